//! Placing a verified binary over the running executable.
//!
//! ```text
//! install(source, target)
//!   ├── rename(source, target)              -> Renamed   (atomic, same filesystem)
//!   └── on failure (e.g. EXDEV):
//!       ├── copy(source, .<name>.goto-update)   staged next to target
//!       ├── chmod +x staging
//!       └── rename(staging, target)         -> Copied    (atomic within target dir)
//! ```
//!
//! The target is never deleted or truncated. If both paths fail the staging
//! file is removed and the original binary is untouched.

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::core::UpdateError;

/// How the new binary reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Single atomic rename of the download onto the target.
    Renamed,
    /// Copied into a staging file beside the target, then renamed over it.
    Copied,
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renamed => f.write_str("atomic rename"),
            Self::Copied => f.write_str("staged copy"),
        }
    }
}

/// Resolve the real path of an executable, following symlinks.
///
/// A symlinked launcher (e.g. `/usr/local/bin/goto -> /opt/goto/goto`) must
/// not itself be replaced; the binary it points to is.
pub async fn resolve_target(path: &Path) -> Result<PathBuf, UpdateError> {
    let resolved =
        fs::canonicalize(path).await.map_err(|e| UpdateError::io("resolving", path, e))?;
    if resolved != path {
        debug!("Resolved {} to {}", path.display(), resolved.display());
    }
    Ok(resolved)
}

/// Set the executable bits (`0o755`) on a file. No-op on non-Unix platforms.
pub async fn make_executable(path: &Path) -> Result<(), UpdateError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)
            .await
            .map_err(|e| UpdateError::io("reading metadata of", path, e))?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)
            .await
            .map_err(|e| UpdateError::io("setting permissions on", path, e))?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

/// Move `source` over `target`, falling back to a staged copy.
///
/// `target` must already be symlink-resolved (see [`resolve_target`]).
///
/// # Errors
///
/// Returns [`UpdateError::Install`] carrying both causes when the rename and
/// the fallback copy both fail. `target` is intact in that case.
pub async fn install(source: &Path, target: &Path) -> Result<InstallMethod, UpdateError> {
    match fs::rename(source, target).await {
        Ok(()) => {
            info!("Installed {} by rename", target.display());
            Ok(InstallMethod::Renamed)
        }
        Err(rename_err) => {
            debug!("Rename onto {} failed ({}), falling back to copy", target.display(), rename_err);
            install_by_copy(source, target).await.map_err(|copy_err| UpdateError::Install {
                target: target.to_path_buf(),
                reason: format!("rename failed ({rename_err}); copy fallback failed ({copy_err})"),
            })?;
            info!("Installed {} by staged copy", target.display());
            Ok(InstallMethod::Copied)
        }
    }
}

/// Staging path beside `target`: `<dir>/.<name>.goto-update`.
fn staging_path(target: &Path) -> PathBuf {
    let name = target.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    target.with_file_name(format!(".{name}.goto-update"))
}

async fn install_by_copy(source: &Path, target: &Path) -> Result<(), UpdateError> {
    let staging = staging_path(target);
    debug!("Staging copy at {}", staging.display());

    let result = async {
        fs::copy(source, &staging).await.map_err(|e| UpdateError::io("copying to", &staging, e))?;
        make_executable(&staging).await?;
        fs::rename(&staging, target)
            .await
            .map_err(|e| UpdateError::io("renaming staged copy over", target, e))
    }
    .await;

    if result.is_err()
        && let Err(e) = fs::remove_file(&staging).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("Failed to remove staging file {}: {}", staging.display(), e);
    }

    result
}
