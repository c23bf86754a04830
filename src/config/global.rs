//! Global configuration for goto.
//!
//! # Location
//!
//! - **Unix/macOS**: `~/.goto/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\goto\config.toml`
//! - **Override**: the `GOTO_CONFIG` environment variable or `--config <path>`
//!
//! # File Format
//!
//! ```toml
//! [update]
//! feed_url = "https://api.github.com/repos/goto-cli/goto/releases/latest"
//! timeout_secs = 60
//! require_digest = true
//! ```

use crate::update::config::UpdateConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "GOTO_CONFIG";

/// Global configuration for goto.
///
/// A missing file is not an error: every setting has a default. A file that
/// exists but cannot be read or parsed is reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Self-update settings (`[update]` table).
    #[serde(default)]
    pub update: UpdateConfig,
}

impl GlobalConfig {
    /// Load from `path` when given, else from the default location.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse global config from {}", path.display()))
    }

    /// Resolve the config file path, honoring [`CONFIG_ENV_VAR`].
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("goto")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".goto")
        };

        Ok(config_dir.join("config.toml"))
    }
}
