use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, info, warn};

use super::asset::{SelectedAsset, select_asset};
use super::config::UpdateConfig;
use super::download::Downloader;
use super::installer::{self, InstallMethod};
use super::notify::Notifier;
use super::platform::Platform;
use super::release::ReleaseClient;
use super::verification::ChecksumVerifier;
use super::version::{is_newer, strip_prefix};
use crate::core::UpdateError;

/// Result of a completed update attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The platform cannot replace a running executable; nothing was done.
    Unsupported {
        platform: Platform,
    },
    /// The installed version is already the latest release.
    UpToDate {
        current: String,
        latest: String,
    },
    /// A new binary was installed.
    Updated {
        from: String,
        to: String,
        /// `false` when the release published no digest and the binary was
        /// installed without an integrity check.
        verified: bool,
        method: InstallMethod,
    },
}

/// Sequences one self-update attempt.
///
/// `SelfUpdater` handles the entire process of checking for and installing
/// a goto update:
///
/// ```text
/// discover -> compare -> select -> download -> verify -> install
/// ```
///
/// Every step is awaited before the next begins and each one is narrated
/// through the [`Notifier`]. The first error aborts the attempt and is
/// returned unchanged; the temporary download is removed on every exit path.
///
/// A `SelfUpdater` is consumed by [`run`](Self::run), so each attempt gets
/// fresh state and its notifier is dropped (closing the pipeline) when the
/// attempt ends.
///
/// # Examples
///
/// ```rust,no_run
/// use goto_cli::update::{NotificationPipeline, Platform, SelfUpdater, UpdateConfig};
///
/// # async fn example() -> Result<(), goto_cli::core::UpdateError> {
/// let (notifier, pipeline) = NotificationPipeline::start(|m| println!("{}", m.content));
///
/// let outcome = SelfUpdater::new(UpdateConfig::default(), Platform::current())
///     .with_notifier(notifier)
///     .run(env!("CARGO_PKG_VERSION"))
///     .await;
///
/// pipeline.shutdown().await;
/// println!("{:?}", outcome?);
/// # Ok(())
/// # }
/// ```
pub struct SelfUpdater {
    config: UpdateConfig,
    platform: Platform,
    /// Install target override; the running executable when `None`.
    target: Option<PathBuf>,
    notifier: Notifier,
}

impl SelfUpdater {
    pub fn new(config: UpdateConfig, platform: Platform) -> Self {
        Self {
            config,
            platform,
            target: None,
            notifier: Notifier::detached(),
        }
    }

    /// Install over `path` instead of the running executable.
    ///
    /// The path is still resolved through symlinks before installing.
    pub fn with_target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Some(path.into());
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Run the attempt for a binary currently at `current_version`.
    ///
    /// # Errors
    ///
    /// Any [`UpdateError`] raised by a step, unchanged. On every error the
    /// installed binary is left as it was.
    pub async fn run(self, current_version: &str) -> Result<UpdateOutcome, UpdateError> {
        let result = self.attempt(current_version).await;
        if let Err(e) = &result {
            debug!("Update attempt failed: {}", e);
            self.notifier.alert("Update aborted; the installed binary was not changed");
        }
        result
    }

    async fn attempt(&self, current_version: &str) -> Result<UpdateOutcome, UpdateError> {
        if !self.platform.supports_self_update() {
            info!("Self-update unsupported on {}", self.platform);
            self.notifier.info(format!(
                "Self-update is not supported on {}; download the new release manually",
                self.platform.os
            ));
            return Ok(UpdateOutcome::Unsupported {
                platform: self.platform.clone(),
            });
        }

        let client = self.http_client()?;

        self.notifier.info("Checking for updates...");
        let release = ReleaseClient::new(client.clone(), &self.config.feed_url)
            .with_timeout(self.config.timeout())
            .fetch_latest()
            .await?;

        let current = strip_prefix(current_version).to_string();
        let latest = strip_prefix(&release.tag).to_string();

        if !is_newer(current_version, &release.tag) {
            info!("Already on latest version {} (feed has {})", current, latest);
            self.notifier.info(format!("Already on the latest version ({current})"));
            return Ok(UpdateOutcome::UpToDate {
                current,
                latest,
            });
        }

        info!("Update available: {} -> {}", current, latest);
        self.notifier.info(format!("New version available: {current} -> {latest}"));

        let asset = select_asset(&release.assets, &self.platform.os, &self.platform.arch)?;
        if asset.digest.is_empty() && self.config.require_digest {
            return Err(UpdateError::MissingDigest {
                asset: asset.name,
            });
        }

        let download = self.create_download_file()?;
        let result = self.download_verify_install(client, &asset, &download).await;
        discard_download(download);
        let (verified, method) = result?;

        self.notifier.success(format!("Updated goto from {current} to {latest}"));
        if !verified {
            self.notifier.warning("This update was installed WITHOUT integrity verification");
        }

        Ok(UpdateOutcome::Updated {
            from: current,
            to: latest,
            verified,
            method,
        })
    }

    async fn download_verify_install(
        &self,
        client: reqwest::Client,
        asset: &SelectedAsset,
        download: &Path,
    ) -> Result<(bool, InstallMethod), UpdateError> {
        self.notifier.info(format!("Downloading {}...", asset.name));
        let bytes = Downloader::new(client).download(download, &asset.url).await?;
        debug!("Downloaded {} bytes to {}", bytes, download.display());

        let verified = if asset.digest.is_empty() {
            self.notifier.warning(format!(
                "No digest published for {}; skipping integrity verification",
                asset.name
            ));
            false
        } else {
            self.notifier.info("Verifying checksum...");
            ChecksumVerifier::verify_checksum(download, &asset.digest).await?;
            self.notifier.success("Checksum verified");
            true
        };

        let target = self.resolve_target().await?;
        self.notifier.info(format!("Installing to {}...", target.display()));
        let method = installer::install(download, &target).await?;

        Ok((verified, method))
    }

    fn http_client(&self) -> Result<reqwest::Client, UpdateError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("goto/", env!("CARGO_PKG_VERSION")));
        // Idle limits only; the metadata request adds its own total deadline
        if let Some(timeout) = self.config.timeout() {
            builder = builder.connect_timeout(timeout).read_timeout(timeout);
        }
        builder.build().map_err(|e| UpdateError::network("building HTTP client", &e))
    }

    fn create_download_file(&self) -> Result<TempPath, UpdateError> {
        let dir = self.config.download_dir();
        let file = tempfile::Builder::new()
            .prefix(".goto-download-")
            .tempfile_in(&dir)
            .map_err(|e| UpdateError::io("creating temporary file in", &dir, e))?;
        Ok(file.into_temp_path())
    }

    async fn resolve_target(&self) -> Result<PathBuf, UpdateError> {
        let path = match &self.target {
            Some(path) => path.clone(),
            None => std::env::current_exe()
                .map_err(|e| UpdateError::io("locating", "current executable", e))?,
        };
        installer::resolve_target(&path).await
    }
}

/// Remove the temporary download if the install did not consume it.
fn discard_download(download: TempPath) {
    let path = download.to_path_buf();
    match download.close() {
        Ok(()) => debug!("Removed temporary download {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove temporary download {}: {}", path.display(), e),
    }
}
