use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default release feed: the GitHub "latest release" endpoint for goto.
pub const DEFAULT_FEED_URL: &str = "https://api.github.com/repos/goto-cli/goto/releases/latest";

/// Configuration settings for goto self-update behavior.
///
/// Stored under the `[update]` table of the global config file. Every field
/// has a default, so an empty or missing table yields [`UpdateConfig::default`].
///
/// # TOML Example
/// ```toml
/// [update]
/// feed_url = "https://api.github.com/repos/goto-cli/goto/releases/latest"
/// timeout_secs = 60
/// require_digest = false
/// download_dir = "/var/tmp"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Release metadata endpoint returning a single release document.
    ///
    /// Point this at a mirror or a local server to test releases before
    /// publishing them.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Network timeout, in seconds.
    ///
    /// The metadata request must complete within this time. The asset
    /// download has no overall limit: connecting, and each wait for the next
    /// chunk of the body, must each finish within it, so a slow but steady
    /// download is never cut off. `0` disables all timeouts.
    ///
    /// # Default: `60`
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Refuse to install an asset that has no published digest.
    ///
    /// # Default: `false`
    ///
    /// Older releases were published without digests, so installs without
    /// one proceed with a warning unless this is enabled.
    #[serde(default)]
    pub require_digest: bool,

    /// Directory for the temporary download. Defaults to the system temp dir.
    ///
    /// Setting this to a directory on the same filesystem as the installed
    /// binary lets the installer use a single atomic rename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            timeout_secs: default_timeout_secs(),
            require_digest: false,
            download_dir: None,
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

impl UpdateConfig {
    /// Default configuration pointed at a different feed.
    pub fn with_feed_url(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            ..Self::default()
        }
    }

    /// Configured timeout, or `None` when disabled.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Directory the temporary download is created in.
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
