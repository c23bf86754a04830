//! Release metadata discovery.
//!
//! Fetches the latest release document from the configured feed. The feed
//! speaks the GitHub "latest release" JSON shape:
//!
//! ```json
//! {
//!   "tag_name": "v1.4.0",
//!   "assets": [
//!     {
//!       "name": "goto-linux-amd64",
//!       "browser_download_url": "https://example.com/goto-linux-amd64",
//!       "digest": "sha256:9f86d0..."
//!     }
//!   ]
//! }
//! ```

use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::core::UpdateError;

/// A published release: a tag plus its downloadable assets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Release tag, usually with a `v` prefix (e.g. `v1.4.0`).
    #[serde(rename = "tag_name")]
    pub tag: String,
    /// Assets in publish order.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// One downloadable file attached to a [`Release`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
    /// Published content digest (`sha256:<hex>`); empty when not published.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub digest: String,
}

// GitHub sends `"digest": null` for assets uploaded before digests existed.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Release {
    /// Parse a release document.
    pub fn from_json(body: &str) -> Result<Self, UpdateError> {
        serde_json::from_str(body).map_err(|e| UpdateError::Parse {
            reason: e.to_string(),
        })
    }
}

/// Client for the release feed.
pub struct ReleaseClient {
    client: reqwest::Client,
    feed_url: String,
    timeout: Option<Duration>,
}

impl ReleaseClient {
    pub fn new(client: reqwest::Client, feed_url: impl Into<String>) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
            timeout: None,
        }
    }

    /// Total deadline for the metadata request, body included.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Fetch the latest release with a single GET request.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::Network`] on transport failure or timeout
    /// - [`UpdateError::Remote`] on any non-2xx status
    /// - [`UpdateError::Parse`] when the body is not a release document
    pub async fn fetch_latest(&self) -> Result<Release, UpdateError> {
        debug!("Fetching latest release from {}", self.feed_url);

        let mut request = self.client.get(&self.feed_url).header(ACCEPT, "application/vnd.github+json");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpdateError::network("fetching release metadata", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::Remote {
                url: self.feed_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpdateError::network("reading release metadata", &e))?;

        let release = Release::from_json(&body)?;
        debug!("Latest release is {} with {} assets", release.tag, release.assets.len());
        Ok(release)
    }
}
