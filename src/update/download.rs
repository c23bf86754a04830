use futures::StreamExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::installer::make_executable;
use crate::core::UpdateError;

/// Streams release assets to disk.
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
        }
    }

    /// Download `url` into `dest`, replacing any existing file, and mark it executable.
    ///
    /// The body is written chunk by chunk as it arrives and flushed to disk
    /// before returning. The caller owns `dest` and must remove it.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::Network`] on transport failure, timeout or a dropped body
    /// - [`UpdateError::Remote`] on any non-2xx status (nothing is written)
    /// - [`UpdateError::Io`] when the file cannot be written
    pub async fn download(&self, dest: &Path, url: &str) -> Result<u64, UpdateError> {
        debug!("Downloading {} to {}", url, dest.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpdateError::network("downloading release asset", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::Remote {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file =
            File::create(dest).await.map_err(|e| UpdateError::io("creating", dest, e))?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| UpdateError::network("downloading release asset", &e))?;
            file.write_all(&chunk).await.map_err(|e| UpdateError::io("writing", dest, e))?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| UpdateError::io("flushing", dest, e))?;
        file.sync_all().await.map_err(|e| UpdateError::io("syncing", dest, e))?;
        drop(file);

        make_executable(dest).await?;

        debug!("Downloaded {} bytes", written);
        Ok(written)
    }
}
