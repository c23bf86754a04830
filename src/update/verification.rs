use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::core::UpdateError;

const SHA256_PREFIX: &str = "sha256:";
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Verifies downloaded binaries against a published content digest.
///
/// Only `sha256:<64 hex>` digests are recognized. Anything else, including
/// an empty string, is rejected: an unrecognized scheme must never result in
/// an installed binary.
///
/// # Security Benefits
///
/// - **Download Integrity**: Detects corrupted or incomplete downloads
/// - **Tamper Detection**: Identifies binaries modified after publishing
pub struct ChecksumVerifier;

impl ChecksumVerifier {
    /// Compute the SHA256 checksum of a file, streaming its content.
    ///
    /// Returns the digest in published form: `sha256:<lowercase hex>`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use goto_cli::update::verification::ChecksumVerifier;
    /// use std::path::Path;
    ///
    /// # async fn example() -> Result<(), goto_cli::core::UpdateError> {
    /// let checksum = ChecksumVerifier::compute_sha256(Path::new("/path/to/binary")).await?;
    /// println!("{}", checksum);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn compute_sha256(file_path: &Path) -> Result<String, UpdateError> {
        debug!("Computing SHA256 checksum for: {}", file_path.display());

        let mut file =
            File::open(file_path).await.map_err(|e| UpdateError::io("opening", file_path, e))?;

        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];
        loop {
            let read = file
                .read(&mut buffer)
                .await
                .map_err(|e| UpdateError::io("reading", file_path, e))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(format!("{SHA256_PREFIX}{}", hex::encode(hasher.finalize())))
    }

    /// Verify a file against a published digest.
    ///
    /// Hex case is ignored. A mismatch reports the digest exactly as published.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::UnsupportedDigestFormat`] unless the digest is `sha256:` followed by 64 hex characters
    /// - [`UpdateError::ChecksumMismatch`] with both values when the content differs
    /// - [`UpdateError::Io`] if the file cannot be opened or read
    pub async fn verify_checksum(file_path: &Path, expected_digest: &str) -> Result<(), UpdateError> {
        let expected_hex = parse_sha256(expected_digest)?;
        info!("Verifying checksum for: {}", file_path.display());

        let actual = Self::compute_sha256(file_path).await?;

        if actual[SHA256_PREFIX.len()..] != expected_hex {
            return Err(UpdateError::ChecksumMismatch {
                expected: expected_digest.to_string(),
                actual,
            });
        }

        info!("Checksum verification successful");
        Ok(())
    }
}

/// Extract the lowercase hex of a `sha256:<64 hex>` digest.
fn parse_sha256(digest: &str) -> Result<String, UpdateError> {
    let unsupported = || UpdateError::UnsupportedDigestFormat {
        digest: digest.to_string(),
    };

    let hex_part = digest.strip_prefix(SHA256_PREFIX).ok_or_else(unsupported)?;
    if hex_part.len() != 64 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(unsupported());
    }

    Ok(hex_part.to_ascii_lowercase())
}
