use tracing::debug;

use super::release::Asset;
use crate::core::UpdateError;

/// Prefix shared by every published binary.
pub const ASSET_PREFIX: &str = "goto";

/// The download URL and published digest of the asset chosen for a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAsset {
    pub name: String,
    pub url: String,
    /// Returned as published; may be empty.
    pub digest: String,
}

/// Expected asset base name for a platform: `goto-<os>-<arch>`.
#[must_use]
pub fn asset_base_name(os: &str, arch: &str) -> String {
    format!("{ASSET_PREFIX}-{os}-{arch}")
}

/// Pick the first asset named `goto-<os>-<arch>` or `goto-<os>-<arch>.exe`.
///
/// List order decides ties. The digest is passed through untouched; format
/// checks happen at verification time.
///
/// # Errors
///
/// Returns [`UpdateError::NoMatchingAsset`] naming both accepted forms when
/// nothing matches, including for an empty list.
pub fn select_asset(assets: &[Asset], os: &str, arch: &str) -> Result<SelectedAsset, UpdateError> {
    let expected = asset_base_name(os, arch);
    let expected_exe = format!("{expected}.exe");

    let asset = assets
        .iter()
        .find(|asset| asset.name == expected || asset.name == expected_exe)
        .ok_or_else(|| UpdateError::NoMatchingAsset {
            expected: expected.clone(),
            expected_exe: expected_exe.clone(),
        })?;

    debug!("Selected asset {} from {}", asset.name, asset.download_url);
    Ok(SelectedAsset {
        name: asset.name.clone(),
        url: asset.download_url.clone(),
        digest: asset.digest.clone(),
    })
}
