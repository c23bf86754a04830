//! Lenient dotted-version comparison.
//!
//! Release tags in the feed are not guaranteed to be valid semver (`v1.2`,
//! `1.10`, `2.0.0-rc1` all show up in practice), so comparison works on
//! dot-separated numeric components and never fails.

use std::cmp::Ordering;

/// Returns `true` when `remote` is strictly newer than `current`.
///
/// Both strings may carry a leading `v` or `V`. Components are compared left to
/// right as non-negative integers; a missing trailing component counts as `0`
/// and a component that does not parse also counts as `0`.
///
/// # Examples
///
/// ```rust
/// use goto_cli::update::version::is_newer;
///
/// assert!(is_newer("1.0.0", "1.0.1"));
/// assert!(is_newer("v1.0", "v1.0.1"));
/// assert!(!is_newer("2.0.0", "1.9.9"));
/// assert!(!is_newer("1.0", "1.0.0"));
/// ```
#[must_use]
pub fn is_newer(current: &str, remote: &str) -> bool {
    compare(current, remote) == Ordering::Less
}

/// Total ordering over version strings under the same normalization as [`is_newer`].
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    let a = components(a);
    let b = components(b);
    let len = a.len().max(b.len());

    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    Ordering::Equal
}

/// Strip one leading `v`/`V` from a tag.
#[must_use]
pub fn strip_prefix(version: &str) -> &str {
    version.strip_prefix(['v', 'V']).unwrap_or(version)
}

fn components(version: &str) -> Vec<u64> {
    strip_prefix(version.trim()).split('.').map(|part| part.parse::<u64>().unwrap_or(0)).collect()
}
