//! goto - named directory shortcuts
//!
//! This crate hosts goto's self-update engine and the CLI plumbing around it.
//! Bookmark storage and shell integration live outside this crate; the only
//! things the updater needs from the rest of the program are the version it
//! was built as and somewhere to print progress.
//!
//! # Core Modules
//!
//! - [`update`] - release discovery, verification and atomic self-replacement
//! - [`cli`] - command-line interface (`goto update`)
//! - [`config`] - global configuration (`~/.goto/config.toml`)
//! - [`core`] - error types and user-friendly error rendering
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Update to the latest release
//! goto update
//!
//! # Same, with debug logging
//! goto --verbose update
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod update;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
