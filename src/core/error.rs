//! Error handling for goto self-updates
//!
//! This module provides the strongly-typed error enum returned by every
//! self-update component and the user-friendly rendering used by the CLI.
//! The error system is designed around two core principles:
//! 1. **Strongly-typed errors** so callers can match on the failure mode
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`UpdateError`] - Enumerated error types for every update failure
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! Components return [`UpdateError`] directly and the orchestrator propagates
//! them with `?`, so the message a component produces is the message the user
//! sees. Only the CLI layer switches to [`anyhow`], and [`user_friendly_error`]
//! recovers the typed error from the chain for display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use goto_cli::core::{UpdateError, user_friendly_error};
//!
//! let error = UpdateError::ChecksumMismatch {
//!     expected: "sha256:00".to_string(),
//!     actual: "sha256:ff".to_string(),
//! };
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for every self-update operation.
///
/// Each variant maps to exactly one failure mode of the update pipeline. None
/// of them are retried automatically: every variant is terminal for the
/// current attempt.
///
/// # Error Categories
///
/// ## Release feed
/// - [`Network`](Self::Network) - transport failure (DNS, TLS, timeout, reset)
/// - [`Remote`](Self::Remote) - the server answered with a non-success status
/// - [`Parse`](Self::Parse) - the release document is not valid JSON or lacks fields
///
/// ## Asset selection and integrity
/// - [`NoMatchingAsset`](Self::NoMatchingAsset) - nothing published for this platform
/// - [`MissingDigest`](Self::MissingDigest) - digest required by config but not published
/// - [`UnsupportedDigestFormat`](Self::UnsupportedDigestFormat) - digest scheme not recognized
/// - [`ChecksumMismatch`](Self::ChecksumMismatch) - downloaded bytes do not match the digest
///
/// ## Filesystem
/// - [`Io`](Self::Io) - a read, write or metadata call failed
/// - [`Install`](Self::Install) - the new binary could not be put in place
///
/// [`Other`](Self::Other) carries failures from outside the pipeline, such as
/// an unreadable config file, once they reach the CLI.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Network error while {operation}: {reason}")]
    Network {
        operation: String,
        reason: String,
    },

    #[error("Release server returned HTTP {status} for {url}")]
    Remote {
        url: String,
        status: u16,
    },

    #[error("Failed to parse release metadata: {reason}")]
    Parse {
        reason: String,
    },

    #[error("No release asset matches this platform (looked for '{expected}' or '{expected_exe}')")]
    NoMatchingAsset {
        expected: String,
        expected_exe: String,
    },

    #[error("Release asset '{asset}' has no published digest")]
    MissingDigest {
        asset: String,
    },

    #[error("Unsupported digest format: '{digest}' (expected sha256:<64 hex characters>)")]
    UnsupportedDigestFormat {
        digest: String,
    },

    #[error("Checksum mismatch: expected {expected}, computed {actual}")]
    ChecksumMismatch {
        expected: String,
        actual: String,
    },

    #[error("IO error while {operation} {}: {source}", path.display())]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install update over {}: {reason}", target.display())]
    Install {
        target: PathBuf,
        reason: String,
    },

    #[error("{message}")]
    Other {
        message: String,
    },
}

impl UpdateError {
    /// Build an [`UpdateError::Io`] from an operation label, the path it touched and the cause.
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Map a [`reqwest::Error`] raised before a status code was available.
    pub(crate) fn network(operation: impl Into<String>, error: &reqwest::Error) -> Self {
        let reason = if error.is_timeout() {
            format!("request timed out ({error})")
        } else {
            error.to_string()
        };
        Self::Network {
            operation: operation.into(),
            reason,
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// Pairs an [`UpdateError`] with an optional suggestion and details so the
/// CLI can print something more useful than the bare message.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying update error
    pub error: UpdateError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: UpdateError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Suggestion and details that fit a given [`UpdateError`].
fn hints(error: &UpdateError) -> (Option<&'static str>, Option<&'static str>) {
    match error {
        UpdateError::Network {
            ..
        } => (
            Some("Check your internet connection and try again"),
            Some("The release feed could not be reached"),
        ),
        UpdateError::Remote {
            status: 403 | 429,
            ..
        } => (Some("The release API is rate limiting this address. Wait a while and retry"), None),
        UpdateError::Remote {
            status: 404,
            ..
        } => (Some("Check the feed_url setting in your goto config"), None),
        UpdateError::Remote {
            ..
        } => (Some("The release server may be having trouble. Try again later"), None),
        UpdateError::Parse {
            ..
        } => (
            Some("Check that feed_url points at a release document, not an HTML page"),
            Some("Expected a JSON object with 'tag_name' and 'assets'"),
        ),
        UpdateError::NoMatchingAsset {
            ..
        } => (
            Some("Build goto from source for this platform or download a release manually"),
            Some("The latest release does not publish a binary for this OS/architecture"),
        ),
        UpdateError::MissingDigest {
            ..
        } => (
            Some("Set update.require_digest = false to allow unverified installs"),
            Some("Your configuration requires every update to be verified"),
        ),
        UpdateError::UnsupportedDigestFormat {
            ..
        } => (None, Some("Only sha256 digests are accepted")),
        UpdateError::ChecksumMismatch {
            ..
        } => (
            Some("Retry the update; if it keeps failing, report it to the maintainers"),
            Some("The download was corrupted or tampered with in transit"),
        ),
        UpdateError::Io {
            source,
            ..
        } if source.kind() == std::io::ErrorKind::PermissionDenied => (
            Some("Try running with elevated permissions (sudo/Administrator) or check file ownership"),
            None,
        ),
        UpdateError::Install {
            ..
        } => (
            Some("Check write permission on the directory containing goto, or reinstall manually"),
            None,
        ),
        UpdateError::Io {
            ..
        }
        | UpdateError::Other {
            ..
        } => (None, None),
    }
}

fn create_error_context(error: UpdateError) -> ErrorContext {
    let (suggestion, details) = hints(&error);
    let mut context = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        context = context.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        context = context.with_details(details);
    }
    context
}

/// Convert any error into an [`ErrorContext`] for display.
///
/// Recovers an [`UpdateError`] from the top of the chain; anything else is
/// wrapped as [`UpdateError::Other`] with the causes in the details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<UpdateError>() {
        Ok(update_error) => return create_error_context(update_error),
        Err(error) => error,
    };

    let permission_denied = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == std::io::ErrorKind::PermissionDenied);

    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();
    let mut context = ErrorContext::new(UpdateError::Other {
        message: error.to_string(),
    });
    if !chain.is_empty() {
        context = context.with_details(chain.join(": "));
    }
    if permission_denied {
        context = context.with_suggestion(
            "Try running with elevated permissions (sudo/Administrator) or check file ownership",
        );
    }
    context
}
