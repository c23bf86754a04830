//! Core types shared across goto
//!
//! This module holds the error handling foundation used by the self-update
//! engine and the CLI:
//! - **Strongly-typed errors** ([`UpdateError`]) for precise error handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions for CLI users
//! - [`user_friendly_error`] to convert any `anyhow` error into a displayable context
//!
//! # Design Principles
//!
//! Every operation that can fail returns a [`Result`] with a meaningful error.
//! Library code returns [`UpdateError`]; the CLI layer works in
//! [`anyhow::Result`] and converts back for display at the very top.

pub mod error;

pub use error::{ErrorContext, UpdateError, user_friendly_error};
