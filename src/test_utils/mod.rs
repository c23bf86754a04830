//! Test utilities for goto
//!
//! Helpers shared by the unit tests and the `integration` test target:
//! logging setup, release feed fixtures, digest helpers and a notification
//! recorder.
//!
//! # Example
//!
//! ```rust,no_run
//! use goto_cli::test_utils::{ReleaseFixture, sha256_digest};
//!
//! let binary = b"#!/bin/sh\necho goto 1.3.0\n";
//! let body = ReleaseFixture::new("v1.3.0")
//!     .asset("goto-linux-amd64", "http://127.0.0.1:8080/goto-linux-amd64", &sha256_digest(binary))
//!     .to_json();
//! assert!(body.contains("tag_name"));
//! ```

use crate::update::{Message, NotificationPipeline, Notifier};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, tests run silently.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Digest string in the feed's format (`sha256:<lowercase hex>`).
pub fn sha256_digest(bytes: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(bytes)))
}

/// Builder for release feed documents.
#[derive(Debug, Clone)]
pub struct ReleaseFixture {
    tag: String,
    assets: Vec<serde_json::Value>,
}

impl ReleaseFixture {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            assets: Vec::new(),
        }
    }

    /// Add an asset. An empty `digest` is written as JSON `null`.
    pub fn asset(mut self, name: &str, url: &str, digest: &str) -> Self {
        let digest = if digest.is_empty() {
            serde_json::Value::Null
        } else {
            json!(digest)
        };
        self.assets.push(json!({
            "name": name,
            "browser_download_url": url,
            "digest": digest,
            "size": 0,
        }));
        self
    }

    pub fn to_value(&self) -> serde_json::Value {
        json!({
            "tag_name": self.tag,
            "name": format!("goto {}", self.tag),
            "draft": false,
            "prerelease": false,
            "assets": self.assets,
        })
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

/// Collected notifications, shared with the sink that fills it.
pub type Recorded = Arc<Mutex<Vec<Message>>>;

/// Start a pipeline whose sink records every message.
///
/// Read the recording only after [`NotificationPipeline::shutdown`].
pub fn recording_pipeline() -> (Notifier, NotificationPipeline, Recorded) {
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);
    let (notifier, pipeline) = NotificationPipeline::start(move |message| {
        if let Ok(mut messages) = sink.lock() {
            messages.push(message);
        }
    });
    (notifier, pipeline, recorded)
}
