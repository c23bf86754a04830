//! Self-update functionality for goto.
//!
//! This module checks a release feed for a newer build, downloads the binary
//! published for the running platform, verifies it against its published
//! digest and swaps it in over the running executable.
//!
//! # Update Process Flow
//!
//! ```text
//! 1. Platform check        refuse (informational) where self-replacement is impossible
//! 2. Discovery             GET feed_url -> Release { tag, assets }
//! 3. Version compare       lenient dotted comparison, optional v prefix
//! 4. Asset selection       goto-<os>-<arch>[.exe], first match wins
//! 5. Download              stream to a temp file, chmod +x
//! 6. Verification          sha256:<hex> digest; missing digest -> warning
//! 7. Install               rename over the real path, staged-copy fallback
//! ```
//!
//! # Safety
//!
//! The installed binary is written exactly once, at the end, after every
//! check has passed. No failure path deletes or truncates it: the fallback
//! stages a full copy next to the target and renames it into place.
//!
//! # Module Structure
//!
//! - [`self_updater`]: the orchestrator, [`SelfUpdater`]
//! - [`release`]: feed client and release data model
//! - [`asset`]: platform asset selection
//! - [`platform`]: OS/architecture identifiers
//! - [`download`]: streaming downloader
//! - [`verification`]: SHA-256 digest verification
//! - [`installer`]: atomic replacement of the executable
//! - [`notify`]: the notification pipeline
//! - [`version`]: version comparison
//! - [`config`]: `[update]` configuration

pub mod asset;
pub mod config;
pub mod download;
pub mod installer;
pub mod notify;
pub mod platform;
pub mod release;
pub mod self_updater;
pub mod verification;
pub mod version;

pub use asset::{SelectedAsset, select_asset};
pub use config::UpdateConfig;
pub use installer::InstallMethod;
pub use notify::{Level, Message, NotificationPipeline, Notifier};
pub use platform::Platform;
pub use release::{Asset, Release, ReleaseClient};
pub use self_updater::{SelfUpdater, UpdateOutcome};
pub use verification::ChecksumVerifier;
pub use version::is_newer;
