//! Configuration management for goto.
//!
//! goto reads a single global TOML file (see [`GlobalConfig`]). Today it only
//! carries the `[update]` table consumed by the self-update engine.

mod global;

pub use global::{CONFIG_ENV_VAR, GlobalConfig};
