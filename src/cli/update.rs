use crate::config::GlobalConfig;
use crate::update::{Level, Message, NotificationPipeline, Platform, SelfUpdater};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

/// Update goto to the latest published release.
///
/// Checks the release feed, downloads the binary for this platform, verifies
/// its digest and replaces the running executable. Takes no options; the
/// feed, timeout and digest policy come from the `[update]` config table.
///
/// # Output
///
/// ```text
/// Checking for updates...
/// New version available: 1.2.0 -> 1.3.0
/// Downloading goto-linux-amd64...
/// Verifying checksum...
/// Checksum verified
/// Installing to /usr/local/bin/goto...
/// Updated goto from 1.2.0 to 1.3.0
/// ```
///
/// "Already on the latest version" and "not supported on this platform" exit
/// with status 0. Any other failure exits non-zero.
#[derive(Args, Debug)]
pub struct UpdateCommand {}

impl UpdateCommand {
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let config = GlobalConfig::load_with_optional(config_path).await?;
        debug!("Using release feed {}", config.update.feed_url);

        let (notifier, pipeline) = NotificationPipeline::start(console_sink);

        let result = SelfUpdater::new(config.update, Platform::current())
            .with_notifier(notifier)
            .run(env!("CARGO_PKG_VERSION"))
            .await;

        // Every narrated step is printed before the final result
        pipeline.shutdown().await;

        let outcome = result?;
        debug!("Update finished: {:?}", outcome);
        Ok(())
    }
}

/// Print a notification to stdout, colored by level.
pub fn console_sink(message: Message) {
    let line = match message.level {
        Level::Info => message.content.cyan(),
        Level::Success => message.content.green(),
        Level::Warning => message.content.yellow(),
        Level::Alert => message.content.red().bold(),
    };
    println!("{line}");
}
