use crate::harness::{NEW_BINARY, TrickleServer, UpdateHarness};
use std::time::Duration;
use goto_cli::core::UpdateError;
use goto_cli::test_utils::{ReleaseFixture, sha256_digest};
use goto_cli::update::{InstallMethod, Level, Message, UpdateOutcome};

const ASSET: &str = "goto-linux-amd64";

fn release_with_digest(harness: &UpdateHarness, digest: &str) -> ReleaseFixture {
    ReleaseFixture::new("v1.1.0")
        .asset("goto-darwin-arm64", &harness.asset_url("goto-darwin-arm64"), "")
        .asset(ASSET, &harness.asset_url(ASSET), digest)
        .asset("goto-windows-amd64.exe", &harness.asset_url("goto-windows-amd64.exe"), "")
}

#[tokio::test]
async fn test_update_replaces_binary() {
    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, &sha256_digest(NEW_BINARY))).await;
    harness.mount_asset(ASSET, NEW_BINARY).await;

    let (result, _) = harness.run(harness.config(), "1.0.0").await;

    assert_eq!(
        result.unwrap(),
        UpdateOutcome::Updated {
            from: "1.0.0".to_string(),
            to: "1.1.0".to_string(),
            verified: true,
            method: InstallMethod::Renamed,
        }
    );
    assert_eq!(harness.installed(), NEW_BINARY);
    harness.assert_no_leftovers();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&harness.target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[tokio::test]
async fn test_update_narrates_each_step_in_order() {
    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, &sha256_digest(NEW_BINARY))).await;
    harness.mount_asset(ASSET, NEW_BINARY).await;

    let (result, messages) = harness.run(harness.config(), "v1.0.0").await;
    result.unwrap();

    let target = std::fs::canonicalize(&harness.target).unwrap();
    assert_eq!(
        messages,
        vec![
            Message::new(Level::Info, "Checking for updates..."),
            Message::new(Level::Info, "New version available: 1.0.0 -> 1.1.0"),
            Message::new(Level::Info, "Downloading goto-linux-amd64..."),
            Message::new(Level::Info, "Verifying checksum..."),
            Message::new(Level::Success, "Checksum verified"),
            Message::new(Level::Info, format!("Installing to {}...", target.display())),
            Message::new(Level::Success, "Updated goto from 1.0.0 to 1.1.0"),
        ]
    );
}

#[tokio::test]
async fn test_checksum_mismatch_leaves_binary_untouched() {
    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, &sha256_digest(b"something else"))).await;
    harness.mount_asset(ASSET, NEW_BINARY).await;

    let (result, messages) = harness.run(harness.config(), "1.0.0").await;

    match result {
        Err(UpdateError::ChecksumMismatch {
            expected,
            actual,
        }) => {
            assert_eq!(expected, sha256_digest(b"something else"));
            assert_eq!(actual, sha256_digest(NEW_BINARY));
        }
        other => panic!("expected checksum mismatch, got {other:?}"),
    }
    harness.assert_target_untouched();
    harness.assert_no_leftovers();

    let last = messages.last().unwrap();
    assert_eq!(last.level, Level::Alert);
    assert!(!messages.iter().any(|m| m.level == Level::Success));
}

#[tokio::test]
async fn test_unsupported_digest_format_is_rejected() {
    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, "md5:0123456789abcdef")).await;
    harness.mount_asset(ASSET, NEW_BINARY).await;

    let (result, _) = harness.run(harness.config(), "1.0.0").await;

    assert!(
        matches!(result, Err(UpdateError::UnsupportedDigestFormat { .. })),
        "got {result:?}"
    );
    harness.assert_target_untouched();
    harness.assert_no_leftovers();
}

#[tokio::test]
async fn test_up_to_date_is_idempotent() {
    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, &sha256_digest(NEW_BINARY))).await;
    harness.mount_asset(ASSET, NEW_BINARY).await;
    let before = std::fs::metadata(&harness.target).unwrap().modified().unwrap();

    for _ in 0..2 {
        let (result, messages) = harness.run(harness.config(), "1.1.0").await;
        assert_eq!(
            result.unwrap(),
            UpdateOutcome::UpToDate {
                current: "1.1.0".to_string(),
                latest: "1.1.0".to_string(),
            }
        );
        assert_eq!(
            messages.last().unwrap(),
            &Message::new(Level::Info, "Already on the latest version (1.1.0)")
        );
    }

    harness.assert_target_untouched();
    let after = std::fs::metadata(&harness.target).unwrap().modified().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_newer_local_build_is_not_downgraded() {
    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, &sha256_digest(NEW_BINARY))).await;

    let (result, _) = harness.run(harness.config(), "1.2").await;

    assert!(matches!(result, Ok(UpdateOutcome::UpToDate { .. })), "got {result:?}");
    harness.assert_target_untouched();
}

#[tokio::test]
async fn test_missing_digest_installs_unverified_with_warning() {
    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, "")).await;
    harness.mount_asset(ASSET, NEW_BINARY).await;

    let (result, messages) = harness.run(harness.config(), "1.0.0").await;

    assert!(
        matches!(
            result,
            Ok(UpdateOutcome::Updated {
                verified: false,
                ..
            })
        ),
        "got {result:?}"
    );
    assert_eq!(harness.installed(), NEW_BINARY);

    let warnings: Vec<&Message> = messages.iter().filter(|m| m.level == Level::Warning).collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].content.contains("No digest published for goto-linux-amd64"));
    assert!(warnings[1].content.contains("WITHOUT integrity verification"));
}

#[tokio::test]
async fn test_missing_digest_refused_when_required() {
    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, "")).await;
    harness.mount_asset(ASSET, NEW_BINARY).await;

    let mut config = harness.config();
    config.require_digest = true;
    let (result, _) = harness.run(config, "1.0.0").await;

    match result {
        Err(UpdateError::MissingDigest {
            asset,
        }) => assert_eq!(asset, ASSET),
        other => panic!("expected missing digest, got {other:?}"),
    }
    harness.assert_target_untouched();
    harness.assert_no_leftovers();
}

#[tokio::test]
async fn test_no_asset_for_platform() {
    let harness = UpdateHarness::new().await;
    let release = ReleaseFixture::new("v1.1.0")
        .asset("goto-darwin-arm64", &harness.asset_url("goto-darwin-arm64"), "")
        .asset("goto-linux-amd64.tar.gz", &harness.asset_url("goto-linux-amd64.tar.gz"), "");
    harness.mount_feed(&release).await;

    let (result, _) = harness.run(harness.config(), "1.0.0").await;

    match result {
        Err(UpdateError::NoMatchingAsset {
            expected,
            expected_exe,
        }) => {
            assert_eq!(expected, "goto-linux-amd64");
            assert_eq!(expected_exe, "goto-linux-amd64.exe");
        }
        other => panic!("expected no matching asset, got {other:?}"),
    }
    harness.assert_target_untouched();
}

#[tokio::test]
async fn test_asset_download_failure() {
    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, &sha256_digest(NEW_BINARY))).await;
    // No asset mock mounted: wiremock answers 404

    let (result, _) = harness.run(harness.config(), "1.0.0").await;

    match result {
        Err(UpdateError::Remote {
            url,
            status,
        }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/download/goto-linux-amd64"));
        }
        other => panic!("expected remote error, got {other:?}"),
    }
    harness.assert_target_untouched();
    harness.assert_no_leftovers();
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_launcher_updates_real_file() {
    use goto_cli::update::{Platform, SelfUpdater};

    let harness = UpdateHarness::new().await;
    harness.mount_feed(&release_with_digest(&harness, &sha256_digest(NEW_BINARY))).await;
    harness.mount_asset(ASSET, NEW_BINARY).await;

    let link = harness.downloads.parent().unwrap().join("goto-link");
    std::os::unix::fs::symlink(&harness.target, &link).unwrap();

    let result = SelfUpdater::new(harness.config(), Platform::new("linux", "amd64"))
        .with_target(&link)
        .run("1.0.0")
        .await;

    assert!(matches!(result, Ok(UpdateOutcome::Updated { .. })), "got {result:?}");
    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(harness.installed(), NEW_BINARY);
}

#[tokio::test]
async fn test_slow_steady_download_is_not_cut_off() {
    let harness = UpdateHarness::new().await;
    let chunks: Vec<Vec<u8>> = NEW_BINARY.chunks(6).map(<[u8]>::to_vec).collect();
    // Five pauses of 400ms: longer than the timeout in total, shorter each
    let asset_server =
        TrickleServer::start(chunks, NEW_BINARY.len(), Duration::from_millis(400)).await;
    let release = ReleaseFixture::new("v1.1.0").asset(
        ASSET,
        &asset_server.url(ASSET),
        &sha256_digest(NEW_BINARY),
    );
    harness.mount_feed(&release).await;

    let mut config = harness.config();
    config.timeout_secs = 1;
    let (result, _) = harness.run(config, "1.0.0").await;

    assert!(
        matches!(
            result,
            Ok(UpdateOutcome::Updated {
                verified: true,
                ..
            })
        ),
        "got {result:?}"
    );
    assert_eq!(harness.installed(), NEW_BINARY);
}

#[tokio::test]
async fn test_stalled_download_times_out() {
    let harness = UpdateHarness::new().await;
    let asset_server =
        TrickleServer::start(vec![NEW_BINARY.to_vec()], NEW_BINARY.len(), Duration::from_secs(3))
            .await;
    let release = ReleaseFixture::new("v1.1.0").asset(
        ASSET,
        &asset_server.url(ASSET),
        &sha256_digest(NEW_BINARY),
    );
    harness.mount_feed(&release).await;

    let mut config = harness.config();
    config.timeout_secs = 1;
    let (result, _) = harness.run(config, "1.0.0").await;

    match result {
        Err(UpdateError::Network {
            operation,
            reason,
        }) => {
            assert_eq!(operation, "downloading release asset");
            assert!(reason.contains("timed out"), "reason: {reason}");
        }
        other => panic!("expected network timeout, got {other:?}"),
    }
    harness.assert_target_untouched();
    harness.assert_no_leftovers();
}

#[tokio::test]
async fn test_connection_dropped_mid_download() {
    let harness = UpdateHarness::new().await;
    let asset_server =
        TrickleServer::start(vec![NEW_BINARY[..10].to_vec()], 4096, Duration::ZERO).await;
    let release = ReleaseFixture::new("v1.1.0").asset(
        ASSET,
        &asset_server.url(ASSET),
        &sha256_digest(NEW_BINARY),
    );
    harness.mount_feed(&release).await;

    let (result, messages) = harness.run(harness.config(), "1.0.0").await;

    match result {
        Err(UpdateError::Network {
            operation,
            ..
        }) => assert_eq!(operation, "downloading release asset"),
        other => panic!("expected network error, got {other:?}"),
    }
    harness.assert_target_untouched();
    harness.assert_no_leftovers();
    assert!(!messages.iter().any(|m| m.content == "Verifying checksum..."));
}

// Needs a download dir on another filesystem than the target; /dev/shm is
// tmpfs on most Linux hosts
#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_cross_filesystem_install_uses_staged_copy() {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    let shm = std::path::Path::new("/dev/shm");
    if !shm.is_dir() {
        eprintln!("skipping: /dev/shm not available");
        return;
    }
    let Ok(downloads) = tempfile::Builder::new().prefix("goto-it-").tempdir_in(shm) else {
        eprintln!("skipping: /dev/shm not writable");
        return;
    };

    let harness = UpdateHarness::new().await;
    let bin = harness.target.parent().unwrap();
    if std::fs::metadata(bin).unwrap().dev() == std::fs::metadata(downloads.path()).unwrap().dev()
    {
        eprintln!("skipping: /dev/shm shares a filesystem with the temp dir");
        return;
    }

    harness.mount_feed(&release_with_digest(&harness, &sha256_digest(NEW_BINARY))).await;
    harness.mount_asset(ASSET, NEW_BINARY).await;

    let mut config = harness.config();
    config.download_dir = Some(downloads.path().to_path_buf());
    let (result, _) = harness.run(config, "1.0.0").await;

    assert!(
        matches!(
            result,
            Ok(UpdateOutcome::Updated {
                method: InstallMethod::Copied,
                ..
            })
        ),
        "got {result:?}"
    );
    assert_eq!(harness.installed(), NEW_BINARY);
    let mode = std::fs::metadata(&harness.target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
    // No staging file beside the target, no download left behind
    harness.assert_no_leftovers();
    assert_eq!(std::fs::read_dir(downloads.path()).unwrap().count(), 0);
}
