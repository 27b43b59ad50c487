// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline tests using the test harness.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing_test::traced_test;
use vaultshift_bwcli::{CliLayout, Platform, ProvisionOutcome};
use vaultshift_core::{
    AccountRecord, CliStepKind, ClientInfo, OpenOptions, SecondFactorPrompt, SourceCredentials,
    VaultSource, VaultshiftError,
};
use vaultshift_pipeline::{report, AlertKind, CachePaths, MigrationRunner, Pipeline};
use vaultshift_test_utils::{login, shared_login, Reply, TestHarness, TEST_CLI_VERSION};

fn pipeline(h: &TestHarness) -> Pipeline {
    Pipeline::new(h.prompt.clone())
        .with_source(h.source.clone())
        .with_runner(h.runner.clone())
}

fn layout(h: &TestHarness) -> CliLayout {
    CliLayout::new(h.cache_dir(), TEST_CLI_VERSION, Platform::current())
}

fn assert_no_transient_files(h: &TestHarness) {
    let paths = CachePaths::new(h.cache_dir(), TEST_CLI_VERSION);
    for path in paths.all() {
        assert!(!path.exists(), "{} should have been removed", path.display());
    }
}

#[tokio::test]
async fn fresh_install_exports_and_imports() {
    let h = TestHarness::builder().build().await;
    h.release.serve_valid_checksum(1).await;
    h.release.serve_archive(1).await;

    let summary = pipeline(&h).run(&h.config).await.unwrap();

    assert_eq!(summary.exported, 2);
    assert_eq!(summary.imported, Some(2));
    assert_eq!(summary.cli, ProvisionOutcome::Installed);
    assert_eq!(
        summary.steps,
        vec![CliStepKind::Login, CliStepKind::Unlock, CliStepKind::Import]
    );

    let calls = h.runner.invocations().await;
    let interchange = h.cache_dir().join("lastpass_export.csv");
    assert_eq!(calls[0].program, layout(&h).executable());
    assert_eq!(
        calls[2].args.last().map(String::as_str),
        Some(interchange.to_string_lossy().as_ref())
    );
    assert_eq!(calls[2].env_value("BW_SESSION"), Some("session-xyz"));

    assert_eq!(h.source.open_count(), 1);
    assert_no_transient_files(&h);
    assert!(layout(&h).executable().exists());
    assert!(layout(&h).checksum_file().exists());
}

#[tokio::test]
#[traced_test]
async fn secrets_never_reach_the_logs() {
    let h = TestHarness::builder().build().await;
    h.release.serve_valid_checksum(1).await;
    h.release.serve_archive(1).await;

    pipeline(&h).run(&h.config).await.unwrap();

    assert!(logs_contain("migration finished"));
    for secret in ["client-secret", "master-pass", "lp-secret", "session-xyz", "pw-one"] {
        assert!(!logs_contain(secret), "{secret} was logged");
    }
}

#[tokio::test]
async fn second_run_reuses_cached_cli() {
    let mut replies = Vec::new();
    for _ in 0..2 {
        replies.extend([Reply::ok(""), Reply::ok("session-xyz"), Reply::ok("Imported 2 items.")]);
    }
    let h = TestHarness::builder().with_cli_replies(replies).build().await;
    h.release.serve_valid_checksum(2).await;
    h.release.serve_archive(1).await;

    let first = pipeline(&h).run(&h.config).await.unwrap();
    let second = pipeline(&h).run(&h.config).await.unwrap();

    assert_eq!(first.cli, ProvisionOutcome::Installed);
    assert_eq!(second.cli, ProvisionOutcome::Cached);
    assert_no_transient_files(&h);
}

#[tokio::test]
async fn missing_input_has_no_side_effects() {
    let mut h = TestHarness::builder().build().await;
    h.config.bitwarden.client_secret = "   ".into();
    h.config.lastpass.email.clear();

    let err = pipeline(&h).run(&h.config).await.unwrap_err();

    match err {
        VaultshiftError::Validation { reasons } => assert_eq!(reasons.len(), 2),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(h.source.open_count(), 0);
    assert!(h.runner.invocations().await.is_empty());
    assert!(h.release.server.received_requests().await.unwrap().is_empty());
    assert_eq!(std::fs::read_dir(h.cache_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn export_failure_stops_before_download() {
    let h = TestHarness::builder()
        .with_failing_source("Invalid password")
        .build()
        .await;

    let err = pipeline(&h).run(&h.config).await.unwrap_err();

    match &err {
        VaultshiftError::Export { message, .. } => assert!(!message.contains("Invalid password")),
        other => panic!("expected export error, got {other:?}"),
    }
    assert!(h.release.server.received_requests().await.unwrap().is_empty());
    assert!(h.runner.invocations().await.is_empty());
    assert_no_transient_files(&h);
}

#[tokio::test]
async fn checksum_mismatch_never_runs_bw() {
    let h = TestHarness::builder().build().await;
    h.release.serve_checksum(&"f".repeat(64), 1).await;
    h.release.serve_archive(1).await;

    let err = pipeline(&h).run(&h.config).await.unwrap_err();

    assert!(matches!(err, VaultshiftError::ChecksumMismatch { .. }), "got {err:?}");
    assert!(h.runner.invocations().await.is_empty());
    assert!(!layout(&h).executable().exists());
    assert_no_transient_files(&h);
}

#[tokio::test]
async fn leftovers_from_a_crashed_run_are_removed() {
    let h = TestHarness::builder()
        .with_failing_source("offline")
        .build()
        .await;
    let paths = CachePaths::new(h.cache_dir(), TEST_CLI_VERSION);
    std::fs::create_dir_all(paths.archive.parent().unwrap()).unwrap();
    for path in paths.all() {
        std::fs::write(path, b"stale").unwrap();
    }

    pipeline(&h).run(&h.config).await.unwrap_err();

    assert_no_transient_files(&h);
}

#[tokio::test]
async fn import_failure_is_reported_per_step() {
    let h = TestHarness::builder()
        .with_cli_replies(vec![
            Reply::ok(""),
            Reply::ok("session-xyz"),
            Reply::exit(1, "Import format is not valid."),
        ])
        .build()
        .await;
    h.release.serve_valid_checksum(1).await;
    h.release.serve_archive(1).await;

    let mut form = h.config.clone();
    let outcome = pipeline(&h).run(&h.config).await;
    let alert = report(&outcome, &mut form);

    assert_eq!(alert.kind, AlertKind::Error);
    assert_eq!(alert.title, "Unable to import your items into Bitwarden");
    assert_eq!(form.bitwarden.master_password, "master-pass");
    assert_no_transient_files(&h);
}

#[tokio::test]
async fn key_connector_account_uses_login_session() {
    let h = TestHarness::builder()
        .with_key_connector()
        .with_cli_replies(vec![Reply::ok("kc-session"), Reply::ok("Imported 2 items.")])
        .build()
        .await;
    h.release.serve_valid_checksum(1).await;
    h.release.serve_archive(1).await;

    let summary = pipeline(&h).run(&h.config).await.unwrap();

    assert_eq!(summary.steps, vec![CliStepKind::Login, CliStepKind::Import]);
    let calls = h.runner.invocations().await;
    assert_eq!(calls[1].env_value("BW_SESSION"), Some("kc-session"));
}

#[tokio::test]
async fn self_hosted_server_and_shared_filter() {
    let h = TestHarness::builder()
        .with_server_url("https://vault.example.org")
        .with_skip_shared()
        .with_records(vec![
            login("Mail", "alice", "pw"),
            shared_login("Deploy", "Ops"),
        ])
        .with_cli_replies(vec![
            Reply::ok(""),
            Reply::ok(""),
            Reply::ok("session-xyz"),
            Reply::ok("Imported 1 items."),
        ])
        .build()
        .await;
    h.release.serve_valid_checksum(1).await;
    h.release.serve_archive(1).await;

    let summary = pipeline(&h).run(&h.config).await.unwrap();

    assert_eq!(summary.exported, 1);
    assert_eq!(summary.skipped_shared, 1);
    assert_eq!(
        h.runner.subcommands().await,
        vec!["config", "login", "unlock", "import"]
    );
}

#[tokio::test]
async fn runner_reports_validation_through_the_task() {
    let mut h = TestHarness::builder().build().await;
    h.config.bitwarden.client_id.clear();
    let runner = MigrationRunner::new(pipeline(&h));

    let outcome = runner.start(&h.config).unwrap().await.unwrap();

    assert!(matches!(outcome, Err(VaultshiftError::Validation { .. })));
    assert!(!runner.is_running());
}

/// Source that blocks until released, keeping a run in flight.
struct GatedSource {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl VaultSource for GatedSource {
    fn name(&self) -> &str {
        "gated"
    }

    async fn open(
        &self,
        _credentials: &SourceCredentials,
        _client: &ClientInfo,
        _prompt: &dyn SecondFactorPrompt,
        _options: &OpenOptions,
    ) -> Result<Vec<AccountRecord>, VaultshiftError> {
        self.entered.notify_one();
        self.release.notified().await;
        Err(VaultshiftError::Internal("released".into()))
    }
}

#[tokio::test]
async fn second_start_while_running_is_busy() {
    let h = TestHarness::builder().build().await;
    let gate = Arc::new(GatedSource {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let runner = MigrationRunner::new(
        Pipeline::new(h.prompt.clone())
            .with_source(gate.clone())
            .with_runner(h.runner.clone()),
    );

    let handle = runner.start(&h.config).unwrap();
    tokio::time::timeout(Duration::from_secs(5), gate.entered.notified())
        .await
        .unwrap();

    assert!(runner.is_running());
    assert!(matches!(runner.start(&h.config), Err(VaultshiftError::Busy)));

    gate.release.notify_one();
    let outcome = handle.await.unwrap();
    assert!(matches!(outcome, Err(VaultshiftError::Export { .. })));
    assert!(!runner.is_running());

    // The guard is free again once the first run ends.
    gate.release.notify_one();
    let again = runner.start(&h.config).unwrap().await.unwrap();
    assert!(again.is_err());
}

#[cfg(unix)]
const FAKE_LPASS: &str = r#"#!/bin/sh
case "$1" in
login)
  IFS= read -r password
  [ "$password" = "lp-secret" ] || exit 1
  touch "$LPASS_HOME/session"
  echo "Success: Logged in as $4." >&2
  ;;
export)
  [ -f "$LPASS_HOME/session" ] || exit 1
  echo "url,username,password,extra,name,grouping,fav"
  echo "https://mail.example.com,alice,pw-one,,Mail,Personal,1"
  echo "https://vpn.example.com,alice,pw-two,,VPN,Work,0"
  ;;
esac
"#;

#[cfg(unix)]
#[tokio::test]
async fn lpass_source_works_on_a_fresh_cache_dir() {
    use std::os::unix::fs::PermissionsExt;

    let mut h = TestHarness::builder().build().await;
    h.release.serve_valid_checksum(1).await;
    h.release.serve_archive(1).await;

    let bin = tempfile::tempdir().unwrap();
    let lpass = bin.path().join("lpass");
    std::fs::write(&lpass, FAKE_LPASS).unwrap();
    std::fs::set_permissions(&lpass, std::fs::Permissions::from_mode(0o755)).unwrap();

    let cache = h.cache_dir().join("not-yet-created");
    h.config.lastpass.lpass_program = lpass.to_string_lossy().to_string();
    h.config.cli.cache_dir = cache.to_string_lossy().to_string();

    let summary = Pipeline::new(h.prompt.clone())
        .with_runner(h.runner.clone())
        .run(&h.config)
        .await
        .unwrap();

    assert_eq!(summary.exported, 2);
    assert_eq!(summary.cli, ProvisionOutcome::Installed);
    assert_eq!(h.source.open_count(), 0);
    for path in CachePaths::new(&cache, TEST_CLI_VERSION).all() {
        assert!(!path.exists(), "{} should have been removed", path.display());
    }
    // Only the installed CLI is left; the per-run LPASS_HOME is gone.
    let leftovers: Vec<_> = std::fs::read_dir(&cache)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("lpass-"))
        .collect();
    assert!(leftovers.is_empty(), "left behind: {leftovers:?}");
}
