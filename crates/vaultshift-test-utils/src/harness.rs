// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end migration tests.
//!
//! `TestHarness` assembles a temp cache directory, a fake release host
//! serving a `bw` stand-in, a completed credential form pointing at both, and
//! mock collaborators. Tests build the pipeline from these pieces.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use vaultshift_config::MigrationConfig;
use vaultshift_core::AccountRecord;

use crate::mock_source::{login, MockVaultSource};
use crate::prompt::StaticPrompt;
use crate::release::{cli_archive, FakeRelease, FAKE_BW_SCRIPT};
use crate::scripted_runner::{Reply, ScriptedRunner};

/// Release version used by the harness.
pub const TEST_CLI_VERSION: &str = "2024.9.0";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    records: Vec<AccountRecord>,
    source_failure: Option<String>,
    replies: Vec<Reply>,
    server_url: Option<String>,
    key_connector: bool,
    skip_shared: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            records: vec![
                login("Mail", "alice", "pw-one"),
                login("Bank", "alice", "pw-two"),
            ],
            source_failure: None,
            replies: vec![Reply::ok(""), Reply::ok("session-xyz"), Reply::ok("Imported 2 items.")],
            server_url: None,
            key_connector: false,
            skip_shared: false,
        }
    }

    /// Records returned by the mock source.
    pub fn with_records(mut self, records: Vec<AccountRecord>) -> Self {
        self.records = records;
        self
    }

    /// Make every source open fail.
    pub fn with_failing_source(mut self, message: &str) -> Self {
        self.source_failure = Some(message.to_string());
        self
    }

    /// Replies for the scripted `bw` runner, in invocation order.
    pub fn with_cli_replies(mut self, replies: Vec<Reply>) -> Self {
        self.replies = replies;
        self
    }

    /// Use a self-hosted server URL.
    pub fn with_server_url(mut self, url: &str) -> Self {
        self.server_url = Some(url.to_string());
        self
    }

    pub fn with_key_connector(mut self) -> Self {
        self.key_connector = true;
        self
    }

    pub fn with_skip_shared(mut self) -> Self {
        self.skip_shared = true;
        self
    }

    /// Build the harness. Nothing is mounted on the release host yet.
    pub async fn build(self) -> TestHarness {
        let cache = tempfile::tempdir().expect("temp cache dir");
        let release = FakeRelease::start(
            TEST_CLI_VERSION,
            cli_archive(
                vaultshift_bwcli::Platform::current().executable_name(),
                FAKE_BW_SCRIPT.as_bytes(),
            ),
        )
        .await;

        let mut config = MigrationConfig::default();
        config.bitwarden.client_id = "user.0000-test".to_string();
        config.bitwarden.client_secret = "client-secret".to_string();
        config.bitwarden.key_connector = self.key_connector;
        if !self.key_connector {
            config.bitwarden.master_password = "master-pass".to_string();
        }
        if let Some(url) = self.server_url {
            config.bitwarden.server_url = url;
        }
        config.lastpass.email = "alice@example.com".to_string();
        config.lastpass.password = "lp-secret".to_string();
        config.lastpass.skip_shared = self.skip_shared;
        config.cli.version = TEST_CLI_VERSION.to_string();
        config.cli.release_base_url = release.base_url();
        config.cli.cache_dir = cache.path().to_string_lossy().to_string();

        let source = Arc::new(match self.source_failure {
            Some(message) => MockVaultSource::failing(message),
            None => MockVaultSource::with_records(self.records),
        });

        TestHarness {
            config,
            source,
            runner: Arc::new(ScriptedRunner::new(self.replies)),
            prompt: Arc::new(StaticPrompt::cancel()),
            release,
            cache,
        }
    }
}

/// A fully assembled test environment.
pub struct TestHarness {
    /// Completed credential form pointing at the temp cache and fake host.
    pub config: MigrationConfig,
    pub source: Arc<MockVaultSource>,
    pub runner: Arc<ScriptedRunner>,
    pub prompt: Arc<StaticPrompt>,
    pub release: FakeRelease,
    cache: TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn cache_dir(&self) -> &Path {
        self.cache.path()
    }
}
