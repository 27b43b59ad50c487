// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for vaultshift integration tests.
//!
//! Provides mock collaborators and test harness infrastructure for fast,
//! deterministic tests without LastPass, Bitwarden, or GitHub.
//!
//! # Components
//!
//! - [`MockVaultSource`] - Source vault with pre-configured records
//! - [`ScriptedRunner`] - Command runner replaying scripted `bw` outputs
//! - [`StaticPrompt`] - Second-factor prompt with canned answers
//! - [`FakeRelease`] - wiremock host serving a `bw` release

pub mod harness;
pub mod mock_source;
pub mod prompt;
pub mod release;
pub mod scripted_runner;

pub use harness::{TestHarness, TEST_CLI_VERSION};
pub use mock_source::{login, shared_login, MockVaultSource};
pub use prompt::StaticPrompt;
pub use release::{cli_archive, sha256_hex, FakeRelease, FAKE_BW_SCRIPT};
pub use scripted_runner::{Reply, ScriptedRunner};
