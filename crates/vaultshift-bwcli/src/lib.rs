// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bitwarden CLI support for vaultshift.
//!
//! [`CliProvisioner`] downloads the platform release of `bw`, verifies it
//! against the published SHA-256, and keeps it cached between runs.
//! [`CliDriver`] then runs the configure/login/unlock/import sequence through
//! a [`vaultshift_core::CommandRunner`].

pub mod artifact;
pub mod driver;
pub mod process;
pub mod provision;

pub use artifact::{CliLayout, CliRelease, Platform};
pub use driver::{
    plan_steps, BitwardenAccount, CliDriver, CliStep, ImportSummary, SuccessCheck, UnlockMethod,
    IMPORT_SUCCESS_MARKER,
};
pub use process::TokioCommandRunner;
pub use provision::{normalize_checksum, CliProvisioner, ProvisionOutcome, ProvisionedCli};
