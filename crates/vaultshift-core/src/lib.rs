// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for vaultshift.
//!
//! This crate provides the error type, the records passed between migration
//! stages, and the collaborator traits that sit at the seams of the pipeline:
//! the source vault, the interactive second-factor prompt, and the subprocess
//! runner used to drive the Bitwarden CLI.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{Phase, VaultshiftError};
pub use types::{AccountRecord, ClientInfo, CliStepKind, SessionKey, SourceCredentials};

// Re-export all collaborator traits at crate root.
pub use traits::{
    CommandOutput, CommandRunner, Invocation, OpenOptions, OutOfBandAction, SecondFactorMethod,
    SecondFactorPrompt, VaultSource,
};
