// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits at the seams of the migration pipeline.
//!
//! The source vault and the subprocess runner use `#[async_trait]` for
//! dynamic dispatch; the second-factor prompt is synchronous from the
//! caller's point of view.

pub mod runner;
pub mod source;

pub use runner::{CommandOutput, CommandRunner, Invocation};
pub use source::{OpenOptions, OutOfBandAction, SecondFactorMethod, SecondFactorPrompt, VaultSource};
