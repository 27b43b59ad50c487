// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for vaultshift.

use strum::Display;
use thiserror::Error;

use crate::types::CliStepKind;

/// The primary error type used across every migration stage.
#[derive(Debug, Error)]
pub enum VaultshiftError {
    /// Configuration errors (invalid TOML, bad overrides, unusable paths).
    #[error("configuration error: {0}")]
    Config(String),

    /// Required input fields are missing. Raised before any side effect.
    #[error("missing required input: {}", reasons.join("; "))]
    Validation { reasons: Vec<String> },

    /// The source vault could not be exported. Deliberately opaque: a wrong
    /// password and a network failure look the same at this layer.
    #[error("could not export source vault: {message}")]
    Export {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A release artifact could not be fetched.
    #[error("download failed for {url}: {message}")]
    Download { url: String, message: String },

    /// The downloaded archive does not match the published checksum.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// The CLI archive could not be unpacked or installed.
    #[error("archive error: {0}")]
    Archive(String),

    /// A Bitwarden CLI invocation failed its success predicate.
    #[error("bw {step} failed (exit code {}): {message}", describe_exit(*exit_code))]
    CliStep {
        step: CliStepKind,
        exit_code: Option<i32>,
        message: String,
    },

    /// A migration is already in progress.
    #[error("a migration is already running")]
    Busy,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// The migration phase an error belongs to, in user terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Configuration,
    Validation,
    Export,
    Setup,
    Bitwarden,
    Runner,
    Internal,
}

impl VaultshiftError {
    /// Returns the phase this error was raised in.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Config(_) => Phase::Configuration,
            Self::Validation { .. } => Phase::Validation,
            Self::Export { .. } => Phase::Export,
            Self::Download { .. } | Self::ChecksumMismatch { .. } | Self::Archive(_) => {
                Phase::Setup
            }
            Self::CliStep { .. } => Phase::Bitwarden,
            Self::Busy => Phase::Runner,
            Self::Internal(_) => Phase::Internal,
        }
    }

    /// Convenience constructor for an export failure wrapping a cause.
    pub fn export<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Export {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
