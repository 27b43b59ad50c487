// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps a migration outcome to the single alert shown to the user.

use strum::Display;
use vaultshift_config::MigrationConfig;
use vaultshift_core::{CliStepKind, VaultshiftError};

use crate::pipeline::MigrationSummary;

/// Whether the alert reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
}

/// One user-facing alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn success(message: String) -> Self {
        Self {
            kind: AlertKind::Success,
            title: "Migration complete".to_string(),
            message,
        }
    }

    fn error(title: &str, message: String) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.to_string(),
            message,
        }
    }
}

/// Title for a failed `bw` step.
pub fn step_title(step: CliStepKind) -> &'static str {
    match step {
        CliStepKind::ConfigureServer => "Unable to configure the Bitwarden server",
        CliStepKind::Login => "Unable to log into your Bitwarden account",
        CliStepKind::Unlock => "Unable to unlock your Bitwarden vault",
        CliStepKind::Import => "Unable to import your items into Bitwarden",
    }
}

/// Build the alert for `outcome`.
///
/// The sensitive form fields are cleared on success only, so a failed run can
/// be retried without retyping everything.
pub fn report(
    outcome: &Result<MigrationSummary, VaultshiftError>,
    form: &mut MigrationConfig,
) -> Alert {
    match outcome {
        Ok(summary) => {
            form.clear_sensitive();
            Alert::success(success_message(summary))
        }
        Err(e) => error_alert(e),
    }
}

fn success_message(summary: &MigrationSummary) -> String {
    let mut message = match summary.imported {
        Some(n) => format!("Imported {n} items into Bitwarden."),
        None => format!(
            "Imported your LastPass vault ({} items exported) into Bitwarden.",
            summary.exported
        ),
    };
    if summary.skipped_shared > 0 {
        message.push_str(&format!(
            " Skipped {} shared items.",
            summary.skipped_shared
        ));
    }
    message
}

fn error_alert(error: &VaultshiftError) -> Alert {
    match error {
        VaultshiftError::Config(message) => {
            Alert::error("Invalid configuration", message.clone())
        }
        VaultshiftError::Validation { reasons } => {
            Alert::error("Missing required information", reasons.join("\n"))
        }
        VaultshiftError::Export { message, .. } => Alert::error(
            "Unable to export your LastPass vault",
            format!("{message}. Check your LastPass email, password and second factor."),
        ),
        VaultshiftError::Download { .. }
        | VaultshiftError::ChecksumMismatch { .. }
        | VaultshiftError::Archive(_) => {
            Alert::error("Unable to set up the Bitwarden CLI", error.to_string())
        }
        VaultshiftError::CliStep { step, .. } => Alert::error(step_title(*step), error.to_string()),
        VaultshiftError::Busy => Alert::error(
            "A migration is already running",
            "Wait for the current migration to finish.".to_string(),
        ),
        VaultshiftError::Internal(message) => Alert::error("Unexpected error", message.clone()),
    }
}
