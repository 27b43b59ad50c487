// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vaultshift migrate` command implementation.

use std::io::IsTerminal;
use std::sync::Arc;

use tracing::info;
use vaultshift_config::MigrationConfig;
use vaultshift_core::VaultshiftError;
use vaultshift_pipeline::{report, AlertKind, MigrationRunner, Pipeline};

use crate::alert::print_alert;
use crate::prompt::TerminalPrompt;

/// Run one migration in the background and print its alert.
///
/// Returns whether the migration succeeded. The form is dropped afterwards;
/// on success its sensitive fields have already been cleared.
pub async fn run_migrate(
    mut config: MigrationConfig,
    plain: bool,
) -> Result<bool, VaultshiftError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let runner = MigrationRunner::new(Pipeline::new(Arc::new(TerminalPrompt)));

    info!(source = ?config.source.kind, "starting migration");
    let handle = runner.start(&config)?;
    let outcome = handle
        .await
        .map_err(|e| VaultshiftError::Internal(format!("migration task failed: {e}")))?;

    let alert = report(&outcome, &mut config);
    print_alert(&alert, use_color);
    config.clear_sensitive();
    Ok(alert.kind == AlertKind::Success)
}
