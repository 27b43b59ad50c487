// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vaultshift provision` and `vaultshift clean` command implementations.

use std::io::IsTerminal;
use std::time::Duration;

use vaultshift_bwcli::{CliProvisioner, ProvisionOutcome};
use vaultshift_config::MigrationConfig;
use vaultshift_core::VaultshiftError;
use vaultshift_pipeline::CachePaths;

/// Download and verify the configured CLI release.
///
/// The downloaded archive is transient and removed afterwards, like after a
/// migration.
pub async fn run_provision(config: &MigrationConfig, plain: bool) -> Result<bool, VaultshiftError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let timeout = (config.cli.http_timeout_secs > 0)
        .then(|| Duration::from_secs(config.cli.http_timeout_secs));
    let provisioner = CliProvisioner::new(
        config.cli.cache_path(),
        &config.cli.version,
        &config.cli.release_base_url,
        timeout,
    )?;

    let result = provisioner.ensure_cli().await;
    CachePaths::from_layout(provisioner.layout()).cleanup().await;
    let cli = result?;

    let state = match cli.outcome {
        ProvisionOutcome::Cached => "already up to date",
        ProvisionOutcome::Installed => "installed",
    };
    if use_color {
        use colored::Colorize;
        println!("  {} bw {} {}", "✓".green(), config.cli.version, state.green());
    } else {
        println!("  [OK] bw {} {state}", config.cli.version);
    }
    println!("    Path:     {}", cli.executable.display());
    println!("    SHA-256:  {}", cli.checksum);
    Ok(true)
}

/// Remove transient files from the cache directory.
pub async fn run_clean(config: &MigrationConfig) -> Result<bool, VaultshiftError> {
    let paths = CachePaths::new(&config.cli.cache_path(), &config.cli.version);
    let removed = paths.cleanup().await;
    let noun = if removed == 1 { "file" } else { "files" };
    println!("Removed {removed} transient {noun}.");
    Ok(true)
}
