// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vaultshift status` command implementation.
//!
//! Reports what is cached locally. Makes no network requests.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde::Serialize;
use vaultshift_bwcli::{CliLayout, Platform};
use vaultshift_config::MigrationConfig;
use vaultshift_core::VaultshiftError;
use vaultshift_pipeline::CachePaths;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub cache_dir: PathBuf,
    pub executable: PathBuf,
    pub installed: bool,
    pub checksum: Option<String>,
    /// Transient files still on disk; empty after a clean run.
    pub leftovers: Vec<PathBuf>,
}

/// Inspect the cache for `version`.
pub fn collect_status(cache_dir: &Path, version: &str) -> StatusResponse {
    let layout = CliLayout::new(cache_dir, version, Platform::current());
    let checksum = std::fs::read_to_string(layout.checksum_file())
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let leftovers = CachePaths::from_layout(&layout)
        .all()
        .into_iter()
        .filter(|p| p.exists())
        .map(Path::to_path_buf)
        .collect();

    StatusResponse {
        version: version.to_string(),
        cache_dir: cache_dir.to_path_buf(),
        executable: layout.executable(),
        installed: layout.executable().exists(),
        checksum,
        leftovers,
    }
}

/// Run the `vaultshift status` command.
pub async fn run_status(
    config: &MigrationConfig,
    json: bool,
    plain: bool,
) -> Result<bool, VaultshiftError> {
    let status = collect_status(&config.cli.cache_path(), &config.cli.version);

    if json {
        let text = serde_json::to_string_pretty(&status)
            .map_err(|e| VaultshiftError::Internal(format!("failed to serialize status: {e}")))?;
        println!("{text}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&status, use_color);
    }
    Ok(true)
}

fn print_status(status: &StatusResponse, use_color: bool) {
    println!();
    println!("  vaultshift status");
    println!("  {}", "-".repeat(35));

    let state = if status.installed { "installed" } else { "not installed" };
    if use_color {
        use colored::Colorize;
        if status.installed {
            println!("    CLI:      {} bw {} {}", "✓".green(), status.version, state.green());
        } else {
            println!("    CLI:      {} bw {} {}", "✗".red(), status.version, state.red());
        }
    } else {
        let tag = if status.installed { "[OK]" } else { "[MISSING]" };
        println!("    CLI:      {tag} bw {} {state}", status.version);
    }

    println!("    Cache:    {}", status.cache_dir.display());
    println!("    Path:     {}", status.executable.display());
    println!(
        "    SHA-256:  {}",
        status.checksum.as_deref().unwrap_or("(none recorded)")
    );

    if !status.leftovers.is_empty() {
        println!();
        println!("  Transient files left from an interrupted run:");
        for path in &status.leftovers {
            println!("    {}", path.display());
        }
        println!("  Remove them with: vaultshift clean");
    }
    println!();
}
