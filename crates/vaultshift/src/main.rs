// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vaultshift - Move a LastPass vault into Bitwarden.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod alert;
mod maintenance;
mod migrate;
mod prompt;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vaultshift_config::{ConfigError, MigrationConfig, Override};

/// Vaultshift - Move a LastPass vault into Bitwarden.
#[derive(Parser, Debug)]
#[command(name = "vaultshift", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level, overriding `app.log_level`.
    #[arg(
        long,
        global = true,
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: Option<String>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the migration (the default).
    Migrate {
        /// Pre-fill the form, e.g. `client_id=user.xxxx skip_shared=true`.
        #[arg(value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
    /// Download and verify the Bitwarden CLI without migrating.
    Provision,
    /// Show the cached CLI version, paths, and checksum.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Remove transient files left in the cache directory.
    Clean,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Migrate {
        overrides: Vec::new(),
    });

    let overrides = match &command {
        Commands::Migrate { overrides } => vaultshift_config::parse_overrides(overrides)
            .unwrap_or_else(|errors| exit_with(&errors)),
        _ => Vec::new(),
    };

    let config = load_config(cli.config.as_deref(), &overrides)
        .unwrap_or_else(|errors| exit_with(&errors));

    let log_level = cli.log_level.as_deref().unwrap_or(&config.app.log_level);
    init_tracing(log_level);

    let result = match command {
        Commands::Migrate { .. } => migrate::run_migrate(config, cli.plain).await,
        Commands::Provision => maintenance::run_provision(&config, cli.plain).await,
        Commands::Status { json } => status::run_status(&config, json, cli.plain).await,
        Commands::Clean => maintenance::run_clean(&config).await,
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn load_config(
    path: Option<&std::path::Path>,
    overrides: &[Override],
) -> Result<MigrationConfig, Vec<ConfigError>> {
    match path {
        Some(path) => vaultshift_config::load_and_validate_path(path, overrides),
        None => vaultshift_config::load_and_validate(overrides),
    }
}

fn exit_with(errors: &[ConfigError]) -> ! {
    vaultshift_config::render_errors(errors);
    std::process::exit(1);
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vaultshift={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
