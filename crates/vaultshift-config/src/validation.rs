// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Two passes exist. [`validate_config`] checks structural settings when the
//! configuration is loaded. [`validate_input`] checks that the credential form
//! is complete and runs at the start of every migration, before any side
//! effect.

use crate::diagnostic::ConfigError;
use crate::model::{MigrationConfig, SourceKind};

/// Validate structural settings (URLs, version, cache location).
///
/// Collects every failure; does not fail fast.
pub fn validate_config(config: &MigrationConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.cli.version.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "cli.version must not be empty".to_string(),
        });
    }

    if !is_http_url(&config.cli.release_base_url) {
        errors.push(ConfigError::Validation {
            message: format!(
                "cli.release_base_url `{}` must start with http:// or https://",
                config.cli.release_base_url
            ),
        });
    }

    if config.cli.cache_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "cli.cache_dir must not be empty".to_string(),
        });
    }

    let server = config.bitwarden.server_url.trim();
    if !server.is_empty() && !is_http_url(server) {
        errors.push(ConfigError::Validation {
            message: format!("bitwarden.server_url `{server}` must start with http:// or https://"),
        });
    }

    if !matches!(
        config.app.log_level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` must be one of trace, debug, info, warn, error",
                config.app.log_level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that every field the chosen migration needs is filled in.
///
/// Whitespace-only values count as empty. Every missing field is reported.
pub fn validate_input(config: &MigrationConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut require = |field: &'static str, value: &str, reason: &str| {
        if value.trim().is_empty() {
            errors.push(ConfigError::MissingInput {
                field,
                reason: reason.to_string(),
            });
        }
    };

    require(
        "bitwarden.client_id",
        &config.bitwarden.client_id,
        "Bitwarden API key client_id is required",
    );
    require(
        "bitwarden.client_secret",
        &config.bitwarden.client_secret,
        "Bitwarden API key client_secret is required",
    );
    if !config.bitwarden.key_connector {
        require(
            "bitwarden.master_password",
            &config.bitwarden.master_password,
            "Bitwarden master password is required unless the account uses Key Connector",
        );
    }

    match config.source.kind {
        SourceKind::Lastpass => {
            require(
                "lastpass.email",
                &config.lastpass.email,
                "LastPass email is required",
            );
            require(
                "lastpass.password",
                &config.lastpass.password,
                "LastPass master password is required",
            );
        }
        SourceKind::LastpassCsv => {
            require(
                "source.csv_path",
                config.source.csv_path.as_deref().unwrap_or_default(),
                "Path to the LastPass CSV export is required",
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("https://") || value.starts_with("http://")
}
