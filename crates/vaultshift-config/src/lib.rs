// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration and credential input for vaultshift.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, `key=value` startup overrides, Elm-style diagnostic error
//! rendering with typo suggestions, and the migration input validator.
//!
//! # Usage
//!
//! ```no_run
//! use vaultshift_config::{load_and_validate, parse_overrides};
//!
//! let overrides = parse_overrides(["skip_shared=true"]).expect("bad overrides");
//! let config = load_and_validate(&overrides).expect("config errors");
//! println!("Bitwarden server: {}", config.bitwarden.server_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod overrides;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{mask_secret, MigrationConfig, SourceKind};
pub use overrides::{parse_overrides, Override, OverrideValue};
pub use validation::{validate_config, validate_input};

use std::path::Path;

/// Load configuration from the XDG hierarchy plus overrides and validate it.
///
/// On a Figment error the loaded TOML sources are re-read so the returned
/// diagnostics can point at the offending line.
pub fn load_and_validate(overrides: &[Override]) -> Result<MigrationConfig, Vec<ConfigError>> {
    match loader::load_config(overrides) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from an explicit file (skipping the XDG lookup) and validate it.
pub fn load_and_validate_path(
    path: &Path,
    overrides: &[Override],
) -> Result<MigrationConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path, overrides) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources: Vec<(String, String)> = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<MigrationConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::CONFIG_FILE_NAME) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::CONFIG_FILE_NAME).display().to_string())
            .unwrap_or_else(|_| loader::CONFIG_FILE_NAME.to_string());
        sources.push((path, content));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("vaultshift").join(loader::CONFIG_FILE_NAME);
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    let system_path = Path::new("/etc/vaultshift/vaultshift.toml");
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}
