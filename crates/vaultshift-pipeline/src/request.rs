// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable snapshot of the credential form taken when a run starts.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use vaultshift_bwcli::{BitwardenAccount, UnlockMethod};
use vaultshift_config::{validate_input, MigrationConfig, SourceKind};
use vaultshift_core::{OpenOptions, SourceCredentials, VaultshiftError};
use vaultshift_export::ExportOptions;

/// Where the records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Sign in through the `lpass` executable.
    Lpass { program: PathBuf },
    /// Read an existing LastPass CSV export.
    CsvFile { path: PathBuf },
}

/// Everything one migration needs, validated and detached from the form.
#[derive(Clone)]
pub struct MigrationRequest {
    pub source: SourceSpec,
    pub credentials: SourceCredentials,
    pub export: ExportOptions,
    pub account: BitwardenAccount,
    pub cache_dir: PathBuf,
    pub cli_version: String,
    pub release_base_url: String,
    pub http_timeout: Option<Duration>,
}

impl MigrationRequest {
    /// Validate the form and snapshot it.
    ///
    /// Fails with [`VaultshiftError::Validation`] listing every missing field.
    pub fn from_config(config: &MigrationConfig) -> Result<Self, VaultshiftError> {
        validate_input(config).map_err(|errors| VaultshiftError::Validation {
            reasons: errors.iter().map(ToString::to_string).collect(),
        })?;

        let source = match config.source.kind {
            SourceKind::Lastpass => SourceSpec::Lpass {
                program: PathBuf::from(&config.lastpass.lpass_program),
            },
            SourceKind::LastpassCsv => SourceSpec::CsvFile {
                path: PathBuf::from(config.source.csv_path.as_deref().unwrap_or_default().trim()),
            },
        };

        let bw = &config.bitwarden;
        let unlock = if bw.key_connector {
            UnlockMethod::KeyConnector
        } else {
            UnlockMethod::MasterPassword(SecretString::from(bw.master_password.clone()))
        };

        Ok(Self {
            source,
            credentials: SourceCredentials {
                email: config.lastpass.email.trim().to_string(),
                password: SecretString::from(config.lastpass.password.clone()),
            },
            export: ExportOptions {
                skip_shared: config.lastpass.skip_shared,
                open: OpenOptions {
                    include_secure_notes: config.lastpass.include_secure_notes,
                },
            },
            account: BitwardenAccount {
                server_url: (!bw.uses_default_server()).then(|| bw.server_url.trim().to_string()),
                client_id: bw.client_id.trim().to_string(),
                client_secret: SecretString::from(bw.client_secret.trim().to_string()),
                unlock,
            },
            cache_dir: config.cli.cache_path(),
            cli_version: config.cli.version.clone(),
            release_base_url: config.cli.release_base_url.clone(),
            http_timeout: (config.cli.http_timeout_secs > 0)
                .then(|| Duration::from_secs(config.cli.http_timeout_secs)),
        })
    }
}

impl fmt::Debug for MigrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationRequest")
            .field("source", &self.source)
            .field("credentials", &self.credentials)
            .field("export", &self.export)
            .field("account", &self.account)
            .field("cache_dir", &self.cache_dir)
            .field("cli_version", &self.cli_version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> MigrationConfig {
        let mut config = MigrationConfig::default();
        config.bitwarden.client_id = " user.1234 ".into();
        config.bitwarden.client_secret = "client-secret".into();
        config.bitwarden.master_password = " padded master ".into();
        config.lastpass.email = "me@example.com".into();
        config.lastpass.password = "lp".into();
        config
    }

    #[test]
    fn invalid_form_lists_reasons() {
        let err = MigrationRequest::from_config(&MigrationConfig::default()).unwrap_err();
        match err {
            VaultshiftError::Validation { reasons } => assert_eq!(reasons.len(), 5),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn default_server_means_no_server_config() {
        let request = MigrationRequest::from_config(&filled()).unwrap();
        assert_eq!(request.account.server_url, None);
        assert_eq!(request.account.client_id, "user.1234");
        assert!(matches!(request.account.unlock, UnlockMethod::MasterPassword(_)));
        assert_eq!(
            request.source,
            SourceSpec::Lpass {
                program: PathBuf::from("lpass")
            }
        );
        assert_eq!(request.http_timeout, None);
    }

    #[test]
    fn master_password_is_passed_verbatim() {
        use secrecy::ExposeSecret;

        let request = MigrationRequest::from_config(&filled()).unwrap();
        match &request.account.unlock {
            UnlockMethod::MasterPassword(p) => assert_eq!(p.expose_secret(), " padded master "),
            UnlockMethod::KeyConnector => panic!("expected master password"),
        }
    }

    #[test]
    fn snapshot_is_detached_from_form() {
        let mut config = filled();
        config.bitwarden.server_url = "https://bw.example.com".into();
        config.bitwarden.key_connector = true;
        config.cli.http_timeout_secs = 15;
        let request = MigrationRequest::from_config(&config).unwrap();

        config.clear_sensitive();
        config.bitwarden.server_url.clear();

        assert_eq!(
            request.account.server_url.as_deref(),
            Some("https://bw.example.com")
        );
        assert_eq!(request.account.client_id, "user.1234");
        assert!(matches!(request.account.unlock, UnlockMethod::KeyConnector));
        assert_eq!(request.http_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn debug_output_has_no_secrets() {
        let request = MigrationRequest::from_config(&filled()).unwrap();
        let debug = format!("{request:?}");
        assert!(!debug.contains("client-secret"));
        assert!(!debug.contains("padded master"));
    }
}
