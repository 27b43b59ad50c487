// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for vaultshift.
//!
//! The model doubles as the credential input form: every field the user can
//! fill in lives here. All structs use `#[serde(deny_unknown_fields)]` so a
//! mistyped key is reported at startup instead of silently ignored.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Bitwarden cloud server. Any other URL triggers `bw config server`.
pub const DEFAULT_SERVER_URL: &str = "https://vault.bitwarden.com";

/// Bitwarden CLI release pinned by default.
pub const DEFAULT_CLI_VERSION: &str = "2024.9.0";

/// Where Bitwarden publishes CLI release artifacts.
pub const DEFAULT_RELEASE_BASE_URL: &str = "https://github.com/bitwarden/clients/releases/download";

/// Top-level vaultshift configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Target Bitwarden account.
    #[serde(default)]
    pub bitwarden: BitwardenConfig,

    /// Which source the records come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// LastPass account.
    #[serde(default)]
    pub lastpass: LastPassConfig,

    /// Bitwarden CLI provisioning.
    #[serde(default)]
    pub cli: CliConfig,
}

impl MigrationConfig {
    /// Wipe every sensitive field of the form. Called after a successful run.
    pub fn clear_sensitive(&mut self) {
        self.bitwarden.client_id.zeroize();
        self.bitwarden.client_secret.zeroize();
        self.bitwarden.master_password.zeroize();
        self.lastpass.email.zeroize();
        self.lastpass.password.zeroize();
    }
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Target Bitwarden account configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BitwardenConfig {
    /// Server URL. Empty or the default cloud URL skips `bw config server`.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Personal API key `client_id`.
    #[serde(default)]
    pub client_id: String,

    /// Personal API key `client_secret`.
    #[serde(default)]
    pub client_secret: String,

    /// Master password used for `bw unlock`.
    #[serde(default)]
    pub master_password: String,

    /// Account unlocks through Key Connector; no master password needed.
    #[serde(default)]
    pub key_connector: bool,
}

impl BitwardenConfig {
    /// True when no `bw config server` call is needed.
    pub fn uses_default_server(&self) -> bool {
        let url = self.server_url.trim().trim_end_matches('/');
        url.is_empty() || url.eq_ignore_ascii_case(DEFAULT_SERVER_URL)
    }
}

impl Default for BitwardenConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            client_id: String::new(),
            client_secret: String::new(),
            master_password: String::new(),
            key_connector: false,
        }
    }
}

impl fmt::Debug for BitwardenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitwardenConfig")
            .field("server_url", &self.server_url)
            .field("client_id", &mask_secret(&self.client_id))
            .field("client_secret", &mask_secret(&self.client_secret))
            .field("master_password", &mask_secret(&self.master_password))
            .field("key_connector", &self.key_connector)
            .finish()
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

/// Supported record sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Sign in to LastPass and export the live vault.
    #[default]
    Lastpass,
    /// Read a CSV file previously exported from LastPass.
    LastpassCsv,
}

/// Source selection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Path to an existing LastPass CSV export (`lastpass_csv` only).
    #[serde(default)]
    pub csv_path: Option<String>,
}

/// LastPass account configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LastPassConfig {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    /// Leave items from shared folders behind.
    #[serde(default)]
    pub skip_shared: bool,

    /// Migrate secure notes as well as logins.
    #[serde(default = "default_true")]
    pub include_secure_notes: bool,

    /// Name or path of the `lpass` executable.
    #[serde(default = "default_lpass_program")]
    pub lpass_program: String,
}

impl Default for LastPassConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            skip_shared: false,
            include_secure_notes: true,
            lpass_program: default_lpass_program(),
        }
    }
}

impl fmt::Debug for LastPassConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastPassConfig")
            .field("email", &self.email)
            .field("password", &mask_secret(&self.password))
            .field("skip_shared", &self.skip_shared)
            .field("include_secure_notes", &self.include_secure_notes)
            .field("lpass_program", &self.lpass_program)
            .finish()
    }
}

fn default_true() -> bool {
    true
}

fn default_lpass_program() -> String {
    "lpass".to_string()
}

/// Bitwarden CLI provisioning configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// CLI release to download, e.g. "2024.9.0".
    #[serde(default = "default_cli_version")]
    pub version: String,

    /// Base URL for release downloads.
    #[serde(default = "default_release_base_url")]
    pub release_base_url: String,

    /// Directory holding the CLI, its state, and the interchange file.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// HTTP timeout in seconds for release downloads. 0 disables the timeout.
    #[serde(default)]
    pub http_timeout_secs: u64,
}

impl CliConfig {
    pub fn cache_path(&self) -> PathBuf {
        PathBuf::from(&self.cache_dir)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: default_cli_version(),
            release_base_url: default_release_base_url(),
            cache_dir: default_cache_dir(),
            http_timeout_secs: 0,
        }
    }
}

fn default_cli_version() -> String {
    DEFAULT_CLI_VERSION.to_string()
}

fn default_release_base_url() -> String {
    DEFAULT_RELEASE_BASE_URL.to_string()
}

fn default_cache_dir() -> String {
    dirs::cache_dir()
        .map(|p| p.join("vaultshift"))
        .unwrap_or_else(|| PathBuf::from(".vaultshift"))
        .to_string_lossy()
        .to_string()
}

/// Mask a secret for display: empty stays visibly empty, anything else is
/// reduced to a short prefix and suffix.
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if value.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    let suffix: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{prefix}...{suffix}")
}
