// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vaultshift.toml` > `~/.config/vaultshift/vaultshift.toml`
//! > `/etc/vaultshift/vaultshift.toml`, environment variable overrides via the
//! `VAULTSHIFT_` prefix, and `key=value` startup overrides on top of everything.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MigrationConfig;
use crate::overrides::Override;

/// Config sections, used to map `VAULTSHIFT_<SECTION>_<KEY>` onto `section.key`.
const SECTIONS: &[&str] = &["app", "bitwarden", "source", "lastpass", "cli"];

/// Local config file name.
pub const CONFIG_FILE_NAME: &str = "vaultshift.toml";

/// Load configuration from the standard XDG hierarchy with env var and
/// startup overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vaultshift/vaultshift.toml` (system-wide)
/// 3. `~/.config/vaultshift/vaultshift.toml` (user XDG config)
/// 4. `./vaultshift.toml` (local directory)
/// 5. `VAULTSHIFT_*` environment variables
/// 6. `key=value` startup overrides
pub fn load_config(overrides: &[Override]) -> Result<MigrationConfig, figment::Error> {
    build_figment(overrides).extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MigrationConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MigrationConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var and startup overrides.
pub fn load_config_from_path(
    path: &Path,
    overrides: &[Override],
) -> Result<MigrationConfig, figment::Error> {
    let figment = Figment::new()
        .merge(Serialized::defaults(MigrationConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider());
    with_overrides(figment, overrides).extract()
}

/// Build the Figment used for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment(overrides: &[Override]) -> Figment {
    let figment = Figment::new()
        .merge(Serialized::defaults(MigrationConfig::default()))
        .merge(Toml::file("/etc/vaultshift/vaultshift.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vaultshift").join(CONFIG_FILE_NAME))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider());
    with_overrides(figment, overrides)
}

fn with_overrides(figment: Figment, overrides: &[Override]) -> Figment {
    overrides
        .iter()
        .fold(figment, |fig, o| fig.merge((o.path, o.value.clone())))
}

/// Environment provider mapping `VAULTSHIFT_BITWARDEN_CLIENT_ID` to
/// `bitwarden.client_id`.
///
/// Only the leading section name is turned into a dot; `Env::split("_")`
/// would wrongly split keys such as `client_id`.
fn env_provider() -> Env {
    Env::prefixed("VAULTSHIFT_").map(|key| env_key_path(key.as_str()).into())
}

/// Map an unprefixed env key such as `BITWARDEN_CLIENT_ID` to `bitwarden.client_id`.
///
/// Figment passes keys in their original case, so matching is done on the
/// lowercased key.
fn env_key_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::parse_overrides;
    use figment::Jail;

    #[test]
    fn env_keys_map_regardless_of_case() {
        assert_eq!(env_key_path("BITWARDEN_CLIENT_ID"), "bitwarden.client_id");
        assert_eq!(env_key_path("lastpass_skip_shared"), "lastpass.skip_shared");
        assert_eq!(env_key_path("CLI_RELEASE_BASE_URL"), "cli.release_base_url");
        assert_eq!(env_key_path("UNKNOWN_KEY"), "unknown_key");
    }

    #[test]
    fn env_var_loads_through_explicit_path() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "")?;
            jail.set_env("VAULTSHIFT_BITWARDEN_CLIENT_SECRET", "from-env");
            jail.set_env("VAULTSHIFT_SOURCE_KIND", "lastpass_csv");

            let config = load_config_from_path(Path::new("custom.toml"), &[])?;
            assert_eq!(config.bitwarden.client_secret, "from-env");
            assert_eq!(config.source.kind, crate::model::SourceKind::LastpassCsv);
            Ok(())
        });
    }

    #[test]
    fn env_var_maps_to_section_key() {
        Jail::expect_with(|jail| {
            jail.set_env("VAULTSHIFT_BITWARDEN_CLIENT_ID", "user.abc");
            jail.set_env("VAULTSHIFT_LASTPASS_SKIP_SHARED", "true");
            jail.set_env("VAULTSHIFT_CLI_VERSION", "2024.1.0");

            let config = load_config(&[])?;
            assert_eq!(config.bitwarden.client_id, "user.abc");
            assert!(config.lastpass.skip_shared);
            assert_eq!(config.cli.version, "2024.1.0");
            Ok(())
        });
    }

    #[test]
    fn local_file_is_read_from_working_directory() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
[lastpass]
email = "file@example.com"
"#,
            )?;
            let config = load_config(&[])?;
            assert_eq!(config.lastpass.email, "file@example.com");
            Ok(())
        });
    }

    #[test]
    fn overrides_beat_env_and_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
[bitwarden]
server_url = "https://from-file.example.com"
"#,
            )?;
            jail.set_env("VAULTSHIFT_BITWARDEN_SERVER_URL", "https://from-env.example.com");

            let overrides =
                parse_overrides(["server_url=https://from-args.example.com", "skip_shared=yes"])
                    .expect("overrides should parse");
            let config = load_config(&overrides)?;
            assert_eq!(config.bitwarden.server_url, "https://from-args.example.com");
            assert!(config.lastpass.skip_shared);
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_used() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[cli]
version = "2023.12.1"
"#,
            )?;
            let config = load_config_from_path(Path::new("custom.toml"), &[])?;
            assert_eq!(config.cli.version, "2023.12.1");
            Ok(())
        });
    }
}
