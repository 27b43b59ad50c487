// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the vaultshift configuration system.

use vaultshift_config::diagnostic::ConfigError;
use vaultshift_config::model::{MigrationConfig, SourceKind};
use vaultshift_config::{
    load_and_validate_str, load_config_from_str, parse_overrides, validate_input,
};

/// Valid TOML with every section deserializes successfully.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
[app]
log_level = "debug"

[bitwarden]
server_url = "https://bw.example.com"
client_id = "user.0f1e"
client_secret = "s3cr3t"
master_password = "correct horse"
key_connector = false

[source]
kind = "lastpass"

[lastpass]
email = "me@example.com"
password = "lp-pass"
skip_shared = true
include_secure_notes = false
lpass_program = "/usr/local/bin/lpass"

[cli]
version = "2024.8.1"
release_base_url = "https://mirror.example.com/bw"
cache_dir = "/tmp/vaultshift-cache"
http_timeout_secs = 30
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.bitwarden.server_url, "https://bw.example.com");
    assert!(!config.bitwarden.uses_default_server());
    assert_eq!(config.bitwarden.client_id, "user.0f1e");
    assert_eq!(config.source.kind, SourceKind::Lastpass);
    assert!(config.lastpass.skip_shared);
    assert!(!config.lastpass.include_secure_notes);
    assert_eq!(config.lastpass.lpass_program, "/usr/local/bin/lpass");
    assert_eq!(config.cli.version, "2024.8.1");
    assert_eq!(config.cli.cache_dir, "/tmp/vaultshift-cache");
    assert_eq!(config.cli.http_timeout_secs, 30);
    assert!(validate_input(&config).is_ok());
}

/// Missing sections fall back to defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    let defaults = MigrationConfig::default();
    assert_eq!(config.bitwarden.server_url, defaults.bitwarden.server_url);
    assert_eq!(config.cli.version, defaults.cli.version);
    assert_eq!(config.source.kind, SourceKind::Lastpass);
    assert!(config.lastpass.include_secure_notes);
}

/// CSV source kind uses its snake_case name.
#[test]
fn csv_source_kind_parses() {
    let config = load_config_from_str(
        r#"
[source]
kind = "lastpass_csv"
csv_path = "/home/me/lastpass.csv"
"#,
    )
    .unwrap();
    assert_eq!(config.source.kind, SourceKind::LastpassCsv);
    assert_eq!(config.source.csv_path.as_deref(), Some("/home/me/lastpass.csv"));
}

/// A typo inside a section becomes a diagnostic with a suggestion and span.
#[test]
fn unknown_key_diagnostic_points_at_typo() {
    let toml = "[lastpass]\nskip_shard = true\n";
    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            span,
            ..
        } => {
            assert_eq!(key, "skip_shard");
            assert_eq!(suggestion.as_deref(), Some("skip_shared"));
            if let Some(span) = span {
                assert_eq!(&toml[span.offset()..span.offset() + span.len()], "skip_shard");
            }
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Wrong value types surface as InvalidType.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[cli]\nhttp_timeout_secs = \"soon\"\n").unwrap_err();
    assert!(
        matches!(
            &errors[0],
            ConfigError::InvalidType { key, .. } if key.contains("http_timeout_secs")
        ),
        "got {errors:?}"
    );
}

/// Structural validation runs after a successful load.
#[test]
fn structural_validation_runs_after_load() {
    let errors = load_and_validate_str("[cli]\nrelease_base_url = \"file:///tmp\"\n").unwrap_err();
    assert!(matches!(
        &errors[0],
        ConfigError::Validation { message } if message.contains("release_base_url")
    ));
}

/// Overrides reach the typed config through the Figment merge.
#[test]
fn overrides_fill_the_form() {
    use figment::{providers::Serialized, Figment};

    let overrides = parse_overrides([
        "client_id=user.abc",
        "client_secret=xyz",
        "key_connector=on",
        "source=lastpass_csv",
        "csv_path=/tmp/in.csv",
    ])
    .unwrap();

    let figment = overrides.iter().fold(
        Figment::new().merge(Serialized::defaults(MigrationConfig::default())),
        |fig, o| fig.merge((o.path, o.value.clone())),
    );
    let config: MigrationConfig = figment.extract().expect("overrides should extract");

    assert_eq!(config.bitwarden.client_id, "user.abc");
    assert!(config.bitwarden.key_connector);
    assert_eq!(config.source.kind, SourceKind::LastpassCsv);
    assert!(validate_input(&config).is_ok());
}

/// Validator reasons are readable on their own.
#[test]
fn validation_reasons_are_human_readable() {
    let errors = validate_input(&MigrationConfig::default()).unwrap_err();
    let reasons: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert!(reasons.iter().any(|r| r.contains("client_id")));
    assert!(reasons.iter().any(|r| r.contains("LastPass email")));
}
