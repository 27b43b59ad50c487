// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `key=value` startup overrides that pre-fill the credential form.
//!
//! These are a convenience for pre-populating fields, not a scripting
//! interface: only the keys listed in [`OVERRIDE_KEYS`] are accepted.

use serde::Serialize;

use crate::diagnostic::{suggest_key, ConfigError};

/// Value kind accepted for an override key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Flag,
}

/// Accepted override keys and the config paths they set.
pub const OVERRIDE_KEYS: &[(&str, &str)] = &[
    ("server_url", "bitwarden.server_url"),
    ("client_id", "bitwarden.client_id"),
    ("client_secret", "bitwarden.client_secret"),
    ("master_password", "bitwarden.master_password"),
    ("key_connector", "bitwarden.key_connector"),
    ("lastpass_email", "lastpass.email"),
    ("lastpass_password", "lastpass.password"),
    ("skip_shared", "lastpass.skip_shared"),
    ("source", "source.kind"),
    ("csv_path", "source.csv_path"),
];

fn kind_of(key: &str) -> Kind {
    match key {
        "key_connector" | "skip_shared" => Kind::Flag,
        _ => Kind::Text,
    }
}

/// A parsed override value.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Text(String),
    Flag(bool),
}

impl std::fmt::Debug for OverrideValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Overrides routinely carry passwords.
        match self {
            Self::Text(_) => f.write_str("Text(****)"),
            Self::Flag(b) => write!(f, "Flag({b})"),
        }
    }
}

/// A single startup override targeting a dotted config path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub path: &'static str,
    pub value: OverrideValue,
}

/// Parse `key=value` arguments.
///
/// Leading dashes are tolerated (`--server_url=...`). Every malformed
/// argument is reported; parsing does not stop at the first problem.
pub fn parse_overrides<I, S>(args: I) -> Result<Vec<Override>, Vec<ConfigError>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut overrides = Vec::new();
    let mut errors = Vec::new();

    for arg in args {
        let arg = arg.as_ref().trim_start_matches('-');
        let Some((raw_key, raw_value)) = arg.split_once('=') else {
            errors.push(ConfigError::InvalidOverride {
                argument: arg.to_string(),
                reason: "expected key=value".to_string(),
            });
            continue;
        };

        let key = raw_key.trim().to_ascii_lowercase();
        let Some(&(_, path)) = OVERRIDE_KEYS.iter().find(|(k, _)| *k == key) else {
            let valid: Vec<&str> = OVERRIDE_KEYS.iter().map(|(k, _)| *k).collect();
            errors.push(ConfigError::UnknownKey {
                suggestion: suggest_key(&key, &valid),
                key,
                valid_keys: valid.join(", "),
                span: None,
                src: None,
            });
            continue;
        };

        let value = match kind_of(&key) {
            Kind::Text => OverrideValue::Text(raw_value.to_string()),
            Kind::Flag => match parse_flag(raw_value) {
                Some(b) => OverrideValue::Flag(b),
                None => {
                    errors.push(ConfigError::InvalidOverride {
                        argument: key,
                        reason: format!("`{raw_value}` is not a boolean (use true/false)"),
                    });
                    continue;
                }
            },
        };

        overrides.push(Override { path, value });
    }

    if errors.is_empty() {
        Ok(overrides)
    } else {
        Err(errors)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
