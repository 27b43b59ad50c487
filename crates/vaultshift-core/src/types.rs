// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types passed between migration stages.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One entry retrieved from the source vault.
///
/// Owned by the export stage only long enough to serialize it; the contents
/// are wiped when the record is dropped.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AccountRecord {
    pub name: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub notes: String,
    /// Folder path inside the source vault (LastPass "grouping").
    pub folder: String,
    /// True when the record lives in a folder shared with other users.
    pub shared: bool,
    pub favorite: bool,
}

impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("notes", &format_args!("<{} bytes>", self.notes.len()))
            .field("folder", &self.folder)
            .field("shared", &self.shared)
            .field("favorite", &self.favorite)
            .finish()
    }
}

/// Operating system family reported to the source service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum ClientPlatform {
    Desktop,
    Mobile,
}

/// Identifies this client to the source service.
///
/// A fresh identifier is generated for every run so that no device trust
/// carries over between migrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub platform: ClientPlatform,
    pub id: String,
    pub description: String,
}

impl ClientInfo {
    /// Generate a per-run client identity.
    pub fn generate() -> Self {
        Self {
            platform: ClientPlatform::Desktop,
            id: uuid::Uuid::new_v4().simple().to_string(),
            description: format!("vaultshift {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Login credentials for the source service.
#[derive(Clone)]
pub struct SourceCredentials {
    pub email: String,
    pub password: SecretString,
}

impl fmt::Debug for SourceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Session token returned by `bw login --raw` or `bw unlock --raw`.
///
/// Held in memory for a single run and handed to later invocations through
/// `BW_SESSION`.
#[derive(Clone)]
pub struct SessionKey(SecretString);

impl SessionKey {
    /// Wraps raw CLI output. Returns `None` for empty output, which is how the
    /// CLI signals that an unlock is still required.
    pub fn from_output(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(SecretString::from(trimmed.to_string())))
        }
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey([REDACTED])")
    }
}

/// The Bitwarden CLI invocations the driver knows how to perform.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CliStepKind {
    ConfigureServer,
    Login,
    Unlock,
    Import,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_record_debug_hides_password() {
        // Struct update syntax is unavailable: the type implements Drop.
        let mut record = AccountRecord::default();
        record.name = "mail".into();
        record.password = "hunter2".into();
        record.notes = "pin 1234".into();
        let debug = format!("{record:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("1234"));
        assert!(debug.contains("mail"));
    }

    #[test]
    fn generated_client_ids_differ() {
        let a = ClientInfo::generate();
        let b = ClientInfo::generate();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 32);
        assert_eq!(a.platform, ClientPlatform::Desktop);
    }

    #[test]
    fn empty_output_is_not_a_session_key() {
        assert!(SessionKey::from_output("").is_none());
        assert!(SessionKey::from_output("  \n").is_none());
        let key = SessionKey::from_output(" abc123\n").unwrap();
        assert_eq!(key.expose(), "abc123");
        assert_eq!(format!("{key:?}"), "SessionKey([REDACTED])");
    }

    #[test]
    fn source_credentials_debug_hides_password() {
        let creds = SourceCredentials {
            email: "me@example.com".into(),
            password: SecretString::from("s3cret".to_string()),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("me@example.com"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn step_kind_serializes_snake_case() {
        let json = serde_json::to_string(&CliStepKind::ConfigureServer).unwrap();
        assert_eq!(json, r#""configure_server""#);
        assert_eq!(CliStepKind::ConfigureServer.to_string(), "configure_server");
    }
}
