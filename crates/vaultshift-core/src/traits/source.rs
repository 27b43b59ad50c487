// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source vault trait and the interactive second-factor callback.

use std::fmt;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::VaultshiftError;
use crate::types::{AccountRecord, ClientInfo, SourceCredentials};

/// Second-factor mechanisms the source service may ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondFactorMethod {
    GoogleAuth,
    Yubikey,
    Duo,
    LastPassAuth,
    Other(String),
}

impl fmt::Display for SecondFactorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoogleAuth => f.write_str("Google Authenticator"),
            Self::Yubikey => f.write_str("YubiKey"),
            Self::Duo => f.write_str("Duo"),
            Self::LastPassAuth => f.write_str("LastPass Authenticator"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Answer to an out-of-band approval request (push notification, Duo call).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfBandAction {
    /// Keep waiting for the approval on the other device.
    Continue,
    /// Give up; the open fails.
    Cancel,
}

/// Callback used by a [`VaultSource`] to satisfy interactive prompts.
///
/// Calls block until the user answers.
pub trait SecondFactorPrompt: Send + Sync {
    /// Ask for a one-time passcode. `None` cancels the login.
    fn passcode(&self, method: &SecondFactorMethod) -> Option<SecretString>;

    /// Tell the user an approval is pending on another device.
    fn approve_out_of_band(&self, method: &SecondFactorMethod) -> OutOfBandAction;
}

/// Parsing options forwarded to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// Keep secure notes as records instead of dropping them.
    pub include_secure_notes: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            include_secure_notes: true,
        }
    }
}

/// Access to the source password vault.
///
/// Implementations authenticate, decrypt, and return every record in vault
/// order. Any failure is reported as an error; callers do not distinguish
/// between kinds of failure.
#[async_trait]
pub trait VaultSource: Send + Sync {
    /// Short name used in logs (e.g., "lpass", "csv-file").
    fn name(&self) -> &str;

    /// Open the vault and return its records.
    async fn open(
        &self,
        credentials: &SourceCredentials,
        client: &ClientInfo,
        prompt: &dyn SecondFactorPrompt,
        options: &OpenOptions,
    ) -> Result<Vec<AccountRecord>, VaultshiftError>;
}
