// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock source vault returning pre-configured records.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use vaultshift_core::{
    AccountRecord, ClientInfo, OpenOptions, SecondFactorPrompt, SourceCredentials, VaultSource,
    VaultshiftError,
};

/// A [`VaultSource`] that returns a fixed list of records or a fixed failure.
pub struct MockVaultSource {
    records: Vec<AccountRecord>,
    failure: Option<String>,
    opens: AtomicUsize,
    clients: Mutex<Vec<ClientInfo>>,
}

impl MockVaultSource {
    pub fn with_records(records: Vec<AccountRecord>) -> Self {
        Self {
            records,
            failure: None,
            opens: AtomicUsize::new(0),
            clients: Mutex::new(Vec::new()),
        }
    }

    /// A source whose every open fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::with_records(Vec::new())
        }
    }

    /// How many times `open` was called.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Client identities presented on each open.
    pub async fn clients(&self) -> Vec<ClientInfo> {
        self.clients.lock().await.clone()
    }
}

#[async_trait]
impl VaultSource for MockVaultSource {
    fn name(&self) -> &str {
        "mock-source"
    }

    async fn open(
        &self,
        _credentials: &SourceCredentials,
        client: &ClientInfo,
        _prompt: &dyn SecondFactorPrompt,
        options: &OpenOptions,
    ) -> Result<Vec<AccountRecord>, VaultshiftError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.clients.lock().await.push(client.clone());
        if let Some(message) = &self.failure {
            return Err(VaultshiftError::Export {
                message: message.clone(),
                source: None,
            });
        }
        Ok(self
            .records
            .iter()
            .filter(|r| options.include_secure_notes || r.url != "http://sn")
            .cloned()
            .collect())
    }
}

/// Build a login record.
pub fn login(name: &str, username: &str, password: &str) -> AccountRecord {
    let mut record = AccountRecord::default();
    record.name = name.to_string();
    record.url = format!("https://{}.example.com", name.to_ascii_lowercase());
    record.username = username.to_string();
    record.password = password.to_string();
    record
}

/// Build a login record inside a shared folder.
pub fn shared_login(name: &str, folder: &str) -> AccountRecord {
    let mut record = login(name, "team", "team-password");
    record.folder = format!("Shared-{folder}");
    record.shared = true;
    record
}
