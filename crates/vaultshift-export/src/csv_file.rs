// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`VaultSource`] reading a CSV file previously exported from LastPass.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;
use vaultshift_core::{
    AccountRecord, ClientInfo, OpenOptions, SecondFactorPrompt, SourceCredentials, VaultSource,
    VaultshiftError,
};
use zeroize::Zeroizing;

use crate::record::read_records;

/// Reads records from an existing LastPass CSV export. No login happens.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl VaultSource for CsvFileSource {
    fn name(&self) -> &str {
        "csv-file"
    }

    async fn open(
        &self,
        _credentials: &SourceCredentials,
        _client: &ClientInfo,
        _prompt: &dyn SecondFactorPrompt,
        options: &OpenOptions,
    ) -> Result<Vec<AccountRecord>, VaultshiftError> {
        let bytes = Zeroizing::new(
            tokio::fs::read(&self.path)
                .await
                .map_err(|e| VaultshiftError::export("failed to read CSV export", e))?,
        );
        let records = read_records(bytes.as_slice(), options.include_secure_notes)
            .map_err(|e| VaultshiftError::export("failed to parse CSV export", e))?;
        info!(path = %self.path.display(), count = records.len(), "read LastPass CSV export");
        Ok(records)
    }
}
