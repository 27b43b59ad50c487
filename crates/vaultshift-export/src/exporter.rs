// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opens the source vault and writes the interchange file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use vaultshift_core::{
    ClientInfo, OpenOptions, SecondFactorPrompt, SourceCredentials, VaultSource, VaultshiftError,
};
use zeroize::Zeroizing;

use crate::record::write_records;

/// Message carried by every export failure. The cause is only logged.
pub const EXPORT_FAILED: &str = "could not export the source vault";

/// Filtering applied to the records before they are written.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub skip_shared: bool,
    pub open: OpenOptions,
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported: usize,
    pub skipped_shared: usize,
    pub path: PathBuf,
}

/// Drives a [`VaultSource`] and writes its records to the interchange file.
pub struct VaultExporter {
    source: Arc<dyn VaultSource>,
    destination: PathBuf,
}

impl VaultExporter {
    pub fn new(source: Arc<dyn VaultSource>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source,
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Fetch the vault and write the filtered records.
    ///
    /// Any failure, whether from the source or from writing the file, is
    /// collapsed into one opaque [`VaultshiftError::Export`].
    pub async fn export(
        &self,
        credentials: &SourceCredentials,
        options: &ExportOptions,
        prompt: &dyn SecondFactorPrompt,
    ) -> Result<ExportSummary, VaultshiftError> {
        self.try_export(credentials, options, prompt)
            .await
            .map_err(|e| {
                warn!(source = self.source.name(), error = %e, "vault export failed");
                VaultshiftError::Export {
                    message: EXPORT_FAILED.to_string(),
                    source: None,
                }
            })
    }

    async fn try_export(
        &self,
        credentials: &SourceCredentials,
        options: &ExportOptions,
        prompt: &dyn SecondFactorPrompt,
    ) -> Result<ExportSummary, VaultshiftError> {
        let client = ClientInfo::generate();
        let mut records = self
            .source
            .open(credentials, &client, prompt, &options.open)
            .await?;

        let total = records.len();
        if options.skip_shared {
            records.retain(|r| !r.shared);
        }
        let skipped_shared = total - records.len();

        let mut buf = Zeroizing::new(Vec::new());
        let exported = write_records(&mut *buf, &records)
            .map_err(|e| VaultshiftError::export("failed to serialize records", e))?;
        drop(records);

        write_private(&self.destination, &buf)
            .await
            .map_err(|e| VaultshiftError::export("failed to write interchange file", e))?;

        info!(
            source = self.source.name(),
            exported,
            skipped_shared,
            path = %self.destination.display(),
            "vault exported"
        );

        Ok(ExportSummary {
            exported,
            skipped_shared,
            path: self.destination.clone(),
        })
    }
}

/// Write `contents` to `path`, readable by the owner only on Unix.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut open = tokio::fs::OpenOptions::new();
    open.write(true).create(true).truncate(true);
    #[cfg(unix)]
    open.mode(0o600);

    let mut file = open.open(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }

    Ok(())
}
