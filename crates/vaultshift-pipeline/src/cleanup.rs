// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transient files written during a run, and their removal.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use vaultshift_bwcli::{CliLayout, Platform};

/// File name of the interchange CSV inside the cache directory.
pub const INTERCHANGE_FILE_NAME: &str = "lastpass_export.csv";

/// The three files that must not outlive a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    /// Plaintext CSV handed to `bw import`.
    pub interchange: PathBuf,
    /// `bw` account state, including the encrypted vault and session data.
    pub state: PathBuf,
    /// Downloaded CLI archive.
    pub archive: PathBuf,
}

impl CachePaths {
    pub fn new(cache_dir: &Path, cli_version: &str) -> Self {
        let layout = CliLayout::new(cache_dir, cli_version, Platform::current());
        Self::from_layout(&layout)
    }

    pub fn from_layout(layout: &CliLayout) -> Self {
        Self {
            interchange: layout.cache_dir().join(INTERCHANGE_FILE_NAME),
            state: layout.state_file(),
            archive: layout.archive_file(),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.interchange, &self.state, &self.archive]
    }

    /// Delete every transient file that exists.
    ///
    /// Best-effort and idempotent: missing files are fine, other failures are
    /// logged at debug and otherwise ignored. Returns how many files were
    /// removed.
    pub async fn cleanup(&self) -> usize {
        let mut removed = 0;
        for path in self.all() {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {
                    debug!(path = %path.display(), "removed transient file");
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "could not remove transient file")
                }
            }
        }
        removed
    }
}
