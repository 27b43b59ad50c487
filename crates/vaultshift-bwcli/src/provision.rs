// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Download, verify, and install the Bitwarden CLI.
//!
//! The installed copy is reused while its recorded checksum matches the one
//! published upstream. The recorded checksum is written only after a
//! successful install, so an interrupted install is never mistaken for a
//! fresh one.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use vaultshift_core::VaultshiftError;

use crate::artifact::{CliLayout, CliRelease, Platform};

/// Whether `ensure_cli` had to install anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The cached copy matched the upstream checksum.
    Cached,
    /// A fresh archive was downloaded, verified, and extracted.
    Installed,
}

/// A verified `bw` executable ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedCli {
    pub executable: PathBuf,
    pub outcome: ProvisionOutcome,
    /// Normalized SHA-256 of the installed archive.
    pub checksum: String,
}

/// Ensures a checksum-verified copy of the CLI exists under the cache dir.
pub struct CliProvisioner {
    client: reqwest::Client,
    release: CliRelease,
    layout: CliLayout,
}

impl CliProvisioner {
    /// Create a provisioner for the current platform.
    ///
    /// `timeout` of `None` means requests never time out.
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        version: &str,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, VaultshiftError> {
        let platform = Platform::current();
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("vaultshift/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| VaultshiftError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            release: CliRelease::new(base_url, version, platform),
            layout: CliLayout::new(cache_dir, version, platform),
        })
    }

    /// Overrides the release host (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.release.base_url = url.into();
        self
    }

    pub fn layout(&self) -> &CliLayout {
        &self.layout
    }

    pub fn release(&self) -> &CliRelease {
        &self.release
    }

    /// Make sure a verified executable is installed and return its path.
    pub async fn ensure_cli(&self) -> Result<ProvisionedCli, VaultshiftError> {
        let executable = self.layout.executable();
        let cached_file = self.layout.checksum_file();

        let upstream = self.fetch_checksum().await?;

        if executable.exists()
            && let Some(cached) = read_cached_checksum(&cached_file).await
        {
            if cached == upstream {
                info!(version = %self.release.version, "bitwarden CLI is up to date");
                return Ok(ProvisionedCli {
                    executable,
                    outcome: ProvisionOutcome::Cached,
                    checksum: upstream,
                });
            }
            info!(
                version = %self.release.version,
                "cached bitwarden CLI does not match upstream checksum, reinstalling"
            );
        }

        self.install(&upstream).await?;

        Ok(ProvisionedCli {
            executable,
            outcome: ProvisionOutcome::Installed,
            checksum: upstream,
        })
    }

    async fn install(&self, expected: &str) -> Result<(), VaultshiftError> {
        let install_dir = self.layout.install_dir();
        tokio::fs::create_dir_all(&install_dir)
            .await
            .map_err(|e| archive_error("failed to create install directory", &install_dir, e))?;

        let url = self.release.archive_url();
        info!(version = %self.release.version, url = %url, "downloading bitwarden CLI");
        let bytes = self.download(&url).await?;

        let actual = hex::encode(Sha256::digest(&bytes));
        if actual != expected {
            warn!(url = %url, expected, actual = %actual, "bitwarden CLI checksum mismatch");
            return Err(VaultshiftError::ChecksumMismatch {
                expected: expected.to_string(),
                actual,
            });
        }

        let archive = self.layout.archive_file();
        tokio::fs::write(&archive, &bytes)
            .await
            .map_err(|e| archive_error("failed to write archive", &archive, e))?;

        let dest = install_dir.clone();
        let extracted = tokio::task::spawn_blocking(move || extract_zip(&archive, &dest))
            .await
            .map_err(|e| VaultshiftError::Internal(format!("extraction task failed: {e}")))??;
        debug!(entries = extracted, "archive extracted");

        let executable = self.layout.executable();
        if !executable.exists() {
            return Err(VaultshiftError::Archive(format!(
                "archive did not contain {}",
                self.release.platform.executable_name()
            )));
        }
        make_executable(&executable).await?;

        let cached_file = self.layout.checksum_file();
        tokio::fs::write(&cached_file, expected)
            .await
            .map_err(|e| archive_error("failed to record checksum", &cached_file, e))?;

        info!(
            version = %self.release.version,
            path = %executable.display(),
            "bitwarden CLI installed"
        );
        Ok(())
    }

    async fn fetch_checksum(&self) -> Result<String, VaultshiftError> {
        let url = self.release.checksum_url();
        let bytes = self.download(&url).await?;
        let text = String::from_utf8_lossy(&bytes);
        normalize_checksum(&text).ok_or_else(|| VaultshiftError::Download {
            url,
            message: "checksum file does not contain a SHA-256 digest".to_string(),
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, VaultshiftError> {
        let download_error = |message: String| VaultshiftError::Download {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_error(format!("status {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(format!("failed to read response body: {e}")))?;
        debug!(url, size = bytes.len(), "downloaded");
        Ok(bytes.to_vec())
    }
}

/// Reduce a published checksum to its lowercase hex digest.
///
/// Accepts a bare digest or `sha256sum`-style `<digest>  <file>` lines, with
/// or without a byte-order mark.
pub fn normalize_checksum(text: &str) -> Option<String> {
    let token = text.trim_start_matches('\u{feff}').split_whitespace().next()?;
    let digest = token.to_ascii_lowercase();
    (digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit())).then_some(digest)
}

async fn read_cached_checksum(path: &Path) -> Option<String> {
    let text = tokio::fs::read_to_string(path).await.ok()?;
    normalize_checksum(&text)
}

fn archive_error(what: &str, path: &Path, e: io::Error) -> VaultshiftError {
    VaultshiftError::Archive(format!("{what} {}: {e}", path.display()))
}

/// Extract every entry of `archive` into `dest`, overwriting existing files.
///
/// Entries whose names would escape `dest` are rejected.
fn extract_zip(archive: &Path, dest: &Path) -> Result<usize, VaultshiftError> {
    let file =
        std::fs::File::open(archive).map_err(|e| archive_error("failed to open", archive, e))?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| VaultshiftError::Archive(format!("not a valid zip archive: {e}")))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| VaultshiftError::Archive(format!("failed to read entry {i}: {e}")))?;
        let relative = entry.enclosed_name().ok_or_else(|| {
            VaultshiftError::Archive(format!("unsafe path in archive: {}", entry.name()))
        })?;
        let target = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(|e| archive_error("failed to create", &target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| archive_error("failed to create", parent, e))?;
        }
        let mut out = std::fs::File::create(&target)
            .map_err(|e| archive_error("failed to create", &target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| archive_error("failed to extract", &target, e))?;
    }

    Ok(zip.len())
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<(), VaultshiftError> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| archive_error("failed to mark executable", path, e))
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<(), VaultshiftError> {
    Ok(())
}
