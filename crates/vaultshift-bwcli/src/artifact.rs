// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Release URLs and on-disk layout of the Bitwarden CLI.

use std::path::{Path, PathBuf};

use strum::{Display, EnumString};

/// Platform names used in Bitwarden CLI release artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Windows,
    Macos,
    Linux,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else {
            Self::Linux
        }
    }

    pub fn executable_name(self) -> &'static str {
        match self {
            Self::Windows => "bw.exe",
            Self::Macos | Self::Linux => "bw",
        }
    }
}

/// A specific CLI release on a specific release host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliRelease {
    pub base_url: String,
    pub version: String,
    pub platform: Platform,
}

impl CliRelease {
    pub fn new(
        base_url: impl Into<String>,
        version: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            version: version.into(),
            platform,
        }
    }

    fn release_url(&self) -> String {
        format!(
            "{}/cli-v{}",
            self.base_url.trim_end_matches('/'),
            self.version
        )
    }

    /// `{base}/cli-v{version}/bw-{platform}-{version}.zip`
    pub fn archive_url(&self) -> String {
        format!(
            "{}/bw-{}-{}.zip",
            self.release_url(),
            self.platform,
            self.version
        )
    }

    /// `{base}/cli-v{version}/bw-{platform}-sha256-{version}.txt`
    pub fn checksum_url(&self) -> String {
        format!(
            "{}/bw-{}-sha256-{}.txt",
            self.release_url(),
            self.platform,
            self.version
        )
    }
}

/// File locations under the cache directory.
///
/// ```text
/// <cache>/data.json                       bw state (BITWARDENCLI_APPDATA_DIR)
/// <cache>/bw-cli/<version>/bw[.exe]        executable
/// <cache>/bw-cli/<version>/bw-sha256.txt   checksum of the installed archive
/// <cache>/bw-cli/<version>/bw.zip          downloaded archive (transient)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliLayout {
    cache_dir: PathBuf,
    version: String,
    platform: Platform,
}

impl CliLayout {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        version: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            version: version.into(),
            platform,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Directory handed to `bw` as `BITWARDENCLI_APPDATA_DIR`.
    pub fn appdata_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn state_file(&self) -> PathBuf {
        self.cache_dir.join("data.json")
    }

    pub fn install_dir(&self) -> PathBuf {
        self.cache_dir.join("bw-cli").join(&self.version)
    }

    pub fn executable(&self) -> PathBuf {
        self.install_dir().join(self.platform.executable_name())
    }

    pub fn checksum_file(&self) -> PathBuf {
        self.install_dir().join("bw-sha256.txt")
    }

    pub fn archive_file(&self) -> PathBuf {
        self.install_dir().join("bw.zip")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_urls_follow_upstream_naming() {
        let release = CliRelease::new(
            "https://github.com/bitwarden/clients/releases/download/",
            "2024.9.0",
            Platform::Linux,
        );
        assert_eq!(
            release.archive_url(),
            "https://github.com/bitwarden/clients/releases/download/cli-v2024.9.0/bw-linux-2024.9.0.zip"
        );
        assert_eq!(
            release.checksum_url(),
            "https://github.com/bitwarden/clients/releases/download/cli-v2024.9.0/bw-linux-sha256-2024.9.0.txt"
        );
    }

    #[test]
    fn platform_names() {
        assert_eq!(Platform::Macos.to_string(), "macos");
        assert_eq!(Platform::Windows.executable_name(), "bw.exe");
        assert_eq!(Platform::Linux.executable_name(), "bw");
    }

    #[test]
    fn layout_paths() {
        let layout = CliLayout::new("/cache", "2024.9.0", Platform::Windows);
        assert_eq!(layout.state_file(), PathBuf::from("/cache/data.json"));
        assert_eq!(
            layout.executable(),
            PathBuf::from("/cache/bw-cli/2024.9.0/bw.exe")
        );
        assert_eq!(
            layout.checksum_file(),
            PathBuf::from("/cache/bw-cli/2024.9.0/bw-sha256.txt")
        );
        assert_eq!(
            layout.archive_file(),
            PathBuf::from("/cache/bw-cli/2024.9.0/bw.zip")
        );
    }
}
