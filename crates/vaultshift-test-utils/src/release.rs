// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fake Bitwarden CLI release host backed by wiremock.

use std::io::{Cursor, Write};

use sha2::{Digest, Sha256};
use vaultshift_bwcli::{CliRelease, Platform};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A shell script standing in for `bw`.
///
/// It accepts the master password `master-pass`, hands out the session key
/// `session-xyz` from `unlock`, and reports the number of CSV rows on import.
/// Every call is appended to `$BITWARDENCLI_APPDATA_DIR/calls.log`.
pub const FAKE_BW_SCRIPT: &str = r#"#!/bin/sh
dir="${BITWARDENCLI_APPDATA_DIR:?}"
echo "$1 BW_NOINTERACTION=$BW_NOINTERACTION" >> "$dir/calls.log"
case "$1" in
config)
  exit 0
  ;;
login)
  [ -n "$BW_CLIENTID" ] && [ -n "$BW_CLIENTSECRET" ] || exit 1
  echo '{"logged_in":true}' > "$dir/data.json"
  ;;
unlock)
  [ "$2" = "master-pass" ] || exit 1
  printf 'session-xyz'
  ;;
import)
  [ "$BW_SESSION" = "session-xyz" ] || exit 1
  [ "$2" = "lastpasscsv" ] && [ -f "$3" ] || exit 1
  rows=$(($(wc -l < "$3") - 1))
  echo "Imported $rows items."
  ;;
*)
  exit 2
  ;;
esac
"#;

/// Zip an executable into a release archive.
pub fn cli_archive(executable_name: &str, contents: &[u8]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o644);
    zip.start_file(executable_name, options)
        .expect("zip entry should start");
    zip.write_all(contents).expect("zip entry should write");
    zip.finish().expect("zip should finish").into_inner()
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// A release served by a local mock server.
pub struct FakeRelease {
    pub server: MockServer,
    pub version: String,
    pub platform: Platform,
    pub archive: Vec<u8>,
}

impl FakeRelease {
    /// Start a server with nothing mounted.
    pub async fn start(version: &str, archive: Vec<u8>) -> Self {
        Self {
            server: MockServer::start().await,
            version: version.to_string(),
            platform: Platform::current(),
            archive,
        }
    }

    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    fn release(&self) -> CliRelease {
        CliRelease::new(self.server.uri(), self.version.clone(), self.platform)
    }

    fn path_of(&self, url: &str) -> String {
        url.trim_start_matches(&self.server.uri()).to_string()
    }

    pub fn archive_path(&self) -> String {
        self.path_of(&self.release().archive_url())
    }

    pub fn checksum_path(&self) -> String {
        self.path_of(&self.release().checksum_url())
    }

    /// Serve `text` as the published checksum, expecting `times` requests.
    pub async fn serve_checksum(&self, text: &str, times: u64) {
        Mock::given(method("GET"))
            .and(path(self.checksum_path()))
            .respond_with(ResponseTemplate::new(200).set_body_string(text))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Serve the correct checksum of the archive, expecting `times` requests.
    pub async fn serve_valid_checksum(&self, times: u64) {
        let digest = sha256_hex(&self.archive);
        self.serve_checksum(&digest, times).await;
    }

    /// Serve the archive, expecting `times` requests.
    pub async fn serve_archive(&self, times: u64) {
        Mock::given(method("GET"))
            .and(path(self.archive_path()))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(self.archive.clone()))
            .expect(times)
            .mount(&self.server)
            .await;
    }
}
