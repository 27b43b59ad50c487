// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The LastPass CSV schema, used both for reading LastPass exports and for
//! writing the interchange file consumed by `bw import lastpasscsv`.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use vaultshift_core::AccountRecord;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Columns of the interchange file, in order.
pub const HEADER: [&str; 8] = [
    "url", "username", "password", "totp", "extra", "name", "grouping", "fav",
];

/// LastPass marks secure notes with this pseudo-URL.
pub const SECURE_NOTE_URL: &str = "http://sn";

/// Grouping prefix of folders shared with other users.
pub const SHARED_FOLDER_PREFIX: &str = "Shared-";

/// One row of a LastPass CSV file.
///
/// Missing columns deserialize as empty, so both the web export (with `totp`)
/// and `lpass export` output (without it) are accepted.
// Field-level defaults only; the type implements `Drop`.
#[derive(Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct LastPassRow {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub totp: String,
    #[serde(default)]
    pub extra: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub grouping: String,
    #[serde(default)]
    pub fav: String,
}

impl LastPassRow {
    pub fn from_record(record: &AccountRecord) -> Self {
        Self {
            url: record.url.clone(),
            username: record.username.clone(),
            password: record.password.clone(),
            totp: String::new(),
            extra: record.notes.clone(),
            name: record.name.clone(),
            grouping: record.folder.clone(),
            fav: if record.favorite { "1" } else { "0" }.to_string(),
        }
    }

    pub fn to_record(&self) -> AccountRecord {
        let mut record = AccountRecord::default();
        record.name.clone_from(&self.name);
        record.url.clone_from(&self.url);
        record.username.clone_from(&self.username);
        record.password.clone_from(&self.password);
        record.notes.clone_from(&self.extra);
        record.folder.clone_from(&self.grouping);
        record.shared = self.grouping.starts_with(SHARED_FOLDER_PREFIX);
        record.favorite = self.fav.trim() == "1";
        record
    }

    pub fn is_secure_note(&self) -> bool {
        self.url == SECURE_NOTE_URL
    }
}

/// Write records as LastPass CSV, header first.
pub fn write_records<'a, W, I>(writer: W, records: I) -> csv::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a AccountRecord>,
{
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(HEADER)?;
    let mut written = 0;
    for record in records {
        csv.serialize(LastPassRow::from_record(record))?;
        written += 1;
    }
    csv.flush()?;
    Ok(written)
}

/// Parse LastPass CSV into records.
///
/// Secure notes are dropped unless `include_secure_notes` is set.
pub fn read_records<R: Read>(
    reader: R,
    include_secure_notes: bool,
) -> csv::Result<Vec<AccountRecord>> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut records = Vec::new();
    for row in csv.deserialize::<LastPassRow>() {
        let row = row?;
        if row.is_secure_note() && !include_secure_notes {
            continue;
        }
        records.push(row.to_record());
    }
    Ok(records)
}
