// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source vault access and the interchange CSV for vaultshift.
//!
//! [`VaultExporter`] opens a [`vaultshift_core::VaultSource`], filters the
//! records, and writes them in the LastPass CSV schema that `bw import
//! lastpasscsv` understands. Two sources are provided: [`LpassSource`] signs
//! in through the `lpass` client, [`CsvFileSource`] reads an export the user
//! already has.

pub mod csv_file;
pub mod exporter;
pub mod lpass;
pub mod record;

pub use csv_file::CsvFileSource;
pub use exporter::{ExportOptions, ExportSummary, VaultExporter, EXPORT_FAILED};
pub use lpass::LpassSource;
