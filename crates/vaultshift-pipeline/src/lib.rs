// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Migration orchestration for vaultshift.
//!
//! A run validates the credential form, exports the LastPass vault to the
//! interchange CSV, provisions the Bitwarden CLI, and imports the file. The
//! [`report`] function turns the outcome into one alert, and
//! [`MigrationRunner`] keeps at most one run in flight.

pub mod cleanup;
pub mod pipeline;
pub mod report;
pub mod request;
pub mod runner;

pub use cleanup::{CachePaths, INTERCHANGE_FILE_NAME};
pub use pipeline::{MigrationSummary, Pipeline};
pub use report::{report, step_title, Alert, AlertKind};
pub use request::{MigrationRequest, SourceSpec};
pub use runner::MigrationRunner;
