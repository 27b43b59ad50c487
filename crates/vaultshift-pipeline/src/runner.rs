// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background execution with a single-run guard.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use vaultshift_config::MigrationConfig;
use vaultshift_core::VaultshiftError;

use crate::pipeline::{MigrationSummary, Pipeline};
use crate::request::MigrationRequest;

/// Runs one migration at a time on a tokio task.
#[derive(Clone)]
pub struct MigrationRunner {
    pipeline: Arc<Pipeline>,
    guard: Arc<Mutex<()>>,
}

impl MigrationRunner {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            guard: Arc::new(Mutex::new(())),
        }
    }

    /// Snapshot `config` and start the migration in the background.
    ///
    /// Fails with [`VaultshiftError::Busy`] while another run holds the guard.
    /// Validation happens inside the task so that its failure is reported the
    /// same way as every other outcome.
    pub fn start(
        &self,
        config: &MigrationConfig,
    ) -> Result<JoinHandle<Result<MigrationSummary, VaultshiftError>>, VaultshiftError> {
        let permit = self
            .guard
            .clone()
            .try_lock_owned()
            .map_err(|_| VaultshiftError::Busy)?;

        let request = MigrationRequest::from_config(config);
        let pipeline = self.pipeline.clone();
        Ok(tokio::spawn(async move {
            let _permit = permit;
            let outcome = pipeline.run_request(&request?).await;
            debug!("migration task finished");
            outcome
        }))
    }

    /// Whether a migration currently holds the guard.
    pub fn is_running(&self) -> bool {
        self.guard.try_lock().is_err()
    }
}
