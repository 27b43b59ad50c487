// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The migration pipeline: validate, export, provision, import.
//!
//! Stages run strictly in order and the first failure ends the run. The
//! transient files are removed before the first stage and again after the
//! run finishes, whatever the outcome.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};
use vaultshift_bwcli::{
    CliDriver, CliProvisioner, ImportSummary, ProvisionOutcome, TokioCommandRunner,
};
use vaultshift_config::MigrationConfig;
use vaultshift_core::{CliStepKind, CommandRunner, SecondFactorPrompt, VaultSource, VaultshiftError};
use vaultshift_export::{CsvFileSource, ExportSummary, LpassSource, VaultExporter};

use crate::cleanup::CachePaths;
use crate::request::{MigrationRequest, SourceSpec};

/// Outcome of a successful migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationSummary {
    /// Records written to the interchange file.
    pub exported: usize,
    /// Shared records left behind because `skip_shared` was set.
    pub skipped_shared: usize,
    /// Item count reported by `bw import`, when it printed one.
    pub imported: Option<usize>,
    pub cli: ProvisionOutcome,
    pub steps: Vec<CliStepKind>,
}

/// Runs migrations with a fixed set of collaborators.
pub struct Pipeline {
    prompt: Arc<dyn SecondFactorPrompt>,
    source: Option<Arc<dyn VaultSource>>,
    runner: Arc<dyn CommandRunner>,
}

impl Pipeline {
    /// Pipeline using the real `lpass`/CSV sources and real subprocesses.
    pub fn new(prompt: Arc<dyn SecondFactorPrompt>) -> Self {
        Self {
            prompt,
            source: None,
            runner: Arc::new(TokioCommandRunner),
        }
    }

    /// Use `source` instead of the one selected by the request.
    pub fn with_source(mut self, source: Arc<dyn VaultSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Run `bw` through `runner`.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Validate the form, snapshot it, and run the migration.
    ///
    /// An invalid form fails before any file, process, or network access.
    pub async fn run(&self, config: &MigrationConfig) -> Result<MigrationSummary, VaultshiftError> {
        let request = MigrationRequest::from_config(config)?;
        self.run_request(&request).await
    }

    /// Run a migration from an already validated request.
    pub async fn run_request(
        &self,
        request: &MigrationRequest,
    ) -> Result<MigrationSummary, VaultshiftError> {
        let run_id = uuid::Uuid::new_v4().simple().to_string();
        let span = info_span!("migration", run_id = %run_id);
        async {
            let paths = CachePaths::new(&request.cache_dir, &request.cli_version);
            paths.cleanup().await;

            let result = self.stages(request, &paths).await;

            paths.cleanup().await;
            match &result {
                Ok(summary) => info!(
                    exported = summary.exported,
                    imported = ?summary.imported,
                    "migration finished"
                ),
                Err(e) => warn!(phase = %e.phase(), error = %e, "migration failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn stages(
        &self,
        request: &MigrationRequest,
        paths: &CachePaths,
    ) -> Result<MigrationSummary, VaultshiftError> {
        let exporter = VaultExporter::new(self.source_for(request), &paths.interchange);
        let ExportSummary {
            exported,
            skipped_shared,
            ..
        } = exporter
            .export(&request.credentials, &request.export, self.prompt.as_ref())
            .await?;

        let provisioner = CliProvisioner::new(
            &request.cache_dir,
            &request.cli_version,
            &request.release_base_url,
            request.http_timeout,
        )?;
        let cli = provisioner.ensure_cli().await?;

        let driver = CliDriver::new(
            self.runner.clone(),
            &cli.executable,
            provisioner.layout().appdata_dir(),
        );
        let ImportSummary { imported, steps } =
            driver.run(&request.account, &paths.interchange).await?;

        Ok(MigrationSummary {
            exported,
            skipped_shared,
            imported,
            cli: cli.outcome,
            steps,
        })
    }

    fn source_for(&self, request: &MigrationRequest) -> Arc<dyn VaultSource> {
        if let Some(source) = &self.source {
            return source.clone();
        }
        match &request.source {
            SourceSpec::Lpass { program } => {
                Arc::new(LpassSource::new(program).with_scratch_dir(&request.cache_dir))
            }
            SourceSpec::CsvFile { path } => Arc::new(CsvFileSource::new(path)),
        }
    }
}
