// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the Bitwarden CLI through server config, login, unlock, and import.
//!
//! Each step is an explicit [`CliStep`]: the arguments, the environment, and
//! the predicate its output must satisfy. Steps run strictly in order and the
//! first failure ends the run. Nothing is retried.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use vaultshift_core::{
    CliStepKind, CommandOutput, CommandRunner, Invocation, SessionKey, VaultshiftError,
};

/// `bw import` reports success with this word on stdout.
pub const IMPORT_SUCCESS_MARKER: &str = "Imported";

/// Import format understood by `bw import`.
pub const IMPORT_FORMAT: &str = "lastpasscsv";

/// How the vault is unlocked after an API-key login.
#[derive(Clone)]
pub enum UnlockMethod {
    MasterPassword(SecretString),
    /// The vault key comes from Key Connector; login alone yields a session.
    KeyConnector,
}

/// The target account, as far as the CLI is concerned.
#[derive(Clone)]
pub struct BitwardenAccount {
    /// Self-hosted or regional server. `None` for the default cloud server.
    pub server_url: Option<String>,
    pub client_id: String,
    pub client_secret: SecretString,
    pub unlock: UnlockMethod,
}

impl std::fmt::Debug for BitwardenAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitwardenAccount")
            .field("server_url", &self.server_url)
            .field("client_id", &self.client_id)
            .field(
                "unlock",
                &match self.unlock {
                    UnlockMethod::MasterPassword(_) => "master_password",
                    UnlockMethod::KeyConnector => "key_connector",
                },
            )
            .finish_non_exhaustive()
    }
}

/// What a step's output must look like to count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessCheck {
    ExitZero,
    /// Exit 0 with something on stdout.
    NonEmptyOutput,
    /// Exit 0 with the marker somewhere on stdout.
    Contains(&'static str),
}

impl SuccessCheck {
    fn check(self, output: &CommandOutput) -> Result<(), String> {
        if !output.success() {
            return Err("bw exited unsuccessfully".to_string());
        }
        match self {
            Self::ExitZero => Ok(()),
            Self::NonEmptyOutput if output.stdout.is_empty() => {
                Err("bw returned no session key".to_string())
            }
            Self::NonEmptyOutput => Ok(()),
            Self::Contains(marker) if !output.stdout.contains(marker) => {
                Err(format!("output did not contain \"{marker}\""))
            }
            Self::Contains(_) => Ok(()),
        }
    }
}

/// One fully described `bw` invocation.
#[derive(Debug, Clone)]
pub struct CliStep {
    pub kind: CliStepKind,
    pub invocation: Invocation,
    pub success: SuccessCheck,
}

/// The step kinds a run will attempt, in order.
///
/// Unlock is planned only for master-password accounts and is skipped at run
/// time when login already produced a session key.
pub fn plan_steps(account: &BitwardenAccount) -> Vec<CliStepKind> {
    let mut steps = Vec::with_capacity(4);
    if account.server_url.is_some() {
        steps.push(CliStepKind::ConfigureServer);
    }
    steps.push(CliStepKind::Login);
    if matches!(account.unlock, UnlockMethod::MasterPassword(_)) {
        steps.push(CliStepKind::Unlock);
    }
    steps.push(CliStepKind::Import);
    steps
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Item count parsed from `Imported N items`, when bw printed one.
    pub imported: Option<usize>,
    /// Steps that actually ran.
    pub steps: Vec<CliStepKind>,
}

/// Parse the item count out of `bw import` output.
pub fn parse_import_count(stdout: &str) -> Option<usize> {
    let rest = &stdout[stdout.find(IMPORT_SUCCESS_MARKER)? + IMPORT_SUCCESS_MARKER.len()..];
    rest.split_whitespace().next()?.parse().ok()
}

/// Drives a provisioned `bw` executable.
pub struct CliDriver {
    runner: Arc<dyn CommandRunner>,
    executable: PathBuf,
    appdata_dir: PathBuf,
}

impl CliDriver {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        executable: impl Into<PathBuf>,
        appdata_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            executable: executable.into(),
            appdata_dir: appdata_dir.into(),
        }
    }

    /// Build the invocation for `kind`.
    ///
    /// `session` is required for Import and ignored elsewhere.
    pub fn step(
        &self,
        kind: CliStepKind,
        account: &BitwardenAccount,
        session: Option<&SessionKey>,
        import_file: &Path,
    ) -> CliStep {
        let base = Invocation::new(&self.executable).env(
            "BITWARDENCLI_APPDATA_DIR",
            self.appdata_dir.to_string_lossy(),
        );

        match kind {
            CliStepKind::ConfigureServer => CliStep {
                kind,
                invocation: base
                    .env("BW_NOINTERACTION", "true")
                    .args(["config", "server"])
                    .arg(account.server_url.clone().unwrap_or_default()),
                success: SuccessCheck::ExitZero,
            },
            // Deliberately BW_NOINTERACTION=false: bw has a bug where an API-key
            // login fails in non-interactive mode.
            CliStepKind::Login => CliStep {
                kind,
                invocation: base
                    .env("BW_NOINTERACTION", "false")
                    .env("BW_CLIENTID", &account.client_id)
                    .env("BW_CLIENTSECRET", account.client_secret.expose_secret())
                    .args(["login", "--apikey", "--raw"]),
                success: SuccessCheck::ExitZero,
            },
            CliStepKind::Unlock => {
                let password = match &account.unlock {
                    UnlockMethod::MasterPassword(p) => p.expose_secret().to_string(),
                    UnlockMethod::KeyConnector => String::new(),
                };
                CliStep {
                    kind,
                    invocation: base
                        .env("BW_NOINTERACTION", "true")
                        .arg("unlock")
                        .secret_arg(password)
                        .arg("--raw"),
                    success: SuccessCheck::NonEmptyOutput,
                }
            }
            CliStepKind::Import => CliStep {
                kind,
                invocation: base
                    .env("BW_NOINTERACTION", "true")
                    .env("BW_SESSION", session.map(SessionKey::expose).unwrap_or_default())
                    .args(["import", IMPORT_FORMAT])
                    .arg(import_file.to_string_lossy()),
                success: SuccessCheck::Contains(IMPORT_SUCCESS_MARKER),
            },
        }
    }

    /// Run every planned step against `import_file`.
    pub async fn run(
        &self,
        account: &BitwardenAccount,
        import_file: &Path,
    ) -> Result<ImportSummary, VaultshiftError> {
        let plan = plan_steps(account);
        let mut session: Option<SessionKey> = None;
        let mut ran = Vec::with_capacity(plan.len());
        let mut imported = None;

        for &kind in &plan {
            if kind == CliStepKind::Unlock && session.is_some() {
                debug!("login returned a session key, skipping unlock");
                continue;
            }

            let step = self.step(kind, account, session.as_ref(), import_file);
            let output = self.execute(&step).await?;
            ran.push(kind);

            match kind {
                CliStepKind::Login => {
                    session = SessionKey::from_output(&output.stdout);
                    if session.is_none() && !plan.contains(&CliStepKind::Unlock) {
                        // Key Connector accounts have no password to unlock with.
                        return Err(VaultshiftError::CliStep {
                            step: CliStepKind::Unlock,
                            exit_code: None,
                            message: "login returned no session key and no master password \
                                      is available"
                                .to_string(),
                        });
                    }
                }
                CliStepKind::Unlock => session = SessionKey::from_output(&output.stdout),
                CliStepKind::Import => {
                    imported = parse_import_count(&output.stdout);
                    debug!(output = %output.stdout, "bw import finished");
                }
                CliStepKind::ConfigureServer => {}
            }
        }

        info!(imported = ?imported, "items imported into Bitwarden");
        Ok(ImportSummary {
            imported,
            steps: ran,
        })
    }

    async fn execute(&self, step: &CliStep) -> Result<CommandOutput, VaultshiftError> {
        info!(step = %step.kind, "running bw");
        let output = self
            .runner
            .run(&step.invocation)
            .await
            .map_err(|e| VaultshiftError::CliStep {
                step: step.kind,
                exit_code: None,
                message: e.to_string(),
            })?;

        if let Err(message) = step.success.check(&output) {
            warn!(step = %step.kind, exit_code = ?output.exit_code, %message, "bw step failed");
            return Err(VaultshiftError::CliStep {
                step: step.kind,
                exit_code: output.exit_code,
                message,
            });
        }
        Ok(output)
    }
}
