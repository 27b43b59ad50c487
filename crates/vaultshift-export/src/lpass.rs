// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`VaultSource`] backed by the `lpass` command-line client.
//!
//! Each open runs in a private `LPASS_HOME` so no login state leaks between
//! runs or into the user's own `lpass` session. Pinentry is disabled, which
//! makes `lpass` print its prompts on stderr and read answers from stdin;
//! second-factor prompts are forwarded to the [`SecondFactorPrompt`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tracing::{debug, info, warn};
use vaultshift_core::{
    AccountRecord, ClientInfo, OpenOptions, OutOfBandAction, SecondFactorMethod,
    SecondFactorPrompt, SourceCredentials, VaultSource, VaultshiftError,
};
use zeroize::Zeroizing;

use crate::record::read_records;

/// Fields requested from `lpass export`.
pub const EXPORT_FIELDS: &str = "url,username,password,extra,name,grouping,fav";

/// What a chunk of `lpass` stderr is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LpassPrompt {
    /// The master password; already supplied up front.
    MasterPassword,
    /// A one-time code typed by the user.
    Passcode(SecondFactorMethod),
    /// An approval pending on another device.
    OutOfBand(SecondFactorMethod),
}

/// Classify prompt text printed by `lpass`.
pub fn classify_prompt(text: &str) -> Option<LpassPrompt> {
    let lower = text.to_ascii_lowercase();
    let method = method_from_text(&lower);
    if lower.contains("out-of-band") || lower.contains("out of band") {
        Some(LpassPrompt::OutOfBand(method))
    } else if lower.contains("passcode") || lower.contains("code") {
        Some(LpassPrompt::Passcode(method))
    } else if lower.contains("master password") {
        Some(LpassPrompt::MasterPassword)
    } else {
        None
    }
}

fn method_from_text(lower: &str) -> SecondFactorMethod {
    if lower.contains("google authenticator") {
        SecondFactorMethod::GoogleAuth
    } else if lower.contains("yubikey") {
        SecondFactorMethod::Yubikey
    } else if lower.contains("duo") {
        SecondFactorMethod::Duo
    } else if lower.contains("lastpass authenticator") {
        SecondFactorMethod::LastPassAuth
    } else {
        SecondFactorMethod::Other("multifactor".to_string())
    }
}

/// Whether an unterminated stderr fragment is a question waiting on stdin.
///
/// Only fragments ending in `:` or `?` count. Anything else is treated as a
/// partial line and more output is awaited, so a prompt in another shape
/// stalls the login until `lpass` exits on its own.
pub fn awaits_answer(fragment: &str) -> bool {
    matches!(fragment.trim_end().chars().last(), Some(':' | '?'))
}

/// Drives the `lpass` executable.
#[derive(Debug, Clone)]
pub struct LpassSource {
    program: PathBuf,
    scratch: Option<PathBuf>,
}

impl LpassSource {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            scratch: None,
        }
    }

    /// Create the per-run `LPASS_HOME` under `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch = Some(dir.into());
        self
    }

    fn command(&self, home: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.env("LPASS_HOME", home)
            .env("LPASS_DISABLE_PINENTRY", "1")
            .env_remove("LPASS_ASKPASS")
            .kill_on_drop(true);
        cmd
    }

    async fn login(
        &self,
        home: &Path,
        credentials: &SourceCredentials,
        prompt: &dyn SecondFactorPrompt,
    ) -> Result<(), VaultshiftError> {
        let mut child = self
            .command(home)
            .args(["login", "--plaintext-key", "--force"])
            .arg(&credentials.email)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| VaultshiftError::export("failed to start lpass", e))?;

        let mut stdin = child.stdin.take();
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| VaultshiftError::Internal("lpass stderr was not captured".into()))?;

        if let Some(input) = stdin.as_mut() {
            send_line(input, credentials.password.expose_secret()).await?;
        }

        let mut pending = String::new();
        let mut chunk = [0u8; 512];
        let mut password_prompts = 0;
        loop {
            let n = stderr
                .read(&mut chunk)
                .await
                .map_err(|e| VaultshiftError::export("failed to read lpass output", e))?;
            if n == 0 {
                break;
            }
            pending.push_str(&String::from_utf8_lossy(&chunk[..n]));

            // Complete lines are status messages, except out-of-band notices.
            while let Some(pos) = pending.find('\n') {
                let line: String = pending.drain(..=pos).collect();
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(line, "lpass");
                if let Some(LpassPrompt::OutOfBand(method)) = classify_prompt(line)
                    && prompt.approve_out_of_band(&method) == OutOfBandAction::Cancel
                {
                    return Err(cancelled(&method));
                }
            }

            if !awaits_answer(&pending) {
                continue;
            }
            let question = std::mem::take(&mut pending);
            match classify_prompt(&question) {
                Some(LpassPrompt::MasterPassword) if password_prompts == 0 => {
                    password_prompts += 1;
                }
                Some(LpassPrompt::Passcode(method)) => {
                    let code = prompt.passcode(&method).ok_or_else(|| cancelled(&method))?;
                    if let Some(input) = stdin.as_mut() {
                        send_line(input, code.expose_secret()).await?;
                    }
                }
                Some(LpassPrompt::OutOfBand(method)) => {
                    if prompt.approve_out_of_band(&method) == OutOfBandAction::Cancel {
                        return Err(cancelled(&method));
                    }
                    if let Some(input) = stdin.as_mut() {
                        send_line(input, "").await?;
                    }
                }
                _ => {
                    // Repeated or unknown question: close stdin so lpass gives up.
                    debug!(prompt = question.trim(), "unanswerable lpass prompt");
                    stdin = None;
                }
            }
        }

        drop(stdin);
        let status = child
            .wait()
            .await
            .map_err(|e| VaultshiftError::export("failed to wait for lpass", e))?;
        if !status.success() {
            return Err(VaultshiftError::Export {
                message: format!("lpass login exited with {status}"),
                source: None,
            });
        }
        Ok(())
    }

    async fn export(
        &self,
        home: &Path,
        options: &OpenOptions,
    ) -> Result<Vec<AccountRecord>, VaultshiftError> {
        let output = self
            .command(home)
            .args(["export", "--sync=now", "--color=never"])
            .arg(format!("--fields={EXPORT_FIELDS}"))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| VaultshiftError::export("failed to start lpass export", e))?;

        let stdout = Zeroizing::new(output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VaultshiftError::Export {
                message: format!(
                    "lpass export exited with {}: {}",
                    output.status,
                    stderr.trim()
                ),
                source: None,
            });
        }

        read_records(stdout.as_slice(), options.include_secure_notes)
            .map_err(|e| VaultshiftError::export("failed to parse lpass export", e))
    }

    async fn logout(&self, home: &Path) {
        let result = self
            .command(home)
            .args(["logout", "--force"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        if let Err(e) = result {
            debug!(error = %e, "lpass logout failed");
        }
    }
}

async fn send_line(stdin: &mut ChildStdin, value: &str) -> Result<(), VaultshiftError> {
    let mut line = Zeroizing::new(String::with_capacity(value.len() + 1));
    line.push_str(value);
    line.push('\n');
    stdin
        .write_all(line.as_bytes())
        .await
        .map_err(|e| VaultshiftError::export("failed to write to lpass", e))?;
    stdin
        .flush()
        .await
        .map_err(|e| VaultshiftError::export("failed to write to lpass", e))
}

fn cancelled(method: &SecondFactorMethod) -> VaultshiftError {
    VaultshiftError::Export {
        message: format!("{method} verification was cancelled"),
        source: None,
    }
}

#[async_trait]
impl VaultSource for LpassSource {
    fn name(&self) -> &str {
        "lpass"
    }

    async fn open(
        &self,
        credentials: &SourceCredentials,
        client: &ClientInfo,
        prompt: &dyn SecondFactorPrompt,
        options: &OpenOptions,
    ) -> Result<Vec<AccountRecord>, VaultshiftError> {
        let prefix = format!("lpass-{}-", client.id);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let home = match &self.scratch {
            Some(dir) => {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| VaultshiftError::export("failed to create scratch dir", e))?;
                builder.tempdir_in(dir)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| VaultshiftError::export("failed to create LPASS_HOME", e))?;

        info!(client = %client.description, "signing in to LastPass");
        let result = match self.login(home.path(), credentials, prompt).await {
            Ok(()) => self.export(home.path(), options).await,
            Err(e) => Err(e),
        };

        self.logout(home.path()).await;
        if let Err(e) = home.close() {
            warn!(error = %e, "failed to remove LPASS_HOME");
        }

        result
    }
}
