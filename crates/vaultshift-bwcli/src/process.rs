// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subprocess execution via `tokio::process`.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use vaultshift_core::{CommandOutput, CommandRunner, Invocation, VaultshiftError};
use zeroize::Zeroizing;

/// Runs invocations as real child processes.
///
/// stdin is closed, stdout is captured, stderr goes straight to the user's
/// terminal so `bw` diagnostics stay visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, VaultshiftError> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                VaultshiftError::Internal(format!(
                    "failed to execute {}: {e}",
                    invocation.program.display()
                ))
            })?;

        // stdout may hold a session key.
        let stdout = Zeroizing::new(output.stdout);
        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&stdout).trim().to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_trimmed_stdout_and_exit_code() {
        let inv = Invocation::new("/bin/sh")
            .arg("-c")
            .arg("echo \"  $GREETING  \"; exit 3")
            .env("GREETING", "hello");
        let out = TokioCommandRunner.run(&inv).await.unwrap();
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stdout, "hello");
        assert!(!out.success());
    }

    #[tokio::test]
    async fn stdin_is_closed() {
        let inv = Invocation::new("/bin/sh")
            .arg("-c")
            .arg("if read -r line; then echo got; else echo eof; fi");
        let out = TokioCommandRunner.run(&inv).await.unwrap();
        assert_eq!(out.stdout, "eof");
        assert!(out.success());
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let inv = Invocation::new("/nonexistent/bw");
        assert!(TokioCommandRunner.run(&inv).await.is_err());
    }
}
