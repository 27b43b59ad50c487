// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subprocess runner trait used to drive external executables.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::VaultshiftError;

/// A single external process invocation.
///
/// Environment values and arguments marked secret are hidden from `Debug`
/// output so invocations can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    secret_args: Vec<usize>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            secret_args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append an argument whose value must never be logged.
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secret_args.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Look up the last binding for an environment variable.
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<&str> = self
            .args
            .iter()
            .enumerate()
            .map(|(i, a)| {
                if self.secret_args.contains(&i) {
                    "****"
                } else {
                    a.as_str()
                }
            })
            .collect();
        let env_keys: Vec<&str> = self.env.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &args)
            .field("env", &env_keys)
            .finish()
    }
}

/// Exit status and captured standard output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output with surrounding whitespace trimmed.
    pub stdout: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into().trim().to_string(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an external process to completion.
///
/// Implementations wait synchronously for exit; there is no retry and no
/// timeout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, VaultshiftError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_secret_args_and_env_values() {
        let inv = Invocation::new("/opt/bw")
            .arg("unlock")
            .secret_arg("correct horse")
            .arg("--raw")
            .env("BW_CLIENTSECRET", "top-secret");
        let debug = format!("{inv:?}");
        assert!(!debug.contains("correct horse"));
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("BW_CLIENTSECRET"));
        assert!(debug.contains("unlock"));
        assert_eq!(inv.args, vec!["unlock", "correct horse", "--raw"]);
    }

    #[test]
    fn env_value_returns_last_binding() {
        let inv = Invocation::new("bw")
            .env("BW_NOINTERACTION", "true")
            .env("BW_NOINTERACTION", "false");
        assert_eq!(inv.env_value("BW_NOINTERACTION"), Some("false"));
        assert_eq!(inv.env_value("BW_SESSION"), None);
    }

    #[test]
    fn command_output_trims_and_checks_exit() {
        let out = CommandOutput::new(0, "  session\n");
        assert_eq!(out.stdout, "session");
        assert!(out.success());
        assert!(!CommandOutput::new(1, "").success());
        let signalled = CommandOutput {
            exit_code: None,
            stdout: String::new(),
        };
        assert!(!signalled.success());
    }
}
