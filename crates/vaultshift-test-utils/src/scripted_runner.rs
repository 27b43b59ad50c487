// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command runner that replays scripted outputs instead of spawning processes.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use vaultshift_core::{CommandOutput, CommandRunner, Invocation, VaultshiftError};

/// A scripted reply for one invocation.
#[derive(Debug, Clone)]
pub enum Reply {
    Output(CommandOutput),
    /// The process could not be started.
    SpawnError(String),
}

impl Reply {
    pub fn ok(stdout: &str) -> Self {
        Self::Output(CommandOutput::new(0, stdout))
    }

    pub fn exit(code: i32, stdout: &str) -> Self {
        Self::Output(CommandOutput::new(code, stdout))
    }
}

/// A [`CommandRunner`] that pops replies from a FIFO queue and records every
/// invocation it receives.
///
/// When the queue is empty, the invocation fails with exit code 127.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation received so far, in order.
    pub async fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().await.clone()
    }

    /// The first argument (the `bw` subcommand) of every invocation.
    pub async fn subcommands(&self) -> Vec<String> {
        self.invocations
            .lock()
            .await
            .iter()
            .map(|inv| inv.args.first().cloned().unwrap_or_default())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, VaultshiftError> {
        self.invocations.lock().await.push(invocation.clone());
        match self.replies.lock().await.pop_front() {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::SpawnError(message)) => Err(VaultshiftError::Internal(message)),
            None => Ok(CommandOutput::new(127, "")),
        }
    }
}
