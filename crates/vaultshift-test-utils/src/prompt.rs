// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Non-interactive second-factor prompt.

use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;
use vaultshift_core::{OutOfBandAction, SecondFactorMethod, SecondFactorPrompt};

/// Answers every prompt with the same canned response.
pub struct StaticPrompt {
    passcode: Option<String>,
    out_of_band: OutOfBandAction,
    asked: AtomicUsize,
}

impl StaticPrompt {
    /// Cancels every prompt.
    pub fn cancel() -> Self {
        Self {
            passcode: None,
            out_of_band: OutOfBandAction::Cancel,
            asked: AtomicUsize::new(0),
        }
    }

    /// Answers passcode prompts with `code` and approves out-of-band requests.
    pub fn answering(code: &str) -> Self {
        Self {
            passcode: Some(code.to_string()),
            out_of_band: OutOfBandAction::Continue,
            asked: AtomicUsize::new(0),
        }
    }

    /// Number of prompts answered so far.
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl SecondFactorPrompt for StaticPrompt {
    fn passcode(&self, _method: &SecondFactorMethod) -> Option<SecretString> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.passcode.clone().map(SecretString::from)
    }

    fn approve_out_of_band(&self, _method: &SecondFactorMethod) -> OutOfBandAction {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.out_of_band
    }
}
