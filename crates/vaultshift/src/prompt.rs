// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal answers for LastPass second-factor prompts.

use std::io::{BufRead, IsTerminal};

use secrecy::SecretString;
use tracing::warn;
use vaultshift_core::{OutOfBandAction, SecondFactorMethod, SecondFactorPrompt};

/// Asks on the controlling terminal. Without a TTY every prompt cancels.
pub struct TerminalPrompt;

impl SecondFactorPrompt for TerminalPrompt {
    fn passcode(&self, method: &SecondFactorMethod) -> Option<SecretString> {
        if !std::io::stdin().is_terminal() {
            warn!(%method, "second factor requested but stdin is not a terminal");
            return None;
        }
        eprint!("{method} code (empty to cancel): ");
        match rpassword::read_password() {
            Ok(code) => passcode_answer(code),
            Err(e) => {
                warn!(error = %e, "failed to read passcode");
                None
            }
        }
    }

    fn approve_out_of_band(&self, method: &SecondFactorMethod) -> OutOfBandAction {
        if !std::io::stdin().is_terminal() {
            return OutOfBandAction::Cancel;
        }
        eprintln!("Approve the login with {method}, then press Enter. Type \"cancel\" to stop.");
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => OutOfBandAction::Cancel,
            Ok(_) => out_of_band_answer(&line),
        }
    }
}

fn passcode_answer(code: String) -> Option<SecretString> {
    let code = code.trim();
    (!code.is_empty()).then(|| SecretString::from(code.to_string()))
}

fn out_of_band_answer(line: &str) -> OutOfBandAction {
    if line.trim().eq_ignore_ascii_case("cancel") {
        OutOfBandAction::Cancel
    } else {
        OutOfBandAction::Continue
    }
}
