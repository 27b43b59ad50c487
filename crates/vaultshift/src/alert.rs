// SPDX-FileCopyrightText: 2026 Vaultshift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of the migration alert.

use vaultshift_pipeline::{Alert, AlertKind};

/// Format `alert` as the lines printed after a run.
pub fn format_alert(alert: &Alert, use_color: bool) -> String {
    let marker = match (alert.kind, use_color) {
        (AlertKind::Success, true) => {
            use colored::Colorize;
            "✓".green().to_string()
        }
        (AlertKind::Error, true) => {
            use colored::Colorize;
            "✗".red().to_string()
        }
        (AlertKind::Success, false) => "[OK]".to_string(),
        (AlertKind::Error, false) => "[FAIL]".to_string(),
    };

    let title = if use_color {
        use colored::Colorize;
        match alert.kind {
            AlertKind::Success => alert.title.green().bold().to_string(),
            AlertKind::Error => alert.title.red().bold().to_string(),
        }
    } else {
        alert.title.clone()
    };

    let mut out = format!("\n  {marker} {title}\n  {}\n", "-".repeat(50));
    for line in alert.message.lines() {
        out.push_str(&format!("    {line}\n"));
    }
    out
}

pub fn print_alert(alert: &Alert, use_color: bool) {
    println!("{}", format_alert(alert, use_color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_error_alert() {
        let alert = Alert {
            kind: AlertKind::Error,
            title: "Missing required information".into(),
            message: "first\nsecond".into(),
        };
        let text = format_alert(&alert, false);
        assert!(text.contains("[FAIL] Missing required information"));
        assert!(text.contains("    first\n    second\n"));
    }

    #[test]
    fn plain_success_alert() {
        let alert = Alert {
            kind: AlertKind::Success,
            title: "Migration complete".into(),
            message: "Imported 2 items into Bitwarden.".into(),
        };
        assert!(format_alert(&alert, false).contains("[OK] Migration complete"));
    }
}
