// SPDX-License-Identifier: Apache-2.0

//! User-facing stderr reporting for the driver.

use colored::Colorize;
use hdldoc::{DiagnosticKind, Diagnostics};

fn prefix(subcommand: Option<&str>) -> String {
    match subcommand {
        Some(subcommand) => format!("hdldoc-driver: {}: ", subcommand),
        None => "hdldoc-driver: ".to_string(),
    }
}

/// Prints `message` and its `(key, value)` details, then exits with status 1.
pub fn report_cli_error_and_exit(
    message: &str,
    subcommand: Option<&str>,
    details: Vec<(&str, &str)>,
) -> ! {
    eprintln!("{}{}", prefix(subcommand), message.red().bold());
    for (key, value) in details {
        eprintln!("  {}: {}", key, value);
    }
    std::process::exit(1);
}

/// Counts per diagnostic kind, in first-seen order.
pub fn summarize_diagnostics(diags: &Diagnostics) -> Vec<(DiagnosticKind, usize)> {
    let mut counts: Vec<(DiagnosticKind, usize)> = Vec::new();
    for d in diags.items() {
        match counts.iter_mut().find(|(kind, _)| *kind == d.kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((d.kind, 1)),
        }
    }
    counts
}

/// Prints a one-line tally of `diags` unless there are none.
pub fn report_diagnostic_summary(subcommand: &str, diags: &Diagnostics) {
    if diags.is_empty() {
        return;
    }
    let tally = summarize_diagnostics(diags)
        .into_iter()
        .map(|(kind, n)| format!("{} x{}", kind.label(), n))
        .collect::<Vec<_>>()
        .join(", ");
    eprintln!(
        "{}{} ({})",
        prefix(Some(subcommand)),
        format!("{} diagnostic(s)", diags.len()).yellow(),
        tally
    );
}
