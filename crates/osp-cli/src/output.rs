//! Output formatting utilities.

use colored::Colorize;
use osp_handshake::ExchangeRecord;

/// Width that exchange labels are right-aligned to.
const LABEL_WIDTH: usize = 10;

/// Formats a success message.
#[must_use]
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// Formats an error message.
#[must_use]
pub fn format_error(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message)
}

/// Formats an info message.
#[must_use]
pub fn format_info(message: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), message)
}

/// Prints a success message.
pub fn success(message: &str) {
    println!("{}", format_success(message));
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{}", format_info(message));
}

/// Prefixes every line of `message` with `label: `, right-aligned so that
/// the colons of consecutive labels line up.
#[must_use]
pub fn aligned(label: &str, message: &str) -> String {
    let prefix = format!("{:>width$}", format!("{label}: "), width = LABEL_WIDTH);
    message
        .lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats one request/response pair, followed by a blank line.
#[must_use]
pub fn format_exchange(record: &ExchangeRecord) -> String {
    format!(
        "{}\n{}\n{}\n",
        aligned("step", &record.step.to_string()).dimmed(),
        aligned("request", &record.request_line()),
        aligned("response", &record.status_line()),
    )
}
