//! Shared CLI output helpers for consistent operator-facing text.

use std::fmt::Display;

use owo_colors::{OwoColorize, Stream};

use crate::domain::{Level, LogEntry};

const RULE_WIDTH: usize = 56;

/// Print a section header and separator.
pub fn section(title: &str) {
    println!();
    println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a simple key/value line.
pub fn key_value(label: &str, value: impl Display) {
    println!("{label:<14} {value}");
}

/// Print a successful status line.
pub fn ok(message: &str) {
    println!("✓ {message}");
}

/// Print an error status line.
pub fn error(message: &str) {
    eprintln!("✗ {message}");
}

/// Print a single-line note.
pub fn note(message: &str) {
    println!("{message}");
}

/// Print the activity log, oldest first.
pub fn activity(entries: &[LogEntry]) {
    section("Activity");
    if entries.is_empty() {
        note("(empty)");
        return;
    }
    for entry in entries {
        let marker = match entry.level {
            Level::Info => " ",
            Level::Success => "✓",
            Level::Warning => "⚠",
            Level::Error => "✗",
        };
        println!("[{}] {marker} {}", entry.timestamp, entry.message);
    }
}
