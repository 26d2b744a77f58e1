//! Append-only activity log shown to the operator.

use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

/// Severity of a log entry or notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: Level,
    pub message: String,
}

impl LogEntry {
    pub fn new(at: DateTime<Local>, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: at.format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        }
    }
}

/// Shared, ordered, unbounded log. Cloning yields another handle to the
/// same entries.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl ActivityLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: LogEntry) {
        self.entries.lock().push(entry);
    }

    /// Copy of all entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Messages only, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
