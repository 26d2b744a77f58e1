//! Log and notification sink.
//!
//! Every message lands in the [`ActivityLog`] and in tracing. Messages the
//! operator should notice right away are also broadcast to the notifiers.

use std::sync::Arc;

use chrono::Local;
use tracing::{error, info, warn};

use crate::domain::{ActivityLog, Level, LogEntry};
use crate::port::{Notification, NotifierRegistry};

#[derive(Clone)]
pub struct Console {
    log: ActivityLog,
    notifiers: Arc<NotifierRegistry>,
}

impl Console {
    #[must_use]
    pub fn new(notifiers: Arc<NotifierRegistry>) -> Self {
        Self {
            log: ActivityLog::new(),
            notifiers,
        }
    }

    /// Console with no notifiers attached.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(Arc::new(NotifierRegistry::new()))
    }

    /// Append to the activity log only.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Info | Level::Success => info!(target: "flashpair::activity", "{message}"),
            Level::Warning => warn!(target: "flashpair::activity", "{message}"),
            Level::Error => error!(target: "flashpair::activity", "{message}"),
        }
        self.log.push(LogEntry::new(Local::now(), level, message));
    }

    /// Append to the activity log and notify.
    pub fn report(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        self.log(level, message.clone());
        self.notifiers.notify_all(Notification::new(level, message));
    }

    #[must_use]
    pub fn activity(&self) -> &ActivityLog {
        &self.log
    }
}
