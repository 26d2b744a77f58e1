use std::sync::{Arc, Mutex};

use crate::port::{Notification, Notifier};

/// Thread-safe notification collector for assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().expect("lock notifications").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().expect("lock notifications").clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("lock notifications")
            .push(notification);
    }
}
