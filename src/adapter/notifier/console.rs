use owo_colors::{OwoColorize, Stream};

use crate::domain::Level;
use crate::port::{Notification, Notifier};

/// Prints notifications to stderr, one coloured line each.
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn render(notification: &Notification) -> String {
        let message = &notification.message;
        match notification.level {
            Level::Success => format!(
                "{} {message}",
                "✓".if_supports_color(Stream::Stderr, |t| t.green())
            ),
            Level::Info => format!(
                "{} {message}",
                "•".if_supports_color(Stream::Stderr, |t| t.cyan())
            ),
            Level::Warning => format!(
                "{} {message}",
                "⚠".if_supports_color(Stream::Stderr, |t| t.yellow())
            ),
            Level::Error => format!(
                "{} {message}",
                "✗".if_supports_color(Stream::Stderr, |t| t.red())
            ),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", Self::render(&notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_keeps_message() {
        let line = ConsoleNotifier::render(&Notification::new(Level::Error, "Transaction failed"));
        assert!(line.ends_with(" Transaction failed"));
    }
}
