//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for operator-facing output.

mod console;

pub use console::ConsoleNotifier;
