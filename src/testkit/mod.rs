//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`wallet`] - [`MockWallet`], a scripted [`WalletProvider`](crate::port::WalletProvider)
//!   with browser-wallet chain semantics and push notifications.
//! - [`contract`] - [`MockBinder`], contracts that count calls and can fail or stall.
//! - [`notifier`] - [`RecordingNotifier`] for notification assertions.

pub mod contract;
pub mod notifier;
pub mod wallet;

pub use contract::MockBinder;
pub use notifier::RecordingNotifier;
pub use wallet::{MockSigner, MockWallet, WalletCall};
