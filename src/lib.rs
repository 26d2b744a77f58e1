//! Flashpair - wallet session and flash-loan dispatcher.
//!
//! Connects a wallet, keeps it on the target network, binds the fixed
//! long/short contract pair to the wallet's signer and calls
//! `initiateFlashLoan()` on both, once or on a 3 second cadence.
//!
//! # Modules
//!
//! - [`domain`] - Target network, contract pair, activity log, error sanitizer
//! - [`port`] - Wallet, contract and notifier traits
//! - [`app`] - Session, dispatcher, scheduler and the controller tying them together
//! - [`adapter`] - Alloy-backed wallet and contract binder, console notifier
//! - [`config`] - Configuration loading from TOML plus environment
//! - [`error`] - Error types and provider-error classification
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```
//! use flashpair::domain::sanitize;
//!
//! assert_eq!(
//!     sanitize("execution reverted: insufficient funds"),
//!     "Transaction failed: insufficient funds"
//! );
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
