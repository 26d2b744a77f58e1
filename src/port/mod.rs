//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams to everything this crate does not own: the wallet
//! that holds the key and knows the network, the contracts it calls, and
//! wherever notifications end up.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Wallet  │            │  Contract   │              │ Notifier  │
//! │ Adapter │            │   Binder    │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! - [`WalletProvider`] - network, accounts and signing handle
//! - [`ContractBinder`], [`FlashLoanContract`] - callable contract handles
//! - [`Notifier`] - transient operator notifications

pub mod contract;
pub mod notifier;
pub mod wallet;

pub use contract::{ContractBinder, FlashLoanContract};
pub use notifier::{Notification, Notifier, NotifierRegistry, NullNotifier};
pub use wallet::{WalletEvent, WalletProvider};
