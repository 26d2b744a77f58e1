//! EVM adapters built on alloy: a local-key wallet and the contract binder.

pub mod contract;
pub mod wallet;

pub use contract::AlloyBinder;
pub use wallet::{EvmSigner, LocalWallet};
