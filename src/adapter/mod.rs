//! Implementations of ports (hexagonal adapters).

pub mod evm;
pub mod notifier;
