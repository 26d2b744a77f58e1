//! Core domain types: the target network, the contract pair,
//! the activity log and the error sanitizer.

pub mod contract;
pub mod log;
pub mod network;
pub mod sanitize;

pub use contract::{ContractKind, TxOptions, GAS_LIMIT, GAS_PRICE_WEI, LONG_CONTRACT, SHORT_CONTRACT};
pub use log::{ActivityLog, Level, LogEntry};
pub use network::{NativeCurrency, NetworkTarget};
pub use sanitize::sanitize;
