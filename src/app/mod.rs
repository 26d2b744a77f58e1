//! Application layer: session lifecycle, dispatch and scheduling.
//!
//! - [`Session`] - wallet connection, network guard, change notifications
//! - [`Dispatcher`] - concurrent `initiateFlashLoan` on the contract pair
//! - [`Scheduler`] - once or every [`DISPATCH_PERIOD`]
//! - [`Console`] - activity log plus notifications
//! - [`Controller`] - everything above behind one handle

pub mod binding;
pub mod console;
pub mod controller;
pub mod dispatcher;
pub mod network;
pub mod scheduler;
pub mod session;

pub use binding::{ContractPair, ContractSlot};
pub use console::Console;
pub use controller::Controller;
pub use dispatcher::{DispatchReport, Dispatcher};
pub use network::ensure_network;
pub use scheduler::{OverlapPolicy, Scheduler, DISPATCH_PERIOD};
pub use session::{Lifecycle, Session};
