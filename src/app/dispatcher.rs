//! Dispatcher: fire `initiateFlashLoan` on both contracts at once.

use std::sync::atomic::{AtomicUsize, Ordering};

use alloy_primitives::TxHash;
use futures_util::future::try_join;
use tracing::{info, warn};

use super::binding::ContractSlot;
use super::console::Console;
use crate::domain::{Level, TxOptions};
use crate::error::{Error, Result};

pub const SUCCESS_MESSAGE: &str = "Flash loans initiated successfully";

/// Transaction hashes returned by one successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub long_tx: TxHash,
    pub short_tx: TxHash,
}

pub struct Dispatcher {
    contracts: ContractSlot,
    console: Console,
    options: TxOptions,
    in_flight: AtomicUsize,
}

/// Holds the in-flight count up for the lifetime of one dispatch.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(contracts: ContractSlot, console: Console) -> Self {
        Self::with_options(contracts, console, TxOptions::default())
    }

    #[must_use]
    pub fn with_options(contracts: ContractSlot, console: Console, options: TxOptions) -> Self {
        Self {
            contracts,
            console,
            options,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Submit `initiateFlashLoan` on the long and short contracts
    /// concurrently and wait for both submissions.
    ///
    /// Fails without side effects when no pair is bound. A rejection on
    /// either side fails the whole dispatch; the failure is classified,
    /// logged and notified.
    pub async fn execute_contracts(&self) -> Result<DispatchReport> {
        let Some(pair) = self.contracts.get() else {
            let err = Error::ContractsNotInitialized;
            self.console.report(Level::Error, err.user_message());
            return Err(err);
        };

        let _in_flight = InFlight::enter(&self.in_flight);
        self.console.log(Level::Info, "Executing flash loans...");

        let submitted = try_join(
            pair.long.initiate_flash_loan(self.options),
            pair.short.initiate_flash_loan(self.options),
        )
        .await;

        match submitted {
            Ok((long_tx, short_tx)) => {
                info!(%long_tx, %short_tx, "Flash loans submitted");
                self.console
                    .log(Level::Info, format!("Long tx: {long_tx}, short tx: {short_tx}"));
                self.console.report(Level::Success, SUCCESS_MESSAGE);
                Ok(DispatchReport { long_tx, short_tx })
            }
            Err(provider_error) => {
                warn!(error = %provider_error, kind = ?provider_error.kind(), "Flash loan submission failed");
                let err = Error::Dispatch(provider_error);
                self.console.report(Level::Error, err.user_message());
                Err(err)
            }
        }
    }

    /// Whether a dispatch is currently awaiting submissions.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}
