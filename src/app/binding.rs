//! Contract binding layer.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::ContractKind;
use crate::port::{ContractBinder, FlashLoanContract};

/// Both sides of the pair, bound to one signer.
#[derive(Clone)]
pub struct ContractPair {
    pub long: Arc<dyn FlashLoanContract>,
    pub short: Arc<dyn FlashLoanContract>,
}

impl ContractPair {
    /// Bind both compiled-in addresses with `signer`. No network traffic.
    pub fn bind<B: ContractBinder + ?Sized>(binder: &B, signer: &B::Signer) -> Self {
        Self {
            long: binder.bind(ContractKind::Long, ContractKind::Long.address(), signer),
            short: binder.bind(ContractKind::Short, ContractKind::Short.address(), signer),
        }
    }
}

/// Shared slot holding the current pair. The session writes it, the
/// dispatcher reads it.
#[derive(Clone, Default)]
pub struct ContractSlot {
    inner: Arc<RwLock<Option<ContractPair>>>,
}

impl ContractSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<ContractPair> {
        self.inner.read().clone()
    }

    pub fn set(&self, pair: ContractPair) {
        *self.inner.write() = Some(pair);
    }

    /// Clear the slot. Returns whether a pair was present.
    pub fn clear(&self) -> bool {
        self.inner.write().take().is_some()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inner.read().is_some()
    }
}
