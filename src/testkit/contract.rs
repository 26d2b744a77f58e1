//! Mock [`ContractBinder`] whose contracts count calls and can be told to
//! fail or to take a while.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;

use super::wallet::MockSigner;
use crate::domain::{ContractKind, TxOptions};
use crate::error::ProviderError;
use crate::port::{ContractBinder, FlashLoanContract};

#[derive(Default)]
struct Shared {
    binds: AtomicUsize,
    long_calls: AtomicUsize,
    short_calls: AtomicUsize,
    next_hash: AtomicU64,
    failures: Mutex<HashMap<ContractKind, ProviderError>>,
    latency: Mutex<Option<Duration>>,
    last_options: Mutex<Option<TxOptions>>,
}

/// Binder whose contracts all report back to one shared journal, so a
/// test keeps visibility after the session rebinds.
#[derive(Clone, Default)]
pub struct MockBinder {
    shared: Arc<Shared>,
}

impl MockBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call on `kind` fail with `error`.
    pub fn fail(&self, kind: ContractKind, error: ProviderError) {
        self.shared
            .failures
            .lock()
            .expect("lock failures")
            .insert(kind, error);
    }

    /// Delay every submission by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.shared.latency.lock().expect("lock latency") = Some(latency);
    }

    pub fn bind_count(&self) -> usize {
        self.shared.binds.load(Ordering::SeqCst)
    }

    /// Submissions attempted on `kind`, including failed ones.
    pub fn calls(&self, kind: ContractKind) -> usize {
        match kind {
            ContractKind::Long => self.shared.long_calls.load(Ordering::SeqCst),
            ContractKind::Short => self.shared.short_calls.load(Ordering::SeqCst),
        }
    }

    pub fn total_calls(&self) -> usize {
        self.calls(ContractKind::Long) + self.calls(ContractKind::Short)
    }

    pub fn last_options(&self) -> Option<TxOptions> {
        *self.shared.last_options.lock().expect("lock options")
    }
}

impl ContractBinder for MockBinder {
    type Signer = MockSigner;

    fn bind(
        &self,
        kind: ContractKind,
        address: Address,
        _signer: &MockSigner,
    ) -> Arc<dyn FlashLoanContract> {
        self.shared.binds.fetch_add(1, Ordering::SeqCst);
        Arc::new(MockContract {
            kind,
            address,
            shared: Arc::clone(&self.shared),
        })
    }
}

struct MockContract {
    kind: ContractKind,
    address: Address,
    shared: Arc<Shared>,
}

#[async_trait]
impl FlashLoanContract for MockContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn initiate_flash_loan(&self, options: TxOptions) -> Result<TxHash, ProviderError> {
        let counter = match self.kind {
            ContractKind::Long => &self.shared.long_calls,
            ContractKind::Short => &self.shared.short_calls,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        *self.shared.last_options.lock().expect("lock options") = Some(options);

        let latency = *self.shared.latency.lock().expect("lock latency");
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self
            .shared
            .failures
            .lock()
            .expect("lock failures")
            .get(&self.kind)
            .cloned();
        match failure {
            Some(error) => Err(error),
            None => {
                let n = self.shared.next_hash.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(TxHash::left_padding_from(&n.to_be_bytes()))
            }
        }
    }
}
