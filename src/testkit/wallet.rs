//! Mock [`WalletProvider`] with scripted failures and a call journal.

use std::collections::HashSet;
use std::sync::Mutex;

use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::NetworkTarget;
use crate::error::{ProviderError, CODE_UNKNOWN_CHAIN};
use crate::port::{WalletEvent, WalletProvider};

/// One recorded call against a [`MockWallet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletCall {
    ChainId,
    SwitchChain(u64),
    AddChain(u64),
    RequestAccounts,
    Signer,
}

/// Signing handle handed out by [`MockWallet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSigner {
    pub address: Address,
}

impl MockSigner {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

struct WalletState {
    chain_id: u64,
    known: HashSet<u64>,
    accounts: Vec<Address>,
    switch_error: Option<ProviderError>,
    add_error: Option<ProviderError>,
    accounts_error: Option<ProviderError>,
    calls: Vec<WalletCall>,
}

/// A wallet that behaves like an injected browser wallet:
///
/// - switching to a chain it does not know fails with code `4902`
/// - adding a chain makes it known and active
/// - notifications are pushed by the test through [`MockWallet::emit`]
pub struct MockWallet {
    state: Mutex<WalletState>,
    events: broadcast::Sender<WalletEvent>,
}

impl MockWallet {
    /// Wallet on `chain_id` with one default account.
    pub fn on_chain(chain_id: u64) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(WalletState {
                chain_id,
                known: HashSet::from([chain_id]),
                accounts: vec![Address::repeat_byte(0x11)],
                switch_error: None,
                add_error: None,
                accounts_error: None,
                calls: Vec::new(),
            }),
            events,
        }
    }

    /// Make `chain_id` known so a switch to it succeeds.
    pub fn knowing(self, chain_id: u64) -> Self {
        self.state.lock().expect("lock wallet").known.insert(chain_id);
        self
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.state.lock().expect("lock wallet").accounts = accounts;
        self
    }

    pub fn failing_switch(self, error: ProviderError) -> Self {
        self.state.lock().expect("lock wallet").switch_error = Some(error);
        self
    }

    pub fn failing_add(self, error: ProviderError) -> Self {
        self.state.lock().expect("lock wallet").add_error = Some(error);
        self
    }

    pub fn failing_accounts(self, error: ProviderError) -> Self {
        self.state.lock().expect("lock wallet").accounts_error = Some(error);
        self
    }

    /// Replace the exposed accounts on a wallet already in use.
    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state.lock().expect("lock wallet").accounts = accounts;
    }

    /// Push a notification to every subscriber.
    pub fn emit(&self, event: WalletEvent) {
        let _ = self.events.send(event);
    }

    pub fn calls(&self) -> Vec<WalletCall> {
        self.state.lock().expect("lock wallet").calls.clone()
    }

    pub fn add_chain_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, WalletCall::AddChain(_)))
            .count()
    }

    pub fn active_chain(&self) -> u64 {
        self.state.lock().expect("lock wallet").chain_id
    }

    /// Number of live notification subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn record(&self, call: WalletCall) {
        self.state.lock().expect("lock wallet").calls.push(call);
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    type Signer = MockSigner;

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.record(WalletCall::ChainId);
        Ok(self.active_chain())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.record(WalletCall::SwitchChain(chain_id));
        let mut state = self.state.lock().expect("lock wallet");
        if let Some(error) = state.switch_error.clone() {
            return Err(error);
        }
        if !state.known.contains(&chain_id) {
            return Err(ProviderError::with_code(
                CODE_UNKNOWN_CHAIN,
                format!("Unrecognized chain ID {chain_id:#x}"),
            ));
        }
        state.chain_id = chain_id;
        Ok(())
    }

    async fn add_chain(&self, target: &NetworkTarget) -> Result<(), ProviderError> {
        self.record(WalletCall::AddChain(target.chain_id));
        let mut state = self.state.lock().expect("lock wallet");
        if let Some(error) = state.add_error.clone() {
            return Err(error);
        }
        state.known.insert(target.chain_id);
        state.chain_id = target.chain_id;
        Ok(())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record(WalletCall::RequestAccounts);
        let state = self.state.lock().expect("lock wallet");
        match &state.accounts_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.accounts.clone()),
        }
    }

    async fn signer(&self) -> Result<MockSigner, ProviderError> {
        self.record(WalletCall::Signer);
        let state = self.state.lock().expect("lock wallet");
        let address = state.accounts.first().copied().unwrap_or(Address::ZERO);
        Ok(MockSigner::new(address))
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

