//! Wallet provider port.
//!
//! Mirrors what an injected browser wallet offers: query and switch the
//! active chain, add an unknown chain, request account access, hand out a
//! signing handle, and push change notifications.

use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::NetworkTarget;
use crate::error::ProviderError;

/// Notifications pushed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The exposed account list changed. Empty means access was revoked.
    AccountsChanged(Vec<Address>),
    /// The active chain changed.
    ChainChanged(u64),
}

/// Source of a signing identity and network context.
///
/// Errors use the provider's own shape ([`ProviderError`]) so callers can
/// classify rejections, pending requests and unknown chains.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Opaque signing handle; the contract binder knows how to use it.
    type Signer: Clone + Send + Sync + 'static;

    /// Currently active chain id.
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// Ask the wallet to switch to `chain_id`. Fails with code `4902`
    /// when the chain is unknown to the wallet.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// Register `target` with the wallet. A successful add also makes it active.
    async fn add_chain(&self, target: &NetworkTarget) -> Result<(), ProviderError>;

    /// Request account access. May return an empty list.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Signing handle for the currently selected account.
    async fn signer(&self) -> Result<Self::Signer, ProviderError>;

    /// Subscribe to change notifications. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;
}
