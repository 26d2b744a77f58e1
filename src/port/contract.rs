//! Contract binding port.

use std::sync::Arc;

use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;

use crate::domain::{ContractKind, TxOptions};
use crate::error::ProviderError;

/// A callable handle to one deployed flash-loan contract.
///
/// Both sides of the pair expose the same interface: a callback the
/// lending pool invokes (never called from here) and `initiateFlashLoan()`.
#[async_trait]
pub trait FlashLoanContract: Send + Sync {
    /// On-chain address this handle is bound to.
    fn address(&self) -> Address;

    /// Submit `initiateFlashLoan()`. Resolves once the node accepts the
    /// transaction, not when it is mined.
    async fn initiate_flash_loan(&self, options: TxOptions) -> Result<TxHash, ProviderError>;
}

/// Builds contract handles for a signing identity.
///
/// Binding is pure construction: no network traffic. A handle is only
/// valid for the signer it was built with.
pub trait ContractBinder: Send + Sync {
    type Signer;

    fn bind(
        &self,
        kind: ContractKind,
        address: Address,
        signer: &Self::Signer,
    ) -> Arc<dyn FlashLoanContract>;
}
