//! Alloy bindings for the flash-loan contract pair.

use std::sync::Arc;

use alloy_primitives::{Address, TxHash};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::debug;

use super::wallet::EvmSigner;
use crate::domain::{ContractKind, TxOptions};
use crate::error::ProviderError;
use crate::port::{ContractBinder, FlashLoanContract};

const REVERTED_PREFIX: &str = "execution reverted";

// Shared interface of both deployed contracts.
sol! {
    #[sol(rpc)]
    contract IFlashLoanPair {
        function executeOperation(
            address asset,
            uint256 amount,
            uint256 premium,
            address initiator,
            bytes calldata params
        ) external returns (bool);

        function initiateFlashLoan() external;
    }
}

/// Binds contracts through an HTTP provider that signs with the session key.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlloyBinder;

impl ContractBinder for AlloyBinder {
    type Signer = EvmSigner;

    fn bind(
        &self,
        kind: ContractKind,
        address: Address,
        signer: &EvmSigner,
    ) -> Arc<dyn FlashLoanContract> {
        let provider = ProviderBuilder::new()
            .wallet(signer.wallet.clone())
            .connect_http(signer.rpc_url.clone())
            .erased();
        debug!(%kind, %address, rpc = %signer.rpc_url, "Bound contract");
        Arc::new(AlloyFlashLoanContract {
            instance: IFlashLoanPair::new(address, provider),
        })
    }
}

struct AlloyFlashLoanContract {
    instance: IFlashLoanPair::IFlashLoanPairInstance<DynProvider>,
}

#[async_trait]
impl FlashLoanContract for AlloyFlashLoanContract {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn initiate_flash_loan(&self, options: TxOptions) -> Result<TxHash, ProviderError> {
        let pending = self
            .instance
            .initiateFlashLoan()
            .gas_price(options.gas_price)
            .gas(options.gas_limit)
            .send()
            .await
            .map_err(contract_error)?;
        Ok(*pending.tx_hash())
    }
}

/// Lift an alloy contract error into the provider shape, keeping the RPC
/// code and any message nested in the error data.
fn contract_error(err: alloy_contract::Error) -> ProviderError {
    if let alloy_contract::Error::TransportError(transport) = &err {
        if let Some(payload) = transport.as_error_resp() {
            let message = payload.message.to_string();
            let nested = payload
                .data
                .as_ref()
                .and_then(|data| nested_message(data.get()))
                .or_else(|| message.starts_with(REVERTED_PREFIX).then(|| message.clone()));
            let error = ProviderError::with_code(payload.code, message);
            return match nested {
                Some(nested) => error.nested(nested),
                None => error,
            };
        }
    }
    ProviderError::message(err.to_string())
}

/// `data.message` of a JSON-RPC error, if present.
fn nested_message(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}
