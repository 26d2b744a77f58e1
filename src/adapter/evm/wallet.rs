//! Local-key wallet.
//!
//! Holds a private key and talks JSON-RPC over HTTP. It keeps the same
//! network semantics as an injected browser wallet: a table of chains it
//! knows about, one active chain, `4902` for a switch to an unknown chain,
//! and a notification whenever the active chain changes.

use std::collections::HashMap;
use std::str::FromStr;

use alloy_primitives::Address;
use alloy_provider::network::EthereumWallet;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::info;
use url::Url;

use crate::config::{Config, PRIVATE_KEY_ENV};
use crate::domain::NetworkTarget;
use crate::error::{ConfigError, ProviderError, Result, CODE_UNKNOWN_CHAIN};
use crate::port::{WalletEvent, WalletProvider};

/// JSON-RPC "invalid params".
const CODE_INVALID_PARAMS: i64 = -32602;

/// Signing handle: the key wrapped for alloy plus the endpoint it was
/// issued for.
#[derive(Clone)]
pub struct EvmSigner {
    pub(crate) wallet: EthereumWallet,
    pub(crate) rpc_url: Url,
    address: Address,
}

impl EvmSigner {
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }
}

struct Networks {
    /// Endpoints for chains added through `add_chain`.
    known: HashMap<u64, Url>,
    active: Url,
}

pub struct LocalWallet {
    signer: PrivateKeySigner,
    networks: Mutex<Networks>,
    events: broadcast::Sender<WalletEvent>,
}

impl LocalWallet {
    /// Create a wallet for `private_key` that starts on `rpc_url`.
    pub fn new(private_key: &str, rpc_url: &str) -> Result<Self> {
        let signer =
            PrivateKeySigner::from_str(private_key).map_err(|e| ConfigError::InvalidValue {
                field: PRIVATE_KEY_ENV,
                reason: e.to_string(),
            })?;
        let active = Url::parse(rpc_url).map_err(|e| ConfigError::InvalidValue {
            field: "wallet.rpc_url",
            reason: e.to_string(),
        })?;
        let (events, _) = broadcast::channel(16);

        Ok(Self {
            signer,
            networks: Mutex::new(Networks {
                known: HashMap::new(),
                active,
            }),
            events,
        })
    }

    /// Build from config. `Ok(None)` means no key is configured, which the
    /// session reports as a missing wallet.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(private_key) = config.wallet.private_key.as_deref() else {
            return Ok(None);
        };
        let rpc_url = config.rpc_url().ok_or(ConfigError::MissingField {
            field: "wallet.rpc_url",
        })?;
        Self::new(private_key, &rpc_url).map(Some)
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    fn active_rpc(&self) -> Url {
        self.networks.lock().active.clone()
    }

    fn activate(&self, chain_id: u64, url: Url) {
        self.networks.lock().active = url;
        info!(chain_id, "Wallet network changed");
        let _ = self.events.send(WalletEvent::ChainChanged(chain_id));
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    type Signer = EvmSigner;

    async fn chain_id(&self) -> std::result::Result<u64, ProviderError> {
        fetch_chain_id(self.active_rpc()).await
    }

    async fn switch_chain(&self, chain_id: u64) -> std::result::Result<(), ProviderError> {
        let url = self.networks.lock().known.get(&chain_id).cloned();
        match url {
            Some(url) => {
                self.activate(chain_id, url);
                Ok(())
            }
            None => Err(ProviderError::with_code(
                CODE_UNKNOWN_CHAIN,
                format!("Unrecognized chain ID {chain_id:#x}. Try adding the chain first."),
            )),
        }
    }

    async fn add_chain(&self, target: &NetworkTarget) -> std::result::Result<(), ProviderError> {
        let url = target
            .primary_rpc()
            .and_then(|raw| Url::parse(raw).ok())
            .ok_or_else(|| {
                ProviderError::with_code(
                    CODE_INVALID_PARAMS,
                    format!("No usable RPC URL for {}", target.chain_name),
                )
            })?;

        // The endpoint must actually serve the chain it is registered under.
        let served = fetch_chain_id(url.clone()).await?;
        if served != target.chain_id {
            return Err(ProviderError::with_code(
                CODE_INVALID_PARAMS,
                format!(
                    "RPC endpoint {url} serves chain {served:#x}, expected {}",
                    target.hex_chain_id()
                ),
            ));
        }

        self.networks
            .lock()
            .known
            .insert(target.chain_id, url.clone());
        self.activate(target.chain_id, url);
        Ok(())
    }

    async fn request_accounts(&self) -> std::result::Result<Vec<Address>, ProviderError> {
        Ok(vec![self.signer.address()])
    }

    async fn signer(&self) -> std::result::Result<EvmSigner, ProviderError> {
        Ok(EvmSigner {
            wallet: EthereumWallet::from(self.signer.clone()),
            rpc_url: self.active_rpc(),
            address: self.signer.address(),
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

/// `eth_chainId` against `url`.
async fn fetch_chain_id(url: Url) -> std::result::Result<u64, ProviderError> {
    let provider = ProviderBuilder::new().connect_http(url);
    provider.get_chain_id().await.map_err(|e| match e.as_error_resp() {
        Some(payload) => ProviderError::with_code(payload.code, payload.message.to_string()),
        None => ProviderError::message(e.to_string()),
    })
}
