//! Target network descriptor.
//!
//! The wallet is only allowed to act on one network. The descriptor
//! carries everything a wallet needs to add the chain when it has never
//! seen it before.

use serde::Serialize;

/// Native currency of a network, as passed to `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A network the wallet should be on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTarget {
    #[serde(serialize_with = "serialize_hex_chain_id")]
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

fn serialize_hex_chain_id<S: serde::Serializer>(id: &u64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{id:#x}"))
}

impl NetworkTarget {
    /// BNB Smart Chain mainnet.
    #[must_use]
    pub fn bsc_mainnet() -> Self {
        Self {
            chain_id: 56,
            chain_name: "BNB Smart Chain".to_string(),
            native_currency: NativeCurrency {
                name: "BNB".to_string(),
                symbol: "BNB".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://bsc-dataseed.binance.org/".to_string()],
            block_explorer_urls: vec!["https://bscscan.com".to_string()],
        }
    }

    /// Chain id in the `0x`-prefixed form wallets expect.
    #[must_use]
    pub fn hex_chain_id(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// First RPC endpoint, if any.
    #[must_use]
    pub fn primary_rpc(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }

    /// Replace the RPC list with a single endpoint.
    #[must_use]
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_urls = vec![url.into()];
        self
    }
}

impl Default for NetworkTarget {
    fn default() -> Self {
        Self::bsc_mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_chain_id_is_prefixed() {
        assert_eq!(NetworkTarget::bsc_mainnet().hex_chain_id(), "0x38");
    }

    #[test]
    fn serializes_as_add_chain_params() {
        let json = serde_json::to_value(NetworkTarget::bsc_mainnet()).unwrap();
        assert_eq!(json["chainId"], "0x38");
        assert_eq!(json["nativeCurrency"]["symbol"], "BNB");
        assert_eq!(json["rpcUrls"][0], "https://bsc-dataseed.binance.org/");
        assert_eq!(json["blockExplorerUrls"][0], "https://bscscan.com");
    }

    #[test]
    fn rpc_override_replaces_list() {
        let target = NetworkTarget::bsc_mainnet().with_rpc_url("http://localhost:8545");
        assert_eq!(target.primary_rpc(), Some("http://localhost:8545"));
        assert_eq!(target.rpc_urls.len(), 1);
    }
}
