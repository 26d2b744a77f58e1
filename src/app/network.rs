//! Network guard: make sure the wallet is on the target chain.

use tracing::{debug, info};

use crate::domain::NetworkTarget;
use crate::error::{Error, ProviderErrorKind, Result};
use crate::port::WalletProvider;

/// Switch the wallet to `target` if it is on another chain.
///
/// An unknown chain (code `4902`) is added with the full descriptor, which
/// also activates it. Any other switch failure aborts with
/// [`Error::Network`].
pub async fn ensure_network<W: WalletProvider>(wallet: &W, target: &NetworkTarget) -> Result<()> {
    let current = wallet.chain_id().await.map_err(Error::Network)?;
    if current == target.chain_id {
        debug!(chain_id = current, "Already on target network");
        return Ok(());
    }

    info!(from = current, to = target.chain_id, "Switching network");
    match wallet.switch_chain(target.chain_id).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ProviderErrorKind::UnknownChain => {
            info!(chain = %target.chain_name, "Chain unknown to wallet, adding it");
            wallet.add_chain(target).await.map_err(Error::Network)
        }
        Err(e) => Err(Error::Network(e)),
    }
}
