//! Wallet session manager.
//!
//! A [`Session`] owns the connection to one wallet: the selected account,
//! its signing handle and the contract pair bound to it. While connected
//! it listens to wallet notifications; the subscription lives exactly as
//! long as the connection (or the session, whichever ends first).

use std::sync::{Arc, Weak};

use alloy_primitives::Address;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::binding::{ContractPair, ContractSlot};
use super::console::Console;
use super::network::ensure_network;
use crate::domain::{Level, NetworkTarget};
use crate::error::{Error, Result};
use crate::port::{ContractBinder, WalletEvent, WalletProvider};

/// Session lifecycle as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    /// The wallet changed network. The session has torn itself down and
    /// the host should build a fresh one.
    ReloadRequested { chain_id: u64 },
}

struct SessionState<S> {
    connecting: bool,
    connected: bool,
    account: Option<Address>,
    signer: Option<S>,
}

impl<S> Default for SessionState<S> {
    fn default() -> Self {
        Self {
            connecting: false,
            connected: false,
            account: None,
            signer: None,
        }
    }
}

struct Inner<W: WalletProvider, B> {
    wallet: Option<Arc<W>>,
    binder: Arc<B>,
    target: NetworkTarget,
    console: Console,
    contracts: ContractSlot,
    state: Mutex<SessionState<W::Signer>>,
    watcher: Mutex<Option<JoinHandle<()>>>,
    lifecycle: watch::Sender<Lifecycle>,
}

/// Clears the `connecting` flag however `connect` exits.
struct ConnectingGuard<'a, S>(&'a Mutex<SessionState<S>>);

impl<S> Drop for ConnectingGuard<'_, S> {
    fn drop(&mut self) {
        self.0.lock().connecting = false;
    }
}

pub struct Session<W, B>
where
    W: WalletProvider + 'static,
    B: ContractBinder<Signer = W::Signer> + 'static,
{
    inner: Arc<Inner<W, B>>,
}

impl<W, B> Session<W, B>
where
    W: WalletProvider + 'static,
    B: ContractBinder<Signer = W::Signer> + 'static,
{
    /// Create a disconnected session. `wallet` is `None` when no wallet
    /// provider is available at all.
    pub fn new(
        wallet: Option<Arc<W>>,
        binder: Arc<B>,
        target: NetworkTarget,
        console: Console,
        contracts: ContractSlot,
    ) -> Self {
        let (lifecycle, _) = watch::channel(Lifecycle::Active);
        Self {
            inner: Arc::new(Inner {
                wallet,
                binder,
                target,
                console,
                contracts,
                state: Mutex::new(SessionState::default()),
                watcher: Mutex::new(None),
                lifecycle,
            }),
        }
    }

    /// Connect to the wallet, land on the target network, bind the pair
    /// and start listening for wallet notifications.
    ///
    /// Failures are logged and notified as a single readable message, then
    /// returned.
    pub async fn connect(&self) -> Result<Address> {
        let inner = &self.inner;
        let Some(wallet) = inner.wallet.clone() else {
            let err = Error::WalletNotFound;
            inner.console.report(Level::Error, err.user_message());
            return Err(err);
        };

        inner.state.lock().connecting = true;
        let _connecting = ConnectingGuard(&inner.state);
        inner.console.log(Level::Info, "Connecting wallet...");

        match self.establish(&wallet).await {
            Ok(account) => {
                info!(%account, chain_id = inner.target.chain_id, "Wallet connected");
                inner
                    .console
                    .report(Level::Success, format!("Wallet connected: {account}"));
                Ok(account)
            }
            Err(e) => {
                error!(error = %e, "Wallet connection failed");
                inner.console.report(Level::Error, e.user_message());
                Err(e)
            }
        }
    }

    async fn establish(&self, wallet: &Arc<W>) -> Result<Address> {
        let inner = &self.inner;
        ensure_network(wallet.as_ref(), &inner.target).await?;

        let accounts = wallet.request_accounts().await.map_err(Error::Connect)?;
        let Some(&account) = accounts.first() else {
            return Err(Error::NoAccounts);
        };

        let signer = wallet.signer().await.map_err(Error::Connect)?;
        inner
            .contracts
            .set(ContractPair::bind(inner.binder.as_ref(), &signer));

        {
            let mut state = inner.state.lock();
            state.connected = true;
            state.account = Some(account);
            state.signer = Some(signer);
        }

        // Subscribe only after the network switch so our own switch does
        // not come back as a chain change.
        let events = wallet.subscribe();
        let handle = tokio::spawn(watch_wallet(Arc::downgrade(&self.inner), events));
        if let Some(previous) = inner.watcher.lock().replace(handle) {
            previous.abort();
        }

        Ok(account)
    }

    /// Drop the connection and unsubscribe from wallet notifications.
    /// Returns whether the session was connected.
    pub fn disconnect(&self) -> bool {
        if let Some(handle) = self.inner.watcher.lock().take() {
            handle.abort();
        }
        self.inner.clear()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.state.lock().connected
    }

    #[must_use]
    pub fn is_connecting(&self) -> bool {
        self.inner.state.lock().connecting
    }

    #[must_use]
    pub fn account(&self) -> Option<Address> {
        self.inner.state.lock().account
    }

    /// Whether a notification subscription is currently held.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.inner
            .watcher
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub fn contracts(&self) -> &ContractSlot {
        &self.inner.contracts
    }

    /// Receiver that flips to [`Lifecycle::ReloadRequested`] on a network change.
    #[must_use]
    pub fn lifecycle(&self) -> watch::Receiver<Lifecycle> {
        self.inner.lifecycle.subscribe()
    }
}

impl<W, B> Inner<W, B>
where
    W: WalletProvider + 'static,
    B: ContractBinder<Signer = W::Signer> + 'static,
{
    /// Reset to disconnected and drop both bindings. No-op when already
    /// disconnected.
    fn clear(&self) -> bool {
        let was_connected = {
            let mut state = self.state.lock();
            let was = state.connected;
            state.connected = false;
            state.account = None;
            state.signer = None;
            was
        };
        self.contracts.clear();
        was_connected
    }

    async fn switch_account(&self, account: Address) -> Result<()> {
        if self.state.lock().account == Some(account) {
            return Ok(());
        }
        let wallet = self.wallet.as_ref().ok_or(Error::WalletNotFound)?;
        let signer = wallet.signer().await.map_err(Error::Connect)?;
        self.contracts
            .set(ContractPair::bind(self.binder.as_ref(), &signer));
        {
            let mut state = self.state.lock();
            state.account = Some(account);
            state.signer = Some(signer);
        }
        self.console
            .log(Level::Info, format!("Account changed to {account}"));
        Ok(())
    }
}

impl<W: WalletProvider, B> Drop for Inner<W, B> {
    fn drop(&mut self) {
        if let Some(handle) = self.watcher.get_mut().take() {
            handle.abort();
        }
    }
}

async fn watch_wallet<W, B>(session: Weak<Inner<W, B>>, mut events: broadcast::Receiver<WalletEvent>)
where
    W: WalletProvider + 'static,
    B: ContractBinder<Signer = W::Signer> + 'static,
{
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Wallet notifications lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        let Some(inner) = session.upgrade() else {
            break;
        };
        debug!(?event, "Wallet notification");

        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.first() {
                None => {
                    inner.watcher.lock().take();
                    if inner.clear() {
                        inner.console.report(Level::Warning, "Wallet disconnected");
                    }
                    break;
                }
                Some(&account) => {
                    if let Err(e) = inner.switch_account(account).await {
                        inner.console.report(Level::Error, e.user_message());
                        inner.watcher.lock().take();
                        inner.clear();
                        break;
                    }
                }
            },
            WalletEvent::ChainChanged(chain_id) => {
                inner
                    .console
                    .log(Level::Info, format!("Network changed to {chain_id:#x}"));
                inner.watcher.lock().take();
                inner.clear();
                inner
                    .lifecycle
                    .send_replace(Lifecycle::ReloadRequested { chain_id });
                break;
            }
        }
    }
}
