//! Controller tying the session, dispatcher and scheduler together.
//!
//! This is the surface the host drives: connect, start, stop, run once,
//! plus read-only views of the log, the session and the contract pair.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::watch;
use tracing::{info, warn};

use super::binding::ContractSlot;
use super::console::Console;
use super::dispatcher::{DispatchReport, Dispatcher};
use super::scheduler::{OverlapPolicy, Scheduler};
use super::session::{Lifecycle, Session};
use crate::domain::{ContractKind, Level, LogEntry, NetworkTarget};
use crate::error::Result;
use crate::port::{ContractBinder, WalletProvider};

pub struct Controller<W, B>
where
    W: WalletProvider + 'static,
    B: ContractBinder<Signer = W::Signer> + 'static,
{
    wallet: Option<Arc<W>>,
    binder: Arc<B>,
    target: NetworkTarget,
    console: Console,
    contracts: ContractSlot,
    session: Session<W, B>,
    dispatcher: Arc<Dispatcher>,
    scheduler: Scheduler,
}

impl<W, B> Controller<W, B>
where
    W: WalletProvider + 'static,
    B: ContractBinder<Signer = W::Signer> + 'static,
{
    pub fn new(
        wallet: Option<Arc<W>>,
        binder: B,
        target: NetworkTarget,
        console: Console,
        overlap: OverlapPolicy,
    ) -> Self {
        let binder = Arc::new(binder);
        let contracts = ContractSlot::new();
        let dispatcher = Arc::new(Dispatcher::new(contracts.clone(), console.clone()));
        let scheduler = Scheduler::new(Arc::clone(&dispatcher), console.clone(), overlap);
        let session = Session::new(
            wallet.clone(),
            Arc::clone(&binder),
            target.clone(),
            console.clone(),
            contracts.clone(),
        );
        Self {
            wallet,
            binder,
            target,
            console,
            contracts,
            session,
            dispatcher,
            scheduler,
        }
    }

    pub async fn connect(&self) -> Result<Address> {
        self.session.connect().await
    }

    pub fn start(&self) {
        self.scheduler.start();
    }

    pub fn stop(&self) -> bool {
        self.scheduler.stop()
    }

    pub async fn run_once(&self) -> Result<DispatchReport> {
        self.scheduler.run_once().await
    }

    /// Full teardown and rebuild of the session, then reconnect.
    ///
    /// Stops the cadence and releases the old session's subscription and
    /// bindings before a fresh session is created. The activity log is
    /// kept.
    pub async fn reinitialize(&mut self) -> Result<Address> {
        info!("Reinitializing session");
        self.scheduler.stop();
        self.session.disconnect();
        self.session = Session::new(
            self.wallet.clone(),
            Arc::clone(&self.binder),
            self.target.clone(),
            self.console.clone(),
            self.contracts.clone(),
        );
        self.console.log(Level::Info, "Session reinitialized");
        self.session.connect().await
    }

    /// Keep the cadence running until `shutdown` resolves.
    ///
    /// Every reload request from the session leads to a full
    /// [`Controller::reinitialize`] and a fresh cadence. A request that
    /// arrived before this call is honoured too. On error the cadence is
    /// already stopped.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let mut lifecycle = self.lifecycle();
            if *lifecycle.borrow() == Lifecycle::Active {
                self.start();
                tokio::select! {
                    _ = &mut shutdown => {
                        self.stop();
                        return Ok(());
                    }
                    reload = lifecycle.wait_for(|state| *state != Lifecycle::Active) => {
                        if reload.is_err() {
                            warn!("Session lifecycle channel closed");
                            self.stop();
                            return Ok(());
                        }
                    }
                }
            }

            self.reinitialize().await?;
        }
    }

    #[must_use]
    pub fn lifecycle(&self) -> watch::Receiver<Lifecycle> {
        self.session.lifecycle()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    #[must_use]
    pub fn is_connecting(&self) -> bool {
        self.session.is_connecting()
    }

    #[must_use]
    pub fn account(&self) -> Option<Address> {
        self.session.account()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        self.dispatcher.is_busy()
    }

    #[must_use]
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.console.activity().entries()
    }

    #[must_use]
    pub fn console(&self) -> &Console {
        &self.console
    }

    #[must_use]
    pub fn target(&self) -> &NetworkTarget {
        &self.target
    }

    /// The two compiled-in contract addresses.
    #[must_use]
    pub fn contract_addresses() -> [(ContractKind, Address); 2] {
        ContractKind::ALL.map(|kind| (kind, kind.address()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::port::WalletEvent;
    use crate::testkit::{MockBinder, MockWallet};

    #[tokio::test]
    async fn reinitialize_reconnects_with_fresh_session() {
        let wallet = Arc::new(MockWallet::on_chain(56));
        let mut controller = Controller::new(
            Some(Arc::clone(&wallet)),
            MockBinder::new(),
            NetworkTarget::bsc_mainnet(),
            Console::silent(),
            OverlapPolicy::Skip,
        );
        controller.connect().await.unwrap();
        let mut lifecycle = controller.lifecycle();

        wallet.emit(WalletEvent::ChainChanged(56));
        lifecycle.changed().await.unwrap();
        assert!(!controller.is_connected());

        controller.reinitialize().await.unwrap();
        assert!(controller.is_connected());
        assert_eq!(*controller.lifecycle().borrow(), Lifecycle::Active);
        assert_eq!(wallet.subscriber_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reload_requested_before_run_is_honoured() {
        let wallet = Arc::new(MockWallet::on_chain(56));
        let binder = MockBinder::new();
        let mut controller = Controller::new(
            Some(Arc::clone(&wallet)),
            binder.clone(),
            NetworkTarget::bsc_mainnet(),
            Console::silent(),
            OverlapPolicy::Skip,
        );
        controller.connect().await.unwrap();

        wallet.emit(WalletEvent::ChainChanged(97));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!controller.is_connected());

        controller
            .run_until(tokio::time::sleep(Duration::from_millis(100)))
            .await
            .unwrap();

        assert!(controller.is_connected());
        assert!(!controller.is_running());
        assert_eq!(*controller.lifecycle().borrow(), Lifecycle::Active);
        assert_eq!(binder.bind_count(), 4);
        assert_eq!(binder.calls(ContractKind::Long), 1);
        assert!(controller
            .log_entries()
            .iter()
            .any(|e| e.message == "Session reinitialized"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_reconnect_ends_run_with_cadence_stopped() {
        let wallet = Arc::new(MockWallet::on_chain(56));
        let mut controller = Controller::new(
            Some(Arc::clone(&wallet)),
            MockBinder::new(),
            NetworkTarget::bsc_mainnet(),
            Console::silent(),
            OverlapPolicy::Skip,
        );
        controller.connect().await.unwrap();
        wallet.set_accounts(vec![]);

        let run = controller.run_until(std::future::pending());
        let emit = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            wallet.emit(WalletEvent::ChainChanged(97));
        };
        let (outcome, ()) = tokio::join!(run, emit);

        assert!(matches!(outcome, Err(crate::error::Error::NoAccounts)));
        assert!(!controller.is_running());
        assert!(!controller.is_connected());
    }

    #[test]
    fn contract_addresses_are_long_then_short() {
        let addresses = Controller::<MockWallet, MockBinder>::contract_addresses();
        assert_eq!(addresses[0].0, ContractKind::Long);
        assert_eq!(addresses[1].0, ContractKind::Short);
    }
}
