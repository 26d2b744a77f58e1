//! End-to-end flows through the controller with mock wallet and contracts.

use std::sync::Arc;
use std::time::Duration;

use flashpair::app::{Console, Controller, Lifecycle, OverlapPolicy};
use flashpair::domain::{ContractKind, NetworkTarget};
use flashpair::error::{Error, ProviderError};
use flashpair::port::{NotifierRegistry, WalletEvent};
use flashpair::testkit::{MockBinder, MockWallet, RecordingNotifier, WalletCall};

fn controller(
    wallet: Arc<MockWallet>,
    binder: MockBinder,
) -> (Controller<MockWallet, MockBinder>, RecordingNotifier) {
    let recorder = RecordingNotifier::new();
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder.clone()));
    let controller = Controller::new(
        Some(wallet),
        binder,
        NetworkTarget::bsc_mainnet(),
        Console::new(Arc::new(registry)),
        OverlapPolicy::Skip,
    );
    (controller, recorder)
}

fn position(messages: &[String], from: usize, pred: impl Fn(&str) -> bool) -> Option<usize> {
    messages[from..]
        .iter()
        .position(|m| pred(m.as_str()))
        .map(|i| i + from)
}

#[tokio::test(start_paused = true)]
async fn connect_start_two_runs_stop() {
    let wallet = Arc::new(MockWallet::on_chain(56));
    let binder = MockBinder::new();
    let (controller, recorder) = controller(wallet, binder.clone());

    controller.connect().await.unwrap();
    controller.start();
    tokio::time::sleep(Duration::from_millis(3010)).await;
    assert!(controller.stop());

    assert_eq!(binder.calls(ContractKind::Long), 2);
    assert_eq!(binder.calls(ContractKind::Short), 2);
    assert!(!controller.is_running());

    let messages: Vec<String> = controller
        .log_entries()
        .into_iter()
        .map(|e| e.message)
        .collect();
    let connected = position(&messages, 0, |m| m.starts_with("Wallet connected")).unwrap();
    let first = position(&messages, connected, |m| m == "Flash loans initiated successfully").unwrap();
    let second = position(&messages, first + 1, |m| m == "Flash loans initiated successfully").unwrap();
    let stopped = position(&messages, second + 1, |m| m == "Execution stopped").unwrap();
    assert!(connected < first && first < second && second < stopped);

    assert!(recorder.messages().iter().any(|m| m == "Execution stopped"));
}

#[tokio::test]
async fn unknown_network_is_added_before_accounts() {
    let wallet = Arc::new(MockWallet::on_chain(1));
    let (controller, _) = controller(Arc::clone(&wallet), MockBinder::new());

    controller.connect().await.unwrap();

    assert_eq!(
        wallet.calls(),
        vec![
            WalletCall::ChainId,
            WalletCall::SwitchChain(56),
            WalletCall::AddChain(56),
            WalletCall::RequestAccounts,
            WalletCall::Signer,
        ]
    );
    assert_eq!(wallet.add_chain_count(), 1);
}

#[tokio::test]
async fn rejected_switch_aborts_connect() {
    let wallet = Arc::new(MockWallet::on_chain(1).failing_switch(ProviderError::user_rejected()));
    let (controller, recorder) = controller(Arc::clone(&wallet), MockBinder::new());

    let err = controller.connect().await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert!(!controller.is_connected());
    assert!(!controller.is_connecting());
    assert_eq!(wallet.add_chain_count(), 0);
    assert!(!wallet.calls().contains(&WalletCall::RequestAccounts));
    assert_eq!(recorder.len(), 1);
}

#[tokio::test]
async fn dispatch_before_connect_is_refused() {
    let binder = MockBinder::new();
    let (controller, recorder) = controller(Arc::new(MockWallet::on_chain(56)), binder.clone());

    let err = controller.run_once().await.unwrap_err();

    assert!(matches!(err, Error::ContractsNotInitialized));
    assert_eq!(binder.total_calls(), 0);
    assert!(recorder
        .messages()
        .iter()
        .any(|m| m == "Contracts not initialized."));
    assert!(!controller.is_running());
}

#[tokio::test(start_paused = true)]
async fn revoked_accounts_mid_cadence_keep_timer_but_refuse_dispatch() {
    let wallet = Arc::new(MockWallet::on_chain(56));
    let binder = MockBinder::new();
    let (controller, _) = controller(Arc::clone(&wallet), binder.clone());

    controller.connect().await.unwrap();
    controller.start();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(binder.calls(ContractKind::Long), 1);

    wallet.emit(WalletEvent::AccountsChanged(vec![]));
    tokio::time::sleep(Duration::from_millis(3000)).await;

    assert!(!controller.is_connected());
    assert_eq!(binder.calls(ContractKind::Long), 1);
    assert!(controller.is_running());
    assert!(controller
        .log_entries()
        .iter()
        .any(|e| e.message == "Contracts not initialized."));
    controller.stop();
}

#[tokio::test(start_paused = true)]
async fn network_change_reload_resumes_cleanly() {
    let wallet = Arc::new(MockWallet::on_chain(56));
    let binder = MockBinder::new();
    let (mut controller, _) = controller(Arc::clone(&wallet), binder.clone());

    controller.connect().await.unwrap();
    controller.start();
    let mut lifecycle = controller.lifecycle();

    wallet.emit(WalletEvent::ChainChanged(97));
    lifecycle.changed().await.unwrap();
    assert_eq!(*lifecycle.borrow(), Lifecycle::ReloadRequested { chain_id: 97 });

    controller.reinitialize().await.unwrap();
    assert!(controller.is_connected());
    assert!(!controller.is_running());
    assert_eq!(binder.bind_count(), 4);
    assert_eq!(wallet.subscriber_count(), 1);
}
