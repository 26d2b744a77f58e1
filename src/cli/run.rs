//! Handlers for the `run` and `once` commands.

use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};

use crate::adapter::evm::{AlloyBinder, LocalWallet};
use crate::adapter::notifier::ConsoleNotifier;
use crate::app::{Console, Controller};
use crate::cli::output;
use crate::config::Config;
use crate::error::Result;
use crate::port::NotifierRegistry;

type EvmController = Controller<LocalWallet, AlloyBinder>;

fn build_controller(config: &Config) -> Result<EvmController> {
    let wallet = LocalWallet::from_config(config)?.map(Arc::new);
    if let Some(wallet) = &wallet {
        info!(address = %wallet.address(), "Wallet loaded");
    }

    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(ConsoleNotifier));
    let console = Console::new(Arc::new(notifiers));

    Ok(Controller::new(
        wallet,
        AlloyBinder,
        config.target(),
        console,
        config.scheduler.overlap,
    ))
}

/// Execute `run`: connect, dispatch on the cadence until Ctrl-C.
///
/// A wallet network change tears the session down; it is rebuilt,
/// reconnected and the cadence resumes. The activity log is printed however
/// the loop ends.
pub async fn execute_run(config: &Config) -> Result<()> {
    let mut controller = build_controller(config)?;
    controller.connect().await?;

    let outcome = controller
        .run_until(async {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
            info!("Shutdown signal received");
        })
        .await;

    output::activity(&controller.log_entries());
    outcome
}

/// Execute `once`: connect and dispatch a single time.
pub async fn execute_once(config: &Config) -> Result<()> {
    let controller = build_controller(config)?;
    let outcome = async {
        controller.connect().await?;
        controller.run_once().await
    }
    .await;

    output::activity(&controller.log_entries());
    let report = outcome?;
    output::section("Transactions");
    output::key_value("long", report.long_tx);
    output::key_value("short", report.short_tx);
    Ok(())
}
