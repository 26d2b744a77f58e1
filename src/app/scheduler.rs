//! Scheduler: run the dispatcher once or on a fixed cadence.
//!
//! ```text
//!   Idle ──start()──▶ Active ──stop()──▶ Idle
//!                      │  ▲
//!                      └──┘ start() (restart)
//! ```
//!
//! At most one timer exists at any time. Stopping only prevents future
//! ticks; a dispatch already in flight is left to finish.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::console::Console;
use super::dispatcher::{DispatchReport, Dispatcher};
use crate::domain::Level;
use crate::error::Result;

/// Fixed cadence between dispatches.
pub const DISPATCH_PERIOD: Duration = Duration::from_millis(3000);

/// What a tick does when the previous dispatch has not finished yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Skip the tick.
    #[default]
    Skip,
    /// Dispatch anyway; runs may overlap.
    Allow,
}

#[derive(Default)]
struct ExecutionState {
    running: bool,
    timer: Option<JoinHandle<()>>,
}

pub struct Scheduler {
    dispatcher: Arc<Dispatcher>,
    console: Console,
    period: Duration,
    overlap: OverlapPolicy,
    state: Mutex<ExecutionState>,
}

impl Scheduler {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>, console: Console, overlap: OverlapPolicy) -> Self {
        Self::with_period(dispatcher, console, overlap, DISPATCH_PERIOD)
    }

    #[must_use]
    pub fn with_period(
        dispatcher: Arc<Dispatcher>,
        console: Console,
        overlap: OverlapPolicy,
        period: Duration,
    ) -> Self {
        Self {
            dispatcher,
            console,
            period,
            overlap,
            state: Mutex::new(ExecutionState::default()),
        }
    }

    /// Dispatch now, then again every period until [`Scheduler::stop`].
    ///
    /// Calling `start` while active replaces the running timer.
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) {
        let timer = tokio::spawn(run_timer(
            Arc::clone(&self.dispatcher),
            self.period,
            self.overlap,
        ));
        {
            let mut state = self.state.lock();
            if let Some(previous) = state.timer.replace(timer) {
                debug!("Replacing active dispatch timer");
                previous.abort();
            }
            state.running = true;
        }
        self.console.report(
            Level::Info,
            format!("Execution started (every {}s)", self.period.as_secs_f64()),
        );
    }

    /// Cancel the timer. Returns `false` (and does nothing) when idle.
    pub fn stop(&self) -> bool {
        let timer = {
            let mut state = self.state.lock();
            let Some(timer) = state.timer.take() else {
                return false;
            };
            state.running = false;
            timer
        };
        timer.abort();
        self.console.report(Level::Info, "Execution stopped");
        true
    }

    /// Dispatch exactly once without touching the timer.
    pub async fn run_once(&self) -> Result<DispatchReport> {
        self.console.report(Level::Info, "Running flash loans once...");
        self.dispatcher.execute_contracts().await
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    #[must_use]
    pub fn has_timer(&self) -> bool {
        self.state.lock().timer.is_some()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.abort();
        }
    }
}

async fn run_timer(dispatcher: Arc<Dispatcher>, period: Duration, overlap: OverlapPolicy) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last: Option<JoinHandle<()>> = None;

    loop {
        // The first tick completes immediately.
        ticker.tick().await;

        if overlap == OverlapPolicy::Skip {
            let pending = last.as_ref().is_some_and(|h| !h.is_finished());
            if pending || dispatcher.is_busy() {
                debug!("Previous dispatch still in flight, skipping tick");
                continue;
            }
        }

        // Spawned so that aborting the timer never cancels a dispatch.
        let dispatcher = Arc::clone(&dispatcher);
        last = Some(tokio::spawn(async move {
            let _ = dispatcher.execute_contracts().await;
        }));
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;
    use crate::app::binding::{ContractPair, ContractSlot};
    use crate::domain::ContractKind;
    use crate::testkit::{MockBinder, MockSigner};

    fn scheduler(binder: &MockBinder, overlap: OverlapPolicy) -> (Scheduler, Console) {
        let slot = ContractSlot::new();
        slot.set(ContractPair::bind(binder, &MockSigner::new(Address::ZERO)));
        let console = Console::silent();
        let dispatcher = Arc::new(Dispatcher::new(slot, console.clone()));
        (Scheduler::new(dispatcher, console.clone(), overlap), console)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn start_dispatches_immediately_then_every_period() {
        let binder = MockBinder::new();
        let (scheduler, _) = scheduler(&binder, OverlapPolicy::Skip);

        scheduler.start();
        advance(10).await;
        assert_eq!(binder.calls(ContractKind::Long), 1);

        advance(3000).await;
        assert_eq!(binder.calls(ContractKind::Long), 2);

        advance(3000).await;
        assert_eq!(binder.calls(ContractKind::Long), 3);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_start_keeps_one_timer() {
        let binder = MockBinder::new();
        let (scheduler, _) = scheduler(&binder, OverlapPolicy::Skip);

        for _ in 0..5 {
            scheduler.start();
            assert!(scheduler.has_timer());
            assert!(scheduler.is_running());
        }
        advance(10).await;
        let after_starts = binder.calls(ContractKind::Long);

        advance(3000).await;
        assert_eq!(binder.calls(ContractKind::Long), after_starts + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_halts_ticks() {
        let binder = MockBinder::new();
        let (scheduler, console) = scheduler(&binder, OverlapPolicy::Skip);

        assert!(!scheduler.stop());
        scheduler.start();
        advance(10).await;

        assert!(scheduler.stop());
        assert!(!scheduler.stop());
        assert!(!scheduler.is_running());
        assert!(!scheduler.has_timer());

        let calls = binder.calls(ContractKind::Long);
        advance(10_000).await;
        assert_eq!(binder.calls(ContractKind::Long), calls);

        let stops = console
            .activity()
            .messages()
            .iter()
            .filter(|m| *m == "Execution stopped")
            .count();
        assert_eq!(stops, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_once_leaves_timer_alone() {
        let binder = MockBinder::new();
        let (scheduler, _) = scheduler(&binder, OverlapPolicy::Skip);

        scheduler.run_once().await.unwrap();

        assert_eq!(binder.calls(ContractKind::Long), 1);
        assert!(!scheduler.is_running());
        assert!(!scheduler.has_timer());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_does_not_cancel_in_flight_dispatch() {
        let binder = MockBinder::new();
        binder.set_latency(Duration::from_secs(2));
        let (scheduler, console) = scheduler(&binder, OverlapPolicy::Skip);

        scheduler.start();
        advance(10).await;
        scheduler.stop();
        advance(5000).await;

        assert!(console
            .activity()
            .messages()
            .iter()
            .any(|m| m == crate::app::dispatcher::SUCCESS_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn skip_policy_skips_ticks_while_busy() {
        let binder = MockBinder::new();
        binder.set_latency(Duration::from_millis(7000));
        let (scheduler, _) = scheduler(&binder, OverlapPolicy::Skip);

        scheduler.start();
        advance(6500).await;
        // Ticks at 3s and 6s fell inside the first, still pending, run.
        assert_eq!(binder.calls(ContractKind::Long), 1);
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn allow_policy_overlaps_runs() {
        let binder = MockBinder::new();
        binder.set_latency(Duration::from_millis(7000));
        let (scheduler, _) = scheduler(&binder, OverlapPolicy::Allow);

        scheduler.start();
        advance(6500).await;
        assert_eq!(binder.calls(ContractKind::Long), 3);
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_cadence() {
        let binder = MockBinder::new();
        binder.fail(
            ContractKind::Long,
            crate::error::ProviderError::message("some unrelated provider noise"),
        );
        let (scheduler, _) = scheduler(&binder, OverlapPolicy::Skip);

        scheduler.start();
        advance(6010).await;
        assert_eq!(binder.calls(ContractKind::Long), 3);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_timer() {
        let binder = MockBinder::new();
        {
            let (scheduler, _) = scheduler(&binder, OverlapPolicy::Skip);
            scheduler.start();
            advance(10).await;
        }
        let calls = binder.calls(ContractKind::Long);
        advance(10_000).await;
        assert_eq!(binder.calls(ContractKind::Long), calls);
    }
}
