//! # Checkout Runner
//!
//! Drives the checkout simulator on the tokio clock.
//!
//! ## Task Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Runner                                  │
//! │                                                                         │
//! │   Session::begin_checkout                                               │
//! │        │  simulator.begin(cart, now)                                    │
//! │        ▼                                                                │
//! │   ┌───────────────────────────┐    watch<f64>     ┌──────────────────┐ │
//! │   │  CheckoutRunner (spawned) │ ────────────────► │  CheckoutHandle  │ │
//! │   │                           │    oneshot<Out>   │                  │ │
//! │   │  interval.tick()          │ ────────────────► │  progress()      │ │
//! │   │    └─ simulator.tick()    │                   │  wait()          │ │
//! │   │  control_rx.recv()        │ ◄──────────────── │  cancel()/fail() │ │
//! │   │    └─ cancel / fail       │   mpsc<Control>   │                  │ │
//! │   └───────────────────────────┘                   └──────────────────┘ │
//! │                                                                         │
//! │  • Exactly one outcome per run; none if the session resets mid-run      │
//! │  • Dropping the handle does not stop the run                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use storefront_core::CheckoutOutcome;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};
use crate::state::SharedCart;

/// Current time on the tokio clock, as the `Instant` the simulator expects.
///
/// Under a paused test runtime this follows the mocked clock.
pub(crate) fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Requests a running checkout can receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutControl {
    /// Shopper backed out.
    Cancel,
    /// Payment declined with a reason.
    Fail(String),
}

// =============================================================================
// Handle
// =============================================================================

/// Caller's side of a running checkout.
#[derive(Debug)]
pub struct CheckoutHandle {
    progress_rx: watch::Receiver<f64>,
    outcome_rx: oneshot::Receiver<CheckoutOutcome>,
    control_tx: mpsc::Sender<CheckoutControl>,
}

impl CheckoutHandle {
    /// Latest published progress in [0, 1].
    pub fn progress(&self) -> f64 {
        *self.progress_rx.borrow()
    }

    /// Asks the runner to cancel. The cart is kept.
    pub async fn cancel(&self) -> SessionResult<()> {
        self.send(CheckoutControl::Cancel).await
    }

    /// Asks the runner to end the checkout as declined. The cart is kept.
    pub async fn fail(&self, reason: impl Into<String>) -> SessionResult<()> {
        self.send(CheckoutControl::Fail(reason.into())).await
    }

    async fn send(&self, control: CheckoutControl) -> SessionResult<()> {
        self.control_tx
            .send(control)
            .await
            .map_err(|_| SessionError::ChannelError("Checkout already finished".into()))
    }

    /// Waits for the outcome.
    ///
    /// ## Errors
    /// `SessionError::CheckoutAborted` if the run was dropped without an
    /// outcome (session reset mid-checkout).
    pub async fn wait(self) -> SessionResult<CheckoutOutcome> {
        self.outcome_rx
            .await
            .map_err(|_| SessionError::CheckoutAborted)
    }
}

// =============================================================================
// Runner
// =============================================================================

enum Step {
    Running(f64),
    Finished(CheckoutOutcome),
    Abandoned,
}

/// Background task ticking one checkout run to its outcome.
pub(crate) struct CheckoutRunner {
    shared: SharedCart,
    interval: Duration,
    progress_tx: watch::Sender<f64>,
    control_rx: mpsc::Receiver<CheckoutControl>,
}

impl CheckoutRunner {
    /// Spawns a runner for a checkout that has already begun.
    pub(crate) fn spawn(shared: SharedCart, interval: Duration) -> (JoinHandle<()>, CheckoutHandle) {
        let (progress_tx, progress_rx) = watch::channel(0.0);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let (control_tx, control_rx) = mpsc::channel(4);

        let runner = CheckoutRunner {
            shared,
            interval,
            progress_tx,
            control_rx,
        };

        let task = tokio::spawn(async move {
            if let Some(outcome) = runner.run().await {
                // The caller may have dropped its handle; the outcome still applied.
                let _ = outcome_tx.send(outcome);
            }
        });

        let handle = CheckoutHandle {
            progress_rx,
            outcome_rx,
            control_tx,
        };

        (task, handle)
    }

    async fn run(mut self) -> Option<CheckoutOutcome> {
        debug!(interval_ms = self.interval.as_millis() as u64, "Checkout runner starting");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.step() {
                        Step::Running(progress) => {
                            self.progress_tx.send_replace(progress);
                        }
                        Step::Finished(outcome) => {
                            self.progress_tx.send_replace(1.0);
                            return Some(outcome);
                        }
                        Step::Abandoned => {
                            info!("Checkout abandoned by session reset");
                            return None;
                        }
                    }
                }

                Some(control) = self.control_rx.recv() => {
                    let result = self.shared.with_checkout_mut(|checkout| match control {
                        CheckoutControl::Cancel => checkout.cancel(),
                        CheckoutControl::Fail(reason) => checkout.fail(reason),
                    });

                    match result {
                        Ok(outcome) => {
                            self.progress_tx.send_replace(0.0);
                            return Some(outcome);
                        }
                        Err(e) => {
                            warn!(error = %e, "Checkout control arrived after the run ended");
                            return None;
                        }
                    }
                }
            }
        }
    }

    fn step(&self) -> Step {
        let now = now();
        self.shared.with_both(|checkout, cart| {
            if !checkout.is_in_progress() {
                return Step::Abandoned;
            }
            match checkout.tick(now, cart) {
                Some(outcome) => Step::Finished(outcome),
                None => Step::Running(checkout.progress(now)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{CheckoutFailure, CheckoutSimulator, CheckoutState, Product, ShippingPolicy};

    fn started(duration_ms: u64) -> SharedCart {
        let shared = SharedCart::new(CheckoutSimulator::new(
            Duration::from_millis(duration_ms),
            ShippingPolicy::default(),
        ));
        let camera = Product::new(9, "Alpha", "Sony", "Cameras", 5_000);
        shared.with_cart_mut(|cart| cart.add_item(&camera, 2)).unwrap();
        shared
            .with_both(|checkout, cart| checkout.begin(cart, now()))
            .unwrap();
        shared
    }

    #[tokio::test(start_paused = true)]
    async fn test_runner_completes_and_clears_cart() {
        let shared = started(2000);
        let (_task, handle) = CheckoutRunner::spawn(shared.clone(), Duration::from_millis(50));

        let outcome = handle.wait().await.unwrap();
        match outcome {
            CheckoutOutcome::Completed(receipt) => {
                assert_eq!(receipt.total_items, 2);
                assert_eq!(receipt.grand_total.cents(), 10_000);
            }
            other => panic!("expected completion, got {:?}", other),
        }

        assert!(shared.with_cart(|cart| cart.is_empty()));
        assert_eq!(
            shared.with_checkout_mut(|checkout| checkout.state()),
            CheckoutState::Completed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_published() {
        let shared = started(2000);
        let (_task, handle) = CheckoutRunner::spawn(shared, Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let progress = handle.progress();
        assert!((0.45..=0.5).contains(&progress), "progress was {}", progress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_cart() {
        let shared = started(2000);
        let (_task, handle) = CheckoutRunner::spawn(shared.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.cancel().await.unwrap();

        let outcome = handle.wait().await.unwrap();
        assert_eq!(outcome, CheckoutOutcome::Failed(CheckoutFailure::Cancelled));
        assert_eq!(shared.with_cart(|cart| cart.total_items()), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_abandons_run() {
        let shared = started(2000);
        let (task, handle) = CheckoutRunner::spawn(shared.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(100)).await;
        shared.with_checkout_mut(|checkout| checkout.reset());

        assert!(matches!(handle.wait().await, Err(SessionError::CheckoutAborted)));
        task.await.unwrap();
        assert_eq!(shared.with_cart(|cart| cart.total_items()), 2);
    }
}
