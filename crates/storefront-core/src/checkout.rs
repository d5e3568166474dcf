//! # Checkout Simulator
//!
//! A clock-driven state machine standing in for a payment transaction.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  begin (cart non-empty)  ┌────────────┐                      │
//! │   │ Idle │ ───────────────────────► │ InProgress │                      │
//! │   └──────┘                          └─────┬──────┘                      │
//! │      ▲                                    │                             │
//! │      │                 ┌──────────────────┼──────────────────┐          │
//! │      │                 │ tick, elapsed >= │ fail / cancel    │          │
//! │      │                 │ duration         │                  │          │
//! │      │                 ▼                  ▼                  │          │
//! │      │          ┌───────────┐      ┌──────────┐              │          │
//! │      └──────────│ Completed │      │  Failed  │              │          │
//! │        reset    │ cart = [] │      │ cart kept│              │          │
//! │      ◄──────────└───────────┘      └──────────┘              │          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no timer in here. Callers pass `now` into every call, which
//! keeps the machine deterministic: a test can step through a two-second
//! checkout by handing in `start + 2s` without waiting for anything.
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use storefront_core::{Cart, CheckoutSimulator, CheckoutState, Product};
//!
//! let mut cart = Cart::new();
//! cart.add_item(&Product::new(1, "Pixel 8", "Google", "Phones", 69_900), 1).unwrap();
//!
//! let mut checkout = CheckoutSimulator::default();
//! let start = Instant::now();
//! checkout.begin(&cart, start).unwrap();
//! assert!(checkout.tick(start + Duration::from_millis(1999), &mut cart).is_none());
//!
//! let outcome = checkout.tick(start + Duration::from_secs(2), &mut cart);
//! assert!(outcome.is_some());
//! assert_eq!(checkout.state(), CheckoutState::Completed);
//! assert!(cart.is_empty());
//! ```

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, ShippingPolicy};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductId;

/// How long a simulated checkout takes.
pub const DEFAULT_CHECKOUT_DURATION: Duration = Duration::from_millis(2000);

// =============================================================================
// State & Outcome Types
// =============================================================================

/// Where the checkout currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CheckoutState {
    #[default]
    Idle,
    InProgress,
    Completed,
    Failed,
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutState::Idle => write!(f, "idle"),
            CheckoutState::InProgress => write!(f, "in_progress"),
            CheckoutState::Completed => write!(f, "completed"),
            CheckoutState::Failed => write!(f, "failed"),
        }
    }
}

/// Why a checkout ended without placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum CheckoutFailure {
    /// The shopper (or the session) aborted the checkout.
    #[error("Checkout was cancelled")]
    Cancelled,

    /// The simulated payment was declined.
    #[error("Payment declined: {reason}")]
    Declined { reason: String },
}

/// One line of a placed order, frozen at completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

/// Confirmation of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderReceipt {
    /// UUID v4.
    pub order_id: String,
    pub lines: Vec<OrderLine>,
    pub total_items: i64,
    pub subtotal: Money,
    pub shipping: Money,
    pub grand_total: Money,
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
}

impl OrderReceipt {
    /// Snapshots the cart into a receipt.
    pub fn from_cart(cart: &Cart, policy: &ShippingPolicy) -> Self {
        let lines = cart
            .entries()
            .iter()
            .map(|e| OrderLine {
                product_id: e.product_id(),
                name: e.product.name.clone(),
                unit_price: e.product.price(),
                quantity: e.quantity,
                line_total: e.line_total(),
            })
            .collect();

        let subtotal = cart.total_amount();
        let shipping = policy.cost_for(subtotal);

        OrderReceipt {
            order_id: Uuid::new_v4().to_string(),
            lines,
            total_items: cart.total_items(),
            subtotal,
            shipping,
            grand_total: subtotal + shipping,
            placed_at: Utc::now(),
        }
    }
}

/// How a checkout ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
#[ts(export)]
pub enum CheckoutOutcome {
    Completed(OrderReceipt),
    Failed(CheckoutFailure),
}

impl CheckoutOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CheckoutOutcome::Completed(_))
    }

    /// Text for the alert shown when the checkout ends.
    pub fn message(&self) -> String {
        match self {
            CheckoutOutcome::Completed(_) => "Your order has been placed successfully!".to_string(),
            CheckoutOutcome::Failed(failure) => failure.to_string(),
        }
    }
}

// =============================================================================
// Checkout Simulator
// =============================================================================

/// The simulated checkout.
///
/// ## Invariants
/// - `started_at` is `Some` exactly while `InProgress`
/// - The cart is only ever cleared on the transition to `Completed`
/// - Progress is 0 outside `InProgress` and never decreases within one run
#[derive(Debug, Clone)]
pub struct CheckoutSimulator {
    state: CheckoutState,
    duration: Duration,
    policy: ShippingPolicy,
    started_at: Option<Instant>,
    last_progress: f64,
}

impl CheckoutSimulator {
    /// Creates an idle simulator.
    pub fn new(duration: Duration, policy: ShippingPolicy) -> Self {
        CheckoutSimulator {
            state: CheckoutState::Idle,
            duration,
            policy,
            started_at: None,
            last_progress: 0.0,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == CheckoutState::InProgress
    }

    /// Starts a checkout.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart`: nothing to buy; the cart is untouched
    /// - `CoreError::CheckoutInProgress`: a run is already going
    ///
    /// Starting again after `Completed` or `Failed` is fine; those states
    /// only last until the next begin or reset.
    pub fn begin(&mut self, cart: &Cart, now: Instant) -> CoreResult<()> {
        if self.is_in_progress() {
            return Err(CoreError::CheckoutInProgress);
        }
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        self.state = CheckoutState::InProgress;
        self.started_at = Some(now);
        self.last_progress = 0.0;

        info!(
            total_items = cart.total_items(),
            grand_total = %cart.grand_total_with(&self.policy),
            duration_ms = self.duration.as_millis() as u64,
            "Checkout started"
        );
        Ok(())
    }

    fn fraction_at(&self, now: Instant) -> f64 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }

        let elapsed = now.saturating_duration_since(started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Progress in [0, 1] for the progress bar.
    pub fn progress(&self, now: Instant) -> f64 {
        if !self.is_in_progress() {
            return 0.0;
        }
        self.fraction_at(now).max(self.last_progress)
    }

    /// Time left until completion (zero when not running).
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) if self.is_in_progress() => self
                .duration
                .saturating_sub(now.saturating_duration_since(started_at)),
            _ => Duration::ZERO,
        }
    }

    /// Advances the checkout to `now`.
    ///
    /// Once the duration has elapsed this snapshots the cart into a receipt,
    /// clears the cart, resets progress and moves to `Completed`, all in one
    /// call. Returns `None` while still running or when not running at all.
    pub fn tick(&mut self, now: Instant, cart: &mut Cart) -> Option<CheckoutOutcome> {
        if !self.is_in_progress() {
            return None;
        }

        let fraction = self.fraction_at(now);
        self.last_progress = self.last_progress.max(fraction);
        if fraction < 1.0 {
            return None;
        }

        let receipt = OrderReceipt::from_cart(cart, &self.policy);
        cart.clear();
        self.finish(CheckoutState::Completed);

        info!(
            order_id = %receipt.order_id,
            grand_total = %receipt.grand_total,
            "Checkout completed"
        );
        Some(CheckoutOutcome::Completed(receipt))
    }

    /// Ends a running checkout as declined. The cart is not touched.
    pub fn fail(&mut self, reason: impl Into<String>) -> CoreResult<CheckoutOutcome> {
        if !self.is_in_progress() {
            return Err(CoreError::NoCheckoutInProgress);
        }

        let failure = CheckoutFailure::Declined {
            reason: reason.into(),
        };
        self.finish(CheckoutState::Failed);
        info!(%failure, "Checkout failed");
        Ok(CheckoutOutcome::Failed(failure))
    }

    /// Aborts a running checkout. The cart is not touched.
    pub fn cancel(&mut self) -> CoreResult<CheckoutOutcome> {
        if !self.is_in_progress() {
            return Err(CoreError::NoCheckoutInProgress);
        }

        self.finish(CheckoutState::Failed);
        info!("Checkout cancelled");
        Ok(CheckoutOutcome::Failed(CheckoutFailure::Cancelled))
    }

    /// Back to `Idle`, whatever the current state.
    ///
    /// The UI calls this after showing the outcome; the session calls it
    /// when it ends. A run that is still going is dropped without an
    /// outcome and without touching the cart.
    pub fn reset(&mut self) {
        self.finish(CheckoutState::Idle);
    }

    fn finish(&mut self, state: CheckoutState) {
        self.state = state;
        self.started_at = None;
        self.last_progress = 0.0;
    }
}

impl Default for CheckoutSimulator {
    fn default() -> Self {
        CheckoutSimulator::new(DEFAULT_CHECKOUT_DURATION, ShippingPolicy::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
