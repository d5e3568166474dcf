//! # Checkout Commands
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout ──► InProgress (button disabled, progress bar)               │
//! │     │                                                                   │
//! │     ├── status  ──► progress 0.0 .. 1.0                                 │
//! │     ├── wait    ──► Completed: alert + cart emptied                     │
//! │     ├── cancel  ──► Failed(Cancelled): cart intact                      │
//! │     └── decline ──► Failed(Declined): cart intact                       │
//! │                                                                         │
//! │  After an outcome is shown the checkout goes back to Idle.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_core::{CartTotals, CheckoutOutcome, CheckoutState, CoreError};
use storefront_session::{CheckoutHandle, Session};
use tracing::{debug, info};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutStatusDto {
    pub state: CheckoutState,
    pub progress: f64,
    /// Time left on the running checkout.
    pub remaining_ms: u64,
    pub totals: CartTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResultDto {
    pub outcome: CheckoutOutcome,
    /// Alert text.
    pub message: String,
}

pub fn checkout_status(session: &Session) -> CheckoutStatusDto {
    CheckoutStatusDto {
        state: session.checkout_state(),
        progress: session.checkout_progress(),
        remaining_ms: session.checkout_remaining().as_millis() as u64,
        totals: session.totals(),
    }
}

/// Starts the checkout and keeps its handle for `wait`/`cancel`/`decline`.
pub fn start_checkout(
    session: &Session,
    pending: &mut Option<CheckoutHandle>,
) -> Result<CheckoutStatusDto, ApiError> {
    let handle = session.begin_checkout()?;
    *pending = Some(handle);
    Ok(checkout_status(session))
}

/// Waits for the running checkout to finish, then acknowledges it.
pub async fn wait_checkout(
    session: &Session,
    pending: &mut Option<CheckoutHandle>,
) -> Result<CheckoutResultDto, ApiError> {
    let handle = pending.take().ok_or(CoreError::NoCheckoutInProgress)?;
    finish(session, handle).await
}

pub async fn cancel_checkout(
    session: &Session,
    pending: &mut Option<CheckoutHandle>,
) -> Result<CheckoutResultDto, ApiError> {
    let handle = pending.take().ok_or(CoreError::NoCheckoutInProgress)?;
    if let Err(e) = handle.cancel().await {
        // Already finished; report whatever it finished with.
        debug!(error = %e, "cancel arrived late");
    }
    finish(session, handle).await
}

pub async fn decline_checkout(
    session: &Session,
    pending: &mut Option<CheckoutHandle>,
    reason: &str,
) -> Result<CheckoutResultDto, ApiError> {
    let handle = pending.take().ok_or(CoreError::NoCheckoutInProgress)?;
    if let Err(e) = handle.fail(reason).await {
        debug!(error = %e, "decline arrived late");
    }
    finish(session, handle).await
}

async fn finish(session: &Session, handle: CheckoutHandle) -> Result<CheckoutResultDto, ApiError> {
    let outcome = handle.wait().await?;
    session.reset_checkout();

    info!(completed = outcome.is_completed(), "Checkout outcome shown");
    Ok(CheckoutResultDto {
        message: outcome.message(),
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use storefront_session::StoreConfig;

    fn session() -> Session {
        Session::with_seed_catalog(StoreConfig::default()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_is_user_facing() {
        let session = session();
        let mut pending = None;

        let err = start_checkout(&session, &mut pending).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
        assert!(pending.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_completes_and_acknowledges() {
        let session = session();
        session.add_to_cart(12, 1).unwrap();
        let mut pending = None;

        let status = start_checkout(&session, &mut pending).unwrap();
        assert_eq!(status.state, CheckoutState::InProgress);
        assert_eq!(status.remaining_ms, 2_000);

        let result = wait_checkout(&session, &mut pending).await.unwrap();
        assert!(result.outcome.is_completed());
        assert_eq!(result.message, "Your order has been placed successfully!");
        assert!(session.cart().is_empty());
        assert_eq!(session.checkout_state(), CheckoutState::Idle);
        assert_eq!(checkout_status(&session).remaining_ms, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_decline_keeps_cart() {
        let session = session();
        session.add_to_cart(12, 2).unwrap();
        let mut pending = None;

        start_checkout(&session, &mut pending).unwrap();
        let result = decline_checkout(&session, &mut pending, "Insufficient funds")
            .await
            .unwrap();

        assert!(!result.outcome.is_completed());
        assert_eq!(result.message, "Payment declined: Insufficient funds");
        assert_eq!(session.cart().quantity_of(12), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_without_checkout() {
        let session = session();
        let err = wait_checkout(&session, &mut None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutConflict);
    }
}
