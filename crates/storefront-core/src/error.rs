//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Checkout and lookup failures                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-session errors (separate crate)                            │
//! │  └── SessionError     - Config, channel and timer failures             │
//! │                                                                         │
//! │  Shell errors (in app)                                                 │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → ApiError → UI      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these is fatal. Every variant maps to a message the UI can show
//! in an alert and recover from.

use thiserror::Error;

/// Text shown when checkout is attempted on an empty cart.
pub const EMPTY_CART_MESSAGE: &str =
    "Cart is empty. Add some products to your cart before checking out.";

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Checkout was attempted with nothing in the cart.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "Checkout" (cart: [])
    ///      │
    ///      ▼
    /// begin(&cart) ── EmptyCart
    ///      │
    ///      ▼
    /// Alert: "Cart is empty. Add some products..."
    /// ```
    #[error("Cart is empty. Add some products to your cart before checking out.")]
    EmptyCart,

    /// A checkout is already running; the button should have been disabled.
    #[error("A checkout is already in progress")]
    CheckoutInProgress,

    /// Cancel/fail was requested but nothing is running.
    #[error("No checkout is in progress")]
    NoCheckoutInProgress,

    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(u32),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for errors that exist only to be shown to the shopper.
    ///
    /// Everything in this enum is recoverable; this separates "tell the
    /// user" from "the caller misused the API".
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CoreError::EmptyCart | CoreError::Validation(_) | CoreError::ProductNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed catalog data).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not.
    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },

    /// A checkbox that must be ticked is not.
    #[error("{field} must be accepted")]
    NotAccepted { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
