//! # storefront-core: Pure Business Logic for the Storefront
//!
//! Cart math, checkout state machine, catalog search and input validation,
//! as plain functions over plain data. No I/O, no timers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Mobile UI / apps/shell                           │   │
//! │  │   Home ──► Search ──► Product ──► Cart ──► Checkout             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            storefront-session (Session, timers)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ storefront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  cart   │ │ checkout │ │ catalog │ │wishlist │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and User
//! - [`money`] - Integer-cent Money type
//! - [`cart`] - Cart ledger, shipping policy, totals
//! - [`checkout`] - Checkout simulator state machine and receipts
//! - [`catalog`] - Static product catalog and search
//! - [`wishlist`] - Hearted products
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, Money, Product};
//!
//! let mut cart = Cart::new();
//! let headphones = Product::new(5, "WH-1000XM5", "Sony", "Headphones", 5_000);
//! cart.add_item(&headphones, 2).unwrap();
//!
//! assert_eq!(cart.total_amount(), Money::from_cents(10_000));
//! assert_eq!(cart.shipping_cost(), Money::zero()); // free from $100.00
//! assert_eq!(cart.grand_total(), Money::from_cents(10_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{shipping_cost, Cart, CartEntry, CartTotals, ShippingPolicy};
pub use catalog::Catalog;
pub use checkout::{
    CheckoutFailure, CheckoutOutcome, CheckoutSimulator, CheckoutState, OrderLine, OrderReceipt,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use wishlist::Wishlist;
