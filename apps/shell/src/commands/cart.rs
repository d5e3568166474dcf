//! # Cart Commands
//!
//! ## Cart Screen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CART                                               2 items             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  WH-1000XM5            [-] 2 [+]             $699.98   (rm)             │
//! │  Pixel 8               [-] 1 [+]             $699.00   (rm)             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Subtotal                                   $1398.98                    │
//! │  Shipping                                       Free                    │
//! │  Total                                      $1398.98                    │
//! │                                                                         │
//! │  [ Checkout ]                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation answers with the whole cart so the screen re-renders from
//! one response.

use serde::Serialize;
use storefront_core::{Cart, CartTotals, Money, ProductId};
use storefront_session::Session;
use tracing::debug;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLineDto>,
    pub totals: CartTotals,
}

impl CartResponse {
    fn build(cart: &Cart, totals: CartTotals) -> Self {
        let lines = cart
            .entries()
            .iter()
            .map(|e| CartLineDto {
                product_id: e.product_id(),
                name: e.product.name.clone(),
                unit_price: e.product.price(),
                quantity: e.quantity,
                line_total: e.line_total(),
            })
            .collect();

        CartResponse { lines, totals }
    }
}

pub fn get_cart(session: &Session) -> CartResponse {
    CartResponse::build(&session.cart(), session.totals())
}

pub fn add_to_cart(
    session: &Session,
    product_id: ProductId,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, quantity, "add_to_cart command");
    session.add_to_cart(product_id, quantity)?;
    Ok(get_cart(session))
}

pub fn increment(session: &Session, product_id: ProductId) -> Result<CartResponse, ApiError> {
    session.increment(product_id)?;
    Ok(get_cart(session))
}

pub fn decrement(session: &Session, product_id: ProductId) -> CartResponse {
    session.decrement(product_id);
    get_cart(session)
}

pub fn update_quantity(
    session: &Session,
    product_id: ProductId,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, quantity, "update_quantity command");
    session.update_quantity(product_id, quantity)?;
    Ok(get_cart(session))
}

pub fn remove_from_cart(session: &Session, product_id: ProductId) -> CartResponse {
    if !session.remove_from_cart(product_id) {
        debug!(product_id, "remove_from_cart: not in cart");
    }
    get_cart(session)
}

pub fn clear_cart(session: &Session) -> CartResponse {
    session.clear_cart();
    get_cart(session)
}
