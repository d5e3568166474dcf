//! # Wishlist Commands

use serde::Serialize;
use storefront_core::ProductId;
use storefront_session::Session;

use crate::commands::catalog::ProductDto;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    /// Membership of the toggled product, when this answers a toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wishlisted: Option<bool>,
    pub items: Vec<ProductDto>,
}

pub fn get_wishlist(session: &Session) -> WishlistResponse {
    WishlistResponse {
        wishlisted: None,
        items: session.wishlist().items().iter().map(ProductDto::from).collect(),
    }
}

/// The heart button on a product card.
pub fn toggle_wishlist(session: &Session, product_id: ProductId) -> Result<WishlistResponse, ApiError> {
    let wishlisted = session.toggle_wishlist(product_id)?;
    Ok(WishlistResponse {
        wishlisted: Some(wishlisted),
        ..get_wishlist(session)
    })
}
