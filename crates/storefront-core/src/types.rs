//! # Domain Types
//!
//! Reference data shared by the cart, wishlist and catalog.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────────┐        ┌─────────────────┐                 │
//! │  │        Product          │        │      User       │                 │
//! │  │  ─────────────────────  │        │  ─────────────  │                 │
//! │  │  id (u32, unique)       │        │  id             │                 │
//! │  │  name / brand           │        │  name           │                 │
//! │  │  category               │        │  email          │                 │
//! │  │  price_cents            │        └─────────────────┘                 │
//! │  │  original_price_cents?  │                                            │
//! │  │  rating / in_stock      │                                            │
//! │  └─────────────────────────┘                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are immutable once loaded. The cart and wishlist hold clones
//! (snapshots), so nothing in a session borrows from the catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Catalog identifier of a product.
pub type ProductId = u32;

// =============================================================================
// Product
// =============================================================================

/// A product listed in the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique catalog id.
    pub id: ProductId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Current selling price in cents. This is what the cart charges.
    pub price_cents: i64,

    /// Pre-discount price in cents, shown struck through next to the price.
    #[serde(default)]
    pub original_price_cents: Option<i64>,

    #[serde(default)]
    pub image_url: String,

    pub brand: String,

    pub category: String,

    /// Average review score, 0.0-5.0.
    #[serde(default)]
    pub rating: f32,

    #[serde(default)]
    pub review_count: u32,

    /// Free-form spec sheet ("Display" => "14-inch OLED").
    #[serde(default)]
    pub specs: BTreeMap<String, String>,

    #[serde(default = "default_in_stock")]
    pub in_stock: bool,

    #[serde(default)]
    pub stock_count: Option<u32>,

    #[serde(default)]
    pub features: Vec<String>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Creates a product with just the fields the cart cares about.
    ///
    /// Handy for tests and for callers that build products by hand.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        price_cents: i64,
    ) -> Self {
        Product {
            id,
            name: name.into(),
            description: String::new(),
            price_cents,
            original_price_cents: None,
            image_url: String::new(),
            brand: brand.into(),
            category: category.into(),
            rating: 0.0,
            review_count: 0,
            specs: BTreeMap::new(),
            in_stock: true,
            stock_count: None,
            features: Vec::new(),
        }
    }

    /// Sets the pre-discount price.
    pub fn with_original_price(mut self, original_price_cents: i64) -> Self {
        self.original_price_cents = Some(original_price_cents);
        self
    }

    /// Returns the current price.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the pre-discount price, if any.
    #[inline]
    pub fn original_price(&self) -> Option<Money> {
        self.original_price_cents.map(Money::from_cents)
    }

    /// Discount badge value ("17% OFF"), or 0 when not discounted.
    ///
    /// ```rust
    /// use storefront_core::Product;
    ///
    /// let laptop = Product::new(1, "XPS 13", "Dell", "Laptops", 99_900)
    ///     .with_original_price(119_900);
    /// assert_eq!(laptop.discount_percentage(), 17);
    /// ```
    pub fn discount_percentage(&self) -> u32 {
        self.original_price()
            .map(|original| self.price().percent_below(original))
            .unwrap_or(0)
    }

    /// True when an original price above the current one is set.
    pub fn is_discounted(&self) -> bool {
        self.original_price()
            .is_some_and(|original| original > self.price())
    }
}

// =============================================================================
// User
// =============================================================================

/// A signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_accessors() {
        let phone = Product::new(7, "Pixel 8", "Google", "Phones", 69_900);
        assert_eq!(phone.price(), Money::from_cents(69_900));
        assert_eq!(phone.original_price(), None);
        assert_eq!(phone.discount_percentage(), 0);
        assert!(!phone.is_discounted());
    }

    #[test]
    fn test_discount_percentage() {
        let tv = Product::new(3, "Bravia 55", "Sony", "TVs", 80_000).with_original_price(100_000);
        assert_eq!(tv.discount_percentage(), 20);
        assert!(tv.is_discounted());

        // An "original" below the current price is not a discount
        let odd = Product::new(4, "Odd", "Acme", "TVs", 100).with_original_price(90);
        assert_eq!(odd.discount_percentage(), 0);
        assert!(!odd.is_discounted());
    }

    #[test]
    fn test_product_deserializes_with_defaults() {
        let json = r#"{
            "id": 12,
            "name": "WH-1000XM5",
            "priceCents": 34999,
            "originalPriceCents": 39999,
            "brand": "Sony",
            "category": "Headphones"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 12);
        assert_eq!(product.original_price(), Some(Money::from_cents(39_999)));
        assert!(product.in_stock);
        assert!(product.features.is_empty());
    }
}
