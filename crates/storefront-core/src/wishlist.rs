//! # Wishlist
//!
//! Products the shopper hearted. Ordered by when they were added, no
//! duplicates, no quantities.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::types::{Product, ProductId};

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Adds a product. Returns false if it was already there.
    pub fn add(&mut self, product: &Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.items.push(product.clone());
        debug!(product_id = product.id, "Added to wishlist");
        true
    }

    /// Removes a product. Returns false if it was not there.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|p| p.id != product_id);
        self.items.len() != initial_len
    }

    /// The heart button: adds if absent, removes if present.
    ///
    /// Returns whether the product is wishlisted afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove(product.id) {
            false
        } else {
            self.add(product)
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut wishlist = Wishlist::new();
        let watch = Product::new(8, "Watch", "Apple", "Watches", 39_900);

        assert!(wishlist.add(&watch));
        assert!(!wishlist.add(&watch));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut wishlist = Wishlist::new();
        let speaker = Product::new(10, "Flex", "Bose", "Speakers", 14_900);

        assert!(wishlist.toggle(&speaker));
        assert!(wishlist.contains(10));
        assert!(!wishlist.toggle(&speaker));
        assert!(!wishlist.contains(10));
    }

    #[test]
    fn test_order_and_remove() {
        let mut wishlist = Wishlist::new();
        for id in [3, 1, 2] {
            wishlist.add(&Product::new(id, "P", "B", "C", 100));
        }
        assert!(wishlist.remove(1));
        assert!(!wishlist.remove(1));

        let ids: Vec<_> = wishlist.items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2]);

        wishlist.clear();
        assert!(wishlist.is_empty());
    }
}
