//! # Cart Ledger
//!
//! The in-memory list of (product, quantity) entries for one session.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI Action              Ledger Operation         Change                 │
//! │  ─────────              ────────────────         ──────                 │
//! │                                                                         │
//! │  Tap "Add to cart" ───► add_item(p, n) ────────► qty += n or push      │
//! │                                                                         │
//! │  Tap "+" ─────────────► increment(id) ─────────► qty += 1              │
//! │                                                                         │
//! │  Tap "-" ─────────────► decrement(id) ─────────► qty -= 1, floor 1     │
//! │                                                                         │
//! │  Edit quantity ───────► update_quantity(id, n) ► qty = n, n<=0 removes │
//! │                                                                         │
//! │  Tap trash icon ──────► remove_item(id) ───────► entry removed         │
//! │                                                                         │
//! │  Tap "Clear" ─────────► clear() ───────────────► []                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `decrement` and `update_quantity` have different floors on purpose:
//! the "-" button stops at 1 and never deletes, while setting a quantity of
//! zero (or less) is how the UI asks for removal.
//!
//! Every change that raises a quantity is checked against
//! [`MAX_ITEM_QUANTITY`](crate::validation::MAX_ITEM_QUANTITY) and against the
//! cart totals still fitting in [`Money`], so the totals below never overflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::validation::{validate_price_cents, validate_quantity};

// =============================================================================
// Shipping Policy
// =============================================================================

/// Subtotal at or above which shipping is free ($100.00).
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(10_000);

/// Shipping fee charged below the threshold ($10.00).
pub const FLAT_SHIPPING_FEE: Money = Money::from_cents(1_000);

/// Flat-fee shipping with a free-shipping threshold.
///
/// ```rust
/// use storefront_core::cart::ShippingPolicy;
/// use storefront_core::Money;
///
/// let policy = ShippingPolicy::default();
/// assert_eq!(policy.cost_for(Money::from_cents(9_999)), Money::from_cents(1_000));
/// assert_eq!(policy.cost_for(Money::from_cents(10_000)), Money::zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingPolicy {
    pub free_threshold: Money,
    pub flat_fee: Money,
}

impl ShippingPolicy {
    pub const fn new(free_threshold: Money, flat_fee: Money) -> Self {
        ShippingPolicy {
            free_threshold,
            flat_fee,
        }
    }

    /// Shipping charged on a given subtotal.
    pub fn cost_for(&self, total_amount: Money) -> Money {
        if total_amount >= self.free_threshold {
            Money::zero()
        } else {
            self.flat_fee
        }
    }

    /// True when `total_amount` ships free.
    pub fn is_free_for(&self, total_amount: Money) -> bool {
        self.cost_for(total_amount).is_zero()
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        ShippingPolicy::new(FREE_SHIPPING_THRESHOLD, FLAT_SHIPPING_FEE)
    }
}

/// Shipping charged on `total_amount` under the standard policy:
/// free from $100.00, otherwise a flat $10.00.
pub fn shipping_cost(total_amount: Money) -> Money {
    ShippingPolicy::default().cost_for(total_amount)
}

// =============================================================================
// Cart Entry
// =============================================================================

/// One line of the cart.
///
/// ## Design Notes
/// The product is a snapshot taken when it was first added, so the cart
/// keeps rendering consistently even if the catalog is reloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartEntry {
    pub product: Product,

    /// Always >= 1.
    pub quantity: i64,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartEntry {
    fn new(product: &Product, quantity: i64) -> Self {
        CartEntry {
            product: product.clone(),
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Product id of this entry.
    #[inline]
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Current unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price().multiply_quantity(self.quantity)
    }

    /// Original unit price × quantity, when the product has one.
    pub fn original_line_total(&self) -> Option<Money> {
        self.product
            .original_price()
            .map(|original| original.multiply_quantity(self.quantity))
    }

    /// Amount saved on this line compared to the original price.
    pub fn savings(&self) -> Money {
        match self.original_line_total() {
            Some(original) if original > self.line_total() => original - self.line_total(),
            _ => Money::zero(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart ledger.
///
/// ## Invariants
/// - At most one entry per product id (adding again increases quantity)
/// - Every entry has 1 <= quantity <= `MAX_ITEM_QUANTITY`
/// - Subtotal and original total fit in `Money` without overflow
/// - Entries keep insertion order; new products go to the end
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    entries: Vec<CartEntry>,

    /// When the cart was created or last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            entries: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Looks up the entry for a product.
    pub fn entry(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id() == product_id)
    }

    /// Quantity of a product in the cart (0 if absent).
    pub fn quantity_of(&self, product_id: ProductId) -> i64 {
        self.entry(product_id).map_or(0, |e| e.quantity)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entry(product_id).is_some()
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.entries.iter().position(|e| e.product_id() == product_id)
    }

    /// Checks that `product` may sit in the cart with `quantity`, replacing
    /// whatever line it has now.
    fn check_line(&self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_price_cents(product.price().cents())?;
        if let Some(original) = product.original_price() {
            validate_price_cents(original.cents())?;
        }

        let subtotal = self.checked_total_with(product, product.price(), quantity, |e| {
            Some(e.line_total())
        });
        let original = self.checked_total_with(
            product,
            product.original_price().unwrap_or(product.price()),
            quantity,
            |e| Some(e.original_line_total().unwrap_or_else(|| e.line_total())),
        );

        if subtotal.is_none() || original.is_none() {
            return Err(ValidationError::OutOfRange {
                field: "cart total".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }
        Ok(())
    }

    fn checked_total_with(
        &self,
        product: &Product,
        unit: Money,
        quantity: i64,
        line_of: impl Fn(&CartEntry) -> Option<Money>,
    ) -> Option<Money> {
        self.entries
            .iter()
            .filter(|e| e.product_id() != product.id)
            .try_fold(unit.checked_multiply_quantity(quantity)?, |acc, e| {
                acc.checked_add(line_of(e)?)
            })
    }

    /// Overwrites the quantity of an existing entry after checking it.
    fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        self.check_line(&self.entries[index].product, quantity)?;
        self.entries[index].quantity = quantity;
        Ok(())
    }

    /// Adds a product or increases its quantity if already present.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity += `quantity`, position kept
    /// - Product not in cart: appended at the end
    ///
    /// ## Errors
    /// Out-of-range quantities (checked before and after adding) and totals
    /// too large for `Money` are rejected with a validation error; the cart
    /// is left untouched.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(index) = self.position(product.id) {
            let quantity = self.entries[index].quantity + quantity;
            self.set_quantity(index, quantity)?;
            debug!(
                product_id = product.id,
                quantity,
                "Increased cart entry quantity"
            );
            return Ok(());
        }

        self.check_line(product, quantity)?;
        self.entries.push(CartEntry::new(product, quantity));
        debug!(product_id = product.id, quantity, "Added cart entry");
        Ok(())
    }

    /// Removes the entry for `product_id`.
    ///
    /// Returns whether anything was removed; removing an absent product is
    /// a no-op, not an error.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let initial_len = self.entries.len();
        self.entries.retain(|e| e.product_id() != product_id);

        let removed = self.entries.len() != initial_len;
        if removed {
            debug!(product_id, "Removed cart entry");
        }
        removed
    }

    /// Sets the quantity of an entry.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: exactly `remove_item(product_id)`
    /// - Product not in cart: no-op
    ///
    /// ## Errors
    /// Quantities above `MAX_ITEM_QUANTITY` are rejected; the entry keeps
    /// its old quantity.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        if let Some(index) = self.position(product_id) {
            self.set_quantity(index, quantity)?;
            debug!(product_id, quantity, "Updated cart entry quantity");
        }
        Ok(())
    }

    /// The "+" control: one more of an existing entry.
    ///
    /// Fails at `MAX_ITEM_QUANTITY`, leaving the entry as it was.
    pub fn increment(&mut self, product_id: ProductId) -> CoreResult<()> {
        if let Some(index) = self.position(product_id) {
            let quantity = self.entries[index].quantity + 1;
            self.set_quantity(index, quantity)?;
        }
        Ok(())
    }

    /// The "-" control: one fewer, but never below 1.
    ///
    /// At quantity 1 this does nothing; removing needs `remove_item` or
    /// `update_quantity(id, 0)`.
    pub fn decrement(&mut self, product_id: ProductId) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.product_id() == product_id) {
            if entry.quantity > 1 {
                entry.quantity -= 1;
            }
        }
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.created_at = Utc::now();
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    /// Sum of quantities across all entries.
    pub fn total_items(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Sum of current price × quantity. Original prices are never charged.
    pub fn total_amount(&self) -> Money {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// What the cart would cost at original prices (undiscounted entries
    /// count at their current price).
    pub fn original_total(&self) -> Money {
        self.entries
            .iter()
            .map(|e| e.original_line_total().unwrap_or_else(|| e.line_total()))
            .sum()
    }

    /// Total saved versus original prices.
    pub fn savings(&self) -> Money {
        self.entries.iter().map(CartEntry::savings).sum()
    }

    /// Shipping under the standard policy.
    pub fn shipping_cost(&self) -> Money {
        shipping_cost(self.total_amount())
    }

    /// Subtotal plus shipping under the standard policy.
    pub fn grand_total(&self) -> Money {
        self.grand_total_with(&ShippingPolicy::default())
    }

    /// Subtotal plus shipping under a given policy.
    pub fn grand_total_with(&self, policy: &ShippingPolicy) -> Money {
        let total = self.total_amount();
        total.saturating_add(policy.cost_for(total))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Summary block rendered under the cart list.
///
/// ```text
/// Subtotal (3 items)          $129.97
/// Shipping                       Free
/// ──────────────────────────────────
/// Total                       $129.97
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_items: i64,
    pub subtotal: Money,
    pub savings: Money,
    pub shipping: Money,
    pub free_shipping: bool,
    pub grand_total: Money,
}

impl CartTotals {
    /// Computes totals under a given shipping policy.
    pub fn compute(cart: &Cart, policy: &ShippingPolicy) -> Self {
        let subtotal = cart.total_amount();
        let shipping = policy.cost_for(subtotal);
        CartTotals {
            item_count: cart.item_count(),
            total_items: cart.total_items(),
            subtotal,
            savings: cart.savings(),
            shipping,
            free_shipping: policy.is_free_for(subtotal),
            grand_total: subtotal.saturating_add(shipping),
        }
    }
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals::compute(cart, &ShippingPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::validation::MAX_ITEM_QUANTITY;

    fn product(id: ProductId, price_cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), "Acme", "Gadgets", price_cents)
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 999), 2).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_amount(), Money::from_cents(1998));
    }

    #[test]
    fn test_add_same_product_sums_quantities() {
        let mut cart = Cart::new();
        let a = product(1, 999);

        for qty in [1, 2, 4] {
            cart.add_item(&a, qty).unwrap();
        }

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.quantity_of(1), 7);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&product(3, 100), 1).unwrap();
        cart.add_item(&product(1, 100), 1).unwrap();
        cart.add_item(&product(2, 100), 1).unwrap();
        cart.add_item(&product(3, 100), 5).unwrap();

        let ids: Vec<_> = cart.entries().iter().map(CartEntry::product_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let a = product(1, 999);
        cart.add_item(&a, 1).unwrap();

        assert!(matches!(cart.add_item(&a, 0), Err(CoreError::Validation(_))));
        assert!(cart.add_item(&a, -2).is_err());
        assert_eq!(cart.quantity_of(1), 1);
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        for qty in [0, -1] {
            let mut updated = Cart::new();
            let mut removed = Cart::new();
            for cart in [&mut updated, &mut removed] {
                cart.add_item(&product(1, 500), 2).unwrap();
                cart.add_item(&product(2, 700), 1).unwrap();
            }

            updated.update_quantity(1, qty).unwrap();
            removed.remove_item(1);

            let lines = |cart: &Cart| -> Vec<(ProductId, i64)> {
                cart.entries()
                    .iter()
                    .map(|e| (e.product_id(), e.quantity))
                    .collect()
            };
            assert_eq!(lines(&updated), lines(&removed));
            assert_eq!(lines(&updated), vec![(2, 1)]);
        }
    }

    #[test]
    fn test_update_quantity_overwrites() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 500), 2).unwrap();
        cart.update_quantity(1, 9).unwrap();
        assert_eq!(cart.quantity_of(1), 9);
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 500), 2).unwrap();
        cart.update_quantity(42, 3).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert!(!cart.contains(42));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 500), 2).unwrap();
        let before = cart.entries().to_vec();

        assert!(!cart.remove_item(99));
        assert!(!cart.remove_item(99));
        assert_eq!(cart.entries(), before.as_slice());
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 500), 2).unwrap();

        cart.decrement(1);
        assert_eq!(cart.quantity_of(1), 1);

        cart.decrement(1);
        assert_eq!(cart.quantity_of(1), 1);
        assert!(cart.contains(1));

        // Different entry point, different floor
        cart.update_quantity(1, 0).unwrap();
        assert!(!cart.contains(1));
    }

    #[test]
    fn test_increment() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 500), 1).unwrap();
        cart.increment(1).unwrap();
        cart.increment(2).unwrap();
        assert_eq!(cart.quantity_of(1), 2);
        assert!(!cart.contains(2));
    }

    #[test]
    fn test_quantity_capped_at_max() {
        let mut cart = Cart::new();
        let a = product(1, 500);
        cart.add_item(&a, MAX_ITEM_QUANTITY - 1).unwrap();

        cart.increment(1).unwrap();
        assert_eq!(cart.quantity_of(1), MAX_ITEM_QUANTITY);

        assert!(matches!(
            cart.increment(1),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(cart.add_item(&a, 1).is_err());
        assert!(cart.update_quantity(1, MAX_ITEM_QUANTITY + 1).is_err());
        assert_eq!(cart.quantity_of(1), MAX_ITEM_QUANTITY);

        cart.update_quantity(1, 3).unwrap();
        assert_eq!(cart.quantity_of(1), 3);
    }

    #[test]
    fn test_add_i64_max_then_one_is_rejected() {
        let mut cart = Cart::new();
        let a = product(1, 500);

        assert!(cart.add_item(&a, i64::MAX).is_err());
        cart.add_item(&a, 1).unwrap();
        assert!(cart.add_item(&a, i64::MAX).is_err());
        assert_eq!(cart.quantity_of(1), 1);
    }

    #[test]
    fn test_huge_quantity_rejected_and_totals_stay_sane() {
        let mut cart = Cart::new();
        let laptop = product(1, 159_900);

        let err = cart.add_item(&laptop, 100_000_000_000_000).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), Money::zero());

        cart.add_item(&laptop, 2).unwrap();
        assert!(cart.update_quantity(1, 100_000_000_000_000).is_err());
        assert_eq!(cart.total_amount(), Money::from_cents(319_800));
    }

    #[test]
    fn test_total_overflow_rejected() {
        let mut cart = Cart::new();
        let half = i64::MAX / 2 + 1;
        cart.add_item(&product(1, half), 1).unwrap();

        // Fits on its own line, not in the subtotal.
        let err = cart.add_item(&product(2, half), 1).unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation(ValidationError::OutOfRange {
                field: "cart total".to_string(),
                min: 0,
                max: i64::MAX,
            })
        );
        assert!(cart.increment(1).is_err());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_amount(), Money::from_cents(half));
        assert_eq!(cart.grand_total(), Money::from_cents(half));
    }

    #[test]
    fn test_total_amount_round_trip() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1250), 1).unwrap();
        let before = cart.total_amount();

        cart.add_item(&product(2, 333), 3).unwrap();
        assert_eq!(cart.total_amount(), before + Money::from_cents(999));

        cart.remove_item(2);
        assert_eq!(cart.total_amount(), before);
    }

    #[test]
    fn test_total_uses_current_price_not_original() {
        let mut cart = Cart::new();
        let discounted = product(1, 8_000).with_original_price(10_000);
        cart.add_item(&discounted, 2).unwrap();

        assert_eq!(cart.total_amount(), Money::from_cents(16_000));
        assert_eq!(cart.original_total(), Money::from_cents(20_000));
        assert_eq!(cart.savings(), Money::from_cents(4_000));
    }

    #[test]
    fn test_shipping_boundary() {
        assert_eq!(shipping_cost(Money::from_cents(9_999)), Money::from_cents(1_000));
        assert_eq!(shipping_cost(Money::from_cents(10_000)), Money::zero());
        assert_eq!(shipping_cost(Money::zero()), Money::from_cents(1_000));
    }

    #[test]
    fn test_free_shipping_scenario() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 5_000), 2).unwrap();

        assert_eq!(cart.total_amount(), Money::from_cents(10_000));
        assert_eq!(cart.shipping_cost(), Money::zero());
        assert_eq!(cart.grand_total(), Money::from_cents(10_000));
    }

    #[test]
    fn test_paid_shipping_scenario() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 4_999), 1).unwrap();

        assert_eq!(cart.grand_total(), Money::from_cents(5_999));

        let custom = ShippingPolicy::new(Money::from_cents(2_500), Money::from_cents(495));
        assert_eq!(cart.grand_total_with(&custom), Money::from_cents(4_999));
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 2_000), 2).unwrap();
        cart.add_item(&product(2, 1_500).with_original_price(2_000), 1).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.subtotal, Money::from_cents(5_500));
        assert_eq!(totals.savings, Money::from_cents(500));
        assert_eq!(totals.shipping, Money::from_cents(1_000));
        assert!(!totals.free_shipping);
        assert_eq!(totals.grand_total, Money::from_cents(6_500));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 999), 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert!(cart.total_amount().is_zero());
    }
}
