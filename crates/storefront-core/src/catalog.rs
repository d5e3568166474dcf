//! # Catalog
//!
//! The read-only product list behind the home, search and category screens.
//!
//! ## Search Semantics
//! ```text
//! query "sony"   ──► lowercase ──► matches name OR category OR brand
//!                                   (substring, case-insensitive)
//!
//! query ""       ──► every product, catalog order
//! category "All" ──► every product, catalog order
//! ```
//!
//! The catalog ships embedded in the binary (`data/catalog.json`); nothing
//! here touches the file system.

use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Product, ProductId};
use crate::validation::{validate_price_cents, validate_search_query};

/// Category name that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// How many products the home screen features.
pub const DEFAULT_FEATURED_COUNT: usize = 6;

const SEED_CATALOG_JSON: &str = include_str!("../data/catalog.json");

/// Static product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids and negative prices.
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        for (i, product) in products.iter().enumerate() {
            validate_price_cents(product.price_cents)?;
            if let Some(original) = product.original_price_cents {
                validate_price_cents(original)?;
            }
            if products[..i].iter().any(|p| p.id == product.id) {
                return Err(ValidationError::InvalidFormat {
                    field: "catalog".to_string(),
                    reason: format!("duplicate product id {}", product.id),
                }
                .into());
            }
        }

        Ok(Catalog { products })
    }

    /// Parses a catalog from a JSON array of products.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let products: Vec<Product> =
            serde_json::from_str(json).map_err(|e| ValidationError::InvalidFormat {
                field: "catalog".to_string(),
                reason: e.to_string(),
            })?;
        Self::new(products)
    }

    /// The catalog bundled with the app.
    pub fn seed() -> CoreResult<Self> {
        Self::from_json(SEED_CATALOG_JSON)
    }

    /// All products, catalog order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Looks up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a product by id, failing with `ProductNotFound`.
    pub fn require(&self, id: ProductId) -> CoreResult<&Product> {
        self.get(id).ok_or(CoreError::ProductNotFound(id))
    }

    /// The first `count` products, for the home screen carousel.
    pub fn featured(&self, count: usize) -> &[Product] {
        &self.products[..count.min(self.products.len())]
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Products in a category. `"All"` returns everything.
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        if category.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Case-insensitive substring search over name, category and brand.
    ///
    /// ## Errors
    /// Queries longer than 100 characters are rejected.
    pub fn search(&self, query: &str) -> CoreResult<Vec<&Product>> {
        let query = validate_search_query(query)?.to_lowercase();

        let results: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.name.to_lowercase().contains(&query)
                    || p.category.to_lowercase().contains(&query)
                    || p.brand.to_lowercase().contains(&query)
            })
            .collect();

        debug!(query = %query, results = results.len(), "Catalog search");
        Ok(results)
    }

    /// Products currently on sale.
    pub fn discounted(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_discounted()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<ProductId> {
        products.iter().map(|p| p.id).collect()
    }

    fn small_catalog() -> Catalog {
        Catalog::new(vec![
            Product::new(1, "MacBook Air", "Apple", "Laptops", 109_900),
            Product::new(2, "Bravia 55", "Sony", "TVs", 89_900).with_original_price(99_900),
            Product::new(3, "Xperia 1 V", "Sony", "Phones", 129_900),
            Product::new(4, "iPhone 15", "Apple", "Phones", 79_900),
        ])
        .unwrap()
    }

    #[test]
    fn test_seed_catalog_loads() {
        let catalog = Catalog::seed().unwrap();
        assert!(catalog.len() >= DEFAULT_FEATURED_COUNT);
        assert!(catalog.get(1).is_some());
        assert_eq!(catalog.featured(DEFAULT_FEATURED_COUNT).len(), DEFAULT_FEATURED_COUNT);
    }

    #[test]
    fn test_search_matches_name_category_brand() {
        let catalog = small_catalog();

        assert_eq!(ids(&catalog.search("sony").unwrap()), vec![2, 3]);
        assert_eq!(ids(&catalog.search("PHONES").unwrap()), vec![3, 4]);
        assert_eq!(ids(&catalog.search("macbook").unwrap()), vec![1]);
        assert!(catalog.search("toaster").unwrap().is_empty());
    }

    #[test]
    fn test_empty_search_returns_everything() {
        let catalog = small_catalog();
        assert_eq!(catalog.search("   ").unwrap().len(), 4);
    }

    #[test]
    fn test_search_rejects_long_query() {
        let catalog = small_catalog();
        assert!(matches!(
            catalog.search(&"a".repeat(101)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_categories_and_filter() {
        let catalog = small_catalog();

        assert_eq!(catalog.categories(), vec!["Laptops", "TVs", "Phones"]);
        assert_eq!(ids(&catalog.by_category("phones")), vec![3, 4]);
        assert_eq!(catalog.by_category(ALL_CATEGORIES).len(), 4);
        assert!(catalog.by_category("Drones").is_empty());
    }

    #[test]
    fn test_featured_clamps() {
        let catalog = small_catalog();
        assert_eq!(catalog.featured(2).len(), 2);
        assert_eq!(catalog.featured(50).len(), 4);
    }

    #[test]
    fn test_require_unknown_product() {
        let catalog = small_catalog();
        assert_eq!(catalog.require(99).unwrap_err(), CoreError::ProductNotFound(99));
    }

    #[test]
    fn test_discounted() {
        let catalog = small_catalog();
        assert_eq!(ids(&catalog.discounted()), vec![2]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Catalog::new(vec![
            Product::new(1, "A", "Acme", "X", 100),
            Product::new(1, "B", "Acme", "X", 100),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(Catalog::from_json("{ not json").is_err());
    }
}
