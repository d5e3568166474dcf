//! # Catalog Commands
//!
//! Home screen, category browsing, search and product detail.
//!
//! ## Screens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  home ──► featured carousel + category chips                           │
//! │    │                                                                    │
//! │    ├── list <category> ──► grid filtered by chip ("All" = everything)   │
//! │    ├── search <query>  ──► name / category / brand, case-insensitive    │
//! │    └── show <id>       ──► detail: specs, discount, wishlist heart      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_core::catalog::ALL_CATEGORIES;
use storefront_core::{Money, Product, ProductId};
use storefront_session::Session;
use tracing::debug;

use crate::error::ApiError;

/// Product card as shown in grids and search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Money,
    pub original_price: Option<Money>,
    pub discount_percentage: u32,
    pub rating: f32,
    pub in_stock: bool,
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        ProductDto {
            id: p.id,
            name: p.name.clone(),
            brand: p.brand.clone(),
            category: p.category.clone(),
            price: p.price(),
            original_price: p.original_price(),
            discount_percentage: p.discount_percentage(),
            rating: p.rating,
            in_stock: p.in_stock,
        }
    }
}

/// Full product page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailDto {
    #[serde(flatten)]
    pub product: Product,
    pub discount_percentage: u32,
    pub wishlisted: bool,
    pub quantity_in_cart: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeDto {
    pub featured: Vec<ProductDto>,
    /// Category chips, "All" first.
    pub categories: Vec<String>,
}

pub fn home(session: &Session) -> HomeDto {
    let categories = std::iter::once(ALL_CATEGORIES)
        .chain(session.catalog().categories())
        .map(str::to_string)
        .collect();

    HomeDto {
        featured: session.featured().iter().map(ProductDto::from).collect(),
        categories,
    }
}

pub fn list_products(session: &Session, category: Option<&str>) -> Vec<ProductDto> {
    let category = category.unwrap_or(ALL_CATEGORIES);
    debug!(category, "list_products command");
    session
        .catalog()
        .by_category(category)
        .into_iter()
        .map(ProductDto::from)
        .collect()
}

pub fn search_products(session: &Session, query: &str) -> Result<Vec<ProductDto>, ApiError> {
    debug!(query, "search_products command");
    let results = session.catalog().search(query)?;
    Ok(results.into_iter().map(ProductDto::from).collect())
}

pub fn get_product(session: &Session, id: ProductId) -> Result<ProductDetailDto, ApiError> {
    let product = session.catalog().require(id)?;
    Ok(ProductDetailDto {
        discount_percentage: product.discount_percentage(),
        wishlisted: session.is_wishlisted(id),
        quantity_in_cart: session.cart().quantity_of(id),
        product: product.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_session::StoreConfig;

    fn session() -> Session {
        Session::with_seed_catalog(StoreConfig::default()).unwrap()
    }

    #[test]
    fn test_home_lists_all_first() {
        let home = home(&session());
        assert_eq!(home.categories[0], "All");
        assert_eq!(home.featured.len(), 6);
    }

    #[test]
    fn test_list_all_matches_catalog() {
        let session = session();
        assert_eq!(list_products(&session, None).len(), session.catalog().len());
    }

    #[test]
    fn test_search_too_long() {
        let err = search_products(&session(), &"x".repeat(101)).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[test]
    fn test_product_detail_flags() {
        let session = session();
        session.toggle_wishlist(2).unwrap();
        session.add_to_cart(2, 3).unwrap();

        let detail = get_product(&session, 2).unwrap();
        assert!(detail.wishlisted);
        assert_eq!(detail.quantity_in_cart, 3);

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["wishlisted"], true);
    }
}
