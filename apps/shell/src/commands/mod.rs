//! # Shell Commands
//!
//! One module per screen of the storefront. Each command takes the session
//! (and, for checkout, the pending handle) and returns a serializable
//! response or an [`ApiError`](crate::error::ApiError).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── catalog.rs   ◄─── home, list, search, product detail
//! ├── cart.rs      ◄─── cart manipulation
//! ├── checkout.rs  ◄─── simulated checkout
//! ├── wishlist.rs  ◄─── heart button, wishlist screen
//! ├── auth.rs      ◄─── sign-in, sign-up, sign-out
//! └── config.rs    ◄─── show / save storefront.toml
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod wishlist;

pub use auth::AuthResponse;
pub use cart::{CartLineDto, CartResponse};
pub use catalog::{HomeDto, ProductDetailDto, ProductDto};
pub use checkout::{CheckoutResultDto, CheckoutStatusDto};
pub use wishlist::WishlistResponse;
