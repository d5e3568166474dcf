//! # storefront-session: Session State and Timed Flows
//!
//! Wraps the pure `storefront-core` types in a session object and adds the
//! parts that need a clock: the checkout runner and the mock auth delay.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        storefront-session                               │
//! │                                                                         │
//! │   ┌──────────────┐                                                     │
//! │   │ StoreConfig  │  defaults ◄── storefront.toml ◄── STOREFRONT_*      │
//! │   └──────┬───────┘                                                     │
//! │          ▼                                                              │
//! │   ┌────────────────────────────────────────────────────────────────┐   │
//! │   │                         Session                                │   │
//! │   │   cart ops ──► Cart          wishlist ops ──► Wishlist         │   │
//! │   │   begin_checkout ──► CheckoutRunner (tokio task)               │   │
//! │   │   login/register ──► MockAuthService (tokio sleep)             │   │
//! │   └────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,ignore
//! let session = Session::with_seed_catalog(StoreConfig::load_or_default(None))?;
//! session.add_to_cart(1, 2)?;
//! let handle = session.begin_checkout()?;
//! let outcome = handle.wait().await?;
//! println!("{}", outcome.message());
//! ```

pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;
mod state;

pub use auth::{demo_user, MockAuthService};
pub use checkout::{CheckoutControl, CheckoutHandle};
pub use config::StoreConfig;
pub use error::{SessionError, SessionResult};
pub use session::Session;
