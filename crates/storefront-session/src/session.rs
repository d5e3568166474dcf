//! # Shopping Session
//!
//! One shopper's state: cart, wishlist, checkout and signed-in user, over a
//! shared read-only catalog. Created explicitly and passed around; there is
//! no global session.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Session                                    │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────────────┐  ┌──────────────────┐  │
//! │  │ Arc<Catalog> │  │ SharedCart               │  │ Mutex<Wishlist>  │  │
//! │  │ (read-only)  │  │  Arc<Mutex<Simulator>>   │  │ Mutex<Option<    │  │
//! │  │              │  │  Arc<Mutex<Cart>>        │  │        User>>    │  │
//! │  └──────────────┘  └────────────┬─────────────┘  └──────────────────┘  │
//! │                                 │ clone                                 │
//! │                                 ▼                                       │
//! │                      CheckoutRunner task (at most one)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use storefront_core::validation::RegistrationForm;
use storefront_core::{
    Cart, CartTotals, Catalog, CheckoutSimulator, CheckoutState, Product, ProductId, User,
    Wishlist,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::MockAuthService;
use crate::checkout::{now, CheckoutHandle, CheckoutRunner};
use crate::config::StoreConfig;
use crate::error::SessionResult;
use crate::state::SharedCart;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    catalog: Arc<Catalog>,
    config: StoreConfig,
    shared: SharedCart,
    runner: Mutex<Option<JoinHandle<()>>>,
    wishlist: Mutex<Wishlist>,
    user: Mutex<Option<User>>,
    auth: MockAuthService,
}

impl Session {
    /// Creates an empty session over `catalog`.
    pub fn new(catalog: Arc<Catalog>, config: StoreConfig) -> Self {
        let simulator = CheckoutSimulator::new(config.checkout.duration(), config.shipping_policy());
        let auth = MockAuthService::from_settings(&config.auth);
        let id = Uuid::new_v4();

        info!(session_id = %id, products = catalog.len(), "Session created");

        Session {
            id,
            catalog,
            config,
            shared: SharedCart::new(simulator),
            runner: Mutex::new(None),
            wishlist: Mutex::new(Wishlist::new()),
            user: Mutex::new(None),
            auth,
        }
    }

    /// Creates a session over the embedded seed catalog.
    pub fn with_seed_catalog(config: StoreConfig) -> SessionResult<Self> {
        let catalog = Catalog::seed()?;
        Ok(Self::new(Arc::new(catalog), config))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Featured products, as many as the config asks for.
    pub fn featured(&self) -> &[Product] {
        self.catalog.featured(self.config.catalog.featured_count)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds `quantity` of a catalog product to the cart.
    ///
    /// ## Errors
    /// - `CoreError::ProductNotFound` for an unknown id
    /// - `CoreError::Validation` for a quantity below 1, or one that would
    ///   take the line past `MAX_ITEM_QUANTITY`
    pub fn add_to_cart(&self, product_id: ProductId, quantity: i64) -> SessionResult<()> {
        let product = self.catalog.require(product_id)?;
        self.shared
            .with_cart_mut(|cart| cart.add_item(product, quantity))?;
        Ok(())
    }

    /// Returns whether anything was removed.
    pub fn remove_from_cart(&self, product_id: ProductId) -> bool {
        self.shared.with_cart_mut(|cart| cart.remove_item(product_id))
    }

    /// Sets a quantity; zero or less removes the entry.
    pub fn update_quantity(&self, product_id: ProductId, quantity: i64) -> SessionResult<()> {
        self.shared
            .with_cart_mut(|cart| cart.update_quantity(product_id, quantity))?;
        Ok(())
    }

    pub fn increment(&self, product_id: ProductId) -> SessionResult<()> {
        self.shared.with_cart_mut(|cart| cart.increment(product_id))?;
        Ok(())
    }

    /// Never goes below 1; use `remove_from_cart` to drop the line.
    pub fn decrement(&self, product_id: ProductId) {
        self.shared.with_cart_mut(|cart| cart.decrement(product_id));
    }

    pub fn clear_cart(&self) {
        self.shared.with_cart_mut(Cart::clear);
    }

    /// Snapshot of the cart.
    pub fn cart(&self) -> Cart {
        self.shared.with_cart(Cart::clone)
    }

    /// Totals under the configured shipping policy.
    pub fn totals(&self) -> CartTotals {
        let policy = self.config.shipping_policy();
        self.shared
            .with_cart(|cart| CartTotals::compute(cart, &policy))
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Starts the simulated checkout and spawns its runner.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart`: nothing happens, the cart stays empty
    /// - `CoreError::CheckoutInProgress`: the running checkout is untouched
    pub fn begin_checkout(&self) -> SessionResult<CheckoutHandle> {
        let started_at = now();
        self.shared
            .with_both(|checkout, cart| checkout.begin(cart, started_at))?;

        let (task, handle) =
            CheckoutRunner::spawn(self.shared.clone(), self.config.checkout.progress_interval());

        if let Some(previous) = lock(&self.runner).replace(task) {
            previous.abort();
        }

        debug!(session_id = %self.id, "Checkout runner spawned");
        Ok(handle)
    }

    pub fn checkout_state(&self) -> CheckoutState {
        self.shared.with_checkout_mut(|checkout| checkout.state())
    }

    /// Progress of the running checkout, 0 when none is running.
    pub fn checkout_progress(&self) -> f64 {
        let at = now();
        self.shared.with_checkout_mut(|checkout| checkout.progress(at))
    }

    /// Time left on the running checkout, zero when none is running.
    pub fn checkout_remaining(&self) -> Duration {
        let at = now();
        self.shared.with_checkout_mut(|checkout| checkout.remaining(at))
    }

    /// Back to `Idle`. A checkout still running is dropped without an
    /// outcome; its handle's `wait` reports `CheckoutAborted`.
    pub fn reset_checkout(&self) {
        self.stop_runner();
        self.shared.with_checkout_mut(CheckoutSimulator::reset);
    }

    fn stop_runner(&self) {
        if let Some(task) = lock(&self.runner).take() {
            task.abort();
        }
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Hearts or un-hearts a product. Returns whether it is wishlisted now.
    pub fn toggle_wishlist(&self, product_id: ProductId) -> SessionResult<bool> {
        let product = self.catalog.require(product_id)?;
        Ok(lock(&self.wishlist).toggle(product))
    }

    pub fn is_wishlisted(&self, product_id: ProductId) -> bool {
        lock(&self.wishlist).contains(product_id)
    }

    pub fn wishlist(&self) -> Wishlist {
        lock(&self.wishlist).clone()
    }

    // =========================================================================
    // Auth
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> SessionResult<User> {
        let user = self.auth.login(email, password).await?;
        *lock(&self.user) = Some(user.clone());
        Ok(user)
    }

    pub async fn register(&self, form: &RegistrationForm) -> SessionResult<User> {
        let user = self.auth.register(form).await?;
        *lock(&self.user) = Some(user.clone());
        Ok(user)
    }

    /// Signs out, returning who was signed in.
    pub fn logout(&self) -> Option<User> {
        let previous = lock(&self.user).take();
        if let Some(user) = &previous {
            info!(user_id = %user.id, "Signed out");
        }
        previous
    }

    pub fn current_user(&self) -> Option<User> {
        lock(&self.user).clone()
    }

    pub fn is_signed_in(&self) -> bool {
        lock(&self.user).is_some()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Ends the shopping session: cart and wishlist emptied, signed out,
    /// checkout back to `Idle`.
    pub fn reset(&self) {
        self.stop_runner();
        self.shared.with_both(|checkout, cart| {
            checkout.reset();
            cart.clear();
        });
        lock(&self.wishlist).clear();
        *lock(&self.user) = None;

        info!(session_id = %self.id, "Session reset");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_runner();
    }
}
