//! # Shared Cart State
//!
//! The cart and the checkout simulator, shared between the session and the
//! background checkout task.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Lock Order                                      │
//! │                                                                         │
//! │   checkout ──────► cart                                                │
//! │                                                                         │
//! │  • Anything that needs both takes the simulator first                   │
//! │  • Closures run synchronously: no lock is ever held across an await     │
//! │  • A poisoned lock is recovered; cart state has no partial updates      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use storefront_core::{Cart, CheckoutSimulator};

#[derive(Debug, Clone)]
pub(crate) struct SharedCart {
    cart: Arc<Mutex<Cart>>,
    checkout: Arc<Mutex<CheckoutSimulator>>,
}

impl SharedCart {
    pub(crate) fn new(simulator: CheckoutSimulator) -> Self {
        SharedCart {
            cart: Arc::new(Mutex::new(Cart::new())),
            checkout: Arc::new(Mutex::new(simulator)),
        }
    }

    /// Executes a function with read access to the cart.
    pub(crate) fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub(crate) fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    pub(crate) fn with_checkout_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CheckoutSimulator) -> R,
    {
        let mut checkout = self.checkout.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut checkout)
    }

    /// Both locks, simulator first.
    pub(crate) fn with_both<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CheckoutSimulator, &mut Cart) -> R,
    {
        let mut checkout = self.checkout.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut checkout, &mut cart)
    }
}
