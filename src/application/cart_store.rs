use crate::domain::amount::PriceTotal;
use crate::domain::cart::Cart;
use crate::domain::ports::CartRepositoryBox;
use crate::domain::product::Product;
use crate::error::Result;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// The session's cart: loaded once from the repository, saved after every
/// mutation.
///
/// Each operation holds the cart lock for the whole read-modify-write, so
/// concurrent triggers resolve last-writer-wins without ever exposing a
/// partially updated line. A mutation is committed in memory before it is
/// persisted; if the save fails the error is returned and the in-memory cart
/// keeps the change.
pub struct CartStore {
    cart: Mutex<Cart>,
    repository: CartRepositoryBox,
}

impl CartStore {
    /// Opens the store, loading whatever cart the repository holds. A record
    /// that cannot be read is logged and replaced by an empty cart.
    pub fn open(repository: CartRepositoryBox) -> Self {
        let cart = match repository.load() {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable persisted cart");
                Cart::default()
            }
        };
        Self {
            cart: Mutex::new(cart),
            repository,
        }
    }

    pub fn add_item(&self, product: &Product) -> Result<()> {
        self.mutate(|cart| cart.add(product))
    }

    pub fn remove_item(&self, product_id: u64) -> Result<()> {
        self.mutate(|cart| cart.remove(product_id))
    }

    pub fn update_quantity(&self, product_id: u64, quantity: i64) -> Result<()> {
        self.mutate(|cart| cart.update(product_id, quantity))
    }

    pub fn clear_cart(&self) -> Result<()> {
        self.mutate(Cart::clear)
    }

    pub fn get_total_items(&self) -> u64 {
        self.lock().total_items()
    }

    pub fn get_total_price(&self) -> PriceTotal {
        self.lock().total()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Cart),
    {
        let mut cart = self.lock();
        f(&mut *cart);
        self.repository.save(&*cart).inspect_err(|e| {
            warn!(error = %e, "Failed to persist cart");
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
