//! In-memory cart store.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use storefront_cart::{Cart, CartId, CartOwner, CartStatus, CartStore};
use storefront_catalog::VariantId;
use storefront_core::{DomainError, DomainResult};

/// In-memory [`CartStore`] for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    inner: RwLock<HashMap<CartId, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DomainError {
    DomainError::invariant("cart store lock poisoned")
}

fn open_cart_of<'a>(carts: &'a HashMap<CartId, Cart>, owner: &CartOwner) -> Option<&'a Cart> {
    carts
        .values()
        .find(|c| c.owner() == owner && c.status() == CartStatus::Open)
}

impl CartStore for InMemoryCartStore {
    fn open_cart_for(&self, owner: &CartOwner) -> DomainResult<Cart> {
        let mut carts = self.inner.write().map_err(|_| poisoned())?;
        if let Some(cart) = open_cart_of(&carts, owner) {
            return Ok(cart.clone());
        }
        let cart = Cart::open(owner.clone(), chrono::Utc::now());
        debug!(cart_id = %cart.id_typed(), owner = %owner, "cart opened");
        carts.insert(cart.id_typed(), cart.clone());
        Ok(cart)
    }

    fn get(&self, id: CartId) -> DomainResult<Cart> {
        let carts = self.inner.read().map_err(|_| poisoned())?;
        carts
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("cart {id}")))
    }

    fn save(&self, cart: &Cart) -> DomainResult<()> {
        let mut carts = self.inner.write().map_err(|_| poisoned())?;
        if cart.status() == CartStatus::Open {
            if let Some(other) = open_cart_of(&carts, cart.owner()) {
                if other.id_typed() != cart.id_typed() {
                    let owner = cart.owner().to_string();
                    return Err(DomainError::uniqueness("cart.open_per_owner", owner));
                }
            }
        }
        carts.insert(cart.id_typed(), cart.clone());
        Ok(())
    }

    fn carts_of(&self, owner: &CartOwner) -> DomainResult<Vec<Cart>> {
        let carts = self.inner.read().map_err(|_| poisoned())?;
        let mut out: Vec<_> = carts.values().filter(|c| c.owner() == owner).cloned().collect();
        out.sort_by(|a, b| b.modified_at().cmp(&a.modified_at()));
        Ok(out)
    }

    fn remove_variant_lines(&self, variant_id: VariantId) -> DomainResult<usize> {
        let mut carts = self.inner.write().map_err(|_| poisoned())?;
        let now = chrono::Utc::now();
        let removed = carts
            .values_mut()
            .filter_map(|cart| cart.purge_variant(variant_id, now))
            .count();
        if removed > 0 {
            debug!(variant_id = %variant_id, lines = removed, "cart lines removed");
        }
        Ok(removed)
    }
}
