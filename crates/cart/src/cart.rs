use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_accounts::UserId;
use storefront_catalog::VariantId;
use storefront_core::{DomainError, DomainResult, Entity, Money, define_id};

define_id! {
    /// Cart identifier.
    pub struct CartId;
}

define_id! {
    /// Cart line identifier.
    pub struct CartItemId;
}

const MAX_SESSION_KEY_LEN: usize = 40;

/// Who a cart belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOwner {
    User(UserId),
    /// Anonymous visitor, identified by a non-empty session key.
    Session(String),
}

impl CartOwner {
    pub fn session(key: impl Into<String>) -> DomainResult<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(DomainError::validation("session key cannot be empty"));
        }
        if key.len() > MAX_SESSION_KEY_LEN {
            return Err(DomainError::validation(format!(
                "session key exceeds {MAX_SESSION_KEY_LEN} characters"
            )));
        }
        Ok(Self::Session(key))
    }
}

impl core::fmt::Display for CartOwner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CartOwner::User(id) => write!(f, "user {id}"),
            CartOwner::Session(key) => write!(f, "session {key}"),
        }
    }
}

/// Cart status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartStatus {
    Open,
    CheckedOut,
    Abandoned,
}

impl core::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CartStatus::Open => f.write_str("OPEN"),
            CartStatus::CheckedOut => f.write_str("CHECKED_OUT"),
            CartStatus::Abandoned => f.write_str("ABANDONED"),
        }
    }
}

/// Cart line: one variant and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub variant_id: VariantId,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn line_total(&self, unit_price: Money) -> DomainResult<Money> {
        unit_price
            .checked_mul(self.quantity)
            .ok_or_else(|| DomainError::invariant("line total overflow"))
    }
}

/// Priced view of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotals {
    pub lines: Vec<(CartItemId, Money)>,
    pub item_count: u32,
    pub total: Money,
}

/// Aggregate root: Cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    owner: CartOwner,
    status: CartStatus,
    items: Vec<CartItem>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Cart {
    pub fn open(owner: CartOwner, now: DateTime<Utc>) -> Self {
        Self {
            id: CartId::new(),
            owner,
            status: CartStatus::Open,
            items: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn owner(&self) -> &CartOwner {
        &self.owner
    }

    pub fn status(&self) -> CartStatus {
        self.status
    }

    /// Items in the order they were added.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, CartStatus::Open)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_for(&self, variant_id: VariantId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.variant_id == variant_id)
    }

    fn ensure_modifiable(&self) -> DomainResult<()> {
        if !self.is_modifiable() {
            return Err(DomainError::invariant(format!(
                "cart is {} and can no longer be modified",
                self.status
            )));
        }
        Ok(())
    }

    fn ensure_quantity(quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(())
    }

    /// Add a variant line. A variant may appear only once per cart.
    pub fn add_item(
        &mut self,
        variant_id: VariantId,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<CartItemId> {
        self.ensure_modifiable()?;
        Self::ensure_quantity(quantity)?;
        if self.item_for(variant_id).is_some() {
            return Err(DomainError::uniqueness("cart_item.variant", variant_id.to_string()));
        }

        let id = CartItemId::new();
        self.items.push(CartItem {
            id,
            variant_id,
            quantity,
            added_at: now,
        });
        self.modified_at = now;
        Ok(id)
    }

    pub fn set_quantity(
        &mut self,
        item_id: CartItemId,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_modifiable()?;
        Self::ensure_quantity(quantity)?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| DomainError::not_found(format!("cart item {item_id}")))?;
        item.quantity = quantity;
        self.modified_at = now;
        Ok(())
    }

    pub fn remove_item(
        &mut self,
        item_id: CartItemId,
        now: DateTime<Utc>,
    ) -> DomainResult<CartItem> {
        self.ensure_modifiable()?;
        let pos = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| DomainError::not_found(format!("cart item {item_id}")))?;
        self.modified_at = now;
        Ok(self.items.remove(pos))
    }

    /// Remove the line of a variant that left the catalog, whatever the cart's status.
    pub fn purge_variant(&mut self, variant_id: VariantId, now: DateTime<Utc>) -> Option<CartItem> {
        let pos = self.items.iter().position(|i| i.variant_id == variant_id)?;
        self.modified_at = now;
        Some(self.items.remove(pos))
    }

    pub fn checkout(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_modifiable()?;
        if self.items.is_empty() {
            return Err(DomainError::invariant("cannot check out an empty cart"));
        }
        self.status = CartStatus::CheckedOut;
        self.modified_at = now;
        Ok(())
    }

    pub fn abandon(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_modifiable()?;
        self.status = CartStatus::Abandoned;
        self.modified_at = now;
        Ok(())
    }

    /// Price every line with `unit_price`, which resolves a variant's current price.
    pub fn totals<F>(&self, mut unit_price: F) -> DomainResult<CartTotals>
    where
        F: FnMut(VariantId) -> DomainResult<Money>,
    {
        let mut lines = Vec::with_capacity(self.items.len());
        let mut total = Money::ZERO;
        let mut item_count: u32 = 0;
        for item in &self.items {
            let line = item.line_total(unit_price(item.variant_id)?)?;
            total = total
                .checked_add(line)
                .ok_or_else(|| DomainError::invariant("cart total overflow"))?;
            item_count = item_count.saturating_add(item.quantity);
            lines.push((item.id, line));
        }
        Ok(CartTotals {
            lines,
            item_count,
            total,
        })
    }
}

impl Entity for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Cart {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Cart {} for {} ({})", self.id, self.owner, self.status)
    }
}

/// Cart record store.
///
/// At most one open cart may exist per owner.
pub trait CartStore: Send + Sync {
    /// The owner's open cart, created when none exists.
    fn open_cart_for(&self, owner: &CartOwner) -> DomainResult<Cart>;
    fn get(&self, id: CartId) -> DomainResult<Cart>;
    /// Insert or replace a cart.
    fn save(&self, cart: &Cart) -> DomainResult<()>;
    /// All carts of an owner, most recently modified first.
    fn carts_of(&self, owner: &CartOwner) -> DomainResult<Vec<Cart>>;
    /// Drop every line holding `variant_id`; returns how many were removed.
    fn remove_variant_lines(&self, variant_id: VariantId) -> DomainResult<usize>;
}
