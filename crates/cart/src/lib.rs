//! Shopping cart domain module.
//!
//! A cart belongs to either a signed-in user or an anonymous session and holds
//! catalog variants with quantities. Pricing is resolved against the catalog
//! by the caller; the cart only multiplies.

pub mod cart;

pub use cart::{Cart, CartId, CartItem, CartItemId, CartOwner, CartStatus, CartStore, CartTotals};
