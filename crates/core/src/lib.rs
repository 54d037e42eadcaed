//! `storefront-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

extern crate self as storefront_core;

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod ordering;
pub mod slug;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use money::Money;
pub use ordering::next_sort_order;
pub use slug::Slug;
pub use value_object::ValueObject;

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use uuid;
}
