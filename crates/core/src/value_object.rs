//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two prices of
/// 1250 cents are the same price, two slugs spelling `red-shirt` are the same
/// slug. To "modify" one, build a new one.
///
/// - **Value Object**: no identity (`Money`, `Slug`)
/// - **Entity**: has identity (`Product`, `ProductVariant`)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
