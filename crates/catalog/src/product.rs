use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::error::{require_max_chars, require_non_blank};
use storefront_core::{DomainError, DomainResult, Entity, Money, Slug, define_id};

use crate::attribute::AttributeId;
use crate::category::{Category, CategoryId};
use crate::variant::ProductVariant;

define_id! {
    /// Product identifier.
    pub struct ProductId;
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub category_id: CategoryId,
    pub name: String,
    /// Derived from the category slug and `name` when omitted.
    pub slug: Option<Slug>,
    pub short_description: String,
    pub full_description: String,
    pub base_price: Money,
    pub is_featured: bool,
    pub is_active: bool,
}

impl CreateProduct {
    pub fn new(category_id: CategoryId, name: impl Into<String>, base_price: Money) -> Self {
        Self {
            category_id,
            name: name.into(),
            slug: None,
            short_description: String::new(),
            full_description: String::new(),
            base_price,
            is_featured: false,
            is_active: true,
        }
    }
}

/// A sellable item in one category. Purchasable configurations are its
/// [`ProductVariant`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub short_description: String,
    pub full_description: String,
    pub base_price: Money,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Build a product in `category`.
    ///
    /// Slugs are unique across the catalog while names are only unique per
    /// category, so a derived slug is prefixed with the category slug.
    pub fn create(
        cmd: CreateProduct,
        category: &Category,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if cmd.category_id != category.id {
            return Err(DomainError::invariant("category_id mismatch"));
        }
        require_non_blank("product name", &cmd.name)?;
        let name = cmd.name.trim().to_string();
        require_max_chars("product name", &name, 255)?;
        let slug = match cmd.slug {
            Some(slug) => slug,
            None => Slug::slugify(&format!("{} {name}", category.slug))?,
        };
        Ok(Self {
            id: ProductId::new(),
            category_id: cmd.category_id,
            name,
            slug,
            short_description: cmd.short_description,
            full_description: cmd.full_description,
            base_price: cmd.base_price,
            is_featured: cmd.is_featured,
            is_active: cmd.is_active,
            created_at: now,
        })
    }

    /// Key of the per-category, case-insensitive name constraint.
    pub fn name_key(&self) -> (CategoryId, String) {
        (self.category_id, self.name.to_lowercase())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Declares that a product varies along an attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub product_id: ProductId,
    pub attribute_id: AttributeId,
}

/// Price a customer pays for a variant: its override, else the product's base price.
pub fn effective_price(variant: &ProductVariant, product: &Product) -> Money {
    variant.price_override.unwrap_or(product.base_price)
}
