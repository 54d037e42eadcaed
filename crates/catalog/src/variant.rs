use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::error::{require_max_chars, require_non_blank};
use storefront_core::{DomainResult, Entity, Money, define_id};

use crate::attribute::AttributeValueId;
use crate::product::ProductId;

define_id! {
    /// Product variant identifier.
    pub struct VariantId;
}

define_id! {
    /// Identifier of a variant ↔ attribute value link.
    pub struct VariantLinkId;
}

/// Command: CreateVariant.
///
/// `sort_order` is mandatory; use the store's next-position lookup for the
/// product when no explicit one is wanted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVariant {
    pub product_id: ProductId,
    pub sku: String,
    pub price_override: Option<Money>,
    pub stock_quantity: u32,
    pub sort_order: u32,
    pub is_active: bool,
}

impl CreateVariant {
    pub fn new(product_id: ProductId, sku: impl Into<String>, sort_order: u32) -> Self {
        Self {
            product_id,
            sku: sku.into(),
            price_override: None,
            stock_quantity: 0,
            sort_order,
            is_active: true,
        }
    }
}

/// A purchasable configuration of a product, identified by SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub price_override: Option<Money>,
    pub stock_quantity: u32,
    pub sort_order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ProductVariant {
    pub fn create(cmd: CreateVariant, now: DateTime<Utc>) -> DomainResult<Self> {
        require_non_blank("SKU", &cmd.sku)?;
        let sku = cmd.sku.trim().to_string();
        require_max_chars("SKU", &sku, 100)?;
        Ok(Self {
            id: VariantId::new(),
            product_id: cmd.product_id,
            sku,
            price_override: cmd.price_override,
            stock_quantity: cmd.stock_quantity,
            sort_order: cmd.sort_order,
            is_active: cmd.is_active,
            created_at: now,
        })
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Listing order inside a product: `(sort_order, sku)`.
    pub fn listing_key(&self) -> (u32, &str) {
        (self.sort_order, &self.sku)
    }
}

impl Entity for ProductVariant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Join record: one attribute value selected by one variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantAttributeValue {
    pub id: VariantLinkId,
    pub variant_id: VariantId,
    pub attribute_value_id: AttributeValueId,
}

impl Entity for VariantAttributeValue {
    type Id = VariantLinkId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
