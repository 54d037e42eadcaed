//! Catalog domain module.
//!
//! Categories, attributes and their values, products, variants and the links
//! between variants and attribute values. Everything here is deterministic
//! domain logic (no IO, no storage); record stores live in `storefront-infra`
//! and implement [`CatalogStore`].

pub mod attribute;
pub mod category;
pub mod error;
pub mod image;
pub mod product;
pub mod store;
pub mod validation;
pub mod variant;

pub use attribute::{
    Attribute, AttributeGroup, AttributeId, AttributeValue, AttributeValueId, CreateAttribute,
    CreateAttributeValue, MAX_ATTRIBUTE_TEXT_LEN,
};
pub use category::{Category, CategoryId, CreateCategory};
pub use error::{CatalogError, CatalogResult, LinkViolation};
pub use image::{AddProductImage, ProductImage, ProductImageId};
pub use product::{CreateProduct, Product, ProductAttribute, ProductId, effective_price};
pub use store::{CatalogStore, ProductQuery, Visibility};
pub use validation::{
    CatalogReader, LinkCandidate, LinkSnapshot, ResolvedLink, check_link, check_unlink,
    combination_key, snapshot_link, validate_link,
};
pub use variant::{CreateVariant, ProductVariant, VariantAttributeValue, VariantId, VariantLinkId};
