//! Catalog repository boundary.
//!
//! Implementations must enforce the storage-level unique keys (surfacing
//! `DomainError::Uniqueness`) and run every link write's validation and
//! persistence as one atomic unit.

use crate::attribute::{
    Attribute, AttributeId, AttributeValue, AttributeValueId, CreateAttribute, CreateAttributeValue,
};
use crate::category::{Category, CategoryId, CreateCategory};
use crate::error::CatalogResult;
use crate::image::{AddProductImage, ProductImage};
use crate::product::{CreateProduct, Product, ProductAttribute, ProductId};
use crate::variant::{
    CreateVariant, ProductVariant, VariantAttributeValue, VariantId, VariantLinkId,
};

/// Whether listings include inactive records.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    All,
    ActiveOnly,
}

impl Visibility {
    pub fn admits(self, is_active: bool) -> bool {
        match self {
            Visibility::All => true,
            Visibility::ActiveOnly => is_active,
        }
    }
}

/// Product listing filter. Results are ordered by name.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category_id: Option<CategoryId>,
    pub visibility: Visibility,
    pub featured_only: bool,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        self.category_id.is_none_or(|c| c == product.category_id)
            && self.visibility.admits(product.is_active)
            && (!self.featured_only || product.is_featured)
    }
}

/// Record store for the catalog.
pub trait CatalogStore: Send + Sync {
    fn create_category(&self, cmd: CreateCategory) -> CatalogResult<Category>;
    fn category(&self, id: CategoryId) -> CatalogResult<Category>;
    /// Categories ordered by name.
    fn categories(&self, visibility: Visibility) -> CatalogResult<Vec<Category>>;
    /// Refused while the category still owns products.
    fn delete_category(&self, id: CategoryId) -> CatalogResult<()>;

    fn create_attribute(&self, cmd: CreateAttribute) -> CatalogResult<Attribute>;
    fn attribute(&self, id: AttributeId) -> CatalogResult<Attribute>;
    /// Attributes ordered by name.
    fn attributes(&self) -> CatalogResult<Vec<Attribute>>;
    /// Refused while any product declares the attribute; removes its values otherwise.
    fn delete_attribute(&self, id: AttributeId) -> CatalogResult<()>;

    /// Next free sort position among the attribute's values.
    fn next_attribute_value_sort_order(&self, attribute_id: AttributeId) -> CatalogResult<u32>;
    fn create_attribute_value(&self, cmd: CreateAttributeValue) -> CatalogResult<AttributeValue>;
    fn attribute_value(&self, id: AttributeValueId) -> CatalogResult<AttributeValue>;
    /// Values ordered by `(sort_order, value)`.
    fn attribute_values(&self, attribute_id: AttributeId) -> CatalogResult<Vec<AttributeValue>>;
    /// Refused while any variant links the value.
    fn delete_attribute_value(&self, id: AttributeValueId) -> CatalogResult<()>;

    fn create_product(&self, cmd: CreateProduct) -> CatalogResult<Product>;
    fn product(&self, id: ProductId) -> CatalogResult<Product>;
    fn products(&self, query: ProductQuery) -> CatalogResult<Vec<Product>>;
    /// Cascades to variants, their links, images and attribute declarations.
    fn delete_product(&self, id: ProductId) -> CatalogResult<()>;

    fn declare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<ProductAttribute>;
    /// Refused while a variant of the product holds a value of the attribute.
    fn undeclare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<()>;
    /// Declared attributes ordered by name.
    fn product_attributes(&self, product_id: ProductId) -> CatalogResult<Vec<Attribute>>;

    /// Next free sort position among the product's variants.
    fn next_variant_sort_order(&self, product_id: ProductId) -> CatalogResult<u32>;
    fn create_variant(&self, cmd: CreateVariant) -> CatalogResult<ProductVariant>;
    fn variant(&self, id: VariantId) -> CatalogResult<ProductVariant>;
    fn variant_by_sku(&self, sku: &str) -> CatalogResult<Option<ProductVariant>>;
    /// Variants ordered by `(sort_order, sku)`.
    fn variants(
        &self,
        product_id: ProductId,
        visibility: Visibility,
    ) -> CatalogResult<Vec<ProductVariant>>;
    fn set_stock_quantity(&self, id: VariantId, quantity: u32) -> CatalogResult<ProductVariant>;
    /// Cascades to the variant's links and variant-scoped images.
    fn delete_variant(&self, id: VariantId) -> CatalogResult<()>;

    /// Validate and persist a new link, atomically.
    fn link_attribute_value(
        &self,
        variant_id: VariantId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue>;
    /// Re-point an existing link to another value, validated like a new one.
    fn relink_attribute_value(
        &self,
        link_id: VariantLinkId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue>;
    /// Refused when the remaining combination duplicates a sibling's.
    fn unlink_attribute_value(&self, link_id: VariantLinkId) -> CatalogResult<()>;
    fn variant_links(&self, variant_id: VariantId) -> CatalogResult<Vec<VariantAttributeValue>>;

    /// Next free sort position among the product's images.
    fn next_image_sort_order(&self, product_id: ProductId) -> CatalogResult<u32>;
    fn add_image(&self, cmd: AddProductImage) -> CatalogResult<ProductImage>;
    /// Images ordered by sort position.
    fn images(&self, product_id: ProductId) -> CatalogResult<Vec<ProductImage>>;
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use storefront_core::Money;

    use super::*;

    #[test]
    fn product_query_combines_filters() {
        let tablets = Category::create(CreateCategory::named("Tablets"), Utc::now()).unwrap();
        let category = tablets.id;
        let cmd = CreateProduct::new(category, "Tablet", Money::from_cents(1));
        let mut p = Product::create(cmd, &tablets, Utc::now()).unwrap();

        assert!(ProductQuery::default().matches(&p));
        let featured = ProductQuery {
            featured_only: true,
            ..ProductQuery::default()
        };
        assert!(!featured.matches(&p));

        p.is_featured = true;
        assert!(featured.matches(&p));

        p.is_active = false;
        let active_in_category = ProductQuery {
            category_id: Some(category),
            visibility: Visibility::ActiveOnly,
            featured_only: false,
        };
        assert!(!active_in_category.matches(&p));
        let elsewhere = ProductQuery {
            category_id: Some(CategoryId::new()),
            ..ProductQuery::default()
        };
        assert!(!elsewhere.matches(&p));
    }
}
