//! Async catalog store boundary shared by every backend.
//!
//! [`CatalogStore`](storefront_catalog::CatalogStore) is the synchronous
//! contract the in-memory store implements directly. Postgres is async, so
//! code that must run against either backend (pricing, cascades across
//! stores) is written against [`AsyncCatalogStore`].

use async_trait::async_trait;

use storefront_catalog::{
    AddProductImage, Attribute, AttributeId, AttributeValue, AttributeValueId, CatalogResult,
    Category, CategoryId, CreateAttribute, CreateAttributeValue, CreateCategory, CreateProduct,
    CreateVariant, Product, ProductAttribute, ProductId, ProductImage, ProductQuery,
    ProductVariant, VariantAttributeValue, VariantId, VariantLinkId, Visibility,
};

/// Record store for the catalog, async flavour.
///
/// Same semantics as `CatalogStore`: unique keys surface as
/// `DomainError::Uniqueness`, protected deletes as `DomainError::Conflict`,
/// and every link write is validated and persisted atomically.
#[async_trait]
pub trait AsyncCatalogStore: Send + Sync {
    async fn create_category(&self, cmd: CreateCategory) -> CatalogResult<Category>;
    async fn category(&self, id: CategoryId) -> CatalogResult<Category>;
    async fn categories(&self, visibility: Visibility) -> CatalogResult<Vec<Category>>;
    async fn delete_category(&self, id: CategoryId) -> CatalogResult<()>;

    async fn create_attribute(&self, cmd: CreateAttribute) -> CatalogResult<Attribute>;
    async fn attribute(&self, id: AttributeId) -> CatalogResult<Attribute>;
    async fn attributes(&self) -> CatalogResult<Vec<Attribute>>;
    async fn delete_attribute(&self, id: AttributeId) -> CatalogResult<()>;

    async fn next_attribute_value_sort_order(
        &self,
        attribute_id: AttributeId,
    ) -> CatalogResult<u32>;
    async fn create_attribute_value(
        &self,
        cmd: CreateAttributeValue,
    ) -> CatalogResult<AttributeValue>;
    async fn attribute_value(&self, id: AttributeValueId) -> CatalogResult<AttributeValue>;
    async fn attribute_values(
        &self,
        attribute_id: AttributeId,
    ) -> CatalogResult<Vec<AttributeValue>>;
    async fn delete_attribute_value(&self, id: AttributeValueId) -> CatalogResult<()>;

    async fn create_product(&self, cmd: CreateProduct) -> CatalogResult<Product>;
    async fn product(&self, id: ProductId) -> CatalogResult<Product>;
    async fn products(&self, query: ProductQuery) -> CatalogResult<Vec<Product>>;
    async fn delete_product(&self, id: ProductId) -> CatalogResult<()>;

    async fn declare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<ProductAttribute>;
    async fn undeclare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<()>;
    async fn product_attributes(&self, product_id: ProductId) -> CatalogResult<Vec<Attribute>>;

    async fn next_variant_sort_order(&self, product_id: ProductId) -> CatalogResult<u32>;
    async fn create_variant(&self, cmd: CreateVariant) -> CatalogResult<ProductVariant>;
    async fn variant(&self, id: VariantId) -> CatalogResult<ProductVariant>;
    async fn variant_by_sku(&self, sku: &str) -> CatalogResult<Option<ProductVariant>>;
    async fn variants(
        &self,
        product_id: ProductId,
        visibility: Visibility,
    ) -> CatalogResult<Vec<ProductVariant>>;
    async fn set_stock_quantity(
        &self,
        id: VariantId,
        quantity: u32,
    ) -> CatalogResult<ProductVariant>;
    async fn delete_variant(&self, id: VariantId) -> CatalogResult<()>;

    async fn link_attribute_value(
        &self,
        variant_id: VariantId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue>;
    async fn relink_attribute_value(
        &self,
        link_id: VariantLinkId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue>;
    async fn unlink_attribute_value(&self, link_id: VariantLinkId) -> CatalogResult<()>;
    async fn variant_links(
        &self,
        variant_id: VariantId,
    ) -> CatalogResult<Vec<VariantAttributeValue>>;

    async fn next_image_sort_order(&self, product_id: ProductId) -> CatalogResult<u32>;
    async fn add_image(&self, cmd: AddProductImage) -> CatalogResult<ProductImage>;
    async fn images(&self, product_id: ProductId) -> CatalogResult<Vec<ProductImage>>;
}
