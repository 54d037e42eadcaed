//! Postgres-backed catalog store.
//!
//! Unique keys (case-insensitive names, slugs, SKUs, `(product, combination)`)
//! are enforced by the schema in `migrations/0001_catalog.sql`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | CatalogError |
//! |------------|----------------------|--------------|
//! | Database (unique violation) | `23505` | `Domain(Uniqueness)` |
//! | Database (foreign key violation) | `23503` | `Domain(Conflict)` |
//! | Database (other) | Any other | `Storage` |
//! | PoolClosed, RowNotFound, Other | N/A | `Storage` |
//!
//! Protected deletes (categories with products, linked attribute values,
//! declared attributes) rely on `ON DELETE RESTRICT` and surface as `Conflict`.
//!
//! ## Link writes
//!
//! Every link write runs in one transaction that first locks the owning
//! product row (`SELECT ... FOR UPDATE`). Link writes for the same product are
//! therefore serialized: the snapshot read, the rule check and the insert see
//! no concurrent sibling change. The `(product_id, combination_key)` unique
//! index backs the combination rule at the storage level. Undeclaring an
//! attribute takes the same lock.
//!
//! Sort-order assignment (`next_*_sort_order`) is read-max only; two callers
//! racing on the same group may receive the same position.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Row};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use storefront_catalog::{
    AddProductImage, Attribute, AttributeGroup, AttributeId, AttributeValue, AttributeValueId,
    CatalogError, CatalogResult, Category, CategoryId, CreateAttribute, CreateAttributeValue,
    CreateCategory, CreateProduct, CreateVariant, LinkCandidate, LinkSnapshot, Product,
    ProductAttribute, ProductId, ProductImage, ProductImageId, ProductQuery, ProductVariant,
    ResolvedLink, VariantAttributeValue, VariantId, VariantLinkId, Visibility, check_link,
    check_unlink, combination_key,
};
use storefront_core::{DomainError, Money, Slug};

const SCHEMA: &str = include_str!("../../migrations/0001_catalog.sql");

/// Which link a write targets.
#[derive(Debug, Copy, Clone)]
enum LinkTarget {
    /// A new link on this variant.
    Variant(VariantId),
    /// An existing link, re-pointed.
    Link(VariantLinkId),
}

/// Postgres-backed catalog store.
///
/// `Send + Sync`; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and apply the bundled schema.
    #[instrument(skip(database_url), err)]
    pub async fn connect(database_url: &str, max_connections: u32) -> CatalogResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Apply `migrations/0001_catalog.sql`. Safe to run repeatedly.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> CatalogResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }

    #[instrument(skip(self, cmd), fields(name = %cmd.name), err)]
    pub async fn create_category(&self, cmd: CreateCategory) -> CatalogResult<Category> {
        let category = Category::create(cmd, Utc::now())?;
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, description, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(*category.id.as_uuid())
        .bind(&category.name)
        .bind(category.slug.as_str())
        .bind(&category.description)
        .bind(category.is_active)
        .bind(category.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_category", e))?;
        Ok(category)
    }

    #[instrument(skip(self), fields(category_id = %id), err)]
    pub async fn category(&self, id: CategoryId) -> CatalogResult<Category> {
        let row = sqlx::query(
            r#"
            SELECT id, name, slug, description, is_active, created_at
            FROM categories WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("category", e))?
        .ok_or_else(|| CatalogError::not_found(format!("category {id}")))?;
        decode(decode_category(&row))
    }

    #[instrument(skip(self), err)]
    pub async fn categories(&self, visibility: Visibility) -> CatalogResult<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, slug, description, is_active, created_at
            FROM categories
            WHERE is_active OR NOT $1
            ORDER BY name
            "#,
        )
        .bind(visibility == Visibility::ActiveOnly)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("categories", e))?;
        rows.iter().map(|r| decode(decode_category(r))).collect()
    }

    /// Refused with `Conflict` while products reference the category.
    #[instrument(skip(self), fields(category_id = %id), err)]
    pub async fn delete_category(&self, id: CategoryId) -> CatalogResult<()> {
        if !self.delete_by_id("DELETE FROM categories WHERE id = $1", *id.as_uuid()).await? {
            return Err(CatalogError::not_found(format!("category {id}")));
        }
        Ok(())
    }

    #[instrument(skip(self, cmd), fields(name = %cmd.name), err)]
    pub async fn create_attribute(&self, cmd: CreateAttribute) -> CatalogResult<Attribute> {
        let attribute = Attribute::create(cmd, Utc::now())?;
        sqlx::query(
            r#"
            INSERT INTO attributes (id, name, attr_group, description, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(*attribute.id.as_uuid())
        .bind(&attribute.name)
        .bind(attribute.group.as_str())
        .bind(&attribute.description)
        .bind(attribute.is_active)
        .bind(attribute.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_attribute", e))?;
        Ok(attribute)
    }

    #[instrument(skip(self), fields(attribute_id = %id), err)]
    pub async fn attribute(&self, id: AttributeId) -> CatalogResult<Attribute> {
        let row = sqlx::query(
            r#"
            SELECT id, name, attr_group, description, is_active, created_at
            FROM attributes WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("attribute", e))?
        .ok_or_else(|| CatalogError::not_found(format!("attribute {id}")))?;
        decode(decode_attribute(&row))
    }

    #[instrument(skip(self), err)]
    pub async fn attributes(&self) -> CatalogResult<Vec<Attribute>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, attr_group, description, is_active, created_at
            FROM attributes
            ORDER BY name
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("attributes", e))?;
        rows.iter().map(|r| decode(decode_attribute(r))).collect()
    }

    /// Refused with `Conflict` while declared on a product; its values go with it.
    #[instrument(skip(self), fields(attribute_id = %id), err)]
    pub async fn delete_attribute(&self, id: AttributeId) -> CatalogResult<()> {
        if !self.delete_by_id("DELETE FROM attributes WHERE id = $1", *id.as_uuid()).await? {
            return Err(CatalogError::not_found(format!("attribute {id}")));
        }
        debug!(attribute_id = %id, "attribute deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(attribute_id = %attribute_id), err)]
    pub async fn next_attribute_value_sort_order(
        &self,
        attribute_id: AttributeId,
    ) -> CatalogResult<u32> {
        self.next_sort_order(
            "SELECT MAX(sort_order) FROM attribute_values WHERE attribute_id = $1",
            *attribute_id.as_uuid(),
        )
        .await
    }

    #[instrument(skip(self, cmd), fields(attribute_id = %cmd.attribute_id), err)]
    pub async fn create_attribute_value(
        &self,
        cmd: CreateAttributeValue,
    ) -> CatalogResult<AttributeValue> {
        let value = AttributeValue::create(cmd)?;
        sqlx::query(
            r#"
            INSERT INTO attribute_values (id, attribute_id, value, sort_order)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(*value.id.as_uuid())
        .bind(*value.attribute_id.as_uuid())
        .bind(&value.value)
        .bind(i64::from(value.sort_order))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_attribute_value", e))?;
        Ok(value)
    }

    #[instrument(skip(self), fields(attribute_value_id = %id), err)]
    pub async fn attribute_value(&self, id: AttributeValueId) -> CatalogResult<AttributeValue> {
        let row = sqlx::query(
            "SELECT id, attribute_id, value, sort_order FROM attribute_values WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("attribute_value", e))?
        .ok_or_else(|| CatalogError::not_found(format!("attribute value {id}")))?;
        decode(decode_attribute_value(&row))
    }

    #[instrument(skip(self), fields(attribute_id = %attribute_id), err)]
    pub async fn attribute_values(
        &self,
        attribute_id: AttributeId,
    ) -> CatalogResult<Vec<AttributeValue>> {
        let rows = sqlx::query(
            r#"
            SELECT id, attribute_id, value, sort_order
            FROM attribute_values
            WHERE attribute_id = $1
            ORDER BY sort_order, value
            "#,
        )
        .bind(*attribute_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("attribute_values", e))?;
        rows.iter().map(|r| decode(decode_attribute_value(r))).collect()
    }

    /// Refused with `Conflict` while any variant links the value.
    #[instrument(skip(self), fields(attribute_value_id = %id), err)]
    pub async fn delete_attribute_value(&self, id: AttributeValueId) -> CatalogResult<()> {
        let sql = "DELETE FROM attribute_values WHERE id = $1";
        if !self.delete_by_id(sql, *id.as_uuid()).await? {
            return Err(CatalogError::not_found(format!("attribute value {id}")));
        }
        Ok(())
    }

    #[instrument(skip(self, cmd), fields(category_id = %cmd.category_id, name = %cmd.name), err)]
    pub async fn create_product(&self, cmd: CreateProduct) -> CatalogResult<Product> {
        let category = self.category(cmd.category_id).await?;
        let product = Product::create(cmd, &category, Utc::now())?;
        sqlx::query(
            r#"
            INSERT INTO products (
                id, category_id, name, slug, short_description, full_description,
                base_price, is_featured, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(*product.id.as_uuid())
        .bind(*product.category_id.as_uuid())
        .bind(&product.name)
        .bind(product.slug.as_str())
        .bind(&product.short_description)
        .bind(&product.full_description)
        .bind(money_to_db(product.base_price)?)
        .bind(product.is_featured)
        .bind(product.is_active)
        .bind(product.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;
        debug!(product_id = %product.id, slug = %product.slug, "product created");
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn product(&self, id: ProductId) -> CatalogResult<Product> {
        let row = sqlx::query(
            r#"
            SELECT id, category_id, name, slug, short_description, full_description,
                   base_price, is_featured, is_active, created_at
            FROM products WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("product", e))?
        .ok_or_else(|| CatalogError::not_found(format!("product {id}")))?;
        decode(decode_product(&row))
    }

    /// Products matching `query`, ordered by name.
    #[instrument(skip(self), err)]
    pub async fn products(&self, query: ProductQuery) -> CatalogResult<Vec<Product>> {
        let category: Option<Uuid> = query.category_id.map(|id| *id.as_uuid());
        let rows = sqlx::query(
            r#"
            SELECT id, category_id, name, slug, short_description, full_description,
                   base_price, is_featured, is_active, created_at
            FROM products
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND (is_active OR NOT $2)
              AND (is_featured OR NOT $3)
            ORDER BY name
            "#,
        )
        .bind(category)
        .bind(query.visibility == Visibility::ActiveOnly)
        .bind(query.featured_only)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("products", e))?;
        rows.iter().map(|r| decode(decode_product(r))).collect()
    }

    /// Cascades to variants, links, images and declarations (schema `ON DELETE CASCADE`).
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        if !self.delete_by_id("DELETE FROM products WHERE id = $1", *id.as_uuid()).await? {
            return Err(CatalogError::not_found(format!("product {id}")));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id, attribute_id = %attribute_id), err)]
    pub async fn declare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<ProductAttribute> {
        sqlx::query("INSERT INTO product_attributes (product_id, attribute_id) VALUES ($1, $2)")
            .bind(*product_id.as_uuid())
            .bind(*attribute_id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("declare_attribute", e))?;
        Ok(ProductAttribute {
            product_id,
            attribute_id,
        })
    }

    /// Refused with `Conflict` while a variant of the product holds one of the
    /// attribute's values.
    #[instrument(skip(self), fields(product_id = %product_id, attribute_id = %attribute_id), err)]
    pub async fn undeclare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("undeclare.begin", e))?;
        lock_product(&mut tx, product_id).await?;

        let in_use: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM variant_attribute_values l
                JOIN product_variants v ON v.id = l.variant_id
                JOIN attribute_values av ON av.id = l.attribute_value_id
                WHERE v.product_id = $1 AND av.attribute_id = $2
            )
            "#,
        )
        .bind(*product_id.as_uuid())
        .bind(*attribute_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("undeclare.in_use", e))?;
        if in_use {
            return Err(DomainError::conflict(format!(
                "attribute {attribute_id} is still used by variants of product {product_id}"
            ))
            .into());
        }

        let result = sqlx::query(
            r#"
            DELETE FROM product_attributes
            WHERE product_id = $1 AND attribute_id = $2
            "#,
        )
        .bind(*product_id.as_uuid())
        .bind(*attribute_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("undeclare", e))?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!(
                "attribute {attribute_id} on product {product_id}"
            )));
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("undeclare.commit", e))?;
        debug!(product_id = %product_id, attribute_id = %attribute_id, "attribute undeclared");
        Ok(())
    }

    /// Declared attributes, ordered by name.
    #[instrument(skip(self), fields(product_id = %product_id), err)]
    pub async fn product_attributes(
        &self,
        product_id: ProductId,
    ) -> CatalogResult<Vec<Attribute>> {
        self.product(product_id).await?;
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.name, a.attr_group, a.description, a.is_active, a.created_at
            FROM product_attributes pa
            JOIN attributes a ON a.id = pa.attribute_id
            WHERE pa.product_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(*product_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("product_attributes", e))?;
        rows.iter().map(|r| decode(decode_attribute(r))).collect()
    }

    #[instrument(skip(self), fields(product_id = %product_id), err)]
    pub async fn next_variant_sort_order(&self, product_id: ProductId) -> CatalogResult<u32> {
        self.next_sort_order(
            "SELECT MAX(sort_order) FROM product_variants WHERE product_id = $1",
            *product_id.as_uuid(),
        )
        .await
    }

    #[instrument(skip(self, cmd), fields(product_id = %cmd.product_id, sku = %cmd.sku), err)]
    pub async fn create_variant(&self, cmd: CreateVariant) -> CatalogResult<ProductVariant> {
        let variant = ProductVariant::create(cmd, Utc::now())?;
        let price_override = variant.price_override.map(money_to_db).transpose()?;
        sqlx::query(
            r#"
            INSERT INTO product_variants (
                id, product_id, sku, price_override, stock_quantity, sort_order,
                is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(*variant.id.as_uuid())
        .bind(*variant.product_id.as_uuid())
        .bind(&variant.sku)
        .bind(price_override)
        .bind(i64::from(variant.stock_quantity))
        .bind(i64::from(variant.sort_order))
        .bind(variant.is_active)
        .bind(variant.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_variant", e))?;
        Ok(variant)
    }

    #[instrument(skip(self), fields(variant_id = %id), err)]
    pub async fn variant(&self, id: VariantId) -> CatalogResult<ProductVariant> {
        let row = sqlx::query(
            r#"
            SELECT id, product_id, sku, price_override, stock_quantity, sort_order,
                   is_active, created_at
            FROM product_variants WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("variant", e))?
        .ok_or_else(|| CatalogError::not_found(format!("variant {id}")))?;
        decode(decode_variant(&row))
    }

    #[instrument(skip(self), err)]
    pub async fn variant_by_sku(&self, sku: &str) -> CatalogResult<Option<ProductVariant>> {
        let row = sqlx::query(
            r#"
            SELECT id, product_id, sku, price_override, stock_quantity, sort_order,
                   is_active, created_at
            FROM product_variants WHERE sku = $1
            "#,
        )
        .bind(sku)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("variant_by_sku", e))?;
        row.as_ref().map(|r| decode(decode_variant(r))).transpose()
    }

    /// Variants ordered by `(sort_order, sku)`.
    #[instrument(skip(self), fields(product_id = %product_id), err)]
    pub async fn variants(
        &self,
        product_id: ProductId,
        visibility: Visibility,
    ) -> CatalogResult<Vec<ProductVariant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, sku, price_override, stock_quantity, sort_order,
                   is_active, created_at
            FROM product_variants
            WHERE product_id = $1 AND (is_active OR NOT $2)
            ORDER BY sort_order, sku
            "#,
        )
        .bind(*product_id.as_uuid())
        .bind(visibility == Visibility::ActiveOnly)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("variants", e))?;
        rows.iter().map(|r| decode(decode_variant(r))).collect()
    }

    #[instrument(skip(self), fields(variant_id = %id, quantity), err)]
    pub async fn set_stock_quantity(
        &self,
        id: VariantId,
        quantity: u32,
    ) -> CatalogResult<ProductVariant> {
        let row = sqlx::query(
            r#"
            UPDATE product_variants SET stock_quantity = $2
            WHERE id = $1
            RETURNING id, product_id, sku, price_override, stock_quantity, sort_order,
                      is_active, created_at
            "#,
        )
        .bind(*id.as_uuid())
        .bind(i64::from(quantity))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("set_stock_quantity", e))?
        .ok_or_else(|| CatalogError::not_found(format!("variant {id}")))?;
        decode(decode_variant(&row))
    }

    /// Cascades to the variant's links and variant-scoped images.
    #[instrument(skip(self), fields(variant_id = %id), err)]
    pub async fn delete_variant(&self, id: VariantId) -> CatalogResult<()> {
        let sql = "DELETE FROM product_variants WHERE id = $1";
        if !self.delete_by_id(sql, *id.as_uuid()).await? {
            return Err(CatalogError::not_found(format!("variant {id}")));
        }
        debug!(variant_id = %id, "variant deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(variant_id = %variant_id), err)]
    pub async fn variant_links(
        &self,
        variant_id: VariantId,
    ) -> CatalogResult<Vec<VariantAttributeValue>> {
        let rows = sqlx::query(
            r#"
            SELECT id, variant_id, attribute_value_id
            FROM variant_attribute_values
            WHERE variant_id = $1
            ORDER BY id
            "#,
        )
        .bind(*variant_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("variant_links", e))?;
        rows.iter().map(|r| decode(decode_link(r))).collect()
    }

    #[instrument(
        skip(self),
        fields(variant_id = %variant_id, attribute_value_id = %attribute_value_id),
        err
    )]
    pub async fn link_attribute_value(
        &self,
        variant_id: VariantId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue> {
        self.write_link(LinkTarget::Variant(variant_id), attribute_value_id)
            .await
    }

    #[instrument(
        skip(self),
        fields(link_id = %link_id, attribute_value_id = %attribute_value_id),
        err
    )]
    pub async fn relink_attribute_value(
        &self,
        link_id: VariantLinkId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue> {
        self.write_link(LinkTarget::Link(link_id), attribute_value_id)
            .await
    }

    async fn write_link(
        &self,
        target: LinkTarget,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("write_link.begin", e))?;

        let (variant_id, replacing) = match target {
            LinkTarget::Variant(variant_id) => (variant_id, None),
            LinkTarget::Link(link_id) => (link_owner(&mut tx, link_id).await?, Some(link_id)),
        };
        let candidate = LinkCandidate {
            variant_id,
            attribute_value_id,
            replacing,
        };
        let product_id = lock_product_of_variant(&mut tx, candidate.variant_id).await?;
        let snapshot = load_snapshot(&mut tx, product_id, candidate).await?;

        if let Err(violations) = check_link(&snapshot) {
            warn!(
                variant_id = %candidate.variant_id,
                violations = violations.len(),
                "link write rejected"
            );
            // Dropping `tx` rolls back; nothing was written.
            return Err(CatalogError::InvalidLink(violations));
        }

        let link = VariantAttributeValue {
            id: replacing.unwrap_or_else(VariantLinkId::new),
            variant_id: candidate.variant_id,
            attribute_value_id: candidate.attribute_value_id,
        };
        let link_uuid = *link.id.as_uuid();
        let value_uuid = *link.attribute_value_id.as_uuid();
        match replacing {
            Some(_) => sqlx::query(
                "UPDATE variant_attribute_values SET attribute_value_id = $2 WHERE id = $1",
            )
            .bind(link_uuid)
            .bind(value_uuid),
            None => sqlx::query(
                r#"
                INSERT INTO variant_attribute_values (id, variant_id, attribute_value_id)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(link_uuid)
            .bind(*link.variant_id.as_uuid())
            .bind(value_uuid),
        }
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("write_link", e))?;

        let combination = snapshot.resulting_combination();
        store_combination_key(&mut tx, link.variant_id, &combination).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("write_link.commit", e))?;

        debug!(
            link_id = %link.id,
            combination = %combination_key(&combination),
            "link written"
        );
        Ok(link)
    }

    /// Refused when the remaining combination duplicates a sibling's.
    #[instrument(skip(self), fields(link_id = %link_id), err)]
    pub async fn unlink_attribute_value(&self, link_id: VariantLinkId) -> CatalogResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("unlink.begin", e))?;

        let variant_id = link_owner(&mut tx, link_id).await?;
        let product_id = lock_product_of_variant(&mut tx, variant_id).await?;
        let product_name = product_name(&mut tx, product_id).await?;

        let mut combinations = load_combinations(&mut tx, product_id).await?;
        let mut remaining = combinations.remove(&variant_id).unwrap_or_default();
        let removed: Uuid = sqlx::query_scalar(
            "SELECT attribute_value_id FROM variant_attribute_values WHERE id = $1",
        )
        .bind(*link_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("unlink", e))?;
        remaining.remove(&AttributeValueId::from_uuid(removed));

        let siblings: Vec<_> = combinations.into_iter().collect();
        check_unlink(&product_name, variant_id, &remaining, &siblings).map_err(|violations| {
            warn!(link_id = %link_id, "unlink rejected");
            CatalogError::InvalidLink(violations)
        })?;

        sqlx::query("DELETE FROM variant_attribute_values WHERE id = $1")
            .bind(*link_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("unlink", e))?;
        store_combination_key(&mut tx, variant_id, &remaining).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("unlink.commit", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id), err)]
    pub async fn next_image_sort_order(&self, product_id: ProductId) -> CatalogResult<u32> {
        self.next_sort_order(
            "SELECT MAX(sort_order) FROM product_images WHERE product_id = $1",
            *product_id.as_uuid(),
        )
        .await
    }

    #[instrument(skip(self, cmd), fields(product_id = %cmd.product_id), err)]
    pub async fn add_image(&self, cmd: AddProductImage) -> CatalogResult<ProductImage> {
        let product = self.product(cmd.product_id).await?;
        let variant = match cmd.variant_id {
            Some(id) => Some(self.variant(id).await?),
            None => None,
        };
        let image = ProductImage::create(cmd, &product, variant.as_ref())?;
        sqlx::query(
            r#"
            INSERT INTO product_images (
                id, product_id, variant_id, file_name, alt_text, sort_order, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*image.id.as_uuid())
        .bind(*image.product_id.as_uuid())
        .bind(image.variant_id.map(|id| *id.as_uuid()))
        .bind(&image.file_name)
        .bind(&image.alt_text)
        .bind(i64::from(image.sort_order))
        .bind(image.is_active)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("add_image", e))?;
        debug!(image_id = %image.id, alt_text = %image.alt_text, "image added");
        Ok(image)
    }

    /// Images ordered by sort position.
    #[instrument(skip(self), fields(product_id = %product_id), err)]
    pub async fn images(&self, product_id: ProductId) -> CatalogResult<Vec<ProductImage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, variant_id, file_name, alt_text, sort_order, is_active
            FROM product_images
            WHERE product_id = $1
            ORDER BY sort_order, id
            "#,
        )
        .bind(*product_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("images", e))?;
        rows.iter().map(|r| decode(decode_image(r))).collect()
    }

    async fn next_sort_order(&self, sql: &'static str, group: Uuid) -> CatalogResult<u32> {
        let max: Option<i64> = sqlx::query_scalar(sql)
            .bind(group)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("next_sort_order", e))?;
        match max {
            None => Ok(0),
            Some(max) => u32::try_from(max)
                .ok()
                .and_then(|m| m.checked_add(1))
                .ok_or_else(|| CatalogError::storage(format!("sort order {max} out of range"))),
        }
    }

    /// `false` when no row matched.
    async fn delete_by_id(&self, sql: &'static str, id: Uuid) -> CatalogResult<bool> {
        let result = sqlx::query(sql)
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl super::AsyncCatalogStore for PostgresCatalogStore {
    async fn create_category(&self, cmd: CreateCategory) -> CatalogResult<Category> {
        self.create_category(cmd).await
    }

    async fn category(&self, id: CategoryId) -> CatalogResult<Category> {
        self.category(id).await
    }

    async fn categories(&self, visibility: Visibility) -> CatalogResult<Vec<Category>> {
        self.categories(visibility).await
    }

    async fn delete_category(&self, id: CategoryId) -> CatalogResult<()> {
        self.delete_category(id).await
    }

    async fn create_attribute(&self, cmd: CreateAttribute) -> CatalogResult<Attribute> {
        self.create_attribute(cmd).await
    }

    async fn attribute(&self, id: AttributeId) -> CatalogResult<Attribute> {
        self.attribute(id).await
    }

    async fn attributes(&self) -> CatalogResult<Vec<Attribute>> {
        self.attributes().await
    }

    async fn delete_attribute(&self, id: AttributeId) -> CatalogResult<()> {
        self.delete_attribute(id).await
    }

    async fn next_attribute_value_sort_order(
        &self,
        attribute_id: AttributeId,
    ) -> CatalogResult<u32> {
        self.next_attribute_value_sort_order(attribute_id).await
    }

    async fn create_attribute_value(
        &self,
        cmd: CreateAttributeValue,
    ) -> CatalogResult<AttributeValue> {
        self.create_attribute_value(cmd).await
    }

    async fn attribute_value(&self, id: AttributeValueId) -> CatalogResult<AttributeValue> {
        self.attribute_value(id).await
    }

    async fn attribute_values(
        &self,
        attribute_id: AttributeId,
    ) -> CatalogResult<Vec<AttributeValue>> {
        self.attribute_values(attribute_id).await
    }

    async fn delete_attribute_value(&self, id: AttributeValueId) -> CatalogResult<()> {
        self.delete_attribute_value(id).await
    }

    async fn create_product(&self, cmd: CreateProduct) -> CatalogResult<Product> {
        self.create_product(cmd).await
    }

    async fn product(&self, id: ProductId) -> CatalogResult<Product> {
        self.product(id).await
    }

    async fn products(&self, query: ProductQuery) -> CatalogResult<Vec<Product>> {
        self.products(query).await
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        self.delete_product(id).await
    }

    async fn declare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<ProductAttribute> {
        self.declare_attribute(product_id, attribute_id).await
    }

    async fn undeclare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<()> {
        self.undeclare_attribute(product_id, attribute_id).await
    }

    async fn product_attributes(&self, product_id: ProductId) -> CatalogResult<Vec<Attribute>> {
        self.product_attributes(product_id).await
    }

    async fn next_variant_sort_order(&self, product_id: ProductId) -> CatalogResult<u32> {
        self.next_variant_sort_order(product_id).await
    }

    async fn create_variant(&self, cmd: CreateVariant) -> CatalogResult<ProductVariant> {
        self.create_variant(cmd).await
    }

    async fn variant(&self, id: VariantId) -> CatalogResult<ProductVariant> {
        self.variant(id).await
    }

    async fn variant_by_sku(&self, sku: &str) -> CatalogResult<Option<ProductVariant>> {
        self.variant_by_sku(sku).await
    }

    async fn variants(
        &self,
        product_id: ProductId,
        visibility: Visibility,
    ) -> CatalogResult<Vec<ProductVariant>> {
        self.variants(product_id, visibility).await
    }

    async fn set_stock_quantity(
        &self,
        id: VariantId,
        quantity: u32,
    ) -> CatalogResult<ProductVariant> {
        self.set_stock_quantity(id, quantity).await
    }

    async fn delete_variant(&self, id: VariantId) -> CatalogResult<()> {
        self.delete_variant(id).await
    }

    async fn link_attribute_value(
        &self,
        variant_id: VariantId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue> {
        self.link_attribute_value(variant_id, attribute_value_id).await
    }

    async fn relink_attribute_value(
        &self,
        link_id: VariantLinkId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue> {
        self.relink_attribute_value(link_id, attribute_value_id).await
    }

    async fn unlink_attribute_value(&self, link_id: VariantLinkId) -> CatalogResult<()> {
        self.unlink_attribute_value(link_id).await
    }

    async fn variant_links(
        &self,
        variant_id: VariantId,
    ) -> CatalogResult<Vec<VariantAttributeValue>> {
        self.variant_links(variant_id).await
    }

    async fn next_image_sort_order(&self, product_id: ProductId) -> CatalogResult<u32> {
        self.next_image_sort_order(product_id).await
    }

    async fn add_image(&self, cmd: AddProductImage) -> CatalogResult<ProductImage> {
        self.add_image(cmd).await
    }

    async fn images(&self, product_id: ProductId) -> CatalogResult<Vec<ProductImage>> {
        self.images(product_id).await
    }
}

/// Variant owning `link_id`.
async fn link_owner(conn: &mut PgConnection, link_id: VariantLinkId) -> CatalogResult<VariantId> {
    let variant: Uuid =
        sqlx::query_scalar("SELECT variant_id FROM variant_attribute_values WHERE id = $1")
            .bind(*link_id.as_uuid())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("link_owner", e))?
            .ok_or_else(|| CatalogError::not_found(format!("link {link_id}")))?;
    Ok(VariantId::from_uuid(variant))
}

/// Lock the product row for the rest of the transaction.
async fn lock_product(conn: &mut PgConnection, product_id: ProductId) -> CatalogResult<()> {
    let sql = "SELECT id FROM products WHERE id = $1 FOR UPDATE";
    let locked: Option<Uuid> = sqlx::query_scalar(sql)
        .bind(*product_id.as_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("lock_product", e))?;
    locked
        .map(|_| ())
        .ok_or_else(|| CatalogError::not_found(format!("product {product_id}")))
}

/// Lock the product row owning `variant_id` for the rest of the transaction.
async fn lock_product_of_variant(
    conn: &mut PgConnection,
    variant_id: VariantId,
) -> CatalogResult<ProductId> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        SELECT p.id
        FROM products p
        JOIN product_variants v ON v.product_id = p.id
        WHERE v.id = $1
        FOR UPDATE OF p
        "#,
    )
    .bind(*variant_id.as_uuid())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| map_sqlx_error("lock_product", e))?
    .ok_or_else(|| CatalogError::not_found(format!("variant {variant_id}")))?;
    Ok(ProductId::from_uuid(id))
}

async fn product_name(conn: &mut PgConnection, product_id: ProductId) -> CatalogResult<String> {
    sqlx::query_scalar("SELECT name FROM products WHERE id = $1")
        .bind(*product_id.as_uuid())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("product_name", e))
}

/// Value sets of every variant of `product_id`, empty sets included.
async fn load_combinations(
    conn: &mut PgConnection,
    product_id: ProductId,
) -> CatalogResult<BTreeMap<VariantId, BTreeSet<AttributeValueId>>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id AS variant_id, l.attribute_value_id
        FROM product_variants v
        LEFT JOIN variant_attribute_values l ON l.variant_id = v.id
        WHERE v.product_id = $1
        "#,
    )
    .bind(*product_id.as_uuid())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| map_sqlx_error("load_combinations", e))?;

    let mut out: BTreeMap<VariantId, BTreeSet<AttributeValueId>> = BTreeMap::new();
    for row in rows {
        let variant: Uuid = row
            .try_get("variant_id")
            .map_err(|e| map_sqlx_error("load_combinations", e))?;
        let value: Option<Uuid> = row
            .try_get("attribute_value_id")
            .map_err(|e| map_sqlx_error("load_combinations", e))?;
        let set = out.entry(VariantId::from_uuid(variant)).or_default();
        if let Some(value) = value {
            set.insert(AttributeValueId::from_uuid(value));
        }
    }
    Ok(out)
}

/// Gather a [`LinkSnapshot`] inside the caller's transaction.
async fn load_snapshot(
    conn: &mut PgConnection,
    product_id: ProductId,
    candidate: LinkCandidate,
) -> CatalogResult<LinkSnapshot> {
    let product_name = product_name(&mut *conn, product_id).await?;

    let attribute_row = sqlx::query(
        r#"
        SELECT a.id, a.name
        FROM attribute_values v
        JOIN attributes a ON a.id = v.attribute_id
        WHERE v.id = $1
        "#,
    )
    .bind(*candidate.attribute_value_id.as_uuid())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| map_sqlx_error("load_snapshot.attribute", e))?
    .ok_or_else(|| {
        CatalogError::not_found(format!("attribute value {}", candidate.attribute_value_id))
    })?;
    let attribute_id: Uuid = attribute_row
        .try_get("id")
        .map_err(|e| map_sqlx_error("load_snapshot.attribute", e))?;
    let attribute_name: String = attribute_row
        .try_get("name")
        .map_err(|e| map_sqlx_error("load_snapshot.attribute", e))?;

    let attribute_declared: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM product_attributes WHERE product_id = $1 AND attribute_id = $2
        )
        "#,
    )
    .bind(*product_id.as_uuid())
    .bind(attribute_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| map_sqlx_error("load_snapshot.declared", e))?;

    let link_rows = sqlx::query(
        r#"
        SELECT l.id, l.attribute_value_id, v.attribute_id
        FROM variant_attribute_values l
        JOIN attribute_values v ON v.id = l.attribute_value_id
        WHERE l.variant_id = $1
        ORDER BY l.id
        "#,
    )
    .bind(*candidate.variant_id.as_uuid())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| map_sqlx_error("load_snapshot.links", e))?;
    let variant_links = link_rows
        .iter()
        .map(|row| -> Result<ResolvedLink, sqlx::Error> {
            Ok(ResolvedLink {
                link_id: VariantLinkId::from_uuid(row.try_get("id")?),
                attribute_value_id: AttributeValueId::from_uuid(row.try_get("attribute_value_id")?),
                attribute_id: AttributeId::from_uuid(row.try_get("attribute_id")?),
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()
        .map_err(|e| map_sqlx_error("load_snapshot.links", e))?;

    let sibling_combinations = load_combinations(&mut *conn, product_id)
        .await?
        .into_iter()
        .filter(|(id, _)| *id != candidate.variant_id)
        .collect();

    Ok(LinkSnapshot {
        candidate,
        product_name,
        attribute_id: AttributeId::from_uuid(attribute_id),
        attribute_name,
        attribute_declared,
        variant_links,
        sibling_combinations,
    })
}

async fn store_combination_key(
    conn: &mut PgConnection,
    variant_id: VariantId,
    combination: &BTreeSet<AttributeValueId>,
) -> CatalogResult<()> {
    let key = (!combination.is_empty()).then(|| combination_key(combination));
    sqlx::query("UPDATE product_variants SET combination_key = $2 WHERE id = $1")
        .bind(*variant_id.as_uuid())
        .bind(key)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("store_combination_key", e))?;
    Ok(())
}

fn money_to_db(money: Money) -> CatalogResult<i64> {
    i64::try_from(money.cents()).map_err(|_| {
        DomainError::validation(format!("amount {money} exceeds storage range")).into()
    })
}

fn decode<T>(result: Result<T, sqlx::Error>) -> CatalogResult<T> {
    result.map_err(|e| map_sqlx_error("decode", e))
}

fn column_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

fn get_u32(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    let raw: i64 = row.try_get(column)?;
    u32::try_from(raw).map_err(|e| column_error(column, e))
}

fn get_money(row: &PgRow, column: &str) -> Result<Money, sqlx::Error> {
    let raw: i64 = row.try_get(column)?;
    u64::try_from(raw)
        .map(Money::from_cents)
        .map_err(|e| column_error(column, e))
}

fn get_slug(row: &PgRow, column: &str) -> Result<Slug, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Slug::parse(raw).map_err(|e| column_error(column, e))
}

fn decode_category(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: CategoryId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        slug: get_slug(row, "slug")?,
        description: row.try_get("description")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn decode_attribute(row: &PgRow) -> Result<Attribute, sqlx::Error> {
    let group: String = row.try_get("attr_group")?;
    let group = AttributeGroup::parse(&group).ok_or_else(|| {
        column_error(
            "attr_group",
            DomainError::validation(format!("unknown attribute group '{group}'")),
        )
    })?;
    Ok(Attribute {
        id: AttributeId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        group,
        description: row.try_get("description")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn decode_attribute_value(row: &PgRow) -> Result<AttributeValue, sqlx::Error> {
    Ok(AttributeValue {
        id: AttributeValueId::from_uuid(row.try_get("id")?),
        attribute_id: AttributeId::from_uuid(row.try_get("attribute_id")?),
        value: row.try_get("value")?,
        sort_order: get_u32(row, "sort_order")?,
    })
}

fn decode_product(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id")?),
        category_id: CategoryId::from_uuid(row.try_get("category_id")?),
        name: row.try_get("name")?,
        slug: get_slug(row, "slug")?,
        short_description: row.try_get("short_description")?,
        full_description: row.try_get("full_description")?,
        base_price: get_money(row, "base_price")?,
        is_featured: row.try_get("is_featured")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn decode_variant(row: &PgRow) -> Result<ProductVariant, sqlx::Error> {
    let price_override: Option<i64> = row.try_get("price_override")?;
    let price_override = price_override
        .map(|raw| u64::try_from(raw).map(Money::from_cents))
        .transpose()
        .map_err(|e| column_error("price_override", e))?;
    Ok(ProductVariant {
        id: VariantId::from_uuid(row.try_get("id")?),
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        sku: row.try_get("sku")?,
        price_override,
        stock_quantity: get_u32(row, "stock_quantity")?,
        sort_order: get_u32(row, "sort_order")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn decode_link(row: &PgRow) -> Result<VariantAttributeValue, sqlx::Error> {
    Ok(VariantAttributeValue {
        id: VariantLinkId::from_uuid(row.try_get("id")?),
        variant_id: VariantId::from_uuid(row.try_get("variant_id")?),
        attribute_value_id: AttributeValueId::from_uuid(row.try_get("attribute_value_id")?),
    })
}

fn decode_image(row: &PgRow) -> Result<ProductImage, sqlx::Error> {
    let variant_id: Option<Uuid> = row.try_get("variant_id")?;
    Ok(ProductImage {
        id: ProductImageId::from_uuid(row.try_get("id")?),
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        variant_id: variant_id.map(VariantId::from_uuid),
        file_name: row.try_get("file_name")?,
        alt_text: row.try_get("alt_text")?,
        sort_order: get_u32(row, "sort_order")?,
        is_active: row.try_get("is_active")?,
    })
}

/// Domain name of a schema unique constraint.
fn constraint_label(name: Option<&str>) -> &'static str {
    match name {
        Some("categories_name_ci") => "category.name",
        Some("categories_slug_key") => "category.slug",
        Some("attributes_name_ci") => "attribute.name",
        Some("attribute_values_value_ci") => "attribute_value.value",
        Some("products_name_ci") => "product.name",
        Some("products_slug_key") => "product.slug",
        Some("product_attributes_pkey") => "product_attribute.pair",
        Some("product_variants_sku_key") => "product_variant.sku",
        Some("product_variants_combination") => "product_variant.combination",
        Some("variant_attribute_values_variant_id_attribute_value_id_key") => {
            "variant_attribute_value.pair"
        }
        _ => "unknown",
    }
}

/// Map sqlx errors to `CatalogError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> CatalogError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => {
                    let constraint = constraint_label(db_err.constraint());
                    let value = db_err.message().to_string();
                    DomainError::uniqueness(constraint, value).into()
                }
                Some("23503") => DomainError::conflict(msg).into(),
                _ => CatalogError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            CatalogError::storage(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::RowNotFound => {
            CatalogError::storage(format!("unexpected row not found in {operation}"))
        }
        _ => CatalogError::storage(format!("sqlx error in {operation}: {err}")),
    }
}
