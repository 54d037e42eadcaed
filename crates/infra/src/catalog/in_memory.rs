//! In-memory catalog store for tests/dev.
//!
//! The whole catalog sits behind one `RwLock`. Every write, including the
//! validate-then-persist sequence of a link write, runs under a single write
//! guard, so no other writer can interleave between the check and the insert.

use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use storefront_catalog::{
    AddProductImage, Attribute, AttributeId, AttributeValue, AttributeValueId, CatalogError,
    CatalogReader, CatalogResult, CatalogStore, Category, CategoryId, CreateAttribute,
    CreateAttributeValue, CreateCategory, CreateProduct, CreateVariant, LinkCandidate, Product,
    ProductAttribute, ProductId, ProductImage, ProductImageId, ProductQuery, ProductVariant,
    VariantAttributeValue, VariantId, VariantLinkId, Visibility, check_unlink, combination_key,
    validate_link,
};
use storefront_core::{DomainError, next_sort_order};

#[derive(Debug, Default)]
struct CatalogState {
    categories: HashMap<CategoryId, Category>,
    attributes: HashMap<AttributeId, Attribute>,
    values: HashMap<AttributeValueId, AttributeValue>,
    products: HashMap<ProductId, Product>,
    declarations: BTreeSet<(ProductId, AttributeId)>,
    variants: HashMap<VariantId, ProductVariant>,
    links: HashMap<VariantLinkId, VariantAttributeValue>,
    images: HashMap<ProductImageId, ProductImage>,
    /// Unique index: product -> normalized combination key -> holder.
    combinations: HashMap<ProductId, HashMap<String, VariantId>>,
}

impl CatalogState {
    fn require_category(&self, id: CategoryId) -> CatalogResult<&Category> {
        self.categories
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(format!("category {id}")))
    }

    fn require_attribute(&self, id: AttributeId) -> CatalogResult<&Attribute> {
        self.attributes
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(format!("attribute {id}")))
    }

    fn require_value(&self, id: AttributeValueId) -> CatalogResult<&AttributeValue> {
        self.values
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(format!("attribute value {id}")))
    }

    fn require_product(&self, id: ProductId) -> CatalogResult<&Product> {
        self.products
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(format!("product {id}")))
    }

    fn require_variant(&self, id: VariantId) -> CatalogResult<&ProductVariant> {
        self.variants
            .get(&id)
            .ok_or_else(|| CatalogError::not_found(format!("variant {id}")))
    }

    fn combination_of(&self, variant_id: VariantId) -> BTreeSet<AttributeValueId> {
        self.links
            .values()
            .filter(|l| l.variant_id == variant_id)
            .map(|l| l.attribute_value_id)
            .collect()
    }

    fn sibling_combinations(
        &self,
        product_id: ProductId,
        variant_id: VariantId,
    ) -> Vec<(VariantId, BTreeSet<AttributeValueId>)> {
        self.variants
            .values()
            .filter(|v| v.product_id == product_id && v.id != variant_id)
            .map(|v| (v.id, self.combination_of(v.id)))
            .collect()
    }

    /// Storage-level unique key on `(product, combination)`.
    fn ensure_combination_free(
        &self,
        product_id: ProductId,
        variant_id: VariantId,
        combination: &BTreeSet<AttributeValueId>,
    ) -> CatalogResult<()> {
        if combination.is_empty() {
            return Ok(());
        }
        let key = combination_key(combination);
        match self.combinations.get(&product_id).and_then(|index| index.get(&key)) {
            Some(holder) if *holder != variant_id => {
                Err(DomainError::uniqueness("product_variant.combination", key).into())
            }
            _ => Ok(()),
        }
    }

    fn index_combination(
        &mut self,
        product_id: ProductId,
        variant_id: VariantId,
        combination: &BTreeSet<AttributeValueId>,
    ) {
        let index = self.combinations.entry(product_id).or_default();
        index.retain(|_, holder| *holder != variant_id);
        if !combination.is_empty() {
            index.insert(combination_key(combination), variant_id);
        }
    }

    fn remove_variant(&mut self, variant_id: VariantId) -> Option<ProductVariant> {
        let variant = self.variants.remove(&variant_id)?;
        self.links.retain(|_, l| l.variant_id != variant_id);
        self.images.retain(|_, i| i.variant_id != Some(variant_id));
        if let Some(index) = self.combinations.get_mut(&variant.product_id) {
            index.retain(|_, holder| *holder != variant_id);
        }
        Some(variant)
    }

    /// Validate and persist one link write. Callers hold the write guard.
    fn apply_link(&mut self, candidate: LinkCandidate) -> CatalogResult<VariantAttributeValue> {
        let snapshot = validate_link(&*self, candidate).inspect_err(|err| {
            warn!(variant_id = %candidate.variant_id, error = %err, "link write rejected");
        })?;

        let product_id = self.require_variant(candidate.variant_id)?.product_id;
        let combination = snapshot.resulting_combination();
        self.ensure_combination_free(product_id, candidate.variant_id, &combination)?;

        let link = VariantAttributeValue {
            id: candidate.replacing.unwrap_or_else(VariantLinkId::new),
            variant_id: candidate.variant_id,
            attribute_value_id: candidate.attribute_value_id,
        };
        self.links.insert(link.id, link);
        self.index_combination(product_id, link.variant_id, &combination);

        debug!(
            link_id = %link.id,
            variant_id = %link.variant_id,
            attribute_value_id = %link.attribute_value_id,
            combination = %combination_key(&combination),
            "link written"
        );
        Ok(link)
    }

    fn image_sort_orders(&self, product_id: ProductId) -> impl Iterator<Item = u32> + '_ {
        self.images
            .values()
            .filter(move |i| i.product_id == product_id)
            .map(|i| i.sort_order)
    }
}

impl CatalogReader for CatalogState {
    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.get(&id).cloned()
    }

    fn attribute(&self, id: AttributeId) -> Option<Attribute> {
        self.attributes.get(&id).cloned()
    }

    fn attribute_value(&self, id: AttributeValueId) -> Option<AttributeValue> {
        self.values.get(&id).cloned()
    }

    fn variant(&self, id: VariantId) -> Option<ProductVariant> {
        self.variants.get(&id).cloned()
    }

    fn is_attribute_declared(&self, product_id: ProductId, attribute_id: AttributeId) -> bool {
        self.declarations.contains(&(product_id, attribute_id))
    }

    fn links_of_variant(&self, variant_id: VariantId) -> Vec<VariantAttributeValue> {
        let mut links: Vec<_> = self
            .links
            .values()
            .filter(|l| l.variant_id == variant_id)
            .copied()
            .collect();
        links.sort_by_key(|l| l.id);
        links
    }

    fn variants_of_product(&self, product_id: ProductId) -> Vec<ProductVariant> {
        let mut variants: Vec<_> = self
            .variants
            .values()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect();
        variants.sort_by(|a, b| a.listing_key().cmp(&b.listing_key()));
        variants
    }
}

/// In-memory [`CatalogStore`].
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<CatalogState>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CatalogResult<RwLockReadGuard<'_, CatalogState>> {
        self.inner
            .read()
            .map_err(|_| CatalogError::storage("catalog lock poisoned"))
    }

    fn write(&self) -> CatalogResult<RwLockWriteGuard<'_, CatalogState>> {
        self.inner
            .write()
            .map_err(|_| CatalogError::storage("catalog lock poisoned"))
    }

    /// Run `f` against a consistent read view, e.g. to call
    /// [`validate_link`] ahead of a write.
    pub fn with_reader<T>(&self, f: impl FnOnce(&dyn CatalogReader) -> T) -> CatalogResult<T> {
        let state = self.read()?;
        Ok(f(&*state))
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn create_category(&self, cmd: CreateCategory) -> CatalogResult<Category> {
        let category = Category::create(cmd, Utc::now())?;
        let mut state = self.write()?;
        let key = category.name_key();
        for existing in state.categories.values() {
            if existing.name_key() == key {
                return Err(DomainError::uniqueness("category.name", category.name).into());
            }
            if existing.slug == category.slug {
                let slug = category.slug.to_string();
                return Err(DomainError::uniqueness("category.slug", slug).into());
            }
        }
        debug!(category_id = %category.id, name = %category.name, "category created");
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    fn category(&self, id: CategoryId) -> CatalogResult<Category> {
        self.read()?.require_category(id).cloned()
    }

    fn categories(&self, visibility: Visibility) -> CatalogResult<Vec<Category>> {
        let state = self.read()?;
        let mut out: Vec<_> = state
            .categories
            .values()
            .filter(|c| visibility.admits(c.is_active))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn delete_category(&self, id: CategoryId) -> CatalogResult<()> {
        let mut state = self.write()?;
        state.require_category(id)?;
        if state.products.values().any(|p| p.category_id == id) {
            return Err(DomainError::conflict(format!("category {id} still has products")).into());
        }
        state.categories.remove(&id);
        debug!(category_id = %id, "category deleted");
        Ok(())
    }

    fn create_attribute(&self, cmd: CreateAttribute) -> CatalogResult<Attribute> {
        let attribute = Attribute::create(cmd, Utc::now())?;
        let mut state = self.write()?;
        let key = attribute.name_key();
        if state.attributes.values().any(|a| a.name_key() == key) {
            return Err(DomainError::uniqueness("attribute.name", attribute.name).into());
        }
        debug!(attribute_id = %attribute.id, name = %attribute.name, "attribute created");
        state.attributes.insert(attribute.id, attribute.clone());
        Ok(attribute)
    }

    fn attribute(&self, id: AttributeId) -> CatalogResult<Attribute> {
        self.read()?.require_attribute(id).cloned()
    }

    fn attributes(&self) -> CatalogResult<Vec<Attribute>> {
        let state = self.read()?;
        let mut out: Vec<_> = state.attributes.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn delete_attribute(&self, id: AttributeId) -> CatalogResult<()> {
        let mut state = self.write()?;
        state.require_attribute(id)?;
        if state.declarations.iter().any(|(_, a)| *a == id) {
            let msg = format!("attribute {id} is declared on products");
            return Err(DomainError::conflict(msg).into());
        }
        state.values.retain(|_, v| v.attribute_id != id);
        state.attributes.remove(&id);
        debug!(attribute_id = %id, "attribute deleted");
        Ok(())
    }

    fn next_attribute_value_sort_order(&self, attribute_id: AttributeId) -> CatalogResult<u32> {
        let state = self.read()?;
        state.require_attribute(attribute_id)?;
        Ok(next_sort_order(
            state
                .values
                .values()
                .filter(|v| v.attribute_id == attribute_id)
                .map(|v| v.sort_order),
        ))
    }

    fn create_attribute_value(&self, cmd: CreateAttributeValue) -> CatalogResult<AttributeValue> {
        let value = AttributeValue::create(cmd)?;
        let mut state = self.write()?;
        state.require_attribute(value.attribute_id)?;
        let key = value.value_key();
        if state.values.values().any(|v| v.value_key() == key) {
            return Err(DomainError::uniqueness("attribute_value.value", value.value).into());
        }
        debug!(
            attribute_value_id = %value.id,
            attribute_id = %value.attribute_id,
            sort_order = value.sort_order,
            "attribute value created"
        );
        state.values.insert(value.id, value.clone());
        Ok(value)
    }

    fn attribute_value(&self, id: AttributeValueId) -> CatalogResult<AttributeValue> {
        self.read()?.require_value(id).cloned()
    }

    fn attribute_values(&self, attribute_id: AttributeId) -> CatalogResult<Vec<AttributeValue>> {
        let state = self.read()?;
        let mut out: Vec<_> = state
            .values
            .values()
            .filter(|v| v.attribute_id == attribute_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| (a.sort_order, &a.value).cmp(&(b.sort_order, &b.value)));
        Ok(out)
    }

    fn delete_attribute_value(&self, id: AttributeValueId) -> CatalogResult<()> {
        let mut state = self.write()?;
        state.require_value(id)?;
        if state.links.values().any(|l| l.attribute_value_id == id) {
            let msg = format!("attribute value {id} is used by variants");
            return Err(DomainError::conflict(msg).into());
        }
        state.values.remove(&id);
        debug!(attribute_value_id = %id, "attribute value deleted");
        Ok(())
    }

    fn create_product(&self, cmd: CreateProduct) -> CatalogResult<Product> {
        let mut state = self.write()?;
        let category = state.require_category(cmd.category_id)?;
        let product = Product::create(cmd, category, Utc::now())?;
        let key = product.name_key();
        for existing in state.products.values() {
            if existing.name_key() == key {
                return Err(DomainError::uniqueness("product.name", product.name).into());
            }
            if existing.slug == product.slug {
                let slug = product.slug.to_string();
                return Err(DomainError::uniqueness("product.slug", slug).into());
            }
        }
        debug!(product_id = %product.id, category_id = %product.category_id, "product created");
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn product(&self, id: ProductId) -> CatalogResult<Product> {
        self.read()?.require_product(id).cloned()
    }

    fn products(&self, query: ProductQuery) -> CatalogResult<Vec<Product>> {
        let state = self.read()?;
        let mut out: Vec<_> = state
            .products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        let mut state = self.write()?;
        state.require_product(id)?;
        let variant_ids: Vec<_> = state
            .variants
            .values()
            .filter(|v| v.product_id == id)
            .map(|v| v.id)
            .collect();
        for variant_id in &variant_ids {
            state.remove_variant(*variant_id);
        }
        state.images.retain(|_, i| i.product_id != id);
        state.declarations.retain(|(p, _)| *p != id);
        state.combinations.remove(&id);
        state.products.remove(&id);
        debug!(product_id = %id, variants = variant_ids.len(), "product deleted");
        Ok(())
    }

    fn declare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<ProductAttribute> {
        let mut state = self.write()?;
        state.require_product(product_id)?;
        state.require_attribute(attribute_id)?;
        if !state.declarations.insert((product_id, attribute_id)) {
            return Err(DomainError::uniqueness(
                "product_attribute.pair",
                format!("{product_id}/{attribute_id}"),
            )
            .into());
        }
        debug!(product_id = %product_id, attribute_id = %attribute_id, "attribute declared");
        Ok(ProductAttribute {
            product_id,
            attribute_id,
        })
    }

    fn undeclare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<()> {
        let mut state = self.write()?;
        if !state.declarations.contains(&(product_id, attribute_id)) {
            return Err(CatalogError::not_found(format!(
                "attribute {attribute_id} on product {product_id}"
            )));
        }
        let in_use = state.links.values().any(|l| {
            state
                .variants
                .get(&l.variant_id)
                .is_some_and(|v| v.product_id == product_id)
                && state
                    .values
                    .get(&l.attribute_value_id)
                    .is_some_and(|v| v.attribute_id == attribute_id)
        });
        if in_use {
            return Err(DomainError::conflict(format!(
                "attribute {attribute_id} is still used by variants of product {product_id}"
            ))
            .into());
        }
        state.declarations.remove(&(product_id, attribute_id));
        debug!(product_id = %product_id, attribute_id = %attribute_id, "attribute undeclared");
        Ok(())
    }

    fn product_attributes(&self, product_id: ProductId) -> CatalogResult<Vec<Attribute>> {
        let state = self.read()?;
        state.require_product(product_id)?;
        let mut out: Vec<_> = state
            .declarations
            .iter()
            .filter(|(p, _)| *p == product_id)
            .filter_map(|(_, a)| state.attributes.get(a).cloned())
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn next_variant_sort_order(&self, product_id: ProductId) -> CatalogResult<u32> {
        let state = self.read()?;
        state.require_product(product_id)?;
        Ok(next_sort_order(
            state
                .variants
                .values()
                .filter(|v| v.product_id == product_id)
                .map(|v| v.sort_order),
        ))
    }

    fn create_variant(&self, cmd: CreateVariant) -> CatalogResult<ProductVariant> {
        let variant = ProductVariant::create(cmd, Utc::now())?;
        let mut state = self.write()?;
        state.require_product(variant.product_id)?;
        if state.variants.values().any(|v| v.sku == variant.sku) {
            return Err(DomainError::uniqueness("product_variant.sku", variant.sku).into());
        }
        debug!(
            variant_id = %variant.id,
            sku = %variant.sku,
            sort_order = variant.sort_order,
            "variant created"
        );
        state.variants.insert(variant.id, variant.clone());
        Ok(variant)
    }

    fn variant(&self, id: VariantId) -> CatalogResult<ProductVariant> {
        self.read()?.require_variant(id).cloned()
    }

    fn variant_by_sku(&self, sku: &str) -> CatalogResult<Option<ProductVariant>> {
        let state = self.read()?;
        Ok(state.variants.values().find(|v| v.sku == sku).cloned())
    }

    fn variants(
        &self,
        product_id: ProductId,
        visibility: Visibility,
    ) -> CatalogResult<Vec<ProductVariant>> {
        let state = self.read()?;
        Ok(state
            .variants_of_product(product_id)
            .into_iter()
            .filter(|v| visibility.admits(v.is_active))
            .collect())
    }

    fn set_stock_quantity(&self, id: VariantId, quantity: u32) -> CatalogResult<ProductVariant> {
        let mut state = self.write()?;
        let variant = state
            .variants
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found(format!("variant {id}")))?;
        variant.stock_quantity = quantity;
        Ok(variant.clone())
    }

    fn delete_variant(&self, id: VariantId) -> CatalogResult<()> {
        let mut state = self.write()?;
        state
            .remove_variant(id)
            .ok_or_else(|| CatalogError::not_found(format!("variant {id}")))?;
        debug!(variant_id = %id, "variant deleted");
        Ok(())
    }

    fn link_attribute_value(
        &self,
        variant_id: VariantId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue> {
        self.write()?
            .apply_link(LinkCandidate::new(variant_id, attribute_value_id))
    }

    fn relink_attribute_value(
        &self,
        link_id: VariantLinkId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue> {
        let mut state = self.write()?;
        let link = state
            .links
            .get(&link_id)
            .copied()
            .ok_or_else(|| CatalogError::not_found(format!("link {link_id}")))?;
        state.apply_link(LinkCandidate::replacing(&link, attribute_value_id))
    }

    fn unlink_attribute_value(&self, link_id: VariantLinkId) -> CatalogResult<()> {
        let mut state = self.write()?;
        let link = state
            .links
            .get(&link_id)
            .copied()
            .ok_or_else(|| CatalogError::not_found(format!("link {link_id}")))?;
        let variant = state.require_variant(link.variant_id)?;
        let product = state.require_product(variant.product_id)?;

        let mut remaining = state.combination_of(variant.id);
        remaining.remove(&link.attribute_value_id);
        let siblings = state.sibling_combinations(product.id, variant.id);
        check_unlink(&product.name, variant.id, &remaining, &siblings).map_err(|violations| {
            warn!(link_id = %link_id, "unlink rejected");
            CatalogError::InvalidLink(violations)
        })?;

        let product_id = product.id;
        state.links.remove(&link_id);
        state.index_combination(product_id, link.variant_id, &remaining);
        debug!(link_id = %link_id, variant_id = %link.variant_id, "link removed");
        Ok(())
    }

    fn variant_links(&self, variant_id: VariantId) -> CatalogResult<Vec<VariantAttributeValue>> {
        let state = self.read()?;
        state.require_variant(variant_id)?;
        Ok(state.links_of_variant(variant_id))
    }

    fn next_image_sort_order(&self, product_id: ProductId) -> CatalogResult<u32> {
        let state = self.read()?;
        state.require_product(product_id)?;
        Ok(next_sort_order(state.image_sort_orders(product_id)))
    }

    fn add_image(&self, cmd: AddProductImage) -> CatalogResult<ProductImage> {
        let mut state = self.write()?;
        let product = state.require_product(cmd.product_id)?;
        let variant = cmd.variant_id.map(|id| state.require_variant(id)).transpose()?;
        let image = ProductImage::create(cmd, product, variant)?;
        debug!(image_id = %image.id, product_id = %image.product_id, "image added");
        state.images.insert(image.id, image.clone());
        Ok(image)
    }

    fn images(&self, product_id: ProductId) -> CatalogResult<Vec<ProductImage>> {
        let state = self.read()?;
        let mut out: Vec<_> = state
            .images
            .values()
            .filter(|i| i.product_id == product_id)
            .cloned()
            .collect();
        out.sort_by_key(|i| i.sort_order);
        Ok(out)
    }
}

#[async_trait]
impl super::AsyncCatalogStore for InMemoryCatalogStore {
    async fn create_category(&self, cmd: CreateCategory) -> CatalogResult<Category> {
        CatalogStore::create_category(self, cmd)
    }

    async fn category(&self, id: CategoryId) -> CatalogResult<Category> {
        CatalogStore::category(self, id)
    }

    async fn categories(&self, visibility: Visibility) -> CatalogResult<Vec<Category>> {
        CatalogStore::categories(self, visibility)
    }

    async fn delete_category(&self, id: CategoryId) -> CatalogResult<()> {
        CatalogStore::delete_category(self, id)
    }

    async fn create_attribute(&self, cmd: CreateAttribute) -> CatalogResult<Attribute> {
        CatalogStore::create_attribute(self, cmd)
    }

    async fn attribute(&self, id: AttributeId) -> CatalogResult<Attribute> {
        CatalogStore::attribute(self, id)
    }

    async fn attributes(&self) -> CatalogResult<Vec<Attribute>> {
        CatalogStore::attributes(self)
    }

    async fn delete_attribute(&self, id: AttributeId) -> CatalogResult<()> {
        CatalogStore::delete_attribute(self, id)
    }

    async fn next_attribute_value_sort_order(
        &self,
        attribute_id: AttributeId,
    ) -> CatalogResult<u32> {
        CatalogStore::next_attribute_value_sort_order(self, attribute_id)
    }

    async fn create_attribute_value(
        &self,
        cmd: CreateAttributeValue,
    ) -> CatalogResult<AttributeValue> {
        CatalogStore::create_attribute_value(self, cmd)
    }

    async fn attribute_value(&self, id: AttributeValueId) -> CatalogResult<AttributeValue> {
        CatalogStore::attribute_value(self, id)
    }

    async fn attribute_values(
        &self,
        attribute_id: AttributeId,
    ) -> CatalogResult<Vec<AttributeValue>> {
        CatalogStore::attribute_values(self, attribute_id)
    }

    async fn delete_attribute_value(&self, id: AttributeValueId) -> CatalogResult<()> {
        CatalogStore::delete_attribute_value(self, id)
    }

    async fn create_product(&self, cmd: CreateProduct) -> CatalogResult<Product> {
        CatalogStore::create_product(self, cmd)
    }

    async fn product(&self, id: ProductId) -> CatalogResult<Product> {
        CatalogStore::product(self, id)
    }

    async fn products(&self, query: ProductQuery) -> CatalogResult<Vec<Product>> {
        CatalogStore::products(self, query)
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        CatalogStore::delete_product(self, id)
    }

    async fn declare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<ProductAttribute> {
        CatalogStore::declare_attribute(self, product_id, attribute_id)
    }

    async fn undeclare_attribute(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> CatalogResult<()> {
        CatalogStore::undeclare_attribute(self, product_id, attribute_id)
    }

    async fn product_attributes(&self, product_id: ProductId) -> CatalogResult<Vec<Attribute>> {
        CatalogStore::product_attributes(self, product_id)
    }

    async fn next_variant_sort_order(&self, product_id: ProductId) -> CatalogResult<u32> {
        CatalogStore::next_variant_sort_order(self, product_id)
    }

    async fn create_variant(&self, cmd: CreateVariant) -> CatalogResult<ProductVariant> {
        CatalogStore::create_variant(self, cmd)
    }

    async fn variant(&self, id: VariantId) -> CatalogResult<ProductVariant> {
        CatalogStore::variant(self, id)
    }

    async fn variant_by_sku(&self, sku: &str) -> CatalogResult<Option<ProductVariant>> {
        CatalogStore::variant_by_sku(self, sku)
    }

    async fn variants(
        &self,
        product_id: ProductId,
        visibility: Visibility,
    ) -> CatalogResult<Vec<ProductVariant>> {
        CatalogStore::variants(self, product_id, visibility)
    }

    async fn set_stock_quantity(
        &self,
        id: VariantId,
        quantity: u32,
    ) -> CatalogResult<ProductVariant> {
        CatalogStore::set_stock_quantity(self, id, quantity)
    }

    async fn delete_variant(&self, id: VariantId) -> CatalogResult<()> {
        CatalogStore::delete_variant(self, id)
    }

    async fn link_attribute_value(
        &self,
        variant_id: VariantId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue> {
        CatalogStore::link_attribute_value(self, variant_id, attribute_value_id)
    }

    async fn relink_attribute_value(
        &self,
        link_id: VariantLinkId,
        attribute_value_id: AttributeValueId,
    ) -> CatalogResult<VariantAttributeValue> {
        CatalogStore::relink_attribute_value(self, link_id, attribute_value_id)
    }

    async fn unlink_attribute_value(&self, link_id: VariantLinkId) -> CatalogResult<()> {
        CatalogStore::unlink_attribute_value(self, link_id)
    }

    async fn variant_links(
        &self,
        variant_id: VariantId,
    ) -> CatalogResult<Vec<VariantAttributeValue>> {
        CatalogStore::variant_links(self, variant_id)
    }

    async fn next_image_sort_order(&self, product_id: ProductId) -> CatalogResult<u32> {
        CatalogStore::next_image_sort_order(self, product_id)
    }

    async fn add_image(&self, cmd: AddProductImage) -> CatalogResult<ProductImage> {
        CatalogStore::add_image(self, cmd)
    }

    async fn images(&self, product_id: ProductId) -> CatalogResult<Vec<ProductImage>> {
        CatalogStore::images(self, product_id)
    }
}
