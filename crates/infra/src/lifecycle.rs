//! Deletes that span the catalog and cart stores.
//!
//! The catalog store cascades within itself (links, images, declarations).
//! Cart lines live in a separate store, so removing a variant also has to
//! drop the lines holding it, or pricing those carts fails afterwards.

use tracing::info;

use storefront_cart::CartStore;
use storefront_catalog::{CatalogResult, ProductId, VariantId, Visibility};

use crate::catalog::AsyncCatalogStore;

/// Delete a variant and every cart line holding it.
///
/// Returns the number of cart lines removed. The catalog delete runs first;
/// when it fails no cart is touched.
pub async fn delete_variant<S, C>(catalog: &S, carts: &C, id: VariantId) -> CatalogResult<usize>
where
    S: AsyncCatalogStore + ?Sized,
    C: CartStore + ?Sized,
{
    catalog.delete_variant(id).await?;
    let lines = carts.remove_variant_lines(id)?;
    info!(variant_id = %id, cart_lines = lines, "variant deleted");
    Ok(lines)
}

/// Delete a product with its variants, and every cart line holding one of them.
pub async fn delete_product<S, C>(catalog: &S, carts: &C, id: ProductId) -> CatalogResult<usize>
where
    S: AsyncCatalogStore + ?Sized,
    C: CartStore + ?Sized,
{
    let variants = catalog.variants(id, Visibility::All).await?;
    catalog.delete_product(id).await?;
    let mut lines = 0;
    for variant in &variants {
        lines += carts.remove_variant_lines(variant.id)?;
    }
    info!(product_id = %id, variants = variants.len(), cart_lines = lines, "product deleted");
    Ok(lines)
}
