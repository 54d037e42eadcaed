//! Cart pricing against the catalog.

use std::collections::HashMap;

use storefront_cart::{Cart, CartTotals};
use storefront_catalog::{CatalogResult, effective_price};
use storefront_core::DomainError;

use crate::catalog::AsyncCatalogStore;

/// Price every line of `cart` at its variant's current effective price.
pub async fn price_cart<S>(catalog: &S, cart: &Cart) -> CatalogResult<CartTotals>
where
    S: AsyncCatalogStore + ?Sized,
{
    let mut prices = HashMap::with_capacity(cart.items().len());
    for item in cart.items() {
        let variant = catalog.variant(item.variant_id).await?;
        let product = catalog.product(variant.product_id).await?;
        prices.insert(variant.id, effective_price(&variant, &product));
    }
    let totals = cart.totals(|variant_id| {
        prices
            .get(&variant_id)
            .copied()
            .ok_or_else(|| DomainError::not_found(format!("price of variant {variant_id}")))
    })?;
    Ok(totals)
}
