//! Product gallery images.
//!
//! File storage is not handled here; an image record only names the stored
//! file.

use serde::{Deserialize, Serialize};

use storefront_core::error::require_non_blank;
use storefront_core::{DomainError, DomainResult, Entity, define_id};

use crate::product::{Product, ProductId};
use crate::variant::{ProductVariant, VariantId};

define_id! {
    /// Product image identifier.
    pub struct ProductImageId;
}

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Command: AddProductImage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProductImage {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub file_name: String,
    /// Blank means "use [`ProductImage::default_alt_text`]".
    pub alt_text: String,
    pub sort_order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub file_name: String,
    pub alt_text: String,
    pub sort_order: u32,
    pub is_active: bool,
}

impl ProductImage {
    /// Build an image for `product`, optionally scoped to one of its variants.
    pub fn create(
        cmd: AddProductImage,
        product: &Product,
        variant: Option<&ProductVariant>,
    ) -> DomainResult<Self> {
        if cmd.product_id != product.id {
            return Err(DomainError::invariant("product_id mismatch"));
        }
        if cmd.variant_id != variant.map(|v| v.id) {
            return Err(DomainError::invariant("variant_id mismatch"));
        }
        if let Some(v) = variant {
            if v.product_id != product.id {
                return Err(DomainError::validation(format!(
                    "the selected variant '{}' does not belong to the product '{}'",
                    v.sku, product.name
                )));
            }
        }
        require_non_blank("image file name", &cmd.file_name)?;
        let extension = cmd
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DomainError::validation(format!(
                "image extension '{extension}' is not allowed (allowed: jpg, jpeg, png)"
            )));
        }

        let alt_text = if cmd.alt_text.trim().is_empty() {
            Self::default_alt_text(product, variant)
        } else {
            cmd.alt_text
        };

        Ok(Self {
            id: ProductImageId::new(),
            product_id: product.id,
            variant_id: cmd.variant_id,
            file_name: cmd.file_name,
            alt_text,
            sort_order: cmd.sort_order,
            is_active: true,
        })
    }

    pub fn default_alt_text(product: &Product, variant: Option<&ProductVariant>) -> String {
        match variant {
            Some(v) => format!("Image of {} (SKU: {})", product.slug, v.sku),
            None => format!("Image of {}", product.slug),
        }
    }
}

impl Entity for ProductImage {
    type Id = ProductImageId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
