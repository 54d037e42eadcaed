//! Variant ↔ attribute value link validation.
//!
//! Every write to a [`VariantAttributeValue`] passes three rules before it is
//! persisted:
//!
//! 1. a variant holds at most one value per attribute,
//! 2. the value's attribute is declared on the variant's product,
//! 3. no two variants of a product hold the same (non-empty) value set.
//!
//! The rules are evaluated by [`check_link`] over a [`LinkSnapshot`], a plain
//! data view of everything the rules need. Backends gather the snapshot
//! however suits them (an in-memory map under a lock, SQL inside a
//! transaction) and share the same decision logic. [`validate_link`] gathers
//! the snapshot through an injected [`CatalogReader`].

use std::collections::BTreeSet;

use crate::attribute::{Attribute, AttributeId, AttributeValue, AttributeValueId};
use crate::error::{CatalogError, CatalogResult, LinkViolation};
use crate::product::{Product, ProductId};
use crate::variant::{ProductVariant, VariantAttributeValue, VariantId, VariantLinkId};

/// The link write being validated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub variant_id: VariantId,
    pub attribute_value_id: AttributeValueId,
    /// Existing link being re-pointed; `None` for a new link.
    pub replacing: Option<VariantLinkId>,
}

impl LinkCandidate {
    pub fn new(variant_id: VariantId, attribute_value_id: AttributeValueId) -> Self {
        Self {
            variant_id,
            attribute_value_id,
            replacing: None,
        }
    }

    pub fn replacing(link: &VariantAttributeValue, attribute_value_id: AttributeValueId) -> Self {
        Self {
            variant_id: link.variant_id,
            attribute_value_id,
            replacing: Some(link.id),
        }
    }
}

/// An existing link of the target variant, with the attribute its value belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub link_id: VariantLinkId,
    pub attribute_value_id: AttributeValueId,
    pub attribute_id: AttributeId,
}

/// Everything the link rules read, captured at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSnapshot {
    pub candidate: LinkCandidate,
    pub product_name: String,
    pub attribute_id: AttributeId,
    pub attribute_name: String,
    /// Whether the candidate's attribute is declared on the product.
    pub attribute_declared: bool,
    /// Current links of the target variant (the replaced one included).
    pub variant_links: Vec<ResolvedLink>,
    /// Value sets of the product's other variants.
    pub sibling_combinations: Vec<(VariantId, BTreeSet<AttributeValueId>)>,
}

impl LinkSnapshot {
    /// Value set the variant would hold once the candidate is applied.
    pub fn resulting_combination(&self) -> BTreeSet<AttributeValueId> {
        let mut set: BTreeSet<AttributeValueId> = self
            .variant_links
            .iter()
            .filter(|l| Some(l.link_id) != self.candidate.replacing)
            .map(|l| l.attribute_value_id)
            .collect();
        set.insert(self.candidate.attribute_value_id);
        set
    }
}

/// Evaluate the link rules; returns every violation found, in rule order.
pub fn check_link(snapshot: &LinkSnapshot) -> Result<(), Vec<LinkViolation>> {
    let mut violations = Vec::new();

    let already_assigned = snapshot.variant_links.iter().any(|l| {
        Some(l.link_id) != snapshot.candidate.replacing && l.attribute_id == snapshot.attribute_id
    });
    if already_assigned {
        violations.push(LinkViolation::DuplicateAttributeAssignment {
            attribute: snapshot.attribute_name.clone(),
        });
    }

    if !snapshot.attribute_declared {
        violations.push(LinkViolation::AttributeNotApplicable {
            attribute: snapshot.attribute_name.clone(),
            product: snapshot.product_name.clone(),
        });
    }

    if let Some(violation) =
        combination_conflict(&snapshot.resulting_combination(), snapshot, &snapshot.product_name)
    {
        violations.push(violation);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Check `combination` against the siblings captured in `snapshot`.
///
/// Empty combinations never conflict.
fn combination_conflict(
    combination: &BTreeSet<AttributeValueId>,
    snapshot: &LinkSnapshot,
    product_name: &str,
) -> Option<LinkViolation> {
    find_duplicate_combination(
        combination,
        snapshot.candidate.variant_id,
        snapshot.sibling_combinations.iter().map(|(id, set)| (*id, set)),
    )
    .map(|_| LinkViolation::DuplicateVariantCombination {
        product: product_name.to_string(),
    })
}

/// First sibling (other than `variant_id`) whose value set equals `combination`.
///
/// Only siblings with the same number of distinct values are compared.
pub fn find_duplicate_combination<'a, I>(
    combination: &BTreeSet<AttributeValueId>,
    variant_id: VariantId,
    siblings: I,
) -> Option<VariantId>
where
    I: IntoIterator<Item = (VariantId, &'a BTreeSet<AttributeValueId>)>,
{
    if combination.is_empty() {
        return None;
    }
    siblings
        .into_iter()
        .filter(|(id, set)| *id != variant_id && set.len() == combination.len())
        .find(|(_, set)| *set == combination)
        .map(|(id, _)| id)
}

/// Normalized storage key of a value set: ids in ascending order, comma separated.
pub fn combination_key(combination: &BTreeSet<AttributeValueId>) -> String {
    combination
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Read access the validator needs, injected by the caller.
pub trait CatalogReader {
    fn product(&self, id: ProductId) -> Option<Product>;
    fn attribute(&self, id: AttributeId) -> Option<Attribute>;
    fn attribute_value(&self, id: AttributeValueId) -> Option<AttributeValue>;
    fn variant(&self, id: VariantId) -> Option<ProductVariant>;
    fn is_attribute_declared(&self, product_id: ProductId, attribute_id: AttributeId) -> bool;
    fn links_of_variant(&self, variant_id: VariantId) -> Vec<VariantAttributeValue>;
    fn variants_of_product(&self, product_id: ProductId) -> Vec<ProductVariant>;
}

/// Capture a [`LinkSnapshot`] for `candidate` through `reader`.
pub fn snapshot_link<R>(reader: &R, candidate: LinkCandidate) -> CatalogResult<LinkSnapshot>
where
    R: CatalogReader + ?Sized,
{
    let variant = reader
        .variant(candidate.variant_id)
        .ok_or_else(|| CatalogError::not_found(format!("variant {}", candidate.variant_id)))?;
    let product = reader
        .product(variant.product_id)
        .ok_or_else(|| CatalogError::not_found(format!("product {}", variant.product_id)))?;
    let value = reader.attribute_value(candidate.attribute_value_id).ok_or_else(|| {
        CatalogError::not_found(format!("attribute value {}", candidate.attribute_value_id))
    })?;
    let attribute = reader
        .attribute(value.attribute_id)
        .ok_or_else(|| CatalogError::not_found(format!("attribute {}", value.attribute_id)))?;

    let variant_links = reader
        .links_of_variant(variant.id)
        .into_iter()
        .map(|link| resolve_link(reader, &link))
        .collect::<CatalogResult<Vec<_>>>()?;

    if let Some(replacing) = candidate.replacing {
        if !variant_links.iter().any(|l| l.link_id == replacing) {
            return Err(CatalogError::not_found(format!(
                "link {replacing} on variant {}",
                variant.id
            )));
        }
    }

    let sibling_combinations = reader
        .variants_of_product(product.id)
        .into_iter()
        .filter(|sibling| sibling.id != variant.id)
        .map(|sibling| {
            let set = reader
                .links_of_variant(sibling.id)
                .into_iter()
                .map(|l| l.attribute_value_id)
                .collect::<BTreeSet<_>>();
            (sibling.id, set)
        })
        .collect();

    Ok(LinkSnapshot {
        candidate,
        product_name: product.name.clone(),
        attribute_id: attribute.id,
        attribute_name: attribute.name.clone(),
        attribute_declared: reader.is_attribute_declared(product.id, attribute.id),
        variant_links,
        sibling_combinations,
    })
}

fn resolve_link<R>(reader: &R, link: &VariantAttributeValue) -> CatalogResult<ResolvedLink>
where
    R: CatalogReader + ?Sized,
{
    let value = reader.attribute_value(link.attribute_value_id).ok_or_else(|| {
        CatalogError::not_found(format!("attribute value {}", link.attribute_value_id))
    })?;
    Ok(ResolvedLink {
        link_id: link.id,
        attribute_value_id: value.id,
        attribute_id: value.attribute_id,
    })
}

/// Validate a link write against the catalog seen through `reader`.
///
/// Returns `CatalogError::InvalidLink` listing every broken rule, or a
/// not-found error when the candidate references missing records.
pub fn validate_link<R>(reader: &R, candidate: LinkCandidate) -> CatalogResult<LinkSnapshot>
where
    R: CatalogReader + ?Sized,
{
    let snapshot = snapshot_link(reader, candidate)?;
    check_link(&snapshot).map_err(CatalogError::InvalidLink)?;
    Ok(snapshot)
}

/// Check that removing `link_id` leaves `variant_id` with a combination no
/// sibling already holds.
pub fn check_unlink(
    product_name: &str,
    variant_id: VariantId,
    remaining: &BTreeSet<AttributeValueId>,
    siblings: &[(VariantId, BTreeSet<AttributeValueId>)],
) -> Result<(), Vec<LinkViolation>> {
    match find_duplicate_combination(remaining, variant_id, siblings.iter().map(|(id, s)| (*id, s)))
    {
        Some(_) => Err(vec![LinkViolation::DuplicateVariantCombination {
            product: product_name.to_string(),
        }]),
        None => Ok(()),
    }
}
