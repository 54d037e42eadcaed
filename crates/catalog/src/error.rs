//! Catalog error model.

use thiserror::Error;

use storefront_core::DomainError;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// A rule broken by a variant ↔ attribute value link.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkViolation {
    /// The variant already holds another value of the same attribute.
    #[error("this product variant already has a value for the attribute '{attribute}'")]
    DuplicateAttributeAssignment { attribute: String },

    /// The attribute is not declared on the variant's product.
    #[error("the attribute '{attribute}' is not associated with the product '{product}'")]
    AttributeNotApplicable { attribute: String, product: String },

    /// Another variant of the product already holds the same value set.
    #[error(
        "this combination of attribute values already exists for another variant \
         of the product '{product}'"
    )]
    DuplicateVariantCombination { product: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The link write was rejected; every failing rule is listed.
    #[error("invalid attribute value link: {}", join(.0))]
    InvalidLink(Vec<LinkViolation>),

    /// The backing store failed (connection, lock, decoding).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl CatalogError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Domain(DomainError::not_found(what))
    }

    /// Violations carried by an `InvalidLink` error (empty otherwise).
    pub fn violations(&self) -> &[LinkViolation] {
        match self {
            Self::InvalidLink(v) => v,
            _ => &[],
        }
    }

    pub fn is_uniqueness(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_uniqueness())
    }
}

fn join(violations: &[LinkViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
