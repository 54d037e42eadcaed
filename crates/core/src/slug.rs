//! URL slugs for categories and products.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

const MAX_SLUG_LEN: usize = 255;

/// A URL-safe label: ASCII letters, digits, hyphens and underscores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl ValueObject for Slug {}

impl Slug {
    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DomainError::validation("slug cannot be empty"));
        }
        if raw.len() > MAX_SLUG_LEN {
            return Err(DomainError::validation(format!(
                "slug exceeds {MAX_SLUG_LEN} characters"
            )));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(DomainError::validation(format!(
                "slug contains invalid character {bad:?}"
            )));
        }
        Ok(Self(raw))
    }

    /// Derive a slug from free text: lowercase ASCII words joined by hyphens.
    pub fn slugify(text: &str) -> DomainResult<Self> {
        let mut out = String::with_capacity(text.len());
        let mut pending_hyphen = false;
        for c in text.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !out.is_empty() {
                    out.push('-');
                }
                pending_hyphen = false;
                out.push(c.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        }
        out.truncate(MAX_SLUG_LEN);
        Self::parse(out.trim_end_matches('-').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl core::fmt::Display for Slug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(Slug::slugify("  Men's  Shirts & Tops ").unwrap().as_str(), "men-s-shirts-tops");
        assert_eq!(Slug::slugify("Clothing").unwrap().as_str(), "clothing");
    }

    #[test]
    fn slugify_rejects_text_without_alphanumerics() {
        assert!(matches!(Slug::slugify("!!!"), Err(DomainError::Validation(_))));
    }

    #[test]
    fn parse_rejects_spaces() {
        assert!(Slug::parse("red shirt").is_err());
        assert!(Slug::parse("red_shirt-2").is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Slug = serde_json::from_str("\"books\"").unwrap();
        assert_eq!(ok.as_str(), "books");
        assert!(serde_json::from_str::<Slug>("\"no spaces\"").is_err());
    }
}
