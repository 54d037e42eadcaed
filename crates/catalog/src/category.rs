use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::error::{require_max_chars, require_non_blank};
use storefront_core::{DomainResult, Entity, Slug, define_id};

define_id! {
    /// Category identifier.
    pub struct CategoryId;
}

/// Command: CreateCategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    /// Derived from `name` when omitted.
    pub slug: Option<Slug>,
    pub description: String,
    pub is_active: bool,
}

impl CreateCategory {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
            description: String::new(),
            is_active: true,
        }
    }
}

/// A top-level grouping of products.
///
/// Names are unique case-insensitively; see [`Category::name_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn create(cmd: CreateCategory, now: DateTime<Utc>) -> DomainResult<Self> {
        require_non_blank("category name", &cmd.name)?;
        let name = cmd.name.trim().to_string();
        require_max_chars("category name", &name, 255)?;
        let slug = match cmd.slug {
            Some(slug) => slug,
            None => Slug::slugify(&name)?,
        };
        Ok(Self {
            id: CategoryId::new(),
            name,
            slug,
            description: cmd.description,
            is_active: cmd.is_active,
            created_at: now,
        })
    }

    /// Key of the case-insensitive name constraint.
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}
