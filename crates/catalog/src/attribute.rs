use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::error::{require_max_chars, require_non_blank};
use storefront_core::{DomainResult, Entity, define_id};

/// Longest accepted attribute name or value, in characters.
pub const MAX_ATTRIBUTE_TEXT_LEN: usize = 255;

define_id! {
    /// Attribute identifier.
    pub struct AttributeId;
}

define_id! {
    /// Attribute value identifier.
    pub struct AttributeValueId;
}

/// Kind of variation an attribute describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeGroup {
    Capacity,
    Color,
    Depth,
    Diameter,
    Height,
    Length,
    Material,
    Quantity,
    Size,
    Thickness,
    Volume,
    Weight,
    Width,
    Other,
}

impl AttributeGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeGroup::Capacity => "CAPACITY",
            AttributeGroup::Color => "COLOR",
            AttributeGroup::Depth => "DEPTH",
            AttributeGroup::Diameter => "DIAMETER",
            AttributeGroup::Height => "HEIGHT",
            AttributeGroup::Length => "LENGTH",
            AttributeGroup::Material => "MATERIAL",
            AttributeGroup::Quantity => "QUANTITY",
            AttributeGroup::Size => "SIZE",
            AttributeGroup::Thickness => "THICKNESS",
            AttributeGroup::Volume => "VOLUME",
            AttributeGroup::Weight => "WEIGHT",
            AttributeGroup::Width => "WIDTH",
            AttributeGroup::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let group = match s.to_ascii_uppercase().as_str() {
            "CAPACITY" => AttributeGroup::Capacity,
            "COLOR" => AttributeGroup::Color,
            "DEPTH" => AttributeGroup::Depth,
            "DIAMETER" => AttributeGroup::Diameter,
            "HEIGHT" => AttributeGroup::Height,
            "LENGTH" => AttributeGroup::Length,
            "MATERIAL" => AttributeGroup::Material,
            "QUANTITY" => AttributeGroup::Quantity,
            "SIZE" => AttributeGroup::Size,
            "THICKNESS" => AttributeGroup::Thickness,
            "VOLUME" => AttributeGroup::Volume,
            "WEIGHT" => AttributeGroup::Weight,
            "WIDTH" => AttributeGroup::Width,
            "OTHER" => AttributeGroup::Other,
            _ => return None,
        };
        Some(group)
    }
}

/// Command: CreateAttribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAttribute {
    pub name: String,
    pub group: AttributeGroup,
    pub description: String,
    pub is_active: bool,
}

impl CreateAttribute {
    pub fn new(name: impl Into<String>, group: AttributeGroup) -> Self {
        Self {
            name: name.into(),
            group,
            description: String::new(),
            is_active: true,
        }
    }
}

/// A named axis of product variation (e.g. "Color").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
    pub group: AttributeGroup,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Attribute {
    pub fn create(cmd: CreateAttribute, now: DateTime<Utc>) -> DomainResult<Self> {
        require_non_blank("attribute name", &cmd.name)?;
        let name = cmd.name.trim().to_string();
        require_max_chars("attribute name", &name, MAX_ATTRIBUTE_TEXT_LEN)?;
        Ok(Self {
            id: AttributeId::new(),
            name,
            group: cmd.group,
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

impl Entity for Attribute {
    type Id = AttributeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: CreateAttributeValue.
///
/// `sort_order` is mandatory; ask the store for the next free position of the
/// attribute when no explicit one is wanted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAttributeValue {
    pub attribute_id: AttributeId,
    pub value: String,
    pub sort_order: u32,
}

/// One admissible value on an attribute's axis (e.g. "Red").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub id: AttributeValueId,
    pub attribute_id: AttributeId,
    pub value: String,
    pub sort_order: u32,
}

impl AttributeValue {
    pub fn create(cmd: CreateAttributeValue) -> DomainResult<Self> {
        require_non_blank("attribute value", &cmd.value)?;
        let value = cmd.value.trim().to_string();
        require_max_chars("attribute value", &value, MAX_ATTRIBUTE_TEXT_LEN)?;
        Ok(Self {
            id: AttributeValueId::new(),
            attribute_id: cmd.attribute_id,
            value,
            sort_order: cmd.sort_order,
        })
    }

    /// Key of the per-attribute, case-insensitive value constraint.
    pub fn value_key(&self) -> (AttributeId, String) {
        (self.attribute_id, self.value.to_lowercase())
    }

    /// Human-readable label, e.g. `Size: Large`.
    pub fn label(&self, attribute: &Attribute) -> String {
        format!("{}: {}", attribute.name, self.value)
    }
}

impl Entity for AttributeValue {
    type Id = AttributeValueId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
