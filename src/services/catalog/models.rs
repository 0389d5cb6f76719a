//! Domain types for the reference catalog.
//!
//! Contains: Category, CatalogIndexEntry, CatalogRecord.

use serde::{Deserialize, Serialize};

/// Reference category. Catalog-backed categories map to a catalog id via
/// configuration; `Heritage` and `SpecialItem` only label raw references and
/// are resolved against other catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Feat,
    Feature,
    Power,
    CorePower,
    Equipment,
    Ritual,
    Race,
    Class,
    Path,
    Destiny,
    Theme,
    Background,
    Heritage,
    SpecialItem,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Feat => "feat",
            Category::Feature => "feature",
            Category::Power => "power",
            Category::CorePower => "core_power",
            Category::Equipment => "equipment",
            Category::Ritual => "ritual",
            Category::Race => "race",
            Category::Class => "class",
            Category::Path => "path",
            Category::Destiny => "destiny",
            Category::Theme => "theme",
            Category::Background => "background",
            Category::Heritage => "heritage",
            Category::SpecialItem => "special_item",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lightweight listing row returned by `CatalogProvider::get_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIndexEntry {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// Full catalog record. `system` holds the category-specific structured
/// content (description, attack formula, weapon tags, properties, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub system: serde_json::Value,
}

impl CatalogRecord {
    pub fn index_entry(&self) -> CatalogIndexEntry {
        CatalogIndexEntry {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}
