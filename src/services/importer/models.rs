//! Domain types for one import run.
//!
//! Contains: CharacterDetails, SourceDocument, ImportOutcome, UnresolvedReport.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::services::catalog::Category;
use crate::services::synthesis::ResolvedRecord;
use crate::types::{CompositeGroup, RawReference};

fn default_level() -> u32 {
    1
}

/// Character-level values extracted by the source parser. The engine reads
/// `level` and `classes`; everything else is passed through to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub abilities: BTreeMap<String, i64>,
    /// Defenses, skills, currency, languages, vision and the rest.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CharacterDetails {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: default_level(),
            classes: Vec::new(),
            race: String::new(),
            abilities: BTreeMap::new(),
            extra: Map::new(),
        }
    }
}

/// Parser output consumed by `ImportSession::run_import`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceDocument {
    pub details: CharacterDetails,
    /// Feats, features, powers, heritage traits and any other catalog-backed
    /// references, keyed by category.
    pub references: BTreeMap<Category, Vec<RawReference>>,
    /// Inventory slots, rituals included.
    pub composite_groups: Vec<CompositeGroup>,
    /// Names of owned special loot (familiars, spellbooks, ...).
    pub special_items: Vec<String>,
}

impl SourceDocument {
    pub fn references(&self, category: Category) -> &[RawReference] {
        self.references
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A reference that produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedReport {
    pub category: Category,
    pub raw_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub details: CharacterDetails,
    /// Deduplicated records ready for bulk creation.
    pub records: Vec<ResolvedRecord>,
    pub unresolved: Vec<UnresolvedReport>,
}
