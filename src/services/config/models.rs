use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::services::catalog::Category;

static EMPTY_TABLE: BTreeMap<String, String> = BTreeMap::new();

/// Catalog id per category. Ids are opaque namespace keys handed to the
/// `CatalogProvider`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct CatalogIds(pub BTreeMap<Category, String>);

impl CatalogIds {
    pub fn get(&self, category: Category) -> Option<&str> {
        self.0.get(&category).map(String::as_str)
    }
}

impl Default for CatalogIds {
    fn default() -> Self {
        let ids = [
            (Category::Feat, "dnd-4e-compendium.module-feats"),
            (Category::Feature, "dnd-4e-compendium.module-features"),
            (Category::Power, "dnd-4e-compendium.module-powers"),
            (Category::CorePower, "dnd-4e-compendium.module-core-powers"),
            (Category::Equipment, "dnd-4e-compendium.module-equipment"),
            (Category::Ritual, "dnd-4e-compendium.module-rituals"),
            (Category::Race, "dnd-4e-compendium.module-races"),
        ];
        Self(
            ids.into_iter()
                .map(|(category, id)| (category, id.to_string()))
                .collect(),
        )
    }
}

/// Static alias tables: raw sheet name → canonical catalog name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LookupTables {
    pub feat: BTreeMap<String, String>,
    pub feature: BTreeMap<String, String>,
    pub power: BTreeMap<String, String>,
    pub equipment: BTreeMap<String, String>,
    pub ritual: BTreeMap<String, String>,
}

impl LookupTables {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn table(&self, category: Category) -> &BTreeMap<String, String> {
        match category {
            Category::Feat => &self.feat,
            Category::Feature => &self.feature,
            Category::Power => &self.power,
            Category::Equipment => &self.equipment,
            Category::Ritual => &self.ritual,
            _ => &EMPTY_TABLE,
        }
    }

    /// Canonical name for `raw_name`, or `raw_name` itself when no alias exists.
    pub fn resolve<'a>(&'a self, category: Category, raw_name: &'a str) -> &'a str {
        self.table(category)
            .get(raw_name)
            .map(String::as_str)
            .unwrap_or(raw_name)
    }
}

/// Which categories replace an unresolved reference with a placeholder record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlaceholderPolicy {
    pub feats: bool,
    pub features: bool,
    pub equipment: bool,
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        Self {
            feats: true,
            features: true,
            equipment: false,
        }
    }
}

impl PlaceholderPolicy {
    pub fn allows(&self, category: Category) -> bool {
        match category {
            Category::Feat => self.feats,
            Category::Feature => self.features,
            Category::Equipment => self.equipment,
            _ => false,
        }
    }
}

/// One rule of the disambiguation table, applied in order to same-stage
/// candidates (sorted by name length, longest first).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisambiguationRule {
    /// Prefer a candidate whose name contains one of the character's class tokens.
    ClassToken,
    /// Prefer a candidate whose name does not carry the hybrid marker.
    NonHybrid,
    /// Take the longest name.
    Longest,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisambiguationPolicy {
    pub rules: Vec<DisambiguationRule>,
    /// Words removed from class names to form class tokens.
    pub class_strip_words: Vec<String>,
    pub hybrid_marker: String,
}

impl Default for DisambiguationPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                DisambiguationRule::ClassToken,
                DisambiguationRule::NonHybrid,
                DisambiguationRule::Longest,
            ],
            class_strip_words: vec!["Class".into(), "Hybrid".into()],
            hybrid_marker: "Hybrid".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    pub catalogs: CatalogIds,
    pub lookup: LookupTables,
    pub placeholders: PlaceholderPolicy,
    /// Fuzzy matches must score strictly above this.
    pub fuzzy_threshold: f64,
    pub disambiguation: DisambiguationPolicy,
    pub special_item_names: Vec<String>,
    pub ritual_names: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            catalogs: CatalogIds::default(),
            lookup: LookupTables::default(),
            placeholders: PlaceholderPolicy::default(),
            fuzzy_threshold: 0.70,
            disambiguation: DisambiguationPolicy::default(),
            special_item_names: [
                "Arcanist Cantrips",
                "Spellbook",
                "Familiar",
                "Animal Companion",
                "Mount",
                "Servant",
                "Retainer",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            ritual_names: [
                "Comprehend Language",
                "Comrades' Succor",
                "Simbul's Conversion",
                "Magic Circle",
                "Brew Potion",
                "Make Whole",
                "Enchant Magic Item",
                "Linked Portal",
                "Sending",
                "Tenser's Floating Disk",
                "Water Walk",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl ImportConfig {
    pub fn catalog_id(&self, category: Category) -> Option<&str> {
        self.catalogs.get(category)
    }

    pub fn is_ritual_name(&self, name: &str) -> bool {
        self.ritual_names.iter().any(|ritual| name.contains(ritual.as_str()))
    }
}
