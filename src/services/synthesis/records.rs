//! Resolved records: catalog content copied out and annotated for the host.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::services::catalog::CatalogRecord;
use crate::services::resolver::MatchStage;

/// Provenance flags. Serialized under the host's per-module flag namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportFlags {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub heritage_feature: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub equipped_status_set: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_equipped_status: Option<bool>,
    /// Catalog ids of the base item and enchantment a composite was built from.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub composite_of: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub implement_expertise_compat: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implement_expertise_bonus: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<MatchStage>,
}

/// A catalog record's content as an independent, mutable copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default)]
    pub system: Value,
    /// Catalog id this record was copied from. `None` for composites and
    /// placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default)]
    pub flags: ImportFlags,
}

impl ResolvedRecord {
    pub fn from_catalog(record: CatalogRecord) -> Self {
        Self {
            name: record.name,
            record_type: record.record_type,
            img: record.img,
            system: record.system,
            source_id: Some(record.id),
            flags: ImportFlags::default(),
        }
    }

    pub fn with_match_stage(mut self, stage: MatchStage) -> Self {
        self.flags.matched_by = Some(stage);
        self
    }

    /// Mutable access to `system` as an object, replacing any non-object value.
    pub fn system_object_mut(&mut self) -> &mut Map<String, Value> {
        if !self.system.is_object() {
            self.system = json!({});
        }
        match &mut self.system {
            Value::Object(map) => map,
            _ => unreachable!("system was just made an object"),
        }
    }

    fn system_str(&self, pointer: &str) -> Option<&str> {
        self.system.pointer(pointer).and_then(Value::as_str)
    }

    pub fn quantity(&self) -> Option<u64> {
        self.system.get("quantity").and_then(Value::as_u64)
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.system_object_mut()
            .insert("quantity".into(), json!(quantity));
    }

    pub fn is_equipped(&self) -> bool {
        self.system
            .get("equipped")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_equipped(&mut self, equipped: bool) {
        self.system_object_mut()
            .insert("equipped".into(), json!(equipped));
    }

    pub fn description(&self) -> &str {
        self.system_str("/description/value").unwrap_or("")
    }

    pub fn weapon_type(&self) -> Option<&str> {
        self.system_str("/weaponType")
    }

    pub fn weapon_use(&self) -> Option<&str> {
        self.system_str("/weaponUse")
    }

    /// Weapon proficiency bonus; absent or non-numeric counts as 0.
    pub fn prof_bonus(&self) -> i64 {
        match self.system.get("profBonus") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn attack_ability(&self) -> Option<&str> {
        self.system_str("/attack/ability")
    }

    pub fn attack_formula(&self) -> Option<&str> {
        self.system_str("/attack/formula")
    }

    pub fn set_attack_formula(&mut self, formula: String) {
        let system = self.system_object_mut();
        let attack = system
            .entry("attack")
            .or_insert_with(|| json!({}));
        if !attack.is_object() {
            *attack = json!({});
        }
        if let Some(map) = attack.as_object_mut() {
            map.insert("formula".into(), Value::String(formula));
        }
    }
}

#[cfg(test)]
#[path = "tests/records_tests.rs"]
mod tests;
