//! Build-wide eligibility for the implement expertise bonus.
//!
//! Computed once per import from the resolved equipment, feats and features,
//! then read by every power patch.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::services::synthesis::ResolvedRecord;

/// Implement kinds an expertise feat can name.
pub const IMPLEMENT_KEYWORDS: &[&str] = &[
    "implement", "ki focus", "orb", "rod", "staff", "tome", "totem", "wand",
];

/// Weapons a monk may use as an implement, matched as lowercase substrings.
pub const MONK_WEAPONS: &[&str] = &[
    "club",
    "dagger",
    "javelin",
    "quarterstaff",
    "short sword",
    "shuriken",
    "sling",
    "spear",
    "unarmed strike",
];

const MONK_FEATURES_EXACT: &[&str] = &["Monk Class", "Hybrid Monk Class"];
const MONK_FEATURES_CONTAINING: &[&str] = &["Monastic Tradition", "Unarmed Combatant"];
const MONK_MULTICLASS_FEATS: &[&str] = &["multiclass monk", "master of the fist"];

static RE_PLUS_N: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+(\d+)").expect("Invalid regex"));

/// Immutable summary of the build. `should_apply_bonus` is the only field
/// the patch step needs; the rest is kept for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSet {
    pub has_implement_expertise: bool,
    pub is_monk: bool,
    pub has_implement_equipped: bool,
    pub has_monk_weapon_equipped: bool,
    pub has_monk_weapon_implement_feature: bool,
    pub should_apply_bonus: bool,
    /// Highest bonus among the qualifying feats, 0 without one.
    pub feat_bonus: i64,
    pub qualifying_feats: Vec<String>,
}

pub fn is_qualifying_feat(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("expertise") && IMPLEMENT_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn is_monk_weapon(record: &ResolvedRecord) -> bool {
    let lower = record.name.to_lowercase();
    record.record_type == "weapon"
        && record.is_equipped()
        && MONK_WEAPONS.iter().any(|w| lower.contains(w))
}

fn is_equipped_implement(record: &ResolvedRecord) -> bool {
    record.record_type == "weapon"
        && record.weapon_type() == Some("implement")
        && record.is_equipped()
}

fn is_monk_implement_feature(name: &str) -> bool {
    MONK_FEATURES_EXACT.contains(&name) || MONK_FEATURES_CONTAINING.iter().any(|f| name.contains(f))
}

fn parse_plus(text: &str) -> Option<i64> {
    RE_PLUS_N
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Level-scaled bonus for feats whose text lists all three tiers.
pub fn tier_bonus(level: u32) -> i64 {
    match level {
        21.. => 3,
        11.. => 2,
        _ => 1,
    }
}

/// Bonus granted by one qualifying feat: an explicit `+N` in its name, then
/// tier scaling when the description lists `+1`, `+2` and `+3`, then the
/// first `+N` in the description, else 1.
pub fn feat_bonus(feat: &ResolvedRecord, level: u32) -> i64 {
    if let Some(bonus) = parse_plus(&feat.name) {
        return bonus;
    }
    let description = feat.description();
    if ["+1", "+2", "+3"].iter().all(|tier| description.contains(tier)) {
        return tier_bonus(level);
    }
    parse_plus(description).unwrap_or(1)
}

pub fn detect_conditions(
    equipment: &[ResolvedRecord],
    feats: &[ResolvedRecord],
    features: &[ResolvedRecord],
    classes: &[String],
    level: u32,
) -> ConditionSet {
    let qualifying: Vec<&ResolvedRecord> =
        feats.iter().filter(|f| is_qualifying_feat(&f.name)).collect();
    let has_implement_expertise = !qualifying.is_empty();

    let is_monk = classes.iter().any(|c| c.to_lowercase().contains("monk"))
        || feats.iter().any(|f| {
            let lower = f.name.to_lowercase();
            MONK_MULTICLASS_FEATS.iter().any(|m| lower.contains(m))
        });

    let has_implement_equipped = equipment.iter().any(is_equipped_implement);
    let has_monk_weapon_equipped = equipment.iter().any(is_monk_weapon);
    let has_monk_weapon_implement_feature =
        features.iter().any(|f| is_monk_implement_feature(&f.name));

    let should_apply_bonus = has_implement_expertise
        && (has_implement_equipped
            || (is_monk && has_monk_weapon_equipped && has_monk_weapon_implement_feature));

    let conditions = ConditionSet {
        has_implement_expertise,
        is_monk,
        has_implement_equipped,
        has_monk_weapon_equipped,
        has_monk_weapon_implement_feature,
        should_apply_bonus,
        feat_bonus: qualifying
            .iter()
            .map(|f| feat_bonus(f, level))
            .max()
            .unwrap_or(0),
        qualifying_feats: qualifying.iter().map(|f| f.name.clone()).collect(),
    };

    log::debug!("Implement expertise conditions: {:?}", conditions);
    conditions
}

#[cfg(test)]
#[path = "tests/conditions_tests.rs"]
mod tests;
