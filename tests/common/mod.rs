//! Shared fixtures for integration tests: a small 4e-style catalog and a
//! monk character sheet that exercises every import path.
#![allow(dead_code)]

use serde_json::{json, Value};
use sheet_import_lib::services::catalog::{CatalogRecord, Category, MemoryCatalog};
use sheet_import_lib::services::config::ImportConfig;
use sheet_import_lib::services::importer::{CharacterDetails, SourceDocument};
use sheet_import_lib::types::{CompositeGroup, RawReference};
use std::collections::BTreeMap;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub const TIERED_EXPERTISE: &str = "<p>You gain a +1 feat bonus to attack rolls with \
    ki focus attacks. The bonus increases to +2 at 11th level and +3 at 21st level.</p>";

fn rec(id: &str, name: &str, record_type: &str, system: Value) -> CatalogRecord {
    CatalogRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: record_type.to_string(),
        img: Some("icons/svg/item-bag.svg".to_string()),
        system,
    }
}

fn catalog_id(category: Category) -> String {
    ImportConfig::default()
        .catalog_id(category)
        .unwrap_or_default()
        .to_string()
}

pub fn fixture_catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_catalog(
            &catalog_id(Category::Feat),
            vec![
                rec(
                    "feat-ie",
                    "Implement Expertise (Ki Focus)",
                    "feat",
                    json!({"description": {"value": TIERED_EXPERTISE}}),
                ),
                rec("feat-al", "Alertness", "feat", json!({})),
                rec("feat-tough", "Toughness", "feat", json!({})),
            ],
        )
        .with_catalog(
            &catalog_id(Category::Feature),
            vec![
                rec("cf-uc", "Unarmed Combatant", "classFeats", json!({})),
                rec("cf-mt", "Monastic Tradition (Centered Breath)", "classFeats", json!({})),
                rec("cf-fm", "Flurry of Blows (Monk)", "classFeats", json!({})),
                rec("cf-fh", "Flurry of Blows (Hybrid)", "classFeats", json!({})),
                rec("cf-ht", "Human Perseverance", "raceFeats", json!({})),
            ],
        )
        .with_catalog(
            &catalog_id(Category::Power),
            vec![
                rec(
                    "pw-fs",
                    "Five Storms",
                    "power",
                    json!({"attack": {"formula": "@powerMod+@lvhalf", "ability": "dex"}, "weaponType": "melee", "weaponUse": "none"}),
                ),
                rec(
                    "pw-cf",
                    "Crane's Wings",
                    "power",
                    json!({"attack": {"formula": "@powerMod+@lvhalf", "ability": "dex"}, "weaponType": "melee", "weaponUse": "default"}),
                ),
                rec(
                    "pw-ib",
                    "Irontooths Bite",
                    "power",
                    json!({"attack": {"formula": "@powerMod", "ability": "cha"}}),
                ),
            ],
        )
        .with_catalog(
            &catalog_id(Category::CorePower),
            vec![rec(
                "cp-mba",
                "Melee Basic Attack",
                "power",
                json!({"attack": {"formula": "@powerMod+@lvhalf", "ability": "str"}, "weaponType": "melee", "weaponUse": "default"}),
            )],
        )
        .with_catalog(
            &catalog_id(Category::Equipment),
            vec![
                rec(
                    "eq-la",
                    "Leather Armor",
                    "equipment",
                    json!({"armorBonus": 2, "enhance": 0, "properties": {"lgt": true}}),
                ),
                rec(
                    "eq-e2",
                    "+2 Enchantment",
                    "equipment",
                    json!({"enhance": 2, "properties": {"mgc": true}}),
                ),
                rec(
                    "eq-us",
                    "Unarmed Strike",
                    "weapon",
                    json!({"profBonus": 3, "weaponType": "melee"}),
                ),
                rec("eq-ad", "Adventurer's Kit", "equipment", json!({})),
            ],
        )
        .with_catalog(
            &catalog_id(Category::Ritual),
            vec![rec("rt-bp", "Brew Potion", "ritual", json!({"level": 1}))],
        )
        .with_catalog(
            &catalog_id(Category::Race),
            vec![rec("rc-bt", "Bonus Feat", "raceFeats", json!({}))],
        )
}

fn refs(category: Category, names: &[&str]) -> Vec<RawReference> {
    names
        .iter()
        .map(|name| RawReference::new(*name, category))
        .collect()
}

fn slot(name: &str, count: u32, equip_count: u32) -> RawReference {
    RawReference::new(name, Category::Equipment).with_counts(count, equip_count)
}

pub fn monk_details(level: u32) -> CharacterDetails {
    let mut abilities = BTreeMap::new();
    abilities.insert("dex".to_string(), 18);
    abilities.insert("wis".to_string(), 16);

    CharacterDetails {
        name: "Kaelen".to_string(),
        level,
        classes: vec!["Monk".to_string()],
        race: "Human".to_string(),
        abilities,
        ..CharacterDetails::default()
    }
}

pub fn monk_document(level: u32) -> SourceDocument {
    let mut references = BTreeMap::new();
    references.insert(
        Category::Feat,
        refs(
            Category::Feat,
            &["Implement Expertise (Ki Focus)", "Alertness", "Alertness", "Secret Homebrew Feat"],
        ),
    );
    references.insert(
        Category::Feature,
        refs(Category::Feature, &["Unarmed Combatant", "Flurry of Blows"]),
    );
    references.insert(
        Category::Power,
        vec![
            RawReference::new("Five Storms", Category::Power).with_element_id("p1"),
            RawReference::new("Crane's Wings", Category::Power)
                .with_element_id("p2")
                .with_replaces("p1"),
            RawReference::new("Irontooth's Bite", Category::Power).with_element_id("p3"),
            RawReference::new("Melee Basic Attack", Category::Power),
        ],
    );
    references.insert(
        Category::Heritage,
        refs(Category::Heritage, &["Human Perseverance", "Bonus Feat"]),
    );

    SourceDocument {
        details: monk_details(level),
        references,
        composite_groups: vec![
            CompositeGroup::with_enchantment(slot("Leather Armor", 1, 1), slot("+2 Enchantment", 1, 1)),
            CompositeGroup::single(slot("Unarmed Strike", 1, 1)),
            CompositeGroup::single(slot("Adventurer's Kit", 1, 0)),
            CompositeGroup::single(slot("Brew Potion", 1, 0).with_element_type("Ritual")),
            CompositeGroup::new(vec![
                slot("Leather Armor", 1, 0),
                slot("+2 Enchantment", 1, 0),
                slot("Adventurer's Kit", 1, 0),
            ]),
        ],
        special_items: vec![],
    }
}
