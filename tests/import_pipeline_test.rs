//! End-to-end import runs against the in-memory fixture catalog.

mod common;

use common::{fixture_catalog, init_logger, monk_document};
use sheet_import_lib::services::catalog::{Category, MemoryCatalog};
use sheet_import_lib::services::config::ImportConfig;
use sheet_import_lib::services::importer::{ImportSession, UnresolvedReport};
use sheet_import_lib::services::resolver::MatchStage;
use sheet_import_lib::services::synthesis::{dedupe, ResolvedRecord};
use sheet_import_lib::types::ImportError;

fn find<'a>(records: &'a [ResolvedRecord], name: &str) -> &'a ResolvedRecord {
    records
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("record '{}' missing", name))
}

async fn import_at(level: u32) -> sheet_import_lib::ImportOutcome {
    init_logger();
    let mut session = ImportSession::new(fixture_catalog(), ImportConfig::default());
    session
        .run_import(monk_document(level))
        .await
        .expect("import should succeed")
}

#[tokio::test]
async fn test_full_import_record_set() {
    let outcome = import_at(5).await;
    let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "Implement Expertise (Ki Focus)",
            "Alertness",
            "Secret Homebrew Feat",
            "Unarmed Combatant",
            "Flurry of Blows (Monk)",
            "Crane's Wings",
            "Irontooths Bite",
            "Melee Basic Attack",
            "Leather Armor +2 Enchantment",
            "Unarmed Strike",
            "Adventurer's Kit",
            "Brew Potion",
            "Human Perseverance",
            "Bonus Feat",
        ]
    );
    assert_eq!(outcome.details.name, "Kaelen");
    assert_eq!(
        outcome.unresolved,
        vec![UnresolvedReport {
            category: Category::Equipment,
            raw_name: "Leather Armor +2 Enchantment Adventurer's Kit".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_composite_slot_record() {
    let outcome = import_at(5).await;
    let armor = find(&outcome.records, "Leather Armor +2 Enchantment");

    assert_eq!(armor.quantity(), Some(1));
    assert!(armor.is_equipped());
    assert_eq!(armor.system["enhance"], 2);
    assert_eq!(armor.system["armorBonus"], 2);
    assert_eq!(armor.system["properties"]["lgt"], true);
    assert_eq!(armor.system["properties"]["mgc"], true);
    assert_eq!(armor.source_id, None);
    assert_eq!(armor.flags.composite_of, vec!["eq-la", "eq-e2"]);
    assert!(armor.flags.equipped_status_set);

    let kit = find(&outcome.records, "Adventurer's Kit");
    assert!(!kit.is_equipped());
    assert_eq!(kit.flags.original_equipped_status, Some(false));
}

#[tokio::test]
async fn test_placeholder_and_fuzzy_provenance() {
    let outcome = import_at(5).await;

    let homebrew = find(&outcome.records, "Secret Homebrew Feat");
    assert!(homebrew.flags.placeholder);
    assert_eq!(homebrew.record_type, "feat");
    assert_eq!(homebrew.flags.original_name.as_deref(), Some("Secret Homebrew Feat"));

    let bite = find(&outcome.records, "Irontooths Bite");
    assert_eq!(bite.flags.matched_by, Some(MatchStage::Fuzzy));
    assert!(!bite.flags.implement_expertise_compat);

    let heritage = find(&outcome.records, "Bonus Feat");
    assert!(heritage.flags.heritage_feature);
    assert_eq!(heritage.source_id.as_deref(), Some("rc-bt"));
}

#[tokio::test]
async fn test_replaced_and_basic_attack_powers_not_resolved() {
    let outcome = import_at(5).await;

    assert!(outcome.records.iter().all(|r| r.name != "Five Storms"));
    let basic = outcome
        .records
        .iter()
        .filter(|r| r.name == "Melee Basic Attack")
        .collect::<Vec<_>>();
    assert_eq!(basic.len(), 1);
    assert_eq!(basic[0].source_id.as_deref(), Some("cp-mba"));
}

#[tokio::test]
async fn test_implement_expertise_scales_with_level() {
    // Unarmed Strike profBonus 3 plus the tiered feat bonus.
    for (level, total) in [(5, 4), (11, 5), (21, 6)] {
        let outcome = import_at(level).await;

        let wings = find(&outcome.records, "Crane's Wings");
        assert_eq!(
            wings.attack_formula(),
            Some(format!("@powerMod+@lvhalf + {total}").as_str()),
            "level {level}"
        );
        assert_eq!(wings.weapon_type(), Some("any"));
        assert_eq!(wings.weapon_use(), Some("default"));
        assert_eq!(wings.flags.implement_expertise_bonus, Some(total));

        let basic = find(&outcome.records, "Melee Basic Attack");
        assert_eq!(
            basic.attack_formula(),
            Some(format!("@powerMod+@lvhalf + {total}").as_str())
        );
    }
}

#[tokio::test]
async fn test_import_is_deterministic() {
    let first = import_at(11).await;
    let second = import_at(11).await;
    assert_eq!(first, second);

    let mut session = ImportSession::new(fixture_catalog(), ImportConfig::default());
    let rerun_a = session.run_import(monk_document(11)).await.unwrap();
    let rerun_b = session.run_import(monk_document(11)).await.unwrap();
    assert_eq!(rerun_a, rerun_b);
    assert_eq!(rerun_a, first);
}

#[tokio::test]
async fn test_output_is_dedupe_fixed_point() {
    let outcome = import_at(5).await;
    let again = dedupe(outcome.records.clone());
    assert_eq!(again, outcome.records);
}

#[tokio::test]
async fn test_missing_feat_catalog_aborts_import() {
    init_logger();
    let mut session = ImportSession::new(MemoryCatalog::new(), ImportConfig::default());

    let err = session.run_import(monk_document(5)).await.unwrap_err();
    assert!(matches!(err, ImportError::CatalogUnavailable(ref id) if id.contains("feats")));
}

#[tokio::test]
async fn test_catalog_from_json_round_trips_through_import() {
    init_logger();
    let json = r#"{
        "dnd-4e-compendium.module-feats": [
            {"_id": "f1", "name": "Toughness", "type": "feat", "system": {}}
        ],
        "dnd-4e-compendium.module-features": []
    }"#;
    let catalog = MemoryCatalog::from_json(json).expect("fixture JSON should parse");
    let mut document = monk_document(1);
    document.references.remove(&Category::Feature);
    document.references.insert(
        Category::Feat,
        vec![sheet_import_lib::types::RawReference::new("Toughness", Category::Feat)],
    );

    let outcome = ImportSession::new(catalog, ImportConfig::default())
        .run_import(document)
        .await
        .expect("import should succeed without optional catalogs");

    let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Toughness"]);
    // Powers, heritage traits and every inventory slot are unresolvable here.
    assert!(outcome
        .unresolved
        .iter()
        .all(|r| r.category != Category::Feat));
}
