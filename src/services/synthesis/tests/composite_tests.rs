use super::*;
use crate::services::catalog::{CatalogRecord, MemoryCatalog};
use crate::services::config::ImportConfig;
use serde_json::json;

const EQUIPMENT: &str = "equipment";

fn item(id: &str, name: &str, system: Value) -> CatalogRecord {
    CatalogRecord {
        id: id.into(),
        name: name.into(),
        record_type: "equipment".into(),
        img: None,
        system,
    }
}

fn catalog() -> MemoryCatalog {
    MemoryCatalog::new().with_catalog(
        EQUIPMENT,
        vec![
            item(
                "e1",
                "Leather Armor",
                json!({"armorBonus": 2, "enhance": 0, "properties": {"light": true}}),
            ),
            item(
                "e2",
                "+2 Enchantment",
                json!({"enhance": 2, "properties": {"magic": true}}),
            ),
            item("e3", "Belt of Vigor (Level 12)", json!({"level": 12})),
            item("e4", "Longsword", json!({"damage": {"dice": 1, "die": "d8"}})),
        ],
    )
}

fn slot(name: &str, count: u32, equip_count: u32) -> RawReference {
    RawReference::new(name, Category::Equipment).with_counts(count, equip_count)
}

async fn run(group: &CompositeGroup) -> ImportResult<ResolvedRecord> {
    let catalog = catalog();
    let index = catalog.get_index(EQUIPMENT).await.unwrap_or_default();
    let config = ImportConfig::default();
    let ctx = ResolveContext::from_config(&config, &[]);
    let source = EquipmentSource {
        provider: &catalog,
        catalog_id: EQUIPMENT,
        index: &index,
    };
    synthesize(group, &source, &config.lookup, &ctx).await
}

#[tokio::test]
async fn test_base_plus_enchantment() {
    let group = CompositeGroup::with_enchantment(
        slot("Leather Armor", 1, 1),
        slot("+2 Enchantment", 1, 1),
    );

    let record = run(&group).await.unwrap();

    assert_eq!(record.name, "Leather Armor +2 Enchantment");
    assert_eq!(record.quantity(), Some(1));
    assert!(record.is_equipped());
    assert_eq!(record.system["enhance"], 2);
    assert_eq!(record.system["armorBonus"], 2);
    assert_eq!(record.system["properties"], json!({"light": true, "magic": true}));
    assert_eq!(record.source_id, None);
    assert_eq!(record.flags.composite_of, vec!["e1", "e2"]);
    assert!(record.flags.equipped_status_set);
    assert_eq!(record.flags.original_equipped_status, Some(true));
}

#[tokio::test]
async fn test_slot_state_comes_from_base_only() {
    let group = CompositeGroup::with_enchantment(
        slot("Leather Armor", 3, 0),
        slot("+2 Enchantment", 1, 1),
    );

    let record = run(&group).await.unwrap();
    assert_eq!(record.quantity(), Some(3));
    assert!(!record.is_equipped());
    assert_eq!(record.flags.original_equipped_status, Some(false));
}

#[tokio::test]
async fn test_single_item_with_tier_suffix() {
    let group = CompositeGroup::single(slot("Belt of Vigor (paragon tier)", 0, 1));

    let record = run(&group).await.unwrap();
    assert_eq!(record.name, "Belt of Vigor (Level 12)");
    assert_eq!(record.source_id.as_deref(), Some("e3"));
    assert_eq!(record.quantity(), Some(1));
    assert!(record.is_equipped());
}

#[tokio::test]
async fn test_no_partial_composite() {
    let group = CompositeGroup::with_enchantment(
        slot("Leather Armor", 1, 1),
        slot("Vorpal Enchantment", 1, 1),
    );

    let err = run(&group).await.unwrap_err();
    assert!(matches!(
        err,
        ImportError::UnresolvedReference { ref name, .. } if name == "Vorpal Enchantment"
    ));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_oversized_group_rejected() {
    let group = CompositeGroup::new(vec![
        slot("Leather Armor", 1, 1),
        slot("+2 Enchantment", 1, 1),
        slot("Longsword", 1, 1),
    ]);

    let err = run(&group).await.unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedCompositeShape(3)));
    assert!(err.is_recoverable());
}

#[test]
fn test_merge_rejects_scalar_content() {
    let base = ResolvedRecord::from_catalog(item("e1", "Leather Armor", json!({})));
    let broken = ResolvedRecord::from_catalog(item("e9", "Broken", json!("oops")));

    let err = merge_records(&base, &broken).unwrap_err();
    assert!(matches!(err, ImportError::MergeFailure(_)));
}

#[test]
fn test_merge_into_is_deep() {
    let mut target = json!({"damage": {"dice": 1, "die": "d8"}, "weight": 4});
    merge_into(&mut target, &json!({"damage": {"die": "d10"}}));

    assert_eq!(target, json!({"damage": {"dice": 1, "die": "d10"}, "weight": 4}));
}

#[test]
fn test_array_properties_union_in_order() {
    let base = ResolvedRecord::from_catalog(item("e1", "Staff", json!({"properties": ["two", "imp"]})));
    let ench = ResolvedRecord::from_catalog(item("e2", "+1 Enchantment", json!({"properties": ["imp", "mag"]})));

    let merged = merge_records(&base, &ench).unwrap();
    assert_eq!(merged.system["properties"], json!(["two", "imp", "mag"]));
}
