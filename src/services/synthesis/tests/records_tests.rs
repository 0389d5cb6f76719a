use super::*;

fn catalog_record(system: Value) -> CatalogRecord {
    CatalogRecord {
        id: "w1".into(),
        name: "Dagger".into(),
        record_type: "weapon".into(),
        img: None,
        system,
    }
}

#[test]
fn test_from_catalog_keeps_source_id() {
    let record = ResolvedRecord::from_catalog(catalog_record(json!({"profBonus": 3})));
    assert_eq!(record.source_id.as_deref(), Some("w1"));
    assert_eq!(record.prof_bonus(), 3);
    assert!(!record.is_equipped());
    assert_eq!(record.quantity(), None);
}

#[test]
fn test_setters_create_system_object() {
    let mut record = ResolvedRecord::from_catalog(catalog_record(Value::Null));
    record.set_quantity(2);
    record.set_equipped(true);
    record.set_attack_formula("@wisMod".into());

    assert_eq!(record.quantity(), Some(2));
    assert!(record.is_equipped());
    assert_eq!(record.attack_formula(), Some("@wisMod"));
}

#[test]
fn test_prof_bonus_tolerates_strings() {
    let record = ResolvedRecord::from_catalog(catalog_record(json!({"profBonus": "2"})));
    assert_eq!(record.prof_bonus(), 2);
    let record = ResolvedRecord::from_catalog(catalog_record(json!({"profBonus": "x"})));
    assert_eq!(record.prof_bonus(), 0);
}

#[test]
fn test_flags_serialize_sparse() {
    let mut record = ResolvedRecord::from_catalog(catalog_record(json!({})));
    record.flags.heritage_feature = true;

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["flags"], json!({"heritageFeature": true}));
    assert_eq!(value["type"], "weapon");
    assert_eq!(value["sourceId"], "w1");
}
