//! Stand-in records for references the catalog cannot resolve yet.

use serde_json::json;

use super::records::{ImportFlags, ResolvedRecord};

pub const PLACEHOLDER_IMG: &str = "icons/svg/mystery-man.svg";
pub const PLACEHOLDER_SOURCE: &str = "Placeholder";

/// Record type implied by a catalog id string.
pub fn infer_record_type(catalog_id: &str) -> &'static str {
    if catalog_id.contains("features") {
        "feature"
    } else if catalog_id.contains("powers") {
        "power"
    } else if catalog_id.contains("equipment") {
        "equipment"
    } else if catalog_id.contains("rituals") {
        "ritual"
    } else {
        "feat"
    }
}

/// Build a provisional record for `raw_name`, flagged for reconciliation on a
/// later import once the catalog carries the entry.
pub fn make_placeholder(raw_name: &str, catalog_id: &str) -> ResolvedRecord {
    let description = format!(
        "<p><em>Placeholder for: {raw_name}</em></p>\
         <p>This item was not found in the compendium. It will be updated when \
         the compendium is updated and the character is re-imported.</p>"
    );

    ResolvedRecord {
        name: raw_name.to_string(),
        record_type: infer_record_type(catalog_id).to_string(),
        img: Some(PLACEHOLDER_IMG.to_string()),
        system: json!({
            "description": {
                "value": description,
                "chat": "",
                "unidentified": ""
            },
            "source": PLACEHOLDER_SOURCE,
            "level": 0
        }),
        source_id: None,
        flags: ImportFlags {
            placeholder: true,
            original_name: Some(raw_name.to_string()),
            ..ImportFlags::default()
        },
    }
}

#[cfg(test)]
#[path = "tests/placeholder_tests.rs"]
mod tests;
