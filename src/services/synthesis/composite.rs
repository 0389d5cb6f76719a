//! Composite Item Synthesizer: one inventory slot in, one equipment record out.

use serde_json::{Map, Value};

use super::records::ResolvedRecord;
use crate::services::catalog::{CatalogIndexEntry, CatalogProvider, Category};
use crate::services::config::LookupTables;
use crate::services::resolver::{self, ResolveContext, Resolution};
use crate::types::{CompositeGroup, ImportError, ImportResult, RawReference};

/// The equipment catalog as seen by one synthesis call.
pub struct EquipmentSource<'a, P> {
    pub provider: &'a P,
    pub catalog_id: &'a str,
    pub index: &'a [CatalogIndexEntry],
}

impl<P: CatalogProvider> EquipmentSource<'_, P> {
    async fn load(
        &self,
        reference: &RawReference,
        resolution: Option<Resolution<'_>>,
    ) -> ImportResult<ResolvedRecord> {
        let unresolved = || ImportError::UnresolvedReference {
            name: reference.raw_name.clone(),
            category: Category::Equipment.to_string(),
        };
        let resolution = resolution.ok_or_else(unresolved)?;
        let document = self
            .provider
            .get_document(self.catalog_id, &resolution.entry.id)
            .await
            .ok_or_else(unresolved)?;
        Ok(ResolvedRecord::from_catalog(document).with_match_stage(resolution.stage))
    }
}

/// Resolve and build the record for one slot.
///
/// Every error returned here is recoverable; the caller logs it and drops the
/// slot.
pub async fn synthesize<P: CatalogProvider>(
    group: &CompositeGroup,
    source: &EquipmentSource<'_, P>,
    lookup: &LookupTables,
    ctx: &ResolveContext<'_>,
) -> ImportResult<ResolvedRecord> {
    let mut record = match group.components.as_slice() {
        [item] => {
            let resolution =
                resolver::resolve_equipment(&item.raw_name, source.index, lookup, ctx);
            source.load(item, resolution).await?
        }
        [base, enchantment] => {
            let base_resolution = resolver::resolve(
                &base.raw_name,
                Category::Equipment,
                source.index,
                lookup,
                ctx,
            );
            let enchantment_resolution = resolver::resolve(
                &enchantment.raw_name,
                Category::Equipment,
                source.index,
                lookup,
                ctx,
            );
            // No partial composites: both halves must resolve before either is read.
            if base_resolution.is_none() {
                return Err(ImportError::UnresolvedReference {
                    name: base.raw_name.clone(),
                    category: Category::Equipment.to_string(),
                });
            }
            if enchantment_resolution.is_none() {
                return Err(ImportError::UnresolvedReference {
                    name: enchantment.raw_name.clone(),
                    category: Category::Equipment.to_string(),
                });
            }
            let base_record = source.load(base, base_resolution).await?;
            let enchantment_record = source.load(enchantment, enchantment_resolution).await?;
            merge_records(&base_record, &enchantment_record)?
        }
        components => return Err(ImportError::UnsupportedCompositeShape(components.len())),
    };

    if let Some(base) = group.base() {
        stamp_slot(&mut record, base);
    }
    Ok(record)
}

/// Quantity and equipped state come from the slot's first component only.
pub fn stamp_slot(record: &mut ResolvedRecord, base: &RawReference) {
    let equipped = base.is_equipped();
    record.set_quantity(base.quantity());
    record.set_equipped(equipped);
    record.flags.equipped_status_set = true;
    record.flags.original_equipped_status = Some(equipped);
}

/// Fuse a base item with an enchantment. Enchantment fields win on conflict;
/// property tags are unioned.
pub fn merge_records(
    base: &ResolvedRecord,
    enchantment: &ResolvedRecord,
) -> ImportResult<ResolvedRecord> {
    let base_system = system_map(base)?;
    let enchantment_system = system_map(enchantment)?;

    let mut system = base_system.clone();
    for (key, value) in &enchantment_system {
        if key == "properties" {
            continue;
        }
        merge_into(system.entry(key.clone()).or_insert(Value::Null), value);
    }

    if let Some(properties) = union_properties(
        base_system.get("properties"),
        enchantment_system.get("properties"),
    ) {
        system.insert("properties".into(), properties);
    }

    let mut merged = base.clone();
    merged.name = format!("{} {}", base.name, enchantment.name);
    merged.system = Value::Object(system);
    merged.source_id = None;
    merged.flags.matched_by = None;
    merged.flags.composite_of = base
        .source_id
        .iter()
        .chain(enchantment.source_id.iter())
        .cloned()
        .collect();
    Ok(merged)
}

fn system_map(record: &ResolvedRecord) -> ImportResult<Map<String, Value>> {
    match &record.system {
        Value::Object(map) => Ok(map.clone()),
        Value::Null => Ok(Map::new()),
        other => Err(ImportError::MergeFailure(format!(
            "'{}' has non-object content ({})",
            record.name,
            value_kind(other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Recursive overlay: objects merge key by key, anything else is replaced.
pub fn merge_into(target: &mut Value, overlay: &Value) {
    match (target, overlay) {
        (Value::Object(target), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_into(target.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target, overlay) => *target = overlay.clone(),
    }
}

fn union_properties(base: Option<&Value>, enchantment: Option<&Value>) -> Option<Value> {
    match (base, enchantment) {
        (Some(Value::Object(base)), Some(Value::Object(enchantment))) => {
            let mut union = base.clone();
            for (key, value) in enchantment {
                union.insert(key.clone(), value.clone());
            }
            Some(Value::Object(union))
        }
        (Some(Value::Array(base)), Some(Value::Array(enchantment))) => {
            let mut union = base.clone();
            for value in enchantment {
                if !union.contains(value) {
                    union.push(value.clone());
                }
            }
            Some(Value::Array(union))
        }
        (base, Some(Value::Null) | None) => base.cloned(),
        (_, enchantment) => enchantment.cloned(),
    }
}

#[cfg(test)]
#[path = "tests/composite_tests.rs"]
mod tests;
