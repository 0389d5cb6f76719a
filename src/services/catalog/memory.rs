use std::collections::BTreeMap;

use crate::services::catalog::models::{CatalogIndexEntry, CatalogRecord};
use crate::services::catalog::CatalogProvider;
use crate::types::ImportResult;

/// In-memory catalog provider keyed by catalog id.
///
/// Index order is insertion order, which keeps pattern and fuzzy stages
/// deterministic for a given fixture.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    catalogs: BTreeMap<String, Vec<CatalogRecord>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a whole catalog.
    pub fn with_catalog(mut self, catalog_id: &str, records: Vec<CatalogRecord>) -> Self {
        self.insert_catalog(catalog_id, records);
        self
    }

    pub fn insert_catalog(&mut self, catalog_id: &str, records: Vec<CatalogRecord>) {
        self.catalogs
            .entry(catalog_id.to_string())
            .or_default()
            .extend(records);
    }

    pub fn catalog_ids(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    /// Load from a JSON object of the form `{"<catalog id>": [record, ...]}`.
    /// Malformed input is a `Config` error.
    pub fn from_json(json: &str) -> ImportResult<Self> {
        let catalogs: BTreeMap<String, Vec<CatalogRecord>> = serde_json::from_str(json)?;

        for (catalog_id, records) in &catalogs {
            log::debug!("Loaded catalog '{}' ({} records)", catalog_id, records.len());
        }

        Ok(Self { catalogs })
    }
}

impl CatalogProvider for MemoryCatalog {
    async fn get_index(&self, catalog_id: &str) -> Option<Vec<CatalogIndexEntry>> {
        self.catalogs
            .get(catalog_id)
            .map(|records| records.iter().map(CatalogRecord::index_entry).collect())
    }

    async fn get_document(&self, catalog_id: &str, id: &str) -> Option<CatalogRecord> {
        self.catalogs
            .get(catalog_id)?
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }
}

#[cfg(test)]
#[path = "tests/memory_tests.rs"]
mod tests;
