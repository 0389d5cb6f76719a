//! Read-only reference catalog seam.
//!
//! The engine only ever reads through `CatalogProvider`; every record it
//! annotates is a copy.
pub mod memory;
pub mod models;

pub use memory::MemoryCatalog;
pub use models::{CatalogIndexEntry, CatalogRecord, Category};

/// Source of catalog listings and documents, queried per catalog id.
///
/// `None` from `get_index` means the catalog does not exist; `None` from
/// `get_document` means the id is not in that catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogProvider {
    async fn get_index(&self, catalog_id: &str) -> Option<Vec<CatalogIndexEntry>>;

    async fn get_document(&self, catalog_id: &str, id: &str) -> Option<CatalogRecord>;
}
