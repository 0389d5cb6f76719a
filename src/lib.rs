//! Character sheet import engine.
//!
//! Resolves loosely named sheet references (feats, features, powers,
//! inventory slots, rituals, heritage traits) against a read-only catalog,
//! synthesizes composite equipment, patches eligible powers and returns one
//! deduplicated record list per import.
pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

pub use services::catalog::{CatalogProvider, Category};
pub use services::config::ImportConfig;
pub use services::importer::{ImportOutcome, ImportSession, SourceDocument};
pub use services::synthesis::ResolvedRecord;
pub use types::{ImportError, ImportResult};
