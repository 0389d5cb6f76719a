//! Import orchestration over a `CatalogProvider`.
pub mod models;
pub mod session;

pub use models::{CharacterDetails, ImportOutcome, SourceDocument, UnresolvedReport};
pub use session::{retained_powers, ImportSession, BASIC_ATTACKS};
