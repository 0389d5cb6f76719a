//! Record synthesis: catalog copies, composite equipment, placeholders and
//! duplicate suppression.
pub mod composite;
pub mod dedup;
pub mod placeholder;
pub mod records;

pub use composite::{merge_records, synthesize, EquipmentSource};
pub use dedup::{dedupe, DedupTracker};
pub use placeholder::make_placeholder;
pub use records::{ImportFlags, ResolvedRecord};
