//! Conditional Enhancement Pipeline: detect implement expertise once, then
//! patch eligible power attack formulas.
pub mod conditions;
pub mod patch;

pub use conditions::{detect_conditions, ConditionSet};
pub use patch::enhance;

use crate::services::synthesis::ResolvedRecord;

/// Resolved build state the pipeline reads.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub equipment: &'a [ResolvedRecord],
    pub feats: &'a [ResolvedRecord],
    pub features: &'a [ResolvedRecord],
    pub classes: &'a [String],
    pub level: u32,
}

impl BuildContext<'_> {
    pub fn conditions(&self) -> ConditionSet {
        detect_conditions(
            self.equipment,
            self.feats,
            self.features,
            self.classes,
            self.level,
        )
    }
}

/// Detect and apply in one step.
pub fn enhance_powers(powers: Vec<ResolvedRecord>, build: &BuildContext<'_>) -> Vec<ResolvedRecord> {
    let conditions = build.conditions();
    enhance(powers, &conditions, build.equipment)
}
