//! Name resolution: turns a loose sheet name into one catalog index entry.
//!
//! Runs an ordered chain of stages (exact → pattern → normalized pattern →
//! fuzzy, with equipment and heritage variants) against a single catalog
//! index. A `None` result is an expected outcome; callers decide whether to
//! warn, drop, or substitute a placeholder.
pub mod disambiguator;
pub mod normalizer;
pub mod similarity;
pub mod stages;

pub use stages::{MatchStage, StageHit, StageQuery, EQUIPMENT_STAGES, GENERIC_STAGES, HERITAGE_STAGES};

use crate::services::catalog::{CatalogIndexEntry, Category};
use crate::services::config::{DisambiguationPolicy, ImportConfig, LookupTables};
use stages::{run_stages, Stage};

/// Build-wide context for disambiguation and fuzzy acceptance.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub classes: &'a [String],
    pub policy: &'a DisambiguationPolicy,
    pub fuzzy_threshold: f64,
}

impl<'a> ResolveContext<'a> {
    pub fn from_config(config: &'a ImportConfig, classes: &'a [String]) -> Self {
        Self {
            classes,
            policy: &config.disambiguation,
            fuzzy_threshold: config.fuzzy_threshold,
        }
    }
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'i> {
    pub entry: &'i CatalogIndexEntry,
    pub stage: MatchStage,
    pub score: f64,
    /// The name actually searched for (after the alias table).
    pub resolved_name: String,
}

/// Resolve through the generic chain.
pub fn resolve<'i>(
    raw_name: &str,
    category: Category,
    index: &'i [CatalogIndexEntry],
    lookup: &LookupTables,
    ctx: &ResolveContext<'_>,
) -> Option<Resolution<'i>> {
    resolve_with(GENERIC_STAGES, raw_name, category, index, lookup, ctx)
}

/// Resolve a lone inventory item through the extended equipment chain.
pub fn resolve_equipment<'i>(
    raw_name: &str,
    index: &'i [CatalogIndexEntry],
    lookup: &LookupTables,
    ctx: &ResolveContext<'_>,
) -> Option<Resolution<'i>> {
    resolve_with(
        EQUIPMENT_STAGES,
        raw_name,
        Category::Equipment,
        index,
        lookup,
        ctx,
    )
}

/// Resolve a racial trait name (no alias table).
pub fn resolve_heritage<'i>(
    raw_name: &str,
    index: &'i [CatalogIndexEntry],
    ctx: &ResolveContext<'_>,
) -> Option<Resolution<'i>> {
    resolve_with(
        HERITAGE_STAGES,
        raw_name,
        Category::Heritage,
        index,
        &LookupTables::default(),
        ctx,
    )
}

pub fn resolve_with<'i>(
    stages: &[Stage],
    raw_name: &str,
    category: Category,
    index: &'i [CatalogIndexEntry],
    lookup: &LookupTables,
    ctx: &ResolveContext<'_>,
) -> Option<Resolution<'i>> {
    let resolved_name = lookup.resolve(category, raw_name);
    let query = StageQuery {
        raw_name,
        resolved_name,
        classes: ctx.classes,
        policy: ctx.policy,
        fuzzy_threshold: ctx.fuzzy_threshold,
    };

    let (stage, hit) = run_stages(stages, &query, index)?;
    Some(Resolution {
        entry: hit.entry,
        stage,
        score: hit.score,
        resolved_name: resolved_name.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
