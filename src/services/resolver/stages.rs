//! Ordered matching stages. Each stage is a pure function over the catalog
//! index; a chain is tried front to back and the first hit wins.

use serde::{Deserialize, Serialize};

use crate::services::catalog::CatalogIndexEntry;
use crate::services::config::DisambiguationPolicy;
use crate::services::resolver::disambiguator;
use crate::services::resolver::normalizer::{
    literal_pattern, normalize_heritage_name, prefix_pattern, significant_words,
    strip_trailing_parenthetical, word_pair_pattern,
};
use crate::services::resolver::similarity::normalized_similarity;

/// Tier suffixes used on sheets, mapped to the catalog's level suffix.
pub const TIER_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("(paragon tier)", "(Level 12)"),
    ("(epic tier)", "(Level 22)"),
    ("(heroic tier)", "(Level 2)"),
];

/// Which stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStage {
    Exact,
    TierSubstitution,
    Pattern,
    NormalizedPattern,
    SignificantWord,
    Fuzzy,
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStage::Exact => write!(f, "Exact"),
            MatchStage::TierSubstitution => write!(f, "TierSubstitution"),
            MatchStage::Pattern => write!(f, "Pattern"),
            MatchStage::NormalizedPattern => write!(f, "NormalizedPattern"),
            MatchStage::SignificantWord => write!(f, "SignificantWord"),
            MatchStage::Fuzzy => write!(f, "Fuzzy"),
        }
    }
}

/// Inputs shared by every stage of one lookup.
#[derive(Debug, Clone, Copy)]
pub struct StageQuery<'a> {
    /// Name as it appeared on the sheet.
    pub raw_name: &'a str,
    /// Name after the alias table.
    pub resolved_name: &'a str,
    pub classes: &'a [String],
    pub policy: &'a DisambiguationPolicy,
    pub fuzzy_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageHit<'i> {
    pub entry: &'i CatalogIndexEntry,
    /// 1.0 for deterministic stages, the similarity for fuzzy hits.
    pub score: f64,
}

impl<'i> StageHit<'i> {
    fn certain(entry: &'i CatalogIndexEntry) -> Self {
        Self { entry, score: 1.0 }
    }
}

pub type StageFn = for<'i> fn(&StageQuery<'_>, &'i [CatalogIndexEntry]) -> Option<StageHit<'i>>;

#[derive(Clone, Copy)]
pub struct Stage {
    pub kind: MatchStage,
    pub run: StageFn,
}

/// exact → pattern → normalized pattern → fuzzy.
pub const GENERIC_STAGES: &[Stage] = &[
    Stage {
        kind: MatchStage::Exact,
        run: exact_stage,
    },
    Stage {
        kind: MatchStage::Pattern,
        run: pattern_stage,
    },
    Stage {
        kind: MatchStage::NormalizedPattern,
        run: normalized_pattern_stage,
    },
    Stage {
        kind: MatchStage::Fuzzy,
        run: fuzzy_stage,
    },
];

/// Lone inventory items: tier substitution after the exact stage, and the
/// significant-word fallback once fuzzy has failed.
pub const EQUIPMENT_STAGES: &[Stage] = &[
    Stage {
        kind: MatchStage::Exact,
        run: exact_stage,
    },
    Stage {
        kind: MatchStage::TierSubstitution,
        run: tier_substitution_stage,
    },
    Stage {
        kind: MatchStage::Pattern,
        run: pattern_stage,
    },
    Stage {
        kind: MatchStage::NormalizedPattern,
        run: normalized_pattern_stage,
    },
    Stage {
        kind: MatchStage::Fuzzy,
        run: fuzzy_stage,
    },
    Stage {
        kind: MatchStage::SignificantWord,
        run: significant_word_stage,
    },
];

/// Racial traits: transliterated comparison, shortest pattern match wins.
pub const HERITAGE_STAGES: &[Stage] = &[
    Stage {
        kind: MatchStage::Exact,
        run: heritage_exact_stage,
    },
    Stage {
        kind: MatchStage::Pattern,
        run: heritage_pattern_stage,
    },
    Stage {
        kind: MatchStage::NormalizedPattern,
        run: heritage_normalized_pattern_stage,
    },
];

/// Run `stages` in order; the first stage returning a hit wins.
pub fn run_stages<'i>(
    stages: &[Stage],
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<(MatchStage, StageHit<'i>)> {
    stages.iter().find_map(|stage| {
        let hit = (stage.run)(query, index)?;
        #[cfg(feature = "debug_resolver")]
        log::debug!(
            "[RESOLVER_TRACE] '{}' → '{}' via {} (score={:.3})",
            query.raw_name,
            hit.entry.name,
            stage.kind,
            hit.score
        );
        Some((stage.kind, hit))
    })
}

// ── Generic stages ──

/// Name equals the resolved name, or equals it once the catalog name's
/// trailing parenthetical is removed. A verbatim match beats a stripped one.
pub fn exact_stage<'i>(
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    let wanted = query.resolved_name;
    index
        .iter()
        .find(|entry| entry.name == wanted)
        .or_else(|| {
            index
                .iter()
                .find(|entry| strip_trailing_parenthetical(&entry.name) == wanted)
        })
        .map(StageHit::certain)
}

/// Case-insensitive literal containment of the resolved name.
pub fn pattern_stage<'i>(
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    pattern_with_disambiguation(query, query.resolved_name, index)
}

/// Same as `pattern_stage` after removing the resolved name's own trailing
/// parenthetical. Skipped when that removal changes nothing.
pub fn normalized_pattern_stage<'i>(
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    let normalized = strip_trailing_parenthetical(query.resolved_name);
    if normalized == query.resolved_name.trim() {
        return None;
    }
    pattern_with_disambiguation(query, &normalized, index)
}

/// Best whole-name similarity over the index; accepted only above the
/// threshold. The first maximum encountered wins.
pub fn fuzzy_stage<'i>(
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    let mut best: Option<StageHit<'i>> = None;

    for entry in index {
        let score = normalized_similarity(query.resolved_name, &entry.name);
        if best.is_none_or(|b| score > b.score) {
            best = Some(StageHit { entry, score });
        }
    }

    best.filter(|hit| hit.score > query.fuzzy_threshold)
}

fn pattern_with_disambiguation<'i>(
    query: &StageQuery<'_>,
    text: &str,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    let pattern = literal_pattern(text)?;
    let matches: Vec<&'i CatalogIndexEntry> = index
        .iter()
        .filter(|entry| pattern.is_match(&entry.name))
        .collect();
    disambiguator::select(&matches, query.classes, query.policy).map(StageHit::certain)
}

// ── Equipment stages ──

/// Swap a sheet tier suffix for the catalog level suffix and look the result
/// up exactly.
pub fn tier_substitution_stage<'i>(
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    TIER_SUBSTITUTIONS.iter().find_map(|(tier, level)| {
        if !query.raw_name.contains(tier) {
            return None;
        }
        let substituted = query.raw_name.replace(tier, level);
        index
            .iter()
            .find(|entry| entry.name == substituted)
            .map(StageHit::certain)
    })
}

/// Adjacent pairs of significant words, then the first significant word as
/// a name prefix. Only used when the name has at least two such words.
pub fn significant_word_stage<'i>(
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    let words = significant_words(query.resolved_name);
    if words.len() < 2 {
        return None;
    }

    let select_matching = |pattern: regex::Regex| -> Option<StageHit<'i>> {
        let matches: Vec<&'i CatalogIndexEntry> = index
            .iter()
            .filter(|entry| pattern.is_match(&entry.name))
            .collect();
        disambiguator::select(&matches, query.classes, query.policy).map(StageHit::certain)
    };

    words
        .windows(2)
        .find_map(|pair| word_pair_pattern(pair[0], pair[1]).and_then(&select_matching))
        .or_else(|| prefix_pattern(words[0]).and_then(&select_matching))
}

// ── Heritage stages ──

pub fn heritage_exact_stage<'i>(
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    let wanted = normalize_heritage_name(query.resolved_name);
    index
        .iter()
        .find(|entry| normalize_heritage_name(&entry.name) == wanted)
        .map(StageHit::certain)
}

pub fn heritage_pattern_stage<'i>(
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    shortest_heritage_match(&normalize_heritage_name(query.resolved_name), index)
}

pub fn heritage_normalized_pattern_stage<'i>(
    query: &StageQuery<'_>,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    let normalized = normalize_heritage_name(query.resolved_name);
    let stripped = strip_trailing_parenthetical(&normalized);
    if stripped == normalized {
        return None;
    }
    shortest_heritage_match(&stripped, index)
}

fn shortest_heritage_match<'i>(
    text: &str,
    index: &'i [CatalogIndexEntry],
) -> Option<StageHit<'i>> {
    let pattern = literal_pattern(text)?;
    index
        .iter()
        .filter(|entry| pattern.is_match(&normalize_heritage_name(&entry.name)))
        .min_by_key(|entry| entry.name.chars().count())
        .map(StageHit::certain)
}

#[cfg(test)]
#[path = "tests/stages_tests.rs"]
mod tests;
