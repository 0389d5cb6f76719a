//! Choose among several same-stage candidates using class context.

use crate::services::catalog::CatalogIndexEntry;
use crate::services::config::{DisambiguationPolicy, DisambiguationRule};

/// Class tokens for matching: each class name with the policy's strip words
/// ("Class", "Hybrid") removed, lowercased, blanks dropped.
pub fn class_tokens(classes: &[String], policy: &DisambiguationPolicy) -> Vec<String> {
    classes
        .iter()
        .map(|class| {
            class
                .split_whitespace()
                .filter(|word| {
                    !policy
                        .class_strip_words
                        .iter()
                        .any(|strip| strip.eq_ignore_ascii_case(word))
                })
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Pick one candidate. Candidates are ranked by name length (longest first,
/// ties keep catalog order) and the policy rules are tried in order; the
/// first rule that finds a candidate wins. Falls back to the longest name.
///
/// Returns `None` only for an empty candidate list.
pub fn select<'i>(
    candidates: &[&'i CatalogIndexEntry],
    classes: &[String],
    policy: &DisambiguationPolicy,
) -> Option<&'i CatalogIndexEntry> {
    match candidates {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }

    let mut ranked: Vec<&'i CatalogIndexEntry> = candidates.to_vec();
    ranked.sort_by(|a, b| b.name.chars().count().cmp(&a.name.chars().count()));

    let tokens = class_tokens(classes, policy);
    let hybrid_marker = policy.hybrid_marker.to_lowercase();

    for rule in &policy.rules {
        let chosen = match rule {
            DisambiguationRule::ClassToken => ranked.iter().copied().find(|entry| {
                let name = entry.name.to_lowercase();
                tokens.iter().any(|token| name.contains(token.as_str()))
            }),
            DisambiguationRule::NonHybrid => ranked
                .iter()
                .copied()
                .find(|entry| !entry.name.to_lowercase().contains(&hybrid_marker)),
            DisambiguationRule::Longest => ranked.first().copied(),
        };
        if let Some(entry) = chosen {
            #[cfg(feature = "debug_resolver")]
            log::debug!(
                "[RESOLVER_TRACE] disambiguate: rule={:?} chose='{}' among {}",
                rule,
                entry.name,
                ranked.len()
            );
            return Some(entry);
        }
    }

    ranked.first().copied()
}

#[cfg(test)]
#[path = "tests/disambiguator_tests.rs"]
mod tests;
