//! Order-preserving duplicate suppression by display name and catalog id.

use std::collections::HashSet;

use super::records::ResolvedRecord;

/// Seen names and source ids. One tracker per `dedupe` call; the session
/// owns a separate one for consumed catalog ids.
#[derive(Debug, Default)]
pub struct DedupTracker {
    names: HashSet<String>,
    ids: HashSet<String>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Records `record` and returns `true` if it was not seen before.
    pub fn admit(&mut self, record: &ResolvedRecord) -> bool {
        if self.has_name(&record.name) {
            return false;
        }
        if let Some(id) = &record.source_id {
            if self.has_id(id) {
                return false;
            }
            self.ids.insert(id.clone());
        }
        self.names.insert(record.name.clone());
        true
    }
}

/// First occurrence wins. Placeholders carry no source id and so only
/// collide by name.
pub fn dedupe(records: Vec<ResolvedRecord>) -> Vec<ResolvedRecord> {
    let mut tracker = DedupTracker::new();
    let before = records.len();
    let kept: Vec<ResolvedRecord> = records
        .into_iter()
        .filter(|record| tracker.admit(record))
        .collect();

    if kept.len() < before {
        log::debug!("Dedupe dropped {} duplicate records", before - kept.len());
    }
    kept
}

#[cfg(test)]
#[path = "tests/dedup_tests.rs"]
mod tests;
