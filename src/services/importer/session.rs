//! One import run: resolves every reference category against the catalog
//! and assembles the final deduplicated record list.

use std::collections::{HashMap, HashSet};

use super::models::{CharacterDetails, ImportOutcome, SourceDocument, UnresolvedReport};
use crate::services::catalog::{CatalogIndexEntry, CatalogProvider, Category};
use crate::services::config::{ImportConfig, LookupTables};
use crate::services::enhancement::{self, BuildContext};
use crate::services::resolver::{self, ResolveContext};
use crate::services::synthesis::composite::stamp_slot;
use crate::services::synthesis::{
    dedupe, make_placeholder, synthesize, DedupTracker, EquipmentSource, ResolvedRecord,
};
use crate::types::{CompositeGroup, ImportError, ImportResult, RawReference};

/// Powers every character gets from the core-powers catalog.
pub const BASIC_ATTACKS: &[&str] = &[
    "Melee Basic Attack",
    "Ranged Basic Attack",
    "Bull Rush Attack",
    "Grab Attack",
    "Opportunity Attack",
    "Second Wind",
];

/// Catalogs searched for special items, in order.
const SPECIAL_ITEM_SOURCES: &[Category] = &[Category::Feature, Category::Equipment, Category::Feat];

/// Catalogs searched for heritage traits, in order.
const HERITAGE_SOURCES: &[Category] = &[Category::Feature, Category::Race];

/// Categories fetched only when the config names a catalog for them.
const OPTIONAL_CATEGORIES: &[Category] = &[
    Category::Class,
    Category::Path,
    Category::Destiny,
    Category::Theme,
    Category::Background,
];

/// Power references worth resolving: retrained-away powers and basic attacks
/// are dropped.
pub fn retained_powers(references: &[RawReference]) -> Vec<&RawReference> {
    let replaced: HashSet<&str> = references
        .iter()
        .filter_map(|r| r.replaces_id.as_deref())
        .collect();

    references
        .iter()
        .filter(|r| {
            !r.element_id
                .as_deref()
                .is_some_and(|id| replaced.contains(id))
        })
        .filter(|r| !BASIC_ATTACKS.contains(&r.raw_name.as_str()))
        .collect()
}

/// Resolves references for one character. Per-run tracking lives here and is
/// reset by `run_import`.
pub struct ImportSession<P> {
    provider: P,
    config: ImportConfig,
    classes: Vec<String>,
    consumed: HashMap<Category, HashSet<String>>,
    unresolved: Vec<UnresolvedReport>,
}

impl<P: CatalogProvider> ImportSession<P> {
    pub fn new(provider: P, config: ImportConfig) -> Self {
        Self {
            provider,
            config,
            classes: Vec::new(),
            consumed: HashMap::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// References dropped so far in this run.
    pub fn unresolved(&self) -> &[UnresolvedReport] {
        &self.unresolved
    }

    fn reset(&mut self, details: &CharacterDetails) {
        self.classes = details.classes.clone();
        self.consumed.clear();
        self.unresolved.clear();
    }

    fn report_unresolved(&mut self, category: Category, raw_name: &str) {
        self.unresolved.push(UnresolvedReport {
            category,
            raw_name: raw_name.to_string(),
        });
    }

    /// Catalog id and index for `category`, `None` if either is missing.
    async fn catalog(&self, category: Category) -> Option<(String, Vec<CatalogIndexEntry>)> {
        let catalog_id = self.config.catalog_id(category)?;
        let index = self.provider.get_index(catalog_id).await?;
        Some((catalog_id.to_string(), index))
    }

    /// Resolve `references` against the catalog configured for `category`.
    ///
    /// Fails with `CatalogUnavailable` when that catalog does not exist.
    /// Unresolved names become placeholders when `create_placeholders` is set
    /// and are otherwise dropped with a warning.
    pub async fn fetch_items(
        &mut self,
        category: Category,
        references: &[RawReference],
        create_placeholders: bool,
    ) -> ImportResult<Vec<ResolvedRecord>> {
        let (records, dropped) = self
            .fetch_from(category, category, references, create_placeholders, true)
            .await?;
        for raw_name in dropped {
            self.report_unresolved(category, &raw_name);
        }
        Ok(records)
    }

    /// `fetch_items` against `catalog_category`, tracking consumed ids under
    /// `tracking`. Alias tables apply only when `use_aliases` is set.
    /// Returns the records and the raw names that were dropped.
    async fn fetch_from(
        &mut self,
        catalog_category: Category,
        tracking: Category,
        references: &[RawReference],
        create_placeholders: bool,
        use_aliases: bool,
    ) -> ImportResult<(Vec<ResolvedRecord>, Vec<String>)> {
        let Some((catalog_id, index)) = self.catalog(catalog_category).await else {
            return Err(ImportError::CatalogUnavailable(
                self.config
                    .catalog_id(catalog_category)
                    .unwrap_or(catalog_category.as_str())
                    .to_string(),
            ));
        };

        let no_aliases = LookupTables::default();
        let lookup = if use_aliases {
            &self.config.lookup
        } else {
            &no_aliases
        };
        let ctx = ResolveContext::from_config(&self.config, &self.classes);
        let mut tracker = DedupTracker::new();
        let mut results = Vec::new();
        let mut dropped = Vec::new();

        for reference in references {
            let Some(resolution) = resolver::resolve(
                &reference.raw_name,
                catalog_category,
                &index,
                lookup,
                &ctx,
            ) else {
                if create_placeholders {
                    log::warn!(
                        "{} not found: {}. Creating placeholder.",
                        catalog_category,
                        reference.raw_name
                    );
                    let placeholder = make_placeholder(&reference.raw_name, &catalog_id);
                    if tracker.admit(&placeholder) {
                        results.push(placeholder);
                    }
                } else {
                    log::warn!("{} not found: {}", catalog_category, reference.raw_name);
                    dropped.push(reference.raw_name.clone());
                }
                continue;
            };

            let consumed = self.consumed.entry(tracking).or_default();
            if consumed.contains(&resolution.entry.id) {
                log::debug!(
                    "Skipping '{}': '{}' already imported",
                    reference.raw_name,
                    resolution.entry.name
                );
                continue;
            }

            let Some(document) = self
                .provider
                .get_document(&catalog_id, &resolution.entry.id)
                .await
            else {
                log::warn!(
                    "{} '{}' is listed but could not be read",
                    catalog_category,
                    resolution.entry.name
                );
                dropped.push(reference.raw_name.clone());
                continue;
            };

            let record = ResolvedRecord::from_catalog(document).with_match_stage(resolution.stage);
            if tracker.admit(&record) {
                self.consumed
                    .entry(tracking)
                    .or_default()
                    .insert(resolution.entry.id.clone());
                results.push(record);
            }
        }

        log::info!(
            "Fetched {} {} records from {} references",
            results.len(),
            catalog_category,
            references.len()
        );
        Ok((results, dropped))
    }

    pub fn is_ritual_group(&self, group: &CompositeGroup) -> bool {
        self.ritual_component(group).is_some()
    }

    fn ritual_component<'g>(&self, group: &'g CompositeGroup) -> Option<&'g RawReference> {
        group.components.iter().find(|component| {
            component.element_type.as_deref() == Some("Ritual")
                || self.config.is_ritual_name(&component.raw_name)
        })
    }

    /// Synthesize one record per non-ritual inventory slot. A missing
    /// equipment catalog yields an empty list.
    pub async fn fetch_equipment(
        &mut self,
        groups: &[CompositeGroup],
    ) -> ImportResult<Vec<ResolvedRecord>> {
        let Some((catalog_id, index)) = self.catalog(Category::Equipment).await else {
            log::warn!("Equipment catalog not found");
            return Ok(Vec::new());
        };

        let ctx = ResolveContext::from_config(&self.config, &self.classes);
        let source = EquipmentSource {
            provider: &self.provider,
            catalog_id: &catalog_id,
            index: &index,
        };
        let mut tracker = DedupTracker::new();
        let mut results = Vec::new();
        let mut dropped = Vec::new();

        for group in groups {
            if group.is_empty() || self.is_ritual_group(group) {
                continue;
            }

            let record = match synthesize(group, &source, &self.config.lookup, &ctx).await {
                Ok(record) => record,
                Err(ImportError::UnresolvedReference { name, .. })
                    if self.config.placeholders.allows(Category::Equipment) =>
                {
                    log::warn!("Equipment not found: {}. Creating placeholder.", name);
                    let mut placeholder = make_placeholder(&slot_name(group), &catalog_id);
                    if let Some(base) = group.base() {
                        stamp_slot(&mut placeholder, base);
                    }
                    placeholder
                }
                Err(e) if e.is_recoverable() => {
                    log::warn!("Dropping inventory slot '{}': {}", slot_name(group), e);
                    dropped.push(slot_name(group));
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(id) = &record.source_id {
                if self
                    .consumed
                    .get(&Category::Equipment)
                    .is_some_and(|ids| ids.contains(id))
                {
                    continue;
                }
            }
            if tracker.admit(&record) {
                if let Some(id) = &record.source_id {
                    self.consumed
                        .entry(Category::Equipment)
                        .or_default()
                        .insert(id.clone());
                }
                results.push(record);
            }
        }

        for raw_name in dropped {
            self.report_unresolved(Category::Equipment, &raw_name);
        }
        log::info!("Fetched {} equipment records from {} slots", results.len(), groups.len());
        Ok(results)
    }

    /// Resolve ritual slots against the ritual catalog.
    pub async fn fetch_rituals(&mut self, groups: &[CompositeGroup]) -> Vec<ResolvedRecord> {
        let Some((catalog_id, index)) = self.catalog(Category::Ritual).await else {
            log::warn!("Ritual catalog not found");
            return Vec::new();
        };

        let ctx = ResolveContext::from_config(&self.config, &self.classes);
        let mut tracker = DedupTracker::new();
        let mut results = Vec::new();
        let mut dropped = Vec::new();

        for group in groups {
            let Some(component) = self.ritual_component(group) else {
                continue;
            };

            let resolution = resolver::resolve(
                &component.raw_name,
                Category::Ritual,
                &index,
                &self.config.lookup,
                &ctx,
            );
            let document = match resolution {
                Some(resolution) => self
                    .provider
                    .get_document(&catalog_id, &resolution.entry.id)
                    .await
                    .map(|doc| (doc, resolution.stage)),
                None => None,
            };
            let Some((document, stage)) = document else {
                log::warn!("Ritual not found: {}", component.raw_name);
                dropped.push(component.raw_name.clone());
                continue;
            };

            let mut record = ResolvedRecord::from_catalog(document).with_match_stage(stage);
            record.set_quantity(component.quantity());
            record.set_equipped(component.is_equipped());
            if tracker.admit(&record) {
                results.push(record);
            }
        }

        for raw_name in dropped {
            self.report_unresolved(Category::Ritual, &raw_name);
        }
        results
    }

    /// Resolve the character's own powers and run them through the
    /// enhancement pipeline. A missing power catalog yields an empty list.
    pub async fn fetch_powers(
        &mut self,
        references: &[RawReference],
        build: &BuildContext<'_>,
    ) -> Vec<ResolvedRecord> {
        let retained: Vec<RawReference> = retained_powers(references).into_iter().cloned().collect();
        log::debug!(
            "Resolving {} of {} power references",
            retained.len(),
            references.len()
        );

        match self.fetch_items(Category::Power, &retained, false).await {
            Ok(powers) => enhancement::enhance_powers(powers, build),
            Err(e) => {
                log::warn!("{}", e);
                Vec::new()
            }
        }
    }

    /// Every record of the core-powers catalog, enhanced. Any read failure
    /// yields an empty list.
    pub async fn fetch_core_powers(&mut self, build: &BuildContext<'_>) -> Vec<ResolvedRecord> {
        let Some((catalog_id, index)) = self.catalog(Category::CorePower).await else {
            log::warn!("Core power catalog not found");
            return Vec::new();
        };

        let mut powers = Vec::with_capacity(index.len());
        for entry in &index {
            match self.provider.get_document(&catalog_id, &entry.id).await {
                Some(document) => powers.push(ResolvedRecord::from_catalog(document)),
                None => {
                    log::error!("Error fetching core powers: '{}' could not be read", entry.name);
                    return Vec::new();
                }
            }
        }

        enhancement::enhance_powers(powers, build)
    }

    /// Resolve each configured special item the character owns, trying the
    /// feature, equipment and feat catalogs in turn without alias tables.
    ///
    /// Fails with `CatalogUnavailable` when one of those catalogs is needed
    /// and does not exist.
    pub async fn fetch_special_items(
        &mut self,
        owned: &[String],
    ) -> ImportResult<Vec<ResolvedRecord>> {
        let wanted: Vec<String> = self
            .config
            .special_item_names
            .iter()
            .filter(|name| owned.iter().any(|loot| loot.contains(name.as_str())))
            .cloned()
            .collect();

        let mut tracker = DedupTracker::new();
        let mut results = Vec::new();

        for name in wanted {
            let reference = [RawReference::new(name.clone(), Category::SpecialItem)];
            let mut found = Vec::new();
            for &source in SPECIAL_ITEM_SOURCES {
                let (records, _) = self
                    .fetch_from(source, Category::SpecialItem, &reference, false, false)
                    .await?;
                if !records.is_empty() {
                    found = records;
                    break;
                }
            }

            if found.is_empty() {
                log::warn!("Special item not found: {}", name);
                self.report_unresolved(Category::SpecialItem, &name);
            }
            results.extend(found.into_iter().filter(|record| tracker.admit(record)));
        }
        Ok(results)
    }

    /// Resolve racial traits against the feature catalog, then the race
    /// catalog. Missing catalogs are skipped. A trait whose every match was
    /// already imported by this call is reported unresolved.
    pub async fn fetch_heritage_features(
        &mut self,
        references: &[RawReference],
    ) -> Vec<ResolvedRecord> {
        if references.is_empty() {
            return Vec::new();
        }

        let mut catalogs = Vec::new();
        for &category in HERITAGE_SOURCES {
            match self.catalog(category).await {
                Some(catalog) => catalogs.push(catalog),
                None => log::debug!("Heritage source {} not available", category),
            }
        }

        let ctx = ResolveContext::from_config(&self.config, &self.classes);
        let mut tracker = DedupTracker::new();
        let mut results = Vec::new();
        let mut dropped = Vec::new();

        for reference in references {
            let mut found = false;
            for (catalog_id, index) in &catalogs {
                let Some(resolution) = resolver::resolve_heritage(&reference.raw_name, index, &ctx)
                else {
                    continue;
                };
                let Some(document) = self
                    .provider
                    .get_document(catalog_id, &resolution.entry.id)
                    .await
                else {
                    continue;
                };

                let mut record = ResolvedRecord::from_catalog(document).with_match_stage(resolution.stage);
                record.flags.heritage_feature = true;
                // A trait already taken from this catalog falls through to the next one.
                if tracker.admit(&record) {
                    results.push(record);
                    found = true;
                    break;
                }
            }
            if !found {
                log::warn!("Heritage feature not found: {}", reference.raw_name);
                dropped.push(reference.raw_name.clone());
            }
        }

        for raw_name in dropped {
            self.report_unresolved(Category::Heritage, &raw_name);
        }
        results
    }

    /// Run a full import. Only a catalog that an item fetch needs and cannot
    /// find aborts; everything else shrinks the output.
    pub async fn run_import(&mut self, document: SourceDocument) -> ImportResult<ImportOutcome> {
        self.reset(&document.details);
        let details = document.details.clone();
        log::info!(
            "Importing '{}' (level {}, classes {:?})",
            details.name,
            details.level,
            details.classes
        );

        let feats = self
            .fetch_items(
                Category::Feat,
                document.references(Category::Feat),
                self.config.placeholders.allows(Category::Feat),
            )
            .await?;
        let features = self
            .fetch_items(
                Category::Feature,
                document.references(Category::Feature),
                self.config.placeholders.allows(Category::Feature),
            )
            .await?;
        let equipment = self.fetch_equipment(&document.composite_groups).await?;
        let rituals = self.fetch_rituals(&document.composite_groups).await;

        let build = BuildContext {
            equipment: &equipment,
            feats: &feats,
            features: &features,
            classes: &details.classes,
            level: details.level,
        };
        let powers = self
            .fetch_powers(document.references(Category::Power), &build)
            .await;
        let core_powers = self.fetch_core_powers(&build).await;

        let special_items = self.fetch_special_items(&document.special_items).await?;
        let heritage = self
            .fetch_heritage_features(document.references(Category::Heritage))
            .await;

        let mut extras = Vec::new();
        for &category in OPTIONAL_CATEGORIES {
            let references = document.references(category);
            if references.is_empty() {
                continue;
            }
            if self.config.catalog_id(category).is_none() {
                log::debug!("No catalog configured for {}, skipping", category);
                continue;
            }
            extras.extend(self.fetch_items(category, references, false).await?);
        }

        let records: Vec<ResolvedRecord> = feats
            .into_iter()
            .chain(features)
            .chain(powers)
            .chain(core_powers)
            .chain(equipment)
            .chain(rituals)
            .chain(special_items)
            .chain(heritage)
            .chain(extras)
            .collect();
        let total = records.len();
        let records = dedupe(records);

        log::info!(
            "Import of '{}' produced {} records ({} duplicates removed, {} unresolved)",
            details.name,
            records.len(),
            total - records.len(),
            self.unresolved.len()
        );

        Ok(ImportOutcome {
            details,
            records,
            unresolved: std::mem::take(&mut self.unresolved),
        })
    }
}

/// Display name of an inventory slot: its component names joined.
fn slot_name(group: &CompositeGroup) -> String {
    group
        .components
        .iter()
        .map(|c| c.raw_name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
