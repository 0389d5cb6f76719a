pub mod models;

pub use models::*;

use anyhow::Context;
use std::path::Path;

/// Read and parse an import config file.
pub fn read_config(path: &Path) -> anyhow::Result<ImportConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ImportConfig = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Load the import config, falling back to defaults if the file is missing
/// or corrupt. Logs WARN on fallback.
pub fn load_config(path: &Path) -> ImportConfig {
    log::info!("Loading import config from: {}", path.display());

    match read_config(path) {
        Ok(config) => {
            if config.fuzzy_threshold <= 0.0 || config.fuzzy_threshold >= 1.0 {
                log::warn!(
                    "Fuzzy threshold {} out of range, using default",
                    config.fuzzy_threshold
                );
                ImportConfig {
                    fuzzy_threshold: ImportConfig::default().fuzzy_threshold,
                    ..config
                }
            } else {
                config
            }
        }
        Err(e) => {
            log::warn!("{:#}. Using default import config.", e);
            ImportConfig::default()
        }
    }
}

/// Load a lookup-table document, falling back to empty tables.
pub fn load_lookup_tables(path: &Path) -> LookupTables {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|contents| LookupTables::from_json(&contents).map_err(|e| e.to_string()));

    match parsed {
        Ok(tables) => tables,
        Err(e) => {
            log::warn!(
                "Failed to load lookup tables from {}: {}. Using empty tables.",
                path.display(),
                e
            );
            LookupTables::default()
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
