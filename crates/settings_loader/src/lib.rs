//! # Settings Loader
//!
//! Loads the studio's flat key/value configuration rows from JSON and
//! parses them once into a typed [`StudioSettings`], so the computation
//! engine never handles raw strings. Missing or unparsable values fall
//! back to 0.0 — the same "no data reads as zero" contract the engine
//! applies everywhere else.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::{StudioConfigEntry, StudioSettings};

/// Config keys recognized by the typed settings.
pub const KEY_STUDIO_AREA_SQM: &str = "studio_area_sqm";
pub const KEY_TARGET_MRR: &str = "target_mrr";
pub const KEY_TARGET_MEMBERS: &str = "target_members";
pub const KEY_CURRENT_RENT: &str = "current_rent";

/// Loads studio config rows from a JSON array file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Vec<StudioConfigEntry>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading config file: {}", path.display()))?;
    let entries: Vec<StudioConfigEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing config JSON in {}", path.display()))?;
    Ok(entries)
}

/// Loads config rows if a path is given and the file exists.
/// Returns None (not an error) when there is nothing to load.
pub fn load_optional_config(path: Option<&PathBuf>) -> Result<Option<Vec<StudioConfigEntry>>> {
    match path {
        Some(p) if p.exists() => Ok(Some(load_config(p)?)),
        _ => Ok(None),
    }
}

/// Flattens config rows into a key -> value map. Later rows win on
/// duplicate keys.
pub fn config_map(entries: &[StudioConfigEntry]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|e| (e.key.clone(), e.value.clone()))
        .collect()
}

fn parse_or_zero(map: &HashMap<String, String>, key: &str) -> f64 {
    map.get(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Builds the typed settings from a flat config map. This is the single
/// place where string values become numbers.
pub fn studio_settings(map: &HashMap<String, String>) -> StudioSettings {
    StudioSettings {
        studio_area_sqm: parse_or_zero(map, KEY_STUDIO_AREA_SQM),
        target_mrr: parse_or_zero(map, KEY_TARGET_MRR),
        target_members: parse_or_zero(map, KEY_TARGET_MEMBERS),
        current_rent: parse_or_zero(map, KEY_CURRENT_RENT),
    }
}
