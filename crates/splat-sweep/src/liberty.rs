//! Cell-name to area extraction from liberty libraries, memoized per file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use splat_core::{ErrorInfo, SplatError};

/// Explicit cache of parsed liberty cell areas.
///
/// Owned by the orchestrator (or whoever needs it) rather than living as
/// ambient module state; invalidation is explicit.
#[derive(Debug, Default)]
pub struct LibertyCache {
    parsed: BTreeMap<PathBuf, BTreeMap<String, f64>>,
}

impl LibertyCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell-name to area map for `path`, parsing and memoizing
    /// on first use.
    pub fn cell_areas(&mut self, path: &Path) -> Result<&BTreeMap<String, f64>, SplatError> {
        let key = canonical_key(path);
        if !self.parsed.contains_key(&key) {
            let text = fs::read_to_string(path).map_err(|err| {
                SplatError::MissingFile(
                    ErrorInfo::new("splat_sweep.liberty_read", "failed to read liberty library")
                        .with_context("path", path.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
            let areas = parse_cell_areas(&text, path)?;
            self.parsed.insert(key.clone(), areas);
        }
        Ok(self.parsed.get(&key).expect("inserted above"))
    }

    /// Drops the memoized entry for `path`, forcing a re-parse on next use.
    pub fn invalidate(&mut self, path: &Path) {
        self.parsed.remove(&canonical_key(path));
    }

    /// Drops every memoized entry.
    pub fn clear(&mut self) {
        self.parsed.clear();
    }

    /// Number of memoized libraries.
    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    /// Returns true when nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}

fn canonical_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Reduces liberty text to a cell-name to area map.
///
/// Only `cell (NAME) { ... area : VALUE ; ... }` structure is understood;
/// everything else in the library is skipped. Cells without a parsable area
/// are dropped with a warning rather than failing the whole library.
fn parse_cell_areas(text: &str, origin: &Path) -> Result<BTreeMap<String, f64>, SplatError> {
    let mut areas = BTreeMap::new();
    let mut current_cell: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("cell") {
            let rest = rest.trim_start();
            if let Some(name) = group_argument(rest) {
                current_cell = Some(name);
                continue;
            }
        }
        if let Some(cell) = &current_cell {
            if let Some(value) = attribute_value(trimmed, "area") {
                match value.parse::<f64>() {
                    Ok(area) => {
                        areas.insert(cell.clone(), area);
                    }
                    Err(_) => {
                        warn!("unparsable area for cell {cell} in {}", origin.display());
                    }
                }
                current_cell = None;
            }
        }
    }

    if areas.is_empty() {
        return Err(SplatError::MetricFormat(
            ErrorInfo::new("splat_sweep.liberty_empty", "no cell areas found in library")
                .with_context("path", origin.display().to_string()),
        ));
    }
    Ok(areas)
}

/// Extracts `NAME` from a `(NAME) {` group opener, stripping quotes.
fn group_argument(rest: &str) -> Option<String> {
    let open = rest.find('(')?;
    let close = rest[open..].find(')')? + open;
    let name = rest[open + 1..close].trim().trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Extracts the value of a `name : value ;` liberty attribute line.
fn attribute_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.trim_start();
    let rest = rest.strip_prefix(':')?;
    Some(rest.trim().trim_end_matches(';').trim())
}
