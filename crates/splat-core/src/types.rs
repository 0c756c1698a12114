use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SplatError};

/// Quality triple parsed from the tool's one-line area/timing summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mapped gate count.
    pub gates: u64,
    /// Total cell area.
    pub area: f64,
    /// Critical path delay.
    pub delay: f64,
}

/// One measurement: a single script applied for a single iteration.
///
/// Identity is `(design_id, script_name, iteration)`. Rows are append-only
/// within a sweep and preserve generation order (catalog order times
/// increasing iteration).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Design instance the measurement belongs to.
    pub design_id: String,
    /// Snapshot artifact persisted for this script/iteration pair.
    pub artifact_name: String,
    /// Name of the optimization recipe that produced the row.
    pub script_name: String,
    /// Iteration index, starting at 1.
    pub iteration: u32,
    /// Cumulative compute time across script and hook steps, seconds.
    /// Monotone non-decreasing within one script, reset per script.
    pub cpu_time: f64,
    /// Mapped gate count.
    pub gates: u64,
    /// Total cell area.
    pub area: f64,
    /// Critical path delay.
    pub delay: f64,
    /// Whether the row lies on the (area, delay) Pareto frontier.
    pub is_pareto: bool,
}

impl ResultRow {
    /// Returns the metric triple recorded on this row.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            gates: self.gates,
            area: self.area,
            delay: self.delay,
        }
    }
}

/// Ordered sequence of [`ResultRow`] for one design instance, or a
/// concatenation across instances in batch mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row, enforcing `(design_id, script_name, iteration)`
    /// uniqueness.
    pub fn push(&mut self, row: ResultRow) -> Result<(), SplatError> {
        let duplicate = self.rows.iter().any(|existing| {
            existing.design_id == row.design_id
                && existing.script_name == row.script_name
                && existing.iteration == row.iteration
        });
        if duplicate {
            return Err(SplatError::Catalog(
                ErrorInfo::new("splat_core.duplicate_row", "result row identity already present")
                    .with_context("design", row.design_id.clone())
                    .with_context("script", row.script_name.clone())
                    .with_context("iteration", row.iteration.to_string()),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the rows in generation order.
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extracts the area column.
    pub fn areas(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.area).collect()
    }

    /// Extracts the delay column.
    pub fn delays(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.delay).collect()
    }

    /// Sets the Pareto flag on the rows selected by `on_frontier`.
    ///
    /// The frontier itself is computed by the selection engine; this only
    /// applies the membership decision back onto the rows.
    pub fn set_pareto_flags<F>(&mut self, mut on_frontier: F)
    where
        F: FnMut(&ResultRow) -> bool,
    {
        for row in &mut self.rows {
            row.is_pareto = on_frontier(row);
        }
    }

    /// Extends this table with all rows of `other`, preserving order.
    pub fn extend(&mut self, other: ResultTable) -> Result<(), SplatError> {
        for row in other.rows {
            self.push(row)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
