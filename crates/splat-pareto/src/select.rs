use splat_core::{ResultTable, SplatError};

use crate::dominance::Objectives;
use crate::frontier::{compute_frontier, Frontier};

/// Index of the row closest to the `(min_area, min_delay)` corner under
/// per-dimension normalization.
///
/// Each dimension is scaled by `(max - min)^2`; a zero scale means the
/// dimension does not discriminate and contributes nothing. First occurrence
/// wins on exact distance ties. Returns `None` on an empty table.
///
/// This is a heuristic: the winner is not guaranteed to lie on the Pareto
/// frontier when the two objective scales differ wildly. Callers that care
/// should cross-check against [`pareto_rows`].
pub fn select_best(table: &ResultTable) -> Option<usize> {
    min_corner_index(&table.areas(), &table.delays())
}

/// Two-column form of [`select_best`] over raw area/delay vectors.
pub fn min_corner_index(areas: &[f64], delays: &[f64]) -> Option<usize> {
    if areas.is_empty() || areas.len() != delays.len() {
        return None;
    }
    let min_area = fold_min(areas);
    let max_area = fold_max(areas);
    let min_delay = fold_min(delays);
    let max_delay = fold_max(delays);
    let scale_area = (max_area - min_area).powi(2);
    let scale_delay = (max_delay - min_delay).powi(2);

    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;
    for i in 0..areas.len() {
        let mut dist = 0.0;
        if scale_area > 0.0 {
            dist += (min_area - areas[i]).powi(2) / scale_area;
        }
        if scale_delay > 0.0 {
            dist += (min_delay - delays[i]).powi(2) / scale_delay;
        }
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }
    Some(best_idx)
}

/// Computes the `(area, delay)` frontier of a table, minimizing both.
pub fn table_frontier(table: &ResultTable) -> Result<Frontier, SplatError> {
    let objectives = Objectives::minimize_all([0, 1]);
    let points = table.rows().iter().map(|row| [row.area, row.delay]);
    compute_frontier(points, &objectives)
}

/// Indices of the rows whose `(area, delay)` lies on the frontier.
pub fn pareto_rows(table: &ResultTable) -> Result<Vec<usize>, SplatError> {
    let frontier = table_frontier(table)?;
    Ok(table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| frontier.contains(&[row.area, row.delay]))
        .map(|(idx, _)| idx)
        .collect())
}

/// Flips the `is_pareto` flag on every row lying on the `(area, delay)`
/// frontier, clearing it everywhere else.
pub fn mark_pareto(table: &mut ResultTable) -> Result<(), SplatError> {
    let frontier = table_frontier(table)?;
    table.set_pareto_flags(|row| frontier.contains(&[row.area, row.delay]));
    Ok(())
}

fn fold_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fold_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
