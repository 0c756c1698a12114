//! Pareto dominance, frontier maintenance, and best-point selection over
//! sweep result tables. Needs no external tool; fully testable against
//! synthetic tables.

mod dominance;
mod frontier;
mod select;

pub use dominance::{dominance_counts, dominates, Objectives};
pub use frontier::{compute_frontier, Frontier};
pub use select::{mark_pareto, min_corner_index, pareto_rows, select_best, table_frontier};
