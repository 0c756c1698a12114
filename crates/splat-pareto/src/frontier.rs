use serde::{Deserialize, Serialize};
use splat_core::{ErrorInfo, SplatError};

use crate::dominance::{dominance_counts, dominates, Objectives};

fn dimension_error(len: usize, needed: usize) -> SplatError {
    SplatError::Catalog(
        ErrorInfo::new(
            "splat_pareto.dimension_mismatch",
            "point has fewer dimensions than the objectives reference",
        )
        .with_context("point_len", len.to_string())
        .with_context("needed", (needed + 1).to_string()),
    )
}

/// A set of mutually non-dominated points.
///
/// The frontier is a derived, recomputable view: it owns no identity beyond
/// the coordinate tuple, so coordinate-identical points collapse to one
/// member. Membership depends only on the point set, never on arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontier {
    points: Vec<Vec<f64>>,
}

impl Frontier {
    /// Creates an empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Conditionally admits `candidate`.
    ///
    /// Returns `Ok(false)` only when an existing member dominates the
    /// candidate; otherwise every member the candidate dominates is evicted
    /// and `Ok(true)` is reported. Incomparable and value-equal candidates
    /// are retained. An exact coordinate duplicate also reports `Ok(true)`
    /// but collapses into the existing member, so `true` means "on the
    /// frontier", not "the frontier grew".
    pub fn insert(
        &mut self,
        candidate: &[f64],
        objectives: &Objectives,
    ) -> Result<bool, SplatError> {
        if let Some(max_index) = objectives.max_index() {
            if candidate.len() <= max_index {
                return Err(dimension_error(candidate.len(), max_index));
            }
        }
        for point in &self.points {
            let (better, worse) = dominance_counts(candidate, point, objectives);
            if worse > 0 && better == 0 {
                return Ok(false);
            }
        }
        self.points
            .retain(|point| !dominates(candidate, point, objectives));
        if !self.contains(candidate) {
            self.points.push(candidate.to_vec());
        }
        Ok(true)
    }

    /// Exact coordinate-tuple membership test.
    pub fn contains(&self, point: &[f64]) -> bool {
        self.points.iter().any(|member| member.as_slice() == point)
    }

    /// The frontier members, in admission order.
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true when the frontier has no members.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Folds every point through [`Frontier::insert`].
///
/// The resulting membership is invariant under permutation of the input:
/// a point survives iff nothing in the full set dominates it.
pub fn compute_frontier<I, P>(points: I, objectives: &Objectives) -> Result<Frontier, SplatError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<[f64]>,
{
    let mut frontier = Frontier::new();
    for point in points {
        frontier.insert(point.as_ref(), objectives)?;
    }
    Ok(frontier)
}
