use serde::{Deserialize, Serialize};
use splat_core::{ErrorInfo, SplatError};

/// Which coordinate dimensions count toward dominance, and in which
/// direction.
///
/// Indices absent from both sets are carried along but ignored when
/// comparing points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objectives {
    minimize: Vec<usize>,
    maximize: Vec<usize>,
}

impl Objectives {
    /// Builds an objective set; the two index sets must be disjoint.
    pub fn new(minimize: Vec<usize>, maximize: Vec<usize>) -> Result<Self, SplatError> {
        if let Some(shared) = minimize.iter().find(|idx| maximize.contains(idx)) {
            return Err(SplatError::Catalog(
                ErrorInfo::new(
                    "splat_pareto.overlapping_dims",
                    "a dimension cannot be both minimized and maximized",
                )
                .with_context("dimension", shared.to_string()),
            ));
        }
        Ok(Self { minimize, maximize })
    }

    /// Convenience constructor minimizing every listed dimension.
    pub fn minimize_all(dims: impl Into<Vec<usize>>) -> Self {
        Self {
            minimize: dims.into(),
            maximize: Vec::new(),
        }
    }

    /// Highest dimension index referenced by either set.
    pub fn max_index(&self) -> Option<usize> {
        self.minimize.iter().chain(self.maximize.iter()).copied().max()
    }

    /// Dimensions where lower is better.
    pub fn minimized(&self) -> &[usize] {
        &self.minimize
    }

    /// Dimensions where higher is better.
    pub fn maximized(&self) -> &[usize] {
        &self.maximize
    }
}

/// Counts the dimensions where `x` beats `y` and where `x` loses to `y`,
/// over the checked dimensions only.
pub fn dominance_counts(x: &[f64], y: &[f64], objectives: &Objectives) -> (usize, usize) {
    let mut better = 0;
    let mut worse = 0;
    for &i in objectives.minimized() {
        if x[i] < y[i] {
            better += 1;
        } else if x[i] > y[i] {
            worse += 1;
        }
    }
    for &i in objectives.maximized() {
        if x[i] > y[i] {
            better += 1;
        } else if x[i] < y[i] {
            worse += 1;
        }
    }
    (better, worse)
}

/// Returns true when `x` dominates `y`: strictly better somewhere and worse
/// nowhere, over the checked dimensions.
pub fn dominates(x: &[f64], y: &[f64], objectives: &Objectives) -> bool {
    let (better, worse) = dominance_counts(x, y, objectives);
    better > 0 && worse == 0
}
