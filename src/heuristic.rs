use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{Cost, GridCell};

/// Heuristic is the estimate of remaining cost between two cells.
/// The engines only need a `Fn(GridCell, GridCell) -> Cost`; this enum provides the
/// usual grid estimators so callers can pick one per search.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Always zero, turning A* into a uniform-cost search
    Trivial,
    #[default]
    Manhattan,
    Euclidean,
    Chebyshev,
}

impl Heuristic {
    pub fn estimate(self, from: GridCell, to: GridCell) -> Cost {
        match self {
            Heuristic::Trivial => trivial(from, to),
            Heuristic::Manhattan => manhattan(from, to),
            Heuristic::Euclidean => euclidean(from, to),
            Heuristic::Chebyshev => chebyshev(from, to),
        }
    }

    /// as_fn hands back the estimator as a closure, as expected by the engines
    pub fn as_fn(self) -> impl Fn(GridCell, GridCell) -> Cost + Copy {
        move |from, to| self.estimate(from, to)
    }
}

#[inline]
fn deltas(a: GridCell, b: GridCell) -> (f64, f64) {
    (
        f64::from((a.row - b.row).abs()),
        f64::from((a.col - b.col).abs()),
    )
}

#[inline]
pub fn trivial(_: GridCell, _: GridCell) -> Cost {
    OrderedFloat(0.0)
}

/// Manhattan (L1) distance. Not admissible once diagonal moves cost 1.5.
#[inline]
pub fn manhattan(a: GridCell, b: GridCell) -> Cost {
    let (dr, dc) = deltas(a, b);
    OrderedFloat(dr + dc)
}

#[inline]
pub fn euclidean(a: GridCell, b: GridCell) -> Cost {
    let (dr, dc) = deltas(a, b);
    OrderedFloat(dr.hypot(dc))
}

/// Chebyshev (L∞) distance
#[inline]
pub fn chebyshev(a: GridCell, b: GridCell) -> Cost {
    let (dr, dc) = deltas(a, b);
    OrderedFloat(dr.max(dc))
}
