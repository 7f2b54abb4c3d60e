//! A*ε (focal search): trades optimality, within a factor of `1 + ε`, for routes that spend
//! fewer calories.
use std::fmt::{Display, Formatter};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::astar::{run, ClosedList, OpenList, Problem, Route, SearchError, SearchOptions, Selection};
use crate::grid::TerrainMap;
use crate::overlay::PathOverlay;
use crate::trace::Trace;
use crate::{Cost, GridCell};

/// Epsilon is the relaxation factor of the focal list. Always finite and non-negative.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Epsilon(f64);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("epsilon must be a finite number >= 0, got {0}")]
pub struct EpsilonError(pub f64);

impl Epsilon {
    pub const ZERO: Epsilon = Epsilon(0.0);

    pub fn new(value: f64) -> Result<Epsilon, EpsilonError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Epsilon(value))
        } else {
            Err(EpsilonError(value))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Largest f admitted to the focal list when the frontier's lowest f is `min_f`.
    /// This is `(1 + epsilon) * min_f`, and never less than `min_f` itself.
    #[inline]
    pub fn bound(self, min_f: Cost) -> Cost {
        OrderedFloat(min_f.0 + min_f.0.abs() * self.0)
    }
}

impl TryFrom<f64> for Epsilon {
    type Error = EpsilonError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Epsilon::new(value)
    }
}

impl From<Epsilon> for f64 {
    fn from(value: Epsilon) -> Self {
        value.0
    }
}

impl std::str::FromStr for Epsilon {
    type Err = EpsilonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|_| EpsilonError(f64::NAN))?;
        Epsilon::new(value)
    }
}

impl Display for Epsilon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// astar_subepsilon runs the same expansion loop as [astar](crate::astar::astar()), but each step
/// selects from the focal list: the frontier entries with `f <= (1 + epsilon) * min_f`. Of those,
/// the one with the fewest accumulated calories is expanded, ties broken by lowest f.
///
/// The returned cost is within `1 + epsilon` of the optimal route's cost rather than equal to it.
/// With `epsilon` zero the focal list only holds the entries tied for the lowest f.
pub fn astar_subepsilon<G, N, C, H, Open, Closed, T, O>(
    problem: &Problem<'_, G, N, C, H>,
    openlist: &mut Open,
    closed: &mut Closed,
    options: &SearchOptions,
    epsilon: Epsilon,
    trace: &mut T,
    overlay: &mut O,
) -> Result<Route, SearchError>
where
    G: TerrainMap + ?Sized,
    N: Fn(GridCell) -> Vec<GridCell>,
    C: Fn(GridCell, GridCell) -> Cost,
    H: Fn(GridCell, GridCell) -> Cost,
    Open: OpenList,
    Closed: ClosedList,
    T: Trace,
    O: PathOverlay,
{
    tracing::debug!(%epsilon, start = %problem.start, goal = %problem.goal, "focal search");
    run(
        problem,
        openlist,
        closed,
        options,
        Selection::Focal(epsilon),
        trace,
        overlay,
    )
}
