//! Terrain routing
//!
//! Finds routes across a static 2D terrain grid where every cell is grass, water, rock or
//! impassable. Moving orthogonally costs 1 and diagonally 1.5; entering a cell also spends
//! calories depending on its terrain.
//!
//! Two engines share one expansion loop:
//! - [astar()] is classic best-first search on `f = g + h`.
//! - [astar_subepsilon] is focal search: among the frontier entries within `1 + ε` of the lowest
//!   `f`, it expands the one that has spent the fewest calories, so the route found costs at most
//!   `1 + ε` times the optimum but tends to be cheaper in calories.
//!
//! Both are generic over their open and closed lists (see [OpenList] and [ClosedList]); minimal
//! implementations are in [simpleopen] and [simpleclosed]. [find_route] wires them up for a
//! [GridMap].
pub mod astar;
pub mod cell;
pub mod grid;
pub mod heuristic;
pub mod node;
pub mod overlay;
pub mod simpleclosed;
pub mod simpleopen;
pub mod subepsilon;
pub mod trace;

use ordered_float::OrderedFloat;

pub use crate::astar::{
    astar, ClosedList, FrontierPolicy, OpenList, Problem, Route, SearchError, SearchOptions,
};
pub use crate::cell::GridCell;
pub use crate::grid::{GridMap, MapError, Terrain, TerrainMap};
pub use crate::heuristic::Heuristic;
pub use crate::node::ResourceModel;
pub use crate::overlay::{NoOverlay, Overlay, PathOverlay};
pub use crate::subepsilon::{astar_subepsilon, Epsilon, EpsilonError};

/// Path cost. Totally ordered so it can key a priority queue.
pub type Cost = OrderedFloat<f64>;

/// Resource units spent entering cells
pub type Calories = u32;

/// Algorithm selects which engine [find_route] runs
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Algorithm {
    AStar,
    SubEpsilon(Epsilon),
}

/// find_route searches `map` with its own neighbours and movement costs, using fresh open and
/// closed lists. Expansions are logged at DEBUG level.
pub fn find_route<O: PathOverlay>(
    map: &GridMap,
    start: GridCell,
    goal: GridCell,
    heuristic: Heuristic,
    algorithm: Algorithm,
    options: &SearchOptions,
    overlay: &mut O,
) -> Result<Route, SearchError> {
    let problem = Problem::new(
        map,
        start,
        goal,
        |c| map.neighbours(c),
        |a, b| map.movement_cost(a, b),
        heuristic.as_fn(),
    );
    let mut open = simpleopen::SimpleOpenList::new();
    let mut closed = simpleclosed::SimpleClosed::with_capacity(map.rows() * map.cols());
    let mut trace = trace::LogTrace;

    match algorithm {
        Algorithm::AStar => astar(&problem, &mut open, &mut closed, options, &mut trace, overlay),
        Algorithm::SubEpsilon(epsilon) => astar_subepsilon(
            &problem,
            &mut open,
            &mut closed,
            options,
            epsilon,
            &mut trace,
            overlay,
        ),
    }
}
