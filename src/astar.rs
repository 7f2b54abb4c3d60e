//! This implementation of A* is generic over its frontier (open list) and interior (closed list),
//! and over the neighbour, movement cost and heuristic functions handed to it. In practice it runs
//! on a [GridMap](crate::grid::GridMap), but anything implementing [TerrainMap] will do.
use std::cmp::Ordering;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::astar::SearchError::*;
use crate::grid::TerrainMap;
use crate::node::{reconstruct, ResourceModel, SearchNode};
use crate::overlay::PathOverlay;
use crate::subepsilon::Epsilon;
use crate::trace::{Expansion, Trace};
use crate::{Calories, Cost, GridCell};

/// OpenList is the frontier: a priority queue of nodes that have been discovered but not expanded.
pub trait OpenList {
    fn is_empty(&self) -> bool;
    fn len(&self) -> usize;
    fn push_open(&mut self, node: Rc<SearchNode>);
    /// Remove the entry with the lowest f
    fn pop_min(&mut self) -> Option<Rc<SearchNode>>;
    /// Remove the entry with the lowest calories among those whose f is within
    /// `(1 + epsilon)` of the lowest f, ties broken by f
    fn pop_focal(&mut self, epsilon: Epsilon) -> Option<Rc<SearchNode>>;
    /// Lowest g queued for `cell`, if any entry for it is queued
    fn queued_cost(&self, cell: GridCell) -> Option<Cost>;
    fn contains(&self, cell: GridCell) -> bool {
        self.queued_cost(cell).is_some()
    }
    /// Queued cells, for tracing
    fn cells(&self) -> Vec<GridCell>;
}

/// ClosedList is the interior: cells that have been expanded and whose g is final.
pub trait ClosedList {
    fn contains(&self, cell: GridCell) -> bool;
    /// Returns false if the cell was already closed
    fn close(&mut self, cell: GridCell) -> bool;
    /// Closed cells in closing order
    fn cells(&self) -> &[GridCell];
}

/// OpenItem is an entry in an OpenList.
/// Ordering is by f, then h (nearer the goal first), then insertion order. It is reversed so that
/// a max-heap such as BinaryHeap pops the minimum first.
#[derive(Debug, Clone)]
pub struct OpenItem {
    pub node: Rc<SearchNode>,
    pub seq: u64,
}

impl OpenItem {
    fn key(&self) -> (Cost, Cost, u64) {
        (self.node.f, self.node.h, self.seq)
    }

    /// Ordering used to pick from the focal list
    pub fn focal_key(&self) -> (Calories, Cost, Cost, u64) {
        (self.node.cal, self.node.f, self.node.h, self.seq)
    }
}

impl Eq for OpenItem {}

impl PartialEq for OpenItem {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Ord for OpenItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key()).reverse()
    }
}

impl PartialOrd for OpenItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// FrontierPolicy decides what happens when a neighbour is already queued.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FrontierPolicy {
    /// Keep the first entry queued for a cell; later paths to it are ignored,
    /// even cheaper ones
    #[default]
    FirstSeen,
    /// Queue another entry when the new path is strictly cheaper than the best
    /// one queued. The stale entry is discarded when popped.
    Relax,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub policy: FrontierPolicy,
    pub resources: ResourceModel,
}

/// Problem bundles the map with the caller supplied search functions.
pub struct Problem<'g, G: ?Sized, N, C, H> {
    pub grid: &'g G,
    pub start: GridCell,
    pub goal: GridCell,
    pub neighbours: N,
    pub movement_cost: C,
    pub heuristic: H,
}

impl<'g, G, N, C, H> Problem<'g, G, N, C, H>
where
    G: TerrainMap + ?Sized,
    N: Fn(GridCell) -> Vec<GridCell>,
    C: Fn(GridCell, GridCell) -> Cost,
    H: Fn(GridCell, GridCell) -> Cost,
{
    pub fn new(
        grid: &'g G,
        start: GridCell,
        goal: GridCell,
        neighbours: N,
        movement_cost: C,
        heuristic: H,
    ) -> Self {
        Problem {
            grid,
            start,
            goal,
            neighbours,
            movement_cost,
            heuristic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Start or goal is not passable terrain; nothing was searched
    #[error("{start} or {goal} is not passable terrain")]
    Unreachable { start: GridCell, goal: GridCell },
    /// Every reachable cell was explored without reaching the goal
    #[error("no path from {start} to {goal}")]
    NoPath { start: GridCell, goal: GridCell },
}

/// Route is a successful search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// f of the goal node when it was selected
    pub cost: f64,
    /// Calories spent along the route, start cell excluded
    pub resources: Calories,
    pub path: Vec<GridCell>,
    /// Nodes expanded before the goal was selected
    pub expansions: usize,
}

/// Selection is how the next node is taken off the frontier
#[derive(Debug, Copy, Clone)]
pub(crate) enum Selection {
    Min,
    Focal(Epsilon),
}

impl Selection {
    fn next<Open: OpenList>(self, openlist: &mut Open) -> Option<Rc<SearchNode>> {
        match self {
            Selection::Min => openlist.pop_min(),
            Selection::Focal(epsilon) => openlist.pop_focal(epsilon),
        }
    }
}

/// astar finds a route from `problem.start` to `problem.goal`, expanding the lowest f node each
/// step. `openlist` and `closed` are expected to be empty. On success, every cell of the route is
/// marked on `overlay`.
pub fn astar<G, N, C, H, Open, Closed, T, O>(
    problem: &Problem<'_, G, N, C, H>,
    openlist: &mut Open,
    closed: &mut Closed,
    options: &SearchOptions,
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
    run(problem, openlist, closed, options, Selection::Min, trace, overlay)
}

/// run is the expansion loop shared by both engines
pub(crate) fn run<G, N, C, H, Open, Closed, T, O>(
    problem: &Problem<'_, G, N, C, H>,
    openlist: &mut Open,
    closed: &mut Closed,
    options: &SearchOptions,
    selection: Selection,
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
    let (grid, start, goal) = (problem.grid, problem.start, problem.goal);
    debug_assert!(openlist.is_empty(), "open list must start empty");

    if !grid.is_valid(start) || !grid.is_valid(goal) {
        tracing::warn!(%start, %goal, "start or goal is not passable");
        return Err(Unreachable { start, goal });
    }

    let resources = &options.resources;
    openlist.push_open(SearchNode::root(
        start,
        (problem.heuristic)(start, goal),
        resources.cost_of(grid.terrain_of(start)),
    ));

    let mut expansions = 0;
    let mut discovered = Vec::new();

    while let Some(current) = selection.next(openlist) {
        // Entries for cells closed since they were queued are stale
        if !closed.close(current.cell) {
            tracing::trace!(cell = %current.cell, "discarding stale frontier entry");
            continue;
        }

        if current.cell == goal {
            let (path, calories) = reconstruct(&current, grid, resources);
            for cell in &path {
                overlay.mark(*cell);
            }

            tracing::info!(
                %start,
                %goal,
                cost = current.f.0,
                calories,
                steps = path.len() - 1,
                expansions,
                "route found"
            );
            return Ok(Route {
                cost: current.f.0,
                resources: calories,
                path,
                expansions,
            });
        }

        expansions += 1;
        discovered.clear();

        for neighbour in (problem.neighbours)(current.cell) {
            if closed.contains(neighbour) {
                continue;
            }

            let g = current.g + (problem.movement_cost)(current.cell, neighbour);
            let admit = match (openlist.queued_cost(neighbour), options.policy) {
                (None, _) => true,
                (Some(_), FrontierPolicy::FirstSeen) => false,
                (Some(queued), FrontierPolicy::Relax) => g < queued,
            };
            if !admit {
                continue;
            }

            let cal = current
                .cal
                .saturating_add(resources.cost_of(grid.terrain_of(neighbour)));
            let h = (problem.heuristic)(neighbour, goal);
            openlist.push_open(SearchNode::child(&current, neighbour, g, h, cal));
            discovered.push(neighbour);
        }

        if trace.enabled() {
            trace.expansion(&Expansion {
                iteration: expansions,
                current: &current,
                interior: closed.cells(),
                frontier: openlist.cells(),
                discovered: &discovered,
            });
        }
    }

    tracing::debug!(%start, %goal, expansions, "frontier exhausted");
    Err(NoPath { start, goal })
}
