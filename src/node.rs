//! Search nodes and the resource ledger rebuilt from them.
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::grid::{Terrain, TerrainMap};
use crate::{Calories, Cost, GridCell};

/// ResourceModel maps terrain to the calories spent entering a cell of that terrain.
/// The same model drives the per-step `cal` accumulation and the ledger built by
/// [reconstruct], so both engines report consistent totals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceModel {
    pub grass: Calories,
    pub water: Calories,
    pub rock: Calories,
}

impl Default for ResourceModel {
    fn default() -> Self {
        ResourceModel {
            grass: 2,
            water: 4,
            rock: 6,
        }
    }
}

impl ResourceModel {
    pub fn cost_of(&self, terrain: Terrain) -> Calories {
        match terrain {
            Terrain::Grass => self.grass,
            Terrain::Water => self.water,
            Terrain::Rock => self.rock,
            // never entered: impassable cells are not neighbours
            Terrain::Impassable => 0,
        }
    }
}

/// SearchNode is a state reached while searching.
/// Parents are shared between every sibling produced by the same expansion, so the
/// link is reference counted. Nodes are never mutated once built.
#[derive(Debug)]
pub struct SearchNode {
    pub cell: GridCell,
    parent: Option<Rc<SearchNode>>,
    pub g: Cost,
    pub h: Cost,
    pub f: Cost,
    /// Calories accumulated on the way here, including the start cell
    pub cal: Calories,
}

impl SearchNode {
    pub fn root(cell: GridCell, h: Cost, cal: Calories) -> Rc<SearchNode> {
        Rc::new(SearchNode {
            cell,
            parent: None,
            g: Cost::from(0.0),
            h,
            f: h,
            cal,
        })
    }

    pub fn child(parent: &Rc<SearchNode>, cell: GridCell, g: Cost, h: Cost, cal: Calories) -> Rc<SearchNode> {
        Rc::new(SearchNode {
            cell,
            parent: Some(Rc::clone(parent)),
            g,
            h,
            f: g + h,
            cal,
        })
    }

    pub fn parent(&self) -> Option<&Rc<SearchNode>> {
        self.parent.as_ref()
    }

    /// Walk from this node back to the root
    pub fn ancestry(&self) -> impl Iterator<Item = &SearchNode> {
        std::iter::successors(Some(self), |n| n.parent.as_deref())
    }
}

// Long ancestry chains would otherwise be dropped recursively.
impl Drop for SearchNode {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut inner) => next = inner.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// reconstruct walks the parent chain of `goal` and returns the route from start to goal
/// along with the calories spent. The start cell is never charged.
pub fn reconstruct<G: TerrainMap + ?Sized>(
    goal: &SearchNode,
    grid: &G,
    resources: &ResourceModel,
) -> (Vec<GridCell>, Calories) {
    let mut path = Vec::new();
    let mut calories = 0;

    for node in goal.ancestry() {
        path.push(node.cell);
        if node.parent.is_some() {
            let terrain = grid.terrain_of(node.cell);
            calories = resources.cost_of(terrain).saturating_add(calories);
            tracing::trace!(cell = %node.cell, %terrain, calories, "step charged");
        }
    }

    path.reverse();
    (path, calories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridMap;

    fn cost(v: f64) -> Cost {
        Cost::from(v)
    }

    #[test]
    fn f_is_g_plus_h() {
        let root = SearchNode::root(GridCell::new(0, 0), cost(4.0), 2);
        assert_eq!(root.f, cost(4.0));

        let child = SearchNode::child(&root, GridCell::new(1, 1), cost(1.5), cost(2.0), 4);
        assert_eq!(child.f, cost(3.5));
        assert_eq!(child.parent().map(|p| p.cell), Some(GridCell::new(0, 0)));
    }

    #[test]
    fn siblings_share_a_parent() {
        let root = SearchNode::root(GridCell::new(0, 0), cost(0.0), 0);
        let a = SearchNode::child(&root, GridCell::new(0, 1), cost(1.0), cost(0.0), 2);
        let b = SearchNode::child(&root, GridCell::new(1, 0), cost(1.0), cost(0.0), 2);
        assert_eq!(Rc::strong_count(&root), 3);
        drop(a);
        drop(root);
        assert_eq!(b.parent().map(|p| p.cell), Some(GridCell::new(0, 0)));
    }

    #[test]
    fn ledger_excludes_the_start_cell() {
        let map = GridMap::parse("*~.\n").unwrap();
        let model = ResourceModel::default();

        let root = SearchNode::root(GridCell::new(0, 0), cost(0.0), 6);
        let water = SearchNode::child(&root, GridCell::new(0, 1), cost(1.0), cost(0.0), 10);
        let grass = SearchNode::child(&water, GridCell::new(0, 2), cost(2.0), cost(0.0), 12);

        let (path, calories) = reconstruct(&grass, &map, &model);
        assert_eq!(
            path,
            vec![GridCell::new(0, 0), GridCell::new(0, 1), GridCell::new(0, 2)]
        );
        assert_eq!(calories, 4 + 2);
        assert_eq!(calories, grass.cal - root.cal);
    }

    #[test]
    fn ledger_saturates_instead_of_wrapping() {
        let map = GridMap::parse(".~~\n").unwrap();
        let model = ResourceModel {
            water: u32::MAX - 1,
            ..ResourceModel::default()
        };

        let root = SearchNode::root(GridCell::new(0, 0), cost(0.0), 2);
        let first = SearchNode::child(&root, GridCell::new(0, 1), cost(1.0), cost(1.0), u32::MAX);
        let second = SearchNode::child(&first, GridCell::new(0, 2), cost(2.0), cost(0.0), u32::MAX);

        let (_, calories) = reconstruct(&second, &map, &model);
        assert_eq!(calories, u32::MAX);
    }

    #[test]
    fn single_cell_route_costs_nothing() {
        let map = GridMap::parse("*\n").unwrap();
        let root = SearchNode::root(GridCell::new(0, 0), cost(0.0), 6);
        let (path, calories) = reconstruct(&root, &map, &ResourceModel::default());
        assert_eq!(path, vec![GridCell::new(0, 0)]);
        assert_eq!(calories, 0);
    }

    #[test]
    fn long_chains_drop_without_recursion() {
        let mut node = SearchNode::root(GridCell::new(0, 0), cost(0.0), 0);
        for i in 1..200_000 {
            node = SearchNode::child(&node, GridCell::new(0, i), cost(f64::from(i)), cost(0.0), 0);
        }
        assert_eq!(node.ancestry().count(), 200_000);
        drop(node);
    }

    #[test]
    fn resource_model_defaults() {
        let model = ResourceModel::default();
        assert_eq!(model.cost_of(Terrain::Grass), 2);
        assert_eq!(model.cost_of(Terrain::Water), 4);
        assert_eq!(model.cost_of(Terrain::Rock), 6);
        assert_eq!(model.cost_of(Terrain::Impassable), 0);
    }
}
