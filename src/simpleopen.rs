/*
The open list starts out holding only the start node.

Entries are OpenItems: a node plus the order it was pushed in, which is the final tie break so
runs are deterministic. Alongside the heap we track the lowest g queued per cell, which is what
the engines consult before pushing a neighbour.
*/
use std::collections::binary_heap::BinaryHeap;
use std::collections::HashMap;
use std::rc::Rc;

use crate::astar::{OpenItem, OpenList};
use crate::node::SearchNode;
use crate::subepsilon::Epsilon;
use crate::{Cost, GridCell};

/// SimpleOpenList is a simplistic implementation of an astar::OpenList
/// It uses a BinaryHeap as the priority queue. Several entries for the same cell may be queued;
/// whichever is popped first wins and the others are discarded by the engine as stale.
/// Focal selection scans the heap and rebuilds it after removing the chosen entry, so it is
/// linear in the size of the frontier.
#[derive(Debug, Default)]
pub struct SimpleOpenList {
    ordering: BinaryHeap<OpenItem>,
    queued: HashMap<GridCell, Cost>,
    next_seq: u64,
}

impl SimpleOpenList {
    pub fn new() -> Self {
        Self::default()
    }

    fn forget(&mut self, item: OpenItem) -> Rc<SearchNode> {
        self.queued.remove(&item.node.cell);
        item.node
    }
}

impl OpenList for SimpleOpenList {
    fn is_empty(&self) -> bool {
        self.ordering.is_empty()
    }

    fn len(&self) -> usize {
        self.ordering.len()
    }

    fn push_open(&mut self, node: Rc<SearchNode>) {
        self.queued
            .entry(node.cell)
            .and_modify(|g| *g = (*g).min(node.g))
            .or_insert(node.g);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.ordering.push(OpenItem { node, seq });
    }

    fn pop_min(&mut self) -> Option<Rc<SearchNode>> {
        let item = self.ordering.pop()?;
        Some(self.forget(item))
    }

    fn pop_focal(&mut self, epsilon: Epsilon) -> Option<Rc<SearchNode>> {
        let bound = epsilon.bound(self.ordering.peek()?.node.f);

        let mut items = std::mem::take(&mut self.ordering).into_vec();
        let chosen = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.node.f <= bound)
            .min_by_key(|(_, item)| item.focal_key())
            .map(|(idx, _)| idx);

        let item = chosen.map(|idx| items.swap_remove(idx));
        self.ordering = BinaryHeap::from(items);
        item.map(|item| self.forget(item))
    }

    fn queued_cost(&self, cell: GridCell) -> Option<Cost> {
        self.queued.get(&cell).copied()
    }

    fn cells(&self) -> Vec<GridCell> {
        self.ordering.iter().map(|item| item.node.cell).collect()
    }
}
