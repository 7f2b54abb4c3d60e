use std::collections::HashSet;

use crate::astar::ClosedList;
use crate::GridCell;

/// SimpleClosed keeps closed cells in a hash set for lookups, and in a vec to remember the order
/// they were closed in.
#[derive(Debug, Default, Clone)]
pub struct SimpleClosed {
    closed: HashSet<GridCell>,
    order: Vec<GridCell>,
}

impl SimpleClosed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SimpleClosed {
            closed: HashSet::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ClosedList for SimpleClosed {
    fn contains(&self, cell: GridCell) -> bool {
        self.closed.contains(&cell)
    }

    fn close(&mut self, cell: GridCell) -> bool {
        if !self.closed.insert(cell) {
            return false;
        }
        self.order.push(cell);
        true
    }

    fn cells(&self) -> &[GridCell] {
        &self.order
    }
}
