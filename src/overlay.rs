use std::fmt::Write;

use crate::grid::GridMap;
use crate::GridCell;

/// Symbol used by [render] for cells on the route
pub const ROUTE_SYMBOL: char = 'o';

/// PathOverlay is the caller-owned structure an engine marks the found route on.
pub trait PathOverlay {
    fn mark(&mut self, cell: GridCell);
}

/// NoOverlay drops every mark
#[derive(Debug, Default, Copy, Clone)]
pub struct NoOverlay;

impl PathOverlay for NoOverlay {
    fn mark(&mut self, _: GridCell) {}
}

impl PathOverlay for Vec<GridCell> {
    fn mark(&mut self, cell: GridCell) {
        self.push(cell);
    }
}

/// Overlay is a boolean layer the same shape as a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    rows: usize,
    cols: usize,
    marked: Vec<bool>,
}

impl Overlay {
    pub fn new(rows: usize, cols: usize) -> Self {
        Overlay {
            rows,
            cols,
            marked: vec![false; rows * cols],
        }
    }

    pub fn for_map(map: &GridMap) -> Self {
        Overlay::new(map.rows(), map.cols())
    }

    fn index_of(&self, cell: GridCell) -> Option<usize> {
        let row = usize::try_from(cell.row).ok()?;
        let col = usize::try_from(cell.col).ok()?;
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    pub fn is_marked(&self, cell: GridCell) -> bool {
        self.index_of(cell).is_some_and(|idx| self.marked[idx])
    }

    fn is_marked_at(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.marked[row * self.cols + col]
    }

    pub fn count(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }
}

impl PathOverlay for Overlay {
    // Marks outside the layer are dropped
    fn mark(&mut self, cell: GridCell) {
        if let Some(idx) = self.index_of(cell) {
            self.marked[idx] = true;
        }
    }
}

/// render draws the map with the overlay's cells replaced by [ROUTE_SYMBOL]
pub fn render(map: &GridMap, overlay: &Overlay) -> String {
    let mut out = String::with_capacity(map.rows() * (map.cols() * 2 + 1));
    for (row, terrain) in map.iter_rows().enumerate() {
        for (col, cell) in terrain.iter().enumerate() {
            let symbol = if overlay.is_marked_at(row, col) {
                ROUTE_SYMBOL
            } else {
                cell.symbol()
            };
            if col > 0 {
                out.push(' ');
            }
            out.push(symbol);
        }
        let _ = writeln!(out);
    }
    out
}
