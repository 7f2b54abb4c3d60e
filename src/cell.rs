use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// GridCell identifies a position on the terrain grid.
/// Cells are plain values: created freely, compared and hashed by their coordinates.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        GridCell { row, col }
    }

    /// A move between two adjacent cells is diagonal when both coordinates change
    #[inline]
    pub fn is_diagonal_to(&self, other: &GridCell) -> bool {
        self.row != other.row && self.col != other.col
    }
}

impl From<(i32, i32)> for GridCell {
    fn from((row, col): (i32, i32)) -> Self {
        GridCell { row, col }
    }
}

impl Display for GridCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("expected a cell as \"row,col\", got {0:?}")]
pub struct ParseCellError(String);

/// Parses "row,col" (surrounding parentheses and whitespace are tolerated)
impl FromStr for GridCell {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (row, col) = trimmed
            .split_once(',')
            .ok_or_else(|| ParseCellError(s.to_string()))?;

        let row = row.trim().parse().map_err(|_| ParseCellError(s.to_string()))?;
        let col = col.trim().parse().map_err(|_| ParseCellError(s.to_string()))?;
        Ok(GridCell { row, col })
    }
}
