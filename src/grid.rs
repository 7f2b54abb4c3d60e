use std::fmt::{Display, Formatter};
use std::path::Path;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{Cost, GridCell};

/// Offsets of the 8-connected neighbourhood, orthogonal moves first
const MOVES: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

const ORTHOGONAL_COST: f64 = 1.0;
const DIAGONAL_COST: f64 = 1.5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Terrain {
    Grass,
    Water,
    Rock,
    Impassable,
}

impl Terrain {
    pub fn from_symbol(c: char) -> Option<Terrain> {
        match c {
            '.' => Some(Terrain::Grass),
            '~' => Some(Terrain::Water),
            '*' => Some(Terrain::Rock),
            '#' => Some(Terrain::Impassable),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Terrain::Grass => '.',
            Terrain::Water => '~',
            Terrain::Rock => '*',
            Terrain::Impassable => '#',
        }
    }

    #[inline]
    pub fn is_passable(self) -> bool {
        self != Terrain::Impassable
    }
}

impl Display for Terrain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Terrain::Grass => "grass",
            Terrain::Water => "water",
            Terrain::Rock => "rock",
            Terrain::Impassable => "impassable",
        };
        f.write_str(name)
    }
}

/// TerrainMap is the read-only view of the world the search engines query.
pub trait TerrainMap {
    /// In bounds and passable
    fn is_valid(&self, cell: GridCell) -> bool;
    /// Terrain at `cell`; anything outside the map reads as impassable
    fn terrain_of(&self, cell: GridCell) -> Terrain;
}

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("failed to read map file")]
    Io(#[from] std::io::Error),
    #[error("map contains no terrain")]
    Empty,
    #[error("map row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// GridMap is a dense, row-major terrain grid loaded from the textual map format:
/// one line per row, `.` grass, `~` water, `*` rock, `#` impassable.
/// Any other character on a line is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    cells: Vec<Terrain>,
}

impl GridMap {
    pub fn parse(text: &str) -> Result<GridMap, MapError> {
        let mut cells = Vec::new();
        let mut rows = 0;
        let mut cols = None;

        for line in text.lines() {
            let row: Vec<Terrain> = line.chars().filter_map(Terrain::from_symbol).collect();
            if row.is_empty() {
                continue;
            }

            let expected = *cols.get_or_insert(row.len());
            if row.len() != expected {
                return Err(MapError::Ragged {
                    row: rows,
                    expected,
                    found: row.len(),
                });
            }

            cells.extend(row);
            rows += 1;
        }

        let cols = cols.ok_or(MapError::Empty)?;
        tracing::debug!(rows, cols, "parsed terrain map");
        Ok(GridMap { rows, cols, cells })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<GridMap, MapError> {
        let text = std::fs::read_to_string(path)?;
        GridMap::parse(&text)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major offset of an in-bounds cell
    pub fn index_of(&self, cell: GridCell) -> Option<usize> {
        let row = usize::try_from(cell.row).ok()?;
        let col = usize::try_from(cell.col).ok()?;
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    /// The valid 8-connected neighbours of `cell`
    pub fn neighbours(&self, cell: GridCell) -> Vec<GridCell> {
        MOVES
            .iter()
            .map(|(dr, dc)| GridCell::new(cell.row + dr, cell.col + dc))
            .filter(|n| self.is_valid(*n))
            .collect()
    }

    /// Cost of a single step between adjacent cells
    pub fn movement_cost(&self, from: GridCell, to: GridCell) -> Cost {
        if from.is_diagonal_to(&to) {
            OrderedFloat(DIAGONAL_COST)
        } else {
            OrderedFloat(ORTHOGONAL_COST)
        }
    }

    /// Iterate the rows as terrain slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Terrain]> {
        self.cells.chunks(self.cols)
    }
}

impl TerrainMap for GridMap {
    fn is_valid(&self, cell: GridCell) -> bool {
        self.terrain_of(cell).is_passable()
    }

    fn terrain_of(&self, cell: GridCell) -> Terrain {
        self.index_of(cell)
            .map_or(Terrain::Impassable, |idx| self.cells[idx])
    }
}

impl Display for GridMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.iter_rows() {
            let line: String = row.iter().map(|t| t.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
.~*
.#.
...
";

    #[test]
    fn parses_symbols() {
        let map = GridMap::parse(SAMPLE).unwrap();
        assert_eq!((map.rows(), map.cols()), (3, 3));
        assert_eq!(map.terrain_of(GridCell::new(0, 0)), Terrain::Grass);
        assert_eq!(map.terrain_of(GridCell::new(0, 1)), Terrain::Water);
        assert_eq!(map.terrain_of(GridCell::new(0, 2)), Terrain::Rock);
        assert_eq!(map.terrain_of(GridCell::new(1, 1)), Terrain::Impassable);
        assert_eq!(map.to_string(), SAMPLE);
    }

    #[test]
    fn terrain_names() {
        let names: Vec<_> = [Terrain::Grass, Terrain::Water, Terrain::Rock, Terrain::Impassable]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, ["grass", "water", "rock", "impassable"]);
    }

    #[test]
    fn ignores_unknown_characters_and_blank_lines() {
        let map = GridMap::parse(". . .\r\n\n.x.~\n").unwrap();
        assert_eq!((map.rows(), map.cols()), (2, 3));
        assert_eq!(map.terrain_of(GridCell::new(1, 2)), Terrain::Water);
    }

    #[test]
    fn rejects_ragged_and_empty_maps() {
        assert!(matches!(
            GridMap::parse("...\n..\n"),
            Err(MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(GridMap::parse("\n\n"), Err(MapError::Empty)));
    }

    #[test]
    fn out_of_bounds_is_impassable() {
        let map = GridMap::parse(SAMPLE).unwrap();
        for cell in [
            GridCell::new(-1, 0),
            GridCell::new(0, -1),
            GridCell::new(3, 0),
            GridCell::new(0, 3),
        ] {
            assert_eq!(map.terrain_of(cell), Terrain::Impassable);
            assert!(!map.is_valid(cell));
        }
    }

    #[test]
    fn neighbours_skip_impassable_and_out_of_bounds() {
        let map = GridMap::parse(SAMPLE).unwrap();

        let corner = map.neighbours(GridCell::new(0, 0));
        assert_eq!(corner, vec![GridCell::new(1, 0), GridCell::new(0, 1)]);

        let mut bottom = map.neighbours(GridCell::new(2, 1));
        bottom.sort();
        assert_eq!(
            bottom,
            vec![
                GridCell::new(1, 0),
                GridCell::new(1, 2),
                GridCell::new(2, 0),
                GridCell::new(2, 2),
            ]
        );
    }

    #[test]
    fn diagonal_steps_cost_more() {
        let map = GridMap::parse(SAMPLE).unwrap();
        let c = GridCell::new(1, 1);
        assert_eq!(map.movement_cost(c, GridCell::new(0, 1)), OrderedFloat(1.0));
        assert_eq!(map.movement_cost(c, GridCell::new(1, 2)), OrderedFloat(1.0));
        assert_eq!(map.movement_cost(c, GridCell::new(2, 2)), OrderedFloat(1.5));
    }
}
