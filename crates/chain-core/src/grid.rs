#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, Coord, TileKind};

/// Board height used by the host game.
pub const GRID_ROWS: usize = 16;
/// Board width used by the host game.
pub const GRID_COLS: usize = 20;

/// `(row, col)` offsets of the 8 neighbours in fixed probe order: NW, N, NE, E, SE, S, SW, W.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// First row/column of the core seed lattice and the spacing between seeds.
const CORE_SEED_START: usize = 2;
const CORE_SEED_STEP: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("cell stored at [{row},{col}] reports position [{reported_row},{reported_col}]")]
    Misplaced {
        row: usize,
        col: usize,
        reported_row: usize,
        reported_col: usize,
    },
    #[error("cell at [{row},{col}] has id {id}, expected {expected}")]
    MismatchedId {
        row: usize,
        col: usize,
        id: u32,
        expected: u32,
    },
    #[error("unknown layout symbol {symbol:?} at [{row},{col}]")]
    Layout { symbol: char, row: usize, col: usize },
}

/// Read-only, row-major snapshot of the board for one tick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")
)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from `rows[row][col]`, validating shape, cell positions and row-major ids.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, SnapshotError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(SnapshotError::Empty);
        }

        let mut cells = Vec::with_capacity(height * width);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(SnapshotError::Ragged {
                    row: r,
                    found: row.len(),
                    expected: width,
                });
            }
            for (c, cell) in row.into_iter().enumerate() {
                if cell.row != r || cell.col != c {
                    return Err(SnapshotError::Misplaced {
                        row: r,
                        col: c,
                        reported_row: cell.row,
                        reported_col: cell.col,
                    });
                }
                let expected = (r * width + c) as u32;
                if cell.id != expected {
                    return Err(SnapshotError::MismatchedId {
                        row: r,
                        col: c,
                        id: cell.id,
                        expected,
                    });
                }
                cells.push(cell);
            }
        }

        Ok(Self {
            rows: height,
            cols: width,
            cells,
        })
    }

    /// Build an unowned, unoccupied grid from text rows: `.` is empty, `0`-`9` are shape kinds.
    pub fn from_layout(layout: &[&str]) -> Result<Self, SnapshotError> {
        let cols = layout.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut rows = Vec::with_capacity(layout.len());
        for (r, line) in layout.iter().enumerate() {
            let mut row = Vec::with_capacity(cols);
            for (c, symbol) in line.chars().enumerate() {
                let kind = match symbol {
                    '.' => TileKind::Empty,
                    '0'..='9' => TileKind::Shape(symbol as u8 - b'0'),
                    _ => return Err(SnapshotError::Layout { symbol, row: r, col: c }),
                };
                row.push(Cell::new(Coord::new(r, c), (r * cols + c) as u32, kind));
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Resolve signed host coordinates (which may carry the off-grid sentinel) to a cell position.
    pub fn locate(&self, row: i64, col: i64) -> Option<Coord> {
        if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.cols as i64 {
            return None;
        }
        Some(Coord::new(row as usize, col as usize))
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.row * self.cols + coord.col)
    }

    pub fn coord_at(&self, index: usize) -> Option<Coord> {
        if index >= self.cells.len() {
            return None;
        }
        Some(Coord::new(index / self.cols, index % self.cols))
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index_of(coord).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index_of(coord).map(move |i| &mut self.cells[i])
    }

    pub fn offset(&self, coord: Coord, d_row: i64, d_col: i64) -> Option<Coord> {
        self.locate(coord.row as i64 + d_row, coord.col as i64 + d_col)
    }

    /// In-bounds neighbours of `coord`, in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(coord, dr, dc))
    }

    pub fn neighbor_indices(&self, index: usize) -> [Option<usize>; 8] {
        let Some(coord) = self.coord_at(index) else {
            return [None; 8];
        };
        let mut out = [None; 8];
        for (i, (dr, dc)) in NEIGHBOR_OFFSETS.into_iter().enumerate() {
            out[i] = self.offset(coord, dr, dc).and_then(|n| self.index_of(n));
        }
        out
    }

    /// Perimeter cells, each listed once: both edge columns row by row, then both edge rows.
    pub fn border_cells(&self) -> Vec<Coord> {
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        let mut out = Vec::with_capacity(2 * (self.rows + self.cols));
        for row in 0..self.rows {
            out.push(Coord::new(row, last_col));
            if last_col > 0 {
                out.push(Coord::new(row, 0));
            }
        }
        for col in 1..last_col {
            out.push(Coord::new(last_row, col));
            if last_row > 0 {
                out.push(Coord::new(0, col));
            }
        }
        out
    }

    /// Evenly spaced interior anchors (every third row and column starting at 2).
    pub fn core_seeds(&self) -> Vec<Coord> {
        let rows = (CORE_SEED_START..self.rows.saturating_sub(1)).step_by(CORE_SEED_STEP);
        let mut out = Vec::new();
        for row in rows {
            for col in (CORE_SEED_START..self.cols.saturating_sub(1)).step_by(CORE_SEED_STEP) {
                out.push(Coord::new(row, col));
            }
        }
        out
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = SnapshotError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Cell>> {
    fn from(grid: Grid) -> Self {
        let cols = grid.cols;
        let mut rows = Vec::with_capacity(grid.rows);
        let mut cells = grid.cells.into_iter();
        for _ in 0..grid.rows {
            rows.push(cells.by_ref().take(cols).collect());
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_seeds_cover_the_standard_board() {
        let layout = vec!["0".repeat(GRID_COLS); GRID_ROWS];
        let refs: Vec<&str> = layout.iter().map(String::as_str).collect();
        let grid = Grid::from_layout(&refs).unwrap();

        let seeds = grid.core_seeds();
        assert_eq!(seeds.len(), 30);
        assert_eq!(seeds.first().copied(), Some(Coord::new(2, 2)));
        assert_eq!(seeds.last().copied(), Some(Coord::new(14, 17)));
    }

    #[test]
    fn border_cells_are_unique_and_on_the_edge() {
        let grid = Grid::from_layout(&["0000", "0000", "0000"]).unwrap();
        let mut border = grid.border_cells();
        assert!(border
            .iter()
            .all(|c| c.row == 0 || c.row == 2 || c.col == 0 || c.col == 3));
        let before = border.len();
        border.sort();
        border.dedup();
        assert_eq!(before, border.len());
        assert_eq!(border.len(), 10);
    }

    #[test]
    fn neighbor_indices_respect_bounds() {
        let grid = Grid::from_layout(&["000", "000"]).unwrap();
        let corner = grid.neighbor_indices(0);
        assert_eq!(corner.iter().flatten().count(), 3);
        assert_eq!(grid.neighbor_indices(99), [None; 8]);
    }

    #[test]
    fn locate_rejects_sentinels() {
        let grid = Grid::from_layout(&["00", "00"]).unwrap();
        assert_eq!(grid.locate(-1, 0), None);
        assert_eq!(grid.locate(0, 2), None);
        assert_eq!(grid.locate(1, 1), Some(Coord::new(1, 1)));
    }

    #[test]
    fn from_rows_rejects_ids_out_of_row_major_order() {
        let row = |r: usize, ids: [u32; 2]| -> Vec<Cell> {
            (0..2)
                .map(|c| Cell::new(Coord::new(r, c), ids[c], TileKind::Shape(0)))
                .collect()
        };
        assert!(Grid::from_rows(vec![row(0, [0, 1]), row(1, [2, 3])]).is_ok());
        assert_eq!(
            Grid::from_rows(vec![row(0, [0, 1]), row(1, [3, 2])]),
            Err(SnapshotError::MismatchedId {
                row: 1,
                col: 0,
                id: 3,
                expected: 2,
            })
        );
    }
}
