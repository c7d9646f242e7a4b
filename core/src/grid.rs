//! Immutable tile grid and the level descriptor it is built from.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Static description of a level as supplied by the level loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Human readable level name.
    pub name: String,
    /// Length of each square tile edge measured in world units.
    pub tile_size: f32,
    /// Row-major tile values; zero marks a blocked cell, anything else is passable.
    pub tiles: Vec<Vec<u8>>,
    /// Cell the player enters the level from.
    pub start: CellCoord,
    /// Cell that marks the level exit.
    pub end: CellCoord,
}

/// Reasons a level descriptor cannot be turned into a [`Grid`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LevelError {
    /// The descriptor has no rows or no columns.
    #[error("level grid must contain at least one row and one column")]
    Empty,
    /// The descriptor is too large to index with signed 32-bit coordinates.
    #[error("level grid of {rows}x{columns} cells exceeds the supported size")]
    TooLarge {
        /// Number of rows in the descriptor.
        rows: usize,
        /// Number of columns in the first row.
        columns: usize,
    },
    /// A row differs in length from the first row.
    #[error("row {row} has {found} tiles but the first row has {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
    /// The tile size is zero, negative, or not finite.
    #[error("tile size must be a positive finite number, got {0}")]
    InvalidTileSize(f32),
    /// The start cell is out of range or blocked.
    #[error("start cell {0:?} is not a passable cell")]
    StartNotPassable(CellCoord),
    /// The end cell is out of range or blocked.
    #[error("end cell {0:?} is not a passable cell")]
    EndNotPassable(CellCoord),
}

/// Immutable description of the dungeon as a grid of passable and blocked cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<bool>,
    tile_size: f32,
    start: CellCoord,
    end: CellCoord,
}

impl Grid {
    /// Builds a grid from a level descriptor, validating its invariants once.
    pub fn from_descriptor(descriptor: &LevelDescriptor) -> Result<Self, LevelError> {
        let row_count = descriptor.tiles.len();
        let column_count = descriptor.tiles.first().map_or(0, Vec::len);
        if row_count == 0 || column_count == 0 {
            return Err(LevelError::Empty);
        }

        let too_large = LevelError::TooLarge {
            rows: row_count,
            columns: column_count,
        };
        let rows = i32::try_from(row_count).map_err(|_| too_large.clone())?;
        let columns = i32::try_from(column_count).map_err(|_| too_large)?;

        if !descriptor.tile_size.is_finite() || descriptor.tile_size <= 0.0 {
            return Err(LevelError::InvalidTileSize(descriptor.tile_size));
        }

        let mut cells = Vec::with_capacity(row_count * column_count);
        for (row, tiles) in descriptor.tiles.iter().enumerate() {
            if tiles.len() != column_count {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: column_count,
                    found: tiles.len(),
                });
            }
            cells.extend(tiles.iter().map(|&tile| tile != 0));
        }

        let grid = Self {
            rows: rows.unsigned_abs(),
            columns: columns.unsigned_abs(),
            cells,
            tile_size: descriptor.tile_size,
            start: descriptor.start,
            end: descriptor.end,
        };

        if !grid.is_passable(grid.start) {
            return Err(LevelError::StartNotPassable(grid.start));
        }
        if !grid.is_passable(grid.end) {
            return Err(LevelError::EndNotPassable(grid.end));
        }

        Ok(grid)
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Cell the player enters the level from.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell that marks the level exit.
    #[must_use]
    pub const fn end(&self) -> CellCoord {
        self.end
    }

    /// Total extent of the grid along the world X axis.
    #[must_use]
    pub fn world_width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// Total extent of the grid along the world Z axis.
    #[must_use]
    pub fn world_depth(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// World-space point at the horizontal centre of the cell, at floor height.
    #[must_use]
    pub fn tile_center(&self, cell: CellCoord) -> Vec3 {
        Vec3::new(
            (cell.column() as f32 + 0.5) * self.tile_size,
            0.0,
            (cell.row() as f32 + 0.5) * self.tile_size,
        )
    }

    /// Cell containing the provided world-space position.
    ///
    /// The result may lie outside the grid; use [`Grid::contains`] to check.
    #[must_use]
    pub fn cell_at(&self, position: Vec3) -> CellCoord {
        let column = (position.x / self.tile_size).floor() as i32;
        let row = (position.z / self.tile_size).floor() as i32;
        CellCoord::new(row, column)
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Reports whether a character may occupy the cell. Out-of-range cells are blocked.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Iterates passable cells in row-major scan order.
    pub fn passable_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, passable)| **passable)
            .map(move |(index, _)| {
                let row = (index / columns) as i32;
                let column = (index % columns) as i32;
                CellCoord::new(row, column)
            })
    }

    /// Number of passable cells in the grid.
    #[must_use]
    pub fn count_passable_cells(&self) -> usize {
        self.cells.iter().filter(|passable| **passable).count()
    }

    /// The `n`-th passable cell (zero-based) in row-major order, if it exists.
    #[must_use]
    pub fn nth_passable_cell(&self, n: usize) -> Option<CellCoord> {
        self.passable_cells().nth(n)
    }

    /// Maps a uniform value in `[0, 1)` onto a passable cell.
    ///
    /// Returns `None` only when the grid has no passable cells.
    #[must_use]
    pub fn random_passable_cell(&self, value: f64) -> Option<CellCoord> {
        let count = self.count_passable_cells();
        if count == 0 {
            return None;
        }
        let scaled = (value * count as f64).floor() as usize;
        self.nth_passable_cell(scaled % count)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let row = u32::try_from(cell.row()).ok()?;
        let column = u32::try_from(cell.column()).ok()?;
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(tiles: Vec<Vec<u8>>, start: CellCoord, end: CellCoord) -> LevelDescriptor {
        LevelDescriptor {
            name: "test".to_owned(),
            tile_size: 10.0,
            tiles,
            start,
            end,
        }
    }

    fn checkerboard() -> Grid {
        let tiles = vec![vec![1, 0, 1], vec![0, 1, 0], vec![1, 1, 0]];
        Grid::from_descriptor(&descriptor(
            tiles,
            CellCoord::new(0, 0),
            CellCoord::new(2, 1),
        ))
        .expect("valid grid")
    }

    #[test]
    fn tile_center_and_cell_at_are_inverse_for_every_cell() {
        let grid = checkerboard();
        for row in 0..3 {
            for column in 0..3 {
                let cell = CellCoord::new(row, column);
                assert_eq!(grid.cell_at(grid.tile_center(cell)), cell);
            }
        }
    }

    #[test]
    fn tile_center_matches_expected_coordinates() {
        let grid = checkerboard();
        let center = grid.tile_center(CellCoord::new(2, 1));
        assert_eq!(center, Vec3::new(15.0, 0.0, 25.0));
    }

    #[test]
    fn cell_at_reports_off_grid_positions() {
        let grid = checkerboard();
        let cell = grid.cell_at(Vec3::new(-0.5, 0.0, 35.0));
        assert_eq!(cell, CellCoord::new(3, -1));
        assert!(!grid.contains(cell));
        assert!(!grid.is_passable(cell));
    }

    #[test]
    fn passable_enumeration_is_row_major() {
        let grid = checkerboard();
        let cells: Vec<CellCoord> = grid.passable_cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 2),
                CellCoord::new(1, 1),
                CellCoord::new(2, 0),
                CellCoord::new(2, 1),
            ]
        );
        assert_eq!(grid.count_passable_cells(), 5);
    }

    #[test]
    fn nth_passable_cell_is_consistent_with_count() {
        let grid = checkerboard();
        let count = grid.count_passable_cells();
        assert_eq!(grid.nth_passable_cell(count - 1), Some(CellCoord::new(2, 1)));
        assert_eq!(grid.nth_passable_cell(count), None);
    }

    #[test]
    fn random_passable_cell_scales_value_into_enumeration() {
        let grid = checkerboard();
        assert_eq!(grid.random_passable_cell(0.0), Some(CellCoord::new(0, 0)));
        assert_eq!(grid.random_passable_cell(0.5), Some(CellCoord::new(1, 1)));
        assert_eq!(grid.random_passable_cell(0.999), Some(CellCoord::new(2, 1)));
    }

    #[test]
    fn world_extent_scales_with_tile_size() {
        let grid = checkerboard();
        assert!((grid.world_width() - 30.0).abs() < f32::EPSILON);
        assert!((grid.world_depth() - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_blocked_start_cell() {
        let tiles = vec![vec![0, 1], vec![1, 1]];
        let result = Grid::from_descriptor(&descriptor(
            tiles,
            CellCoord::new(0, 0),
            CellCoord::new(1, 1),
        ));
        assert_eq!(result, Err(LevelError::StartNotPassable(CellCoord::new(0, 0))));
    }

    #[test]
    fn rejects_out_of_range_end_cell() {
        let tiles = vec![vec![1, 1], vec![1, 1]];
        let result = Grid::from_descriptor(&descriptor(
            tiles,
            CellCoord::new(0, 0),
            CellCoord::new(5, 0),
        ));
        assert_eq!(result, Err(LevelError::EndNotPassable(CellCoord::new(5, 0))));
    }

    #[test]
    fn rejects_ragged_rows() {
        let tiles = vec![vec![1, 1, 1], vec![1, 1]];
        let result = Grid::from_descriptor(&descriptor(
            tiles,
            CellCoord::new(0, 0),
            CellCoord::new(1, 1),
        ));
        assert_eq!(
            result,
            Err(LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn rejects_empty_and_degenerate_tiles() {
        let empty = Grid::from_descriptor(&descriptor(
            Vec::new(),
            CellCoord::new(0, 0),
            CellCoord::new(0, 0),
        ));
        assert_eq!(empty, Err(LevelError::Empty));

        let mut flat = descriptor(vec![vec![1]], CellCoord::new(0, 0), CellCoord::new(0, 0));
        flat.tile_size = 0.0;
        assert_eq!(
            Grid::from_descriptor(&flat),
            Err(LevelError::InvalidTileSize(0.0))
        );
    }
}
