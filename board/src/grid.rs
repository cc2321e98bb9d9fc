//! Playable cell topology of a board.

use std::collections::HashSet;

use glam::Vec2;
use hexspin_core::{hex_corners, CellCoord, EngineError};

/// Immutable set of playable cells.
///
/// Rows alternate in length: even rows hold `width` cells, odd rows hold
/// `width + 1`. Because even rows are shifted right by half a tile, the odd
/// rows overhang both sides and the outline stays symmetric. Heights are odd so
/// the first and last rows are both short rows.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellCoord>,
    members: HashSet<CellCoord>,
}

impl Grid {
    /// Builds the grid for the provided dimensions.
    pub fn create(width: u32, height: u32) -> Result<Self, EngineError> {
        if height % 2 == 0 || width == 0 {
            return Err(EngineError::InvalidGridShape { width, height });
        }
        let (Ok(columns), Ok(rows)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(EngineError::InvalidGridShape { width, height });
        };

        let mut cells = Vec::new();
        for r in 0..rows {
            let length = if r % 2 == 0 { columns } else { columns + 1 };
            cells.extend((0..length).map(|q| CellCoord::new(q, r)));
        }
        let members = cells.iter().copied().collect();

        Ok(Self {
            width,
            height,
            cells,
            members,
        })
    }

    /// Length of the even rows.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Every playable cell in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of playable cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the cell belongs to the grid.
    #[must_use]
    pub fn has_cell(&self, cell: CellCoord) -> bool {
        self.members.contains(&cell)
    }
}

/// World-space rectangle enclosing every hex of a grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridBounds {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl GridBounds {
    /// Centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Extent of the rectangle.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Computes the bounding rectangle of the grid's hex outlines.
///
/// Used to align the board with external content such as an image centre.
#[must_use]
pub fn grid_bounds(grid: &Grid, tile_size: f32, origin: Vec2) -> GridBounds {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for corner in grid
        .cells()
        .iter()
        .flat_map(|cell| hex_corners(*cell, tile_size, origin))
    {
        min = min.min(corner);
        max = max.max(corner);
    }
    GridBounds { min, max }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_heights_are_rejected() {
        assert_eq!(
            Grid::create(7, 4).err(),
            Some(EngineError::InvalidGridShape {
                width: 7,
                height: 4
            })
        );
    }

    #[test]
    fn zero_width_is_rejected() {
        assert!(Grid::create(0, 3).is_err());
    }

    #[test]
    fn rows_alternate_in_length() {
        let grid = Grid::create(4, 5).expect("grid");
        for r in 0..5 {
            let length = grid.cells().iter().filter(|cell| cell.r() == r).count();
            assert_eq!(length, if r % 2 == 0 { 4 } else { 5 });
        }
        assert_eq!(grid.cell_count(), 4 * 5 + 2);
    }

    #[test]
    fn membership_is_exact() {
        let grid = Grid::create(3, 3).expect("grid");
        assert!(grid.has_cell(CellCoord::new(2, 0)));
        assert!(!grid.has_cell(CellCoord::new(3, 0)));
        assert!(grid.has_cell(CellCoord::new(3, 1)));
        assert!(!grid.has_cell(CellCoord::new(0, 3)));
        assert!(!grid.has_cell(CellCoord::new(-1, 1)));
    }

    #[test]
    fn bounds_match_padded_board_extent() {
        let grid = Grid::create(5, 3).expect("grid");
        let tile_size = 10.0;
        let bounds = grid_bounds(&grid, tile_size, Vec2::ZERO);
        let size = bounds.size();
        let expected_width = hexspin_core::hex::SQRT_3 * 6.0 * tile_size;
        let expected_height = (1.5 * 3.0 + 0.5) * tile_size;
        assert!((size.x - expected_width).abs() < 1e-2, "width {}", size.x);
        assert!((size.y - expected_height).abs() < 1e-2, "height {}", size.y);
    }

    #[test]
    fn bounds_center_follows_origin() {
        let grid = Grid::create(5, 3).expect("grid");
        let at_zero = grid_bounds(&grid, 8.0, Vec2::ZERO).center();
        let shifted = grid_bounds(&grid, 8.0, Vec2::new(30.0, -12.0)).center();
        assert!((shifted - at_zero - Vec2::new(30.0, -12.0)).length() < 1e-3);
    }
}
