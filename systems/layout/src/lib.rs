#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Geometric fitting of grid dimensions and tile size.
//!
//! Board extents are measured in tile-size units. A grid of `W` columns and
//! `H` (odd) rows spans `√3·(W+1)` horizontally, because odd rows carry one
//! extra cell, and `1.5·H + 0.5` vertically. Padding `d` adds `2d` to both.

use std::ops::RangeInclusive;

use glam::Vec2;
use hexspin_core::EngineError;

const SQRT_3_F64: f64 = 1.732_050_807_568_877_2;

/// Padding around the board used when none is configured, in tile units.
pub const DEFAULT_PADDING: f64 = 0.5;

/// Smallest tile size the solver will return, in pixels.
pub const MIN_TILE_SIZE: f32 = 1.0;

/// Bounds of the integer grid-shape search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRanges {
    /// Candidate row counts; even values are skipped.
    pub heights: RangeInclusive<u32>,
    /// Candidate even-row lengths.
    pub widths: RangeInclusive<u32>,
}

impl Default for SearchRanges {
    fn default() -> Self {
        Self {
            heights: 3..=35,
            widths: 1..=50,
        }
    }
}

/// Tuning knobs shared by the shape and tile-size solvers.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutTuning {
    /// Padding around the board, in tile units.
    pub padding: f64,
    /// Margin kept free inside the viewport, in pixels.
    pub margin: f32,
    /// Bounds of the integer shape search.
    pub ranges: SearchRanges,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            margin: 0.0,
            ranges: SearchRanges::default(),
        }
    }
}

/// Positive root of the continuous relaxation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxedShape {
    /// Real-valued even-row length.
    pub width: f64,
    /// Real-valued row count.
    pub height: f64,
}

/// Integer grid dimensions chosen for a target cell count and aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridShape {
    /// Length of the even rows.
    pub width: u32,
    /// Number of rows, always odd.
    pub height: u32,
    /// Number of cells the grid will contain.
    pub cell_count: u32,
    /// Aspect ratio of the padded board.
    pub aspect: f64,
    /// Continuous optimum the integer search started from, when one exists.
    pub relaxed: Option<RelaxedShape>,
}

/// Number of cells in a grid with alternating row lengths.
#[must_use]
pub fn cell_count(width: u32, height: u32) -> u32 {
    width
        .saturating_mul(height)
        .saturating_add(height.saturating_sub(1) / 2)
}

/// Padded board width in tile units.
#[must_use]
pub fn padded_width(width: u32, padding: f64) -> f64 {
    SQRT_3_F64 * (f64::from(width) + 1.0) + 2.0 * padding
}

/// Padded board height in tile units.
#[must_use]
pub fn padded_height(height: u32, padding: f64) -> f64 {
    1.5 * f64::from(height) + 0.5 + 2.0 * padding
}

/// Width over height of the padded board.
#[must_use]
pub fn board_aspect(width: u32, height: u32, padding: f64) -> f64 {
    padded_width(width, padding) / padded_height(height, padding)
}

/// Solves the continuous relaxation of the shape problem.
///
/// Substituting `W = (n − (H−1)/2) / H` into `board_aspect = ar` yields
/// `A·H² + B·H + C = 0`; the positive root gives `H*` and from it `W*`.
#[must_use]
pub fn relax_grid_shape(target_cells: u32, aspect: f64, padding: f64) -> Option<RelaxedShape> {
    let n = f64::from(target_cells);
    let a = 1.5 * aspect;
    let b = aspect * (0.5 + 2.0 * padding) - 2.0 * padding - SQRT_3_F64 / 2.0;
    let c = -(SQRT_3_F64 / 2.0) * (2.0 * n + 1.0);
    if a <= 0.0 || !a.is_finite() {
        return None;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let height = (-b + discriminant.sqrt()) / (2.0 * a);
    if height <= 0.0 || !height.is_finite() {
        return None;
    }
    let width = (n - (height - 1.0) / 2.0) / height;
    Some(RelaxedShape { width, height })
}

/// Picks grid dimensions for `target_cells` cells on an `aspect` board.
///
/// Uses the default search ranges; see [`derive_grid_shape_in`].
pub fn derive_grid_shape(
    target_cells: u32,
    aspect: f64,
    padding: f64,
) -> Result<GridShape, EngineError> {
    derive_grid_shape_in(target_cells, aspect, padding, &SearchRanges::default())
}

/// Picks grid dimensions by exhaustive search over `ranges`.
///
/// Candidates are ranked by the cell-count error first and the aspect error
/// second; the first candidate in (height, width) order wins exact ties.
pub fn derive_grid_shape_in(
    target_cells: u32,
    aspect: f64,
    padding: f64,
    ranges: &SearchRanges,
) -> Result<GridShape, EngineError> {
    let relaxed = relax_grid_shape(target_cells, aspect, padding);

    let mut best: Option<(u32, f64, u32, u32)> = None;
    for height in ranges.heights.clone().filter(|height| height % 2 == 1) {
        for width in ranges.widths.clone() {
            let count_error = cell_count(width, height).abs_diff(target_cells);
            let aspect_error = (board_aspect(width, height, padding) - aspect).abs();
            let better = match best {
                None => true,
                Some((best_count, best_aspect, _, _)) => {
                    count_error < best_count
                        || (count_error == best_count
                            && aspect_error.total_cmp(&best_aspect).is_lt())
                }
            };
            if better {
                best = Some((count_error, aspect_error, width, height));
            }
        }
    }

    let (_, _, width, height) = best.ok_or(EngineError::UnresolvableGridShape)?;
    let shape = GridShape {
        width,
        height,
        cell_count: cell_count(width, height),
        aspect: board_aspect(width, height, padding),
        relaxed,
    };
    tracing::debug!(
        target_cells,
        width,
        height,
        cells = shape.cell_count,
        aspect = shape.aspect,
        relaxed_width = relaxed.map(|r| r.width),
        relaxed_height = relaxed.map(|r| r.height),
        "grid shape derived"
    );
    Ok(shape)
}

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl LayoutRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }
}

/// Viewport area available to the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Margin kept free on every side, in pixels.
    pub margin: f32,
}

impl Viewport {
    /// Area left once the margin is removed from every side.
    #[must_use]
    pub fn usable(&self) -> LayoutRect {
        let margin = self.margin.max(0.0);
        let size = Vec2::new(
            (self.width - 2.0 * margin).max(0.0),
            (self.height - 2.0 * margin).max(0.0),
        );
        LayoutRect::new(Vec2::splat(margin), size)
    }
}

/// Largest rectangle with the image's aspect ratio centred inside `bounds`.
#[must_use]
pub fn contain_fit(image_width: f32, image_height: f32, bounds: LayoutRect) -> LayoutRect {
    if image_width <= 0.0 || image_height <= 0.0 {
        return LayoutRect::new(bounds.center(), Vec2::ZERO);
    }
    let scale = (bounds.size.x / image_width).min(bounds.size.y / image_height);
    let size = Vec2::new(image_width, image_height) * scale;
    LayoutRect::new(bounds.center() - size * 0.5, size)
}

/// Largest tile size that fits the padded board into the viewport and, when
/// given, into the image rectangle. Never smaller than [`MIN_TILE_SIZE`].
#[must_use]
pub fn derive_tile_size(
    shape: &GridShape,
    padding: f64,
    viewport: &Viewport,
    image: Option<LayoutRect>,
) -> f32 {
    let board_width = padded_width(shape.width, padding) as f32;
    let board_height = padded_height(shape.height, padding) as f32;
    let fit = |size: Vec2| (size.x / board_width).min(size.y / board_height);

    let from_viewport = fit(viewport.usable().size);
    let tile_size = match image {
        Some(rect) => from_viewport.min(fit(rect.size)),
        None => from_viewport,
    };
    let tile_size = if tile_size.is_finite() {
        tile_size.max(MIN_TILE_SIZE)
    } else {
        MIN_TILE_SIZE
    };
    tracing::debug!(tile_size, board_width, board_height, "tile size derived");
    tile_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_of_seventy_five_picks_eight_by_nine() {
        let shape = derive_grid_shape(75, 1.5, 0.5).expect("shape");
        assert_eq!((shape.width, shape.height), (8, 9));
        assert_eq!(shape.cell_count, 76);
    }

    #[test]
    fn exact_counts_win_over_aspect() {
        // 5 columns by 3 rows holds exactly 16 cells.
        let shape = derive_grid_shape(16, 5.0, 0.0).expect("shape");
        assert_eq!(shape.cell_count, 16);
        assert_eq!(shape.height % 2, 1);
    }

    #[test]
    fn aspect_breaks_count_ties() {
        // 31 cells fit exactly as 10x3, 4x7, 3x9 and 1x21.
        let tall = derive_grid_shape(31, 0.5, 0.5).expect("tall");
        assert_eq!((tall.width, tall.height), (3, 9));
        let wide = derive_grid_shape(31, 3.0, 0.5).expect("wide");
        assert_eq!((wide.width, wide.height), (10, 3));
    }

    #[test]
    fn empty_search_space_is_unresolvable() {
        let ranges = SearchRanges {
            heights: 4..=4,
            widths: 1..=50,
        };
        assert_eq!(
            derive_grid_shape_in(75, 1.5, 0.5, &ranges),
            Err(EngineError::UnresolvableGridShape)
        );
    }

    #[test]
    fn relaxed_root_solves_both_targets() {
        let relaxed = relax_grid_shape(75, 1.5, 0.5).expect("root");
        let cells = relaxed.width * relaxed.height + (relaxed.height - 1.0) / 2.0;
        assert!((cells - 75.0).abs() < 1e-6);
        let aspect = (SQRT_3_F64 * (relaxed.width + 1.0) + 1.0) / (1.5 * relaxed.height + 1.5);
        assert!((aspect - 1.5).abs() < 1e-6, "aspect {aspect}");
    }

    #[test]
    fn cell_count_matches_row_rule() {
        assert_eq!(cell_count(7, 3), 22);
        assert_eq!(cell_count(8, 9), 76);
        assert_eq!(cell_count(1, 1), 1);
    }

    #[test]
    fn viewport_limits_tile_size_without_image() {
        let shape = GridShape {
            width: 8,
            height: 9,
            cell_count: 76,
            aspect: board_aspect(8, 9, 0.5),
            relaxed: None,
        };
        let viewport = Viewport {
            width: 1000.0,
            height: 600.0,
            margin: 20.0,
        };
        let tile_size = derive_tile_size(&shape, 0.5, &viewport, None);
        let expected = (960.0 / padded_width(8, 0.5) as f32).min(560.0 / 15.0);
        assert!((tile_size - expected).abs() < 1e-4);
    }

    #[test]
    fn image_rectangle_can_shrink_tiles() {
        let shape = GridShape {
            width: 8,
            height: 9,
            cell_count: 76,
            aspect: board_aspect(8, 9, 0.5),
            relaxed: None,
        };
        let viewport = Viewport {
            width: 1000.0,
            height: 600.0,
            margin: 0.0,
        };
        let image = contain_fit(300.0, 300.0, LayoutRect::new(Vec2::ZERO, Vec2::splat(150.0)));
        let with_image = derive_tile_size(&shape, 0.5, &viewport, Some(image));
        let without = derive_tile_size(&shape, 0.5, &viewport, None);
        assert!(with_image < without);
        assert!((with_image - 150.0 / padded_width(8, 0.5) as f32).abs() < 1e-4);
    }

    #[test]
    fn tile_size_is_clamped_to_one() {
        let shape = GridShape {
            width: 50,
            height: 35,
            cell_count: cell_count(50, 35),
            aspect: board_aspect(50, 35, 0.5),
            relaxed: None,
        };
        let viewport = Viewport {
            width: 10.0,
            height: 10.0,
            margin: 8.0,
        };
        assert_eq!(derive_tile_size(&shape, 0.5, &viewport, None), MIN_TILE_SIZE);
    }

    #[test]
    fn contain_fit_centres_letterboxed_image() {
        let bounds = LayoutRect::new(Vec2::new(10.0, 10.0), Vec2::new(400.0, 200.0));
        let fitted = contain_fit(100.0, 100.0, bounds);
        assert_eq!(fitted.size, Vec2::new(200.0, 200.0));
        assert_eq!(fitted.origin, Vec2::new(110.0, 10.0));
    }
}
