//! Offset hex coordinate system shared by every Hexspin crate.
//!
//! Cells use pointy-top hexes laid out in rows. Even rows are shifted right by
//! half a tile width, so the six neighbour offsets depend on row parity. The
//! direction index is the single source of truth for operator cycles, vertex
//! discovery and hover outlines: direction `i` points at screen angle `60°·i`
//! (clockwise from east, y grows downwards) and hex corner `i` sits between
//! directions `i` and `i + 1`.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Square root of three, the horizontal spacing factor of pointy-top hexes.
pub const SQRT_3: f32 = 1.732_050_8;

/// Vertical distance between adjacent rows expressed in tile-size units.
pub const ROW_SPACING: f32 = 1.5;

const KEY_SEPARATOR: char = ',';

const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, 1), (0, 1), (-1, 0), (0, -1), (1, -1)];
const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(1, 0), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1)];

/// Location of a single hex cell expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    q: i32,
    r: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column index within the row.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row index.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Reports whether the cell sits on an even (half-shifted) row.
    #[must_use]
    pub const fn is_even_row(&self) -> bool {
        self.r.rem_euclid(2) == 0
    }

    /// Returns the adjacent cell in the provided direction.
    ///
    /// The result may lie outside any particular grid; callers filter with
    /// their own membership test.
    #[must_use]
    pub fn neighbor(self, direction: HexDirection) -> Self {
        let table = if self.is_even_row() {
            &EVEN_ROW_OFFSETS
        } else {
            &ODD_ROW_OFFSETS
        };
        let (dq, dr) = table[usize::from(direction.index())];
        Self::new(self.q.wrapping_add(dq), self.r.wrapping_add(dr))
    }

    /// All six neighbours in direction order.
    #[must_use]
    pub fn neighbors(self) -> [Self; 6] {
        HexDirection::ALL.map(|direction| self.neighbor(direction))
    }

    /// Canonical key naming this cell.
    #[must_use]
    pub fn key(self) -> CellKey {
        cell_key(self)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.q, self.r)
    }
}

/// Canonical string form of a [`CellCoord`].
///
/// Keys are `"{q},{r}"` in decimal. The mapping is total over `i32` pairs and
/// injective, so keys double as dictionary keys and tile identities. Ordering
/// is plain lexicographic string ordering.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey(String);

impl CellKey {
    /// Borrows the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the canonical key of a cell.
#[must_use]
pub fn cell_key(cell: CellCoord) -> CellKey {
    CellKey(cell.to_string())
}

/// Parses a canonical key back into its cell.
///
/// Only the exact canonical form is accepted: surrounding whitespace, plus
/// signs or leading zeros would break injectivity and are rejected.
pub fn parse_cell_key(value: &str) -> Result<CellCoord, EngineError> {
    let invalid = || EngineError::InvalidCellKey {
        key: value.to_owned(),
    };
    let (q, r) = value.split_once(KEY_SEPARATOR).ok_or_else(invalid)?;
    let q: i32 = q.parse().map_err(|_| invalid())?;
    let r: i32 = r.parse().map_err(|_| invalid())?;
    let cell = CellCoord::new(q, r);
    if cell.to_string() != value {
        return Err(invalid());
    }
    Ok(cell)
}

/// One of the six neighbour directions, indexed `0..6` clockwise from east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexDirection(u8);

impl HexDirection {
    /// East.
    pub const EAST: Self = Self(0);
    /// South-east.
    pub const SOUTH_EAST: Self = Self(1);
    /// South-west.
    pub const SOUTH_WEST: Self = Self(2);
    /// West.
    pub const WEST: Self = Self(3);
    /// North-west.
    pub const NORTH_WEST: Self = Self(4);
    /// North-east.
    pub const NORTH_EAST: Self = Self(5);

    /// Every direction in index order.
    pub const ALL: [Self; 6] = [
        Self::EAST,
        Self::SOUTH_EAST,
        Self::SOUTH_WEST,
        Self::WEST,
        Self::NORTH_WEST,
        Self::NORTH_EAST,
    ];

    /// Creates a direction from any index, wrapping modulo six.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index % 6)
    }

    /// Zero-based direction index.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// Next direction clockwise.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.0 + 1)
    }

    /// Previous direction clockwise, i.e. the next one counter-clockwise.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self::new(self.0 + 5)
    }
}

/// Horizontal distance between adjacent cell centres for the given tile size.
#[must_use]
pub fn column_spacing(tile_size: f32) -> f32 {
    SQRT_3 * tile_size
}

/// Half-tile shift applied to even rows.
#[must_use]
pub fn row_offset_x(row: i32, tile_size: f32) -> f32 {
    if row.rem_euclid(2) == 0 {
        column_spacing(tile_size) / 2.0
    } else {
        0.0
    }
}

/// Maps a cell to the world-space position of its centre.
#[must_use]
pub fn world_from_cell(cell: CellCoord, tile_size: f32, origin: Vec2) -> Vec2 {
    Vec2::new(
        origin.x + cell.q() as f32 * column_spacing(tile_size) + row_offset_x(cell.r(), tile_size),
        origin.y + cell.r() as f32 * ROW_SPACING * tile_size,
    )
}

/// Offsets of the six hex corners from the cell centre.
///
/// Corner `i` lies at angle `30° + 60°·i`, between neighbour directions `i`
/// and `i + 1`.
#[must_use]
pub fn hex_corner_offsets(tile_size: f32) -> [Vec2; 6] {
    let mut corners = [Vec2::ZERO; 6];
    for (index, corner) in corners.iter_mut().enumerate() {
        let angle = (30.0 + 60.0 * index as f32).to_radians();
        *corner = Vec2::new(angle.cos(), angle.sin()) * tile_size;
    }
    corners
}

/// World-space corners of a cell.
#[must_use]
pub fn hex_corners(cell: CellCoord, tile_size: f32, origin: Vec2) -> [Vec2; 6] {
    let center = world_from_cell(cell, tile_size, origin);
    hex_corner_offsets(tile_size).map(|offset| center + offset)
}

/// Corner indices bounding the edge that faces `direction`.
#[must_use]
pub const fn edge_corners(direction: HexDirection) -> (usize, usize) {
    (direction.previous().index() as usize, direction.index() as usize)
}
