#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hexspin puzzle engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative board, and pure systems. Adapters submit [`Command`] values
//! naming an anchor and a turn direction, the board executes them through its
//! `apply` entry point, and then reports [`Event`] values describing which
//! tiles changed pose. Operator kinds, anchor instances, tile identities and
//! the [`EngineError`] taxonomy live here so every crate agrees on them.

pub mod hex;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use hex::{
    cell_key, hex_corner_offsets, hex_corners, parse_cell_key, world_from_cell, CellCoord,
    CellKey, HexDirection,
};

/// Number of orientation steps in a full turn. One step is 60°.
pub const ROTATION_STEPS: u8 = 6;

const ALTERNATING_EVEN_DIRECTIONS: [HexDirection; 3] = [
    HexDirection::EAST,
    HexDirection::SOUTH_WEST,
    HexDirection::NORTH_WEST,
];
const ALTERNATING_ODD_DIRECTIONS: [HexDirection; 3] = [
    HexDirection::SOUTH_EAST,
    HexDirection::WEST,
    HexDirection::NORTH_EAST,
];

/// Commands that express all permissible board mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Rotates the tiles around an anchor by one operator step.
    RotateAnchor {
        /// Anchor whose cycle should be permuted.
        anchor: AnchorId,
        /// Turn direction applied to the cycle.
        direction: TurnDirection,
    },
}

/// Events reported by the board after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a move changed the pose of the listed tiles.
    TilesRotated {
        /// Anchor the move was applied to.
        anchor: AnchorId,
        /// Turn direction that was applied.
        direction: TurnDirection,
        /// Tiles whose position or orientation changed, cycle members first.
        tiles: Vec<TileId>,
    },
    /// Announces that the board returned to its solved configuration.
    PuzzleSolved,
}

/// Failures raised by the engine.
///
/// All variants describe programmer or data-integrity errors; normal play
/// never produces them when inputs are validated upstream.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Grid heights must be odd and both dimensions non-zero.
    #[error("grid shape {width}x{height} is invalid; height must be odd and dimensions non-zero")]
    InvalidGridShape {
        /// Requested row length of even rows.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// A move referenced a cell that holds no tile.
    #[error("no tile occupies cell {cell}")]
    MissingTileAtCell {
        /// Cell that was expected to be occupied.
        cell: CellCoord,
    },
    /// An operator id did not name any known operator.
    #[error("unknown operator id `{id}`")]
    UnknownOperatorId {
        /// Identifier that failed to resolve.
        id: String,
    },
    /// An anchor id did not name any instance in the catalog.
    #[error("unknown anchor `{anchor}`")]
    UnknownAnchor {
        /// Identifier that failed to resolve.
        anchor: AnchorId,
    },
    /// The bounded grid-shape search had no candidates to choose from.
    #[error("no grid shape candidates exist within the configured search ranges")]
    UnresolvableGridShape,
    /// The corner-matching search for a vertex pivot found no candidate.
    #[error("vertex anchor `{anchor}` has no matching corner triple")]
    DegenerateVertexAnchor {
        /// Anchor whose pivot could not be resolved.
        anchor: AnchorId,
    },
    /// Text did not match the canonical cell-key form.
    #[error("`{key}` is not a canonical cell key")]
    InvalidCellKey {
        /// Offending text.
        key: String,
    },
}

/// Direction in which a move turns its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnDirection {
    /// Carries tiles clockwise on screen and turns them clockwise.
    Clockwise,
    /// Carries tiles counter-clockwise on screen and turns them counter-clockwise.
    CounterClockwise,
}

impl TurnDirection {
    /// Both directions, clockwise first.
    pub const ALL: [Self; 2] = [Self::Clockwise, Self::CounterClockwise];

    /// Signed unit used by the permutation and orientation arithmetic.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }

    /// Direction that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Orientation of a tile in 60° clockwise steps, always in `0..6`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rotation(u8);

impl Rotation {
    /// Upright orientation.
    pub const ZERO: Self = Self(0);

    /// Creates a rotation, wrapping the provided step count modulo six.
    #[must_use]
    pub const fn new(steps: u8) -> Self {
        Self(steps % ROTATION_STEPS)
    }

    /// Number of 60° clockwise steps.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns the rotation turned by a signed number of steps.
    #[must_use]
    pub fn turned(self, delta: i32) -> Self {
        let wrapped = (i32::from(self.0) + delta).rem_euclid(i32::from(ROTATION_STEPS));
        Self(u8::try_from(wrapped).unwrap_or(0))
    }

    /// Clockwise angle in radians.
    #[must_use]
    pub fn radians(self) -> f32 {
        (60.0 * f32::from(self.0)).to_radians()
    }
}

/// Identity of a tile, equal to the cell it must occupy when solved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(CellCoord);

impl TileId {
    /// Creates the identity of the tile whose home is `home`.
    #[must_use]
    pub const fn new(home: CellCoord) -> Self {
        Self(home)
    }

    /// Home cell of the tile.
    #[must_use]
    pub const fn home(&self) -> CellCoord {
        self.0
    }

    /// Canonical key of the tile, identical to its home cell key.
    #[must_use]
    pub fn key(&self) -> CellKey {
        cell_key(self.0)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Closed set of move operators.
///
/// Adding an operator means extending this enum and every `match` over it;
/// there is no runtime registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperatorKind {
    /// Six neighbours of a cell rotate around it by 60°.
    Ring6,
    /// Neighbours 0, 2 and 4 rotate by 120° while the centre spins in place.
    AlternatingEven,
    /// Neighbours 1, 3 and 5 rotate by 120° while the centre spins in place.
    AlternatingOdd,
    /// Three cells meeting at a shared vertex rotate by 120°.
    Vertex,
}

impl OperatorKind {
    /// Every operator in dispatch order.
    pub const ALL: [Self; 4] = [
        Self::Ring6,
        Self::AlternatingEven,
        Self::AlternatingOdd,
        Self::Vertex,
    ];

    /// Stable identifier used in configuration and anchor ids.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Ring6 => "ring6",
            Self::AlternatingEven => "alt3_even",
            Self::AlternatingOdd => "alt3_odd",
            Self::Vertex => "vertex3",
        }
    }

    /// Resolves an operator from its stable identifier.
    pub fn from_id(id: &str) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| EngineError::UnknownOperatorId { id: id.to_owned() })
    }

    /// Number of cells permuted by one move.
    #[must_use]
    pub const fn cycle_length(self) -> usize {
        match self {
            Self::Ring6 => 6,
            Self::AlternatingEven | Self::AlternatingOdd | Self::Vertex => 3,
        }
    }

    /// Orientation change of each moved tile, in 60° steps.
    #[must_use]
    pub const fn rotation_step(self) -> u8 {
        match self {
            Self::Ring6 => 1,
            Self::AlternatingEven | Self::AlternatingOdd | Self::Vertex => 2,
        }
    }

    /// Whether the anchor cell spins in place during a move.
    #[must_use]
    pub const fn spins_anchor(self) -> bool {
        matches!(self, Self::AlternatingEven | Self::AlternatingOdd)
    }

    /// Neighbour directions forming the cycle of a cell-anchored operator.
    ///
    /// Returns `None` for [`OperatorKind::Vertex`], whose cycles are anchored at
    /// corners rather than cells.
    #[must_use]
    pub const fn cell_directions(self) -> Option<&'static [HexDirection]> {
        match self {
            Self::Ring6 => Some(&HexDirection::ALL),
            Self::AlternatingEven => Some(&ALTERNATING_EVEN_DIRECTIONS),
            Self::AlternatingOdd => Some(&ALTERNATING_ODD_DIRECTIONS),
            Self::Vertex => None,
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Unique identifier of an anchor instance within a catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(String);

impl AnchorId {
    /// Identifier of a cell-anchored instance.
    #[must_use]
    pub fn for_cell(kind: OperatorKind, cell: CellCoord) -> Self {
        Self(format!("{}@{}", kind.id(), cell_key(cell)))
    }

    /// Identifier of a vertex instance, built from the lexicographically sorted
    /// keys of the three cells so every discovery of the vertex agrees.
    #[must_use]
    pub fn for_vertex(cells: [CellCoord; 3]) -> Self {
        let mut keys = cells.map(cell_key);
        keys.sort();
        let joined = keys
            .iter()
            .map(CellKey::as_str)
            .collect::<Vec<_>>()
            .join("|");
        Self(format!("{}@{joined}", OperatorKind::Vertex.id()))
    }

    /// Borrows the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A concrete move opportunity on a particular grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorInstance {
    kind: OperatorKind,
    id: AnchorId,
    cycle: Vec<CellCoord>,
    spin: Option<CellCoord>,
}

impl AnchorInstance {
    /// Describes a move over `cycle`, optionally spinning the `spin` cell.
    ///
    /// Cycle order defines the permutation: a clockwise move carries the tile
    /// at position `i` to position `i + 1`.
    #[must_use]
    pub fn new(
        kind: OperatorKind,
        id: AnchorId,
        cycle: Vec<CellCoord>,
        spin: Option<CellCoord>,
    ) -> Self {
        Self {
            kind,
            id,
            cycle,
            spin,
        }
    }

    /// Operator that produced the instance.
    #[must_use]
    pub const fn kind(&self) -> OperatorKind {
        self.kind
    }

    /// Unique identifier of the instance.
    #[must_use]
    pub const fn id(&self) -> &AnchorId {
        &self.id
    }

    /// Ordered cells whose tiles permute under the move.
    #[must_use]
    pub fn cycle(&self) -> &[CellCoord] {
        &self.cycle
    }

    /// Cell whose tile turns in place, if any.
    #[must_use]
    pub const fn spin(&self) -> Option<CellCoord> {
        self.spin
    }

    /// Orientation change per move in 60° steps.
    #[must_use]
    pub const fn rotation_step(&self) -> u8 {
        self.kind.rotation_step()
    }

    /// Every cell touched by the move: cycle cells followed by the spin cell.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cycle.iter().copied().chain(self.spin)
    }
}
