#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Hexspin adapters.
//!
//! Backends never read board state directly; they receive a [`Scene`]
//! snapshot with every tile already placed in world space.

use std::collections::HashSet;

use anyhow::Result as AnyResult;
use glam::Vec2;
use hexspin_board::{query, BoardState};
use hexspin_core::{
    hex::edge_corners, hex_corners, world_from_cell, AnchorId, AnchorInstance, CellCoord,
    CellKey, EngineError, HexDirection, OperatorKind, Rotation, TileId, TurnDirection,
};
use hexspin_system_operators::{anchor_world, OperatorCatalog};

/// Mouse button that triggered a rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
}

impl PointerButton {
    /// Rotation requested by the button: primary turns clockwise, secondary
    /// counter-clockwise.
    #[must_use]
    pub const fn turn_direction(self) -> TurnDirection {
        match self {
            Self::Primary => TurnDirection::Clockwise,
            Self::Secondary => TurnDirection::CounterClockwise,
        }
    }
}

/// Placement of one tile in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct TileVisual {
    /// Tile being drawn.
    pub tile: TileId,
    /// Canonical key of the tile's home cell, used to pick its texture.
    pub home_key: CellKey,
    /// Cell the tile currently occupies.
    pub cell: CellCoord,
    /// Centre of the occupied cell.
    pub position: Vec2,
    /// Orientation in rotation units.
    pub rotation: Rotation,
    /// Orientation in radians, clockwise on screen.
    pub rotation_radians: f32,
}

/// Clickable pivot of one anchor instance.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorMarker {
    /// Instance the marker belongs to.
    pub anchor: AnchorId,
    /// World-space pivot of the instance.
    pub pivot: Vec2,
}

/// Straight boundary segment between two hex corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlineEdge {
    /// First endpoint.
    pub from: Vec2,
    /// Second endpoint.
    pub to: Vec2,
}

/// Snapshot handed to rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Hex circumradius in pixels.
    pub tile_size: f32,
    /// World position of cell (0, 0) before row offsets.
    pub origin: Vec2,
    /// Every tile, in row-major order of the occupied cell.
    pub tiles: Vec<TileVisual>,
    /// Operator whose anchors are currently selectable.
    pub selected_operator: OperatorKind,
    /// Pivot markers of the selected operator's instances.
    pub anchors: Vec<AnchorMarker>,
    /// Outline of the hovered instance, if any.
    pub hover: Vec<OutlineEdge>,
    /// Whether the board is solved.
    pub solved: bool,
}

impl Scene {
    /// Captures the board and the selected operator's anchors.
    pub fn capture(
        board: &BoardState,
        catalog: &OperatorCatalog,
        selected_operator: OperatorKind,
        tile_size: f32,
        origin: Vec2,
    ) -> Result<Self, EngineError> {
        let tiles = query::tile_poses(board)
            .into_iter()
            .map(|pose| TileVisual {
                tile: pose.tile,
                home_key: pose.home.key(),
                cell: pose.cell,
                position: world_from_cell(pose.cell, tile_size, origin),
                rotation: pose.rotation,
                rotation_radians: pose.rotation.radians(),
            })
            .collect();

        let anchors = catalog
            .instances(selected_operator)
            .iter()
            .map(|instance| {
                Ok(AnchorMarker {
                    anchor: instance.id().clone(),
                    pivot: anchor_world(instance, tile_size, origin)?,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(Self {
            tile_size,
            origin,
            tiles,
            selected_operator,
            anchors,
            hover: Vec::new(),
            solved: hexspin_board::is_solved(board),
        })
    }

    /// Replaces the hover outline with the outline of `instance`.
    pub fn set_hover(&mut self, instance: Option<&AnchorInstance>) {
        self.hover = instance
            .map(|instance| hover_outline(instance, self.tile_size, self.origin))
            .unwrap_or_default();
    }
}

/// Boundary edges of the union of an instance's cells.
///
/// An edge is emitted for every cell side whose neighbour is not part of the
/// instance. Ring instances leave their unmoved centre out, so their outline
/// has an inner boundary as well.
#[must_use]
pub fn hover_outline(instance: &AnchorInstance, tile_size: f32, origin: Vec2) -> Vec<OutlineEdge> {
    let members: HashSet<CellCoord> = instance.cells().collect();
    let mut edges = Vec::new();
    for cell in instance.cells() {
        let corners = hex_corners(cell, tile_size, origin);
        for direction in HexDirection::ALL {
            if members.contains(&cell.neighbor(direction)) {
                continue;
            }
            let (from, to) = edge_corners(direction);
            edges.push(OutlineEdge {
                from: corners[from],
                to: corners[to],
            });
        }
    }
    edges
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub title: String,
    /// Scene content to display.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Hexspin scenes.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}
