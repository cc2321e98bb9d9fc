#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Hexspin.
//!
//! The board owns the tile arrangement of a single puzzle session. It is
//! created solved and mutated exclusively through [`apply_move`] (or the
//! command-driven [`apply`] wrapper), which keeps the cell/tile mapping a
//! bijection at every observable instant.

pub mod grid;

use std::collections::HashMap;

use hexspin_core::{
    AnchorId, AnchorInstance, CellCoord, Command, EngineError, Event, Rotation, TileId,
    TurnDirection,
};

pub use grid::{grid_bounds, Grid, GridBounds};

/// Tile arrangement over a fixed [`Grid`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    tile_at: HashMap<CellCoord, TileId>,
    cell_of: HashMap<TileId, CellCoord>,
    rotation: HashMap<TileId, Rotation>,
    home: HashMap<TileId, CellCoord>,
}

impl BoardState {
    /// Creates the identity arrangement: every tile at home, upright.
    #[must_use]
    pub fn create_solved(grid: &Grid) -> Self {
        let capacity = grid.cell_count();
        let mut state = Self {
            tile_at: HashMap::with_capacity(capacity),
            cell_of: HashMap::with_capacity(capacity),
            rotation: HashMap::with_capacity(capacity),
            home: HashMap::with_capacity(capacity),
        };
        for &cell in grid.cells() {
            let tile = TileId::new(cell);
            let _ = state.tile_at.insert(cell, tile);
            let _ = state.cell_of.insert(tile, cell);
            let _ = state.rotation.insert(tile, Rotation::ZERO);
            let _ = state.home.insert(tile, cell);
        }
        state
    }
}

/// Reports whether every tile sits at its home cell with zero rotation.
#[must_use]
pub fn is_solved(state: &BoardState) -> bool {
    state.cell_of.iter().all(|(tile, cell)| {
        state.home.get(tile) == Some(cell)
            && state.rotation.get(tile).copied().unwrap_or_default() == Rotation::ZERO
    })
}

/// Applies one move to the board and reports the tiles whose pose changed.
///
/// The tile at cycle position `i` moves to position `i + sign` (wrapping), and
/// every moved tile, plus the spin tile if any, turns by
/// `rotation_step · sign`. All cells are resolved before anything is written,
/// so a [`EngineError::MissingTileAtCell`] failure leaves the state untouched.
pub fn apply_move(
    state: &mut BoardState,
    instance: &AnchorInstance,
    direction: TurnDirection,
) -> Result<Vec<TileId>, EngineError> {
    let cycle = instance.cycle();
    let mut movers = Vec::with_capacity(cycle.len());
    for &cell in cycle {
        movers.push(state.tile(cell)?);
    }
    let spinner = instance
        .spin()
        .map(|cell| state.tile(cell))
        .transpose()?;

    let sign = direction.sign();
    let delta = i32::from(instance.rotation_step()) * sign;
    let length = i32::try_from(cycle.len()).unwrap_or(i32::MAX);

    for (index, &tile) in movers.iter().enumerate() {
        let position = i32::try_from(index).unwrap_or(0);
        let target = (position + sign).rem_euclid(length.max(1));
        let destination = cycle[usize::try_from(target).unwrap_or(0)];
        let _ = state.tile_at.insert(destination, tile);
        let _ = state.cell_of.insert(tile, destination);
        state.turn(tile, delta);
    }

    let mut changed = movers;
    if let Some(tile) = spinner {
        state.turn(tile, delta);
        if !changed.contains(&tile) {
            changed.push(tile);
        }
    }

    Ok(changed)
}

/// Applies the provided command to the board.
///
/// `anchor_for` resolves anchor ids against the caller's operator catalog.
/// A successful move emits [`Event::TilesRotated`], followed by
/// [`Event::PuzzleSolved`] when the move completes the puzzle.
pub fn apply<'a, F>(
    state: &mut BoardState,
    command: Command,
    mut anchor_for: F,
    out_events: &mut Vec<Event>,
) -> Result<(), EngineError>
where
    F: FnMut(&AnchorId) -> Option<&'a AnchorInstance>,
{
    match command {
        Command::RotateAnchor { anchor, direction } => {
            let instance = anchor_for(&anchor)
                .ok_or_else(|| EngineError::UnknownAnchor {
                    anchor: anchor.clone(),
                })?;
            let tiles = apply_move(state, instance, direction)?;
            out_events.push(Event::TilesRotated {
                anchor,
                direction,
                tiles,
            });
            if is_solved(state) {
                out_events.push(Event::PuzzleSolved);
            }
        }
    }
    Ok(())
}

impl BoardState {
    fn tile(&self, cell: CellCoord) -> Result<TileId, EngineError> {
        self.tile_at
            .get(&cell)
            .copied()
            .ok_or(EngineError::MissingTileAtCell { cell })
    }

    fn turn(&mut self, tile: TileId, delta: i32) {
        let rotation = self.rotation.entry(tile).or_default();
        *rotation = rotation.turned(delta);
    }
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use hexspin_core::{CellCoord, Rotation, TileId};

    use super::BoardState;

    /// Tile currently occupying the cell.
    #[must_use]
    pub fn tile_at(state: &BoardState, cell: CellCoord) -> Option<TileId> {
        state.tile_at.get(&cell).copied()
    }

    /// Cell currently holding the tile.
    #[must_use]
    pub fn cell_of(state: &BoardState, tile: TileId) -> Option<CellCoord> {
        state.cell_of.get(&tile).copied()
    }

    /// Orientation of the tile.
    #[must_use]
    pub fn rotation_of(state: &BoardState, tile: TileId) -> Option<Rotation> {
        state.rotation.get(&tile).copied()
    }

    /// Number of tiles on the board.
    #[must_use]
    pub fn tile_count(state: &BoardState) -> usize {
        state.cell_of.len()
    }

    /// Captures every tile pose, sorted by cell for deterministic scans.
    #[must_use]
    pub fn tile_poses(state: &BoardState) -> Vec<TilePose> {
        let mut poses: Vec<TilePose> = state
            .tile_at
            .iter()
            .map(|(&cell, &tile)| TilePose {
                tile,
                cell,
                rotation: state.rotation.get(&tile).copied().unwrap_or_default(),
                home: state.home.get(&tile).copied().unwrap_or(tile.home()),
            })
            .collect();
        poses.sort_by_key(|pose| (pose.cell.r(), pose.cell.q()));
        poses
    }

    /// Number of tiles that are away from home or not upright.
    #[must_use]
    pub fn misplaced_count(state: &BoardState) -> usize {
        tile_poses(state)
            .iter()
            .filter(|pose| pose.cell != pose.home || pose.rotation != Rotation::ZERO)
            .count()
    }

    /// Reports whether `cell → tile → cell` is the identity and both maps
    /// cover the same universe.
    #[must_use]
    pub fn is_consistent(state: &BoardState) -> bool {
        state.tile_at.len() == state.cell_of.len()
            && state.rotation.len() == state.cell_of.len()
            && state.home.len() == state.cell_of.len()
            && state
                .tile_at
                .iter()
                .all(|(cell, tile)| state.cell_of.get(tile) == Some(cell))
            && state
                .rotation
                .values()
                .all(|rotation| rotation.get() < hexspin_core::ROTATION_STEPS)
    }

    /// Immutable snapshot of a single tile's pose.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TilePose {
        /// Tile identity.
        pub tile: TileId,
        /// Cell currently holding the tile.
        pub cell: CellCoord,
        /// Current orientation.
        pub rotation: Rotation,
        /// Cell the tile must return to.
        pub home: CellCoord,
    }
}
