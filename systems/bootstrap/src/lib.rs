#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session bootstrap that wires layout, board and operators together.
//!
//! A [`Session`] owns everything a single puzzle needs. Adapters create one
//! per puzzle and pass it around instead of sharing global state.

use glam::Vec2;
use hexspin_board::{apply, grid_bounds, is_solved, BoardState, Grid};
use hexspin_core::{AnchorId, AnchorInstance, Command, EngineError, Event, TurnDirection};
use hexspin_system_layout::{
    contain_fit, derive_grid_shape_in, derive_tile_size, GridShape, LayoutRect, LayoutTuning,
    Viewport,
};
use hexspin_system_operators::{anchor_world, OperatorCatalog};
use hexspin_system_scramble::{scramble, scramble_rng, unscramble, ScrambleConfig, ScrambleStep};

/// Picture the board is fitted to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageSource {
    /// Only the aspect ratio (width over height) is known.
    Aspect(f64),
    /// Pixel dimensions of the image.
    Size {
        /// Image width in pixels.
        width: f32,
        /// Image height in pixels.
        height: f32,
    },
}

impl ImageSource {
    /// Width over height of the image.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        match *self {
            Self::Aspect(aspect) => aspect,
            Self::Size { width, height } => f64::from(width) / f64::from(height),
        }
    }
}

/// Inputs required to bootstrap a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Desired number of cells.
    pub target_cells: u32,
    /// Picture the board is fitted to.
    pub image: ImageSource,
    /// Viewport width in pixels.
    pub viewport_width: f32,
    /// Viewport height in pixels.
    pub viewport_height: f32,
    /// Solver tuning.
    pub tuning: LayoutTuning,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_cells: 75,
            image: ImageSource::Aspect(1.5),
            viewport_width: 1280.0,
            viewport_height: 720.0,
            tuning: LayoutTuning::default(),
        }
    }
}

impl SessionConfig {
    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
            margin: self.tuning.margin,
        }
    }
}

/// Pixel placement of the board inside the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionLayout {
    /// Grid dimensions chosen by the shape solver.
    pub shape: GridShape,
    /// Hex circumradius in pixels.
    pub tile_size: f32,
    /// World position of cell (0, 0) before row offsets.
    pub origin: Vec2,
    /// Rectangle the image occupies, when its size is known.
    pub image_rect: Option<LayoutRect>,
}

/// Everything a single puzzle needs.
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    grid: Grid,
    board: BoardState,
    catalog: OperatorCatalog,
    layout: SessionLayout,
}

impl Session {
    /// Derives the layout and creates a solved board for it.
    pub fn bootstrap(config: SessionConfig) -> Result<Self, EngineError> {
        let shape = derive_grid_shape_in(
            config.target_cells,
            config.image.aspect(),
            config.tuning.padding,
            &config.tuning.ranges,
        )?;
        let grid = Grid::create(shape.width, shape.height)?;
        let board = BoardState::create_solved(&grid);
        let catalog = OperatorCatalog::build(&grid);
        let layout = fit_layout(&config, &grid, shape);

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            cells = grid.cell_count(),
            tile_size = layout.tile_size,
            anchors = catalog.len(),
            "session ready"
        );

        Ok(Self {
            config,
            grid,
            board,
            catalog,
            layout,
        })
    }

    /// Configuration the session was created from.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Playable cells.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current tile arrangement.
    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Anchor instances of every operator on this grid.
    #[must_use]
    pub fn catalog(&self) -> &OperatorCatalog {
        &self.catalog
    }

    /// Current pixel placement.
    #[must_use]
    pub fn layout(&self) -> &SessionLayout {
        &self.layout
    }

    /// Reports whether the puzzle is solved.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        is_solved(&self.board)
    }

    /// Refits tile size and origin to a new viewport. The grid is kept.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.config.viewport_width = viewport_width;
        self.config.viewport_height = viewport_height;
        self.layout = fit_layout(&self.config, &self.grid, self.layout.shape);
        tracing::debug!(tile_size = self.layout.tile_size, "session resized");
    }

    /// Scrambles the board with a generator derived from `seed`.
    pub fn scramble(
        &mut self,
        config: &ScrambleConfig,
        seed: u64,
    ) -> Result<Vec<ScrambleStep>, EngineError> {
        let mut rng = scramble_rng(seed, &self.grid);
        scramble(&mut self.board, &self.catalog, config, &mut rng)
    }

    /// Undoes a scramble previously applied to this session.
    pub fn unscramble(&mut self, steps: &[ScrambleStep]) -> Result<(), EngineError> {
        unscramble(&mut self.board, &self.catalog, steps)
    }

    /// Applies a command, resolving anchors against this session's catalog.
    pub fn handle(
        &mut self,
        command: Command,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        let catalog = &self.catalog;
        apply(&mut self.board, command, |anchor| catalog.get(anchor), out_events)
    }

    /// Rotates a single anchor.
    pub fn rotate(
        &mut self,
        anchor: &AnchorId,
        direction: TurnDirection,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EngineError> {
        self.handle(
            Command::RotateAnchor {
                anchor: anchor.clone(),
                direction,
            },
            out_events,
        )
    }

    /// World-space pivot of an instance at the current layout.
    pub fn pivot(&self, instance: &AnchorInstance) -> Result<Vec2, EngineError> {
        anchor_world(instance, self.layout.tile_size, self.layout.origin)
    }
}

fn fit_layout(config: &SessionConfig, grid: &Grid, shape: GridShape) -> SessionLayout {
    let viewport = config.viewport();
    let usable = viewport.usable();
    let image_rect = match config.image {
        ImageSource::Size { width, height } => Some(contain_fit(width, height, usable)),
        ImageSource::Aspect(_) => None,
    };
    let tile_size = derive_tile_size(&shape, config.tuning.padding, &viewport, image_rect);

    let target = image_rect.map_or_else(|| usable.center(), |rect| rect.center());
    let origin = target - grid_bounds(grid, tile_size, Vec2::ZERO).center();

    SessionLayout {
        shape,
        tile_size,
        origin,
        image_rect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexspin_core::OperatorKind;

    #[test]
    fn default_session_uses_eight_by_nine() {
        let session = Session::bootstrap(SessionConfig::default()).expect("session");
        assert_eq!((session.grid().width(), session.grid().height()), (8, 9));
        assert_eq!(session.grid().cell_count(), 76);
        assert!(session.is_solved());
        assert!(!session.catalog().is_empty());
    }

    #[test]
    fn board_is_centred_on_the_image() {
        let config = SessionConfig {
            image: ImageSource::Size {
                width: 600.0,
                height: 400.0,
            },
            ..SessionConfig::default()
        };
        let session = Session::bootstrap(config).expect("session");
        let layout = session.layout();
        let image = layout.image_rect.expect("image rect");
        let bounds = grid_bounds(session.grid(), layout.tile_size, layout.origin);
        assert!((bounds.center() - image.center()).length() < 1e-3);
        assert!(bounds.size().x <= image.size.x + 1e-3);
        assert!(bounds.size().y <= image.size.y + 1e-3);
    }

    #[test]
    fn resize_keeps_grid_and_tiles() {
        let mut session = Session::bootstrap(SessionConfig::default()).expect("session");
        let _ = session
            .scramble(&ScrambleConfig::default(), 5)
            .expect("scramble");
        let before = session.board().clone();
        let tile_size = session.layout().tile_size;

        session.resize(640.0, 360.0);

        assert_eq!(session.board(), &before);
        assert!(session.layout().tile_size < tile_size);
        assert_eq!(session.grid().width(), 8);
    }

    #[test]
    fn rotate_reports_solution_when_undoing_last_move() {
        let mut session = Session::bootstrap(SessionConfig {
            target_cells: 22,
            image: ImageSource::Aspect(2.5),
            ..SessionConfig::default()
        })
        .expect("session");
        let anchor = session.catalog().instances(OperatorKind::Ring6)[0]
            .id()
            .clone();
        let mut events = Vec::new();

        session
            .rotate(&anchor, TurnDirection::Clockwise, &mut events)
            .expect("rotate");
        assert!(!session.is_solved());
        assert!(!events.contains(&Event::PuzzleSolved));

        events.clear();
        session
            .rotate(&anchor, TurnDirection::CounterClockwise, &mut events)
            .expect("rotate back");
        assert!(session.is_solved());
        assert_eq!(events.last(), Some(&Event::PuzzleSolved));
    }

    #[test]
    fn unknown_anchor_is_rejected() {
        let mut session = Session::bootstrap(SessionConfig::default()).expect("session");
        let mut events = Vec::new();
        let result = session.rotate(
            &AnchorId::for_cell(OperatorKind::Ring6, hexspin_core::CellCoord::new(-4, -4)),
            TurnDirection::Clockwise,
            &mut events,
        );
        assert!(matches!(result, Err(EngineError::UnknownAnchor { .. })));
        assert!(events.is_empty());
        assert!(session.is_solved());
    }

    #[test]
    fn pivots_follow_the_layout_origin() {
        let session = Session::bootstrap(SessionConfig::default()).expect("session");
        let instance = &session.catalog().instances(OperatorKind::Vertex)[0];
        let pivot = session.pivot(instance).expect("pivot");
        let at_zero = anchor_world(instance, session.layout().tile_size, Vec2::ZERO)
            .expect("pivot at zero");
        assert!((pivot - at_zero - session.layout().origin).length() < 1e-3);
    }
}
