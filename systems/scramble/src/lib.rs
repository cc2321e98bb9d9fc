#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised scrambling built from legal moves only.
//!
//! Every scramble is a sequence of ordinary moves, so any scrambled board is
//! solvable by replaying the inverses in reverse order.

use hexspin_board::{apply_move, BoardState, Grid};
use hexspin_core::{AnchorId, EngineError, OperatorKind, TurnDirection};
use hexspin_system_operators::OperatorCatalog;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const SCRAMBLE_STREAM_LABEL: &str = "hexspin::scramble";

/// Number of moves applied when no explicit count is configured.
pub const DEFAULT_SCRAMBLE_MOVES: u32 = 60;

/// Largest move count a configuration may request.
pub const MAX_SCRAMBLE_MOVES: u32 = 100_000;

/// Parameters of one scramble.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrambleConfig {
    /// Number of moves to apply.
    pub moves: u32,
    /// Operators the scramble may draw from.
    pub operators: Vec<OperatorKind>,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            moves: DEFAULT_SCRAMBLE_MOVES,
            operators: OperatorKind::ALL.to_vec(),
        }
    }
}

/// One applied scramble move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrambleStep {
    /// Instance that was rotated.
    pub anchor: AnchorId,
    /// Direction it was rotated in.
    pub direction: TurnDirection,
}

impl ScrambleStep {
    /// Step that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            anchor: self.anchor.clone(),
            direction: self.direction.inverse(),
        }
    }
}

/// Applies `config.moves` random moves to the board.
///
/// Each move draws an operator uniformly among the enabled ones that have
/// instances on this grid, then an instance and a direction uniformly.
/// Consecutive moves may cancel. When no enabled operator has an instance the
/// board is left untouched and no steps are returned.
pub fn scramble<R>(
    state: &mut BoardState,
    catalog: &OperatorCatalog,
    config: &ScrambleConfig,
    rng: &mut R,
) -> Result<Vec<ScrambleStep>, EngineError>
where
    R: Rng + ?Sized,
{
    let available = catalog.available(&config.operators);
    if available.is_empty() {
        tracing::debug!(moves = config.moves, "no operator can move this grid");
        return Ok(Vec::new());
    }

    let mut steps = Vec::new();
    for _ in 0..config.moves {
        let Some(kind) = available.choose(rng) else {
            break;
        };
        let Some(instance) = catalog.instances(*kind).choose(rng) else {
            continue;
        };
        let direction = if rng.gen_bool(0.5) {
            TurnDirection::Clockwise
        } else {
            TurnDirection::CounterClockwise
        };
        let _ = apply_move(state, instance, direction)?;
        steps.push(ScrambleStep {
            anchor: instance.id().clone(),
            direction,
        });
    }

    tracing::debug!(
        requested = config.moves,
        applied = steps.len(),
        operators = available.len(),
        "board scrambled"
    );
    Ok(steps)
}

/// Replays the inverses of `steps` in reverse order.
pub fn unscramble(
    state: &mut BoardState,
    catalog: &OperatorCatalog,
    steps: &[ScrambleStep],
) -> Result<(), EngineError> {
    for step in steps.iter().rev() {
        let undo = step.inverse();
        let instance = catalog
            .get(&undo.anchor)
            .ok_or_else(|| EngineError::UnknownAnchor {
                anchor: undo.anchor.clone(),
            })?;
        let _ = apply_move(state, instance, undo.direction)?;
    }
    Ok(())
}

/// Derives the scramble seed for a session seed and grid shape.
#[must_use]
pub fn derive_scramble_seed(session_seed: u64, grid: &Grid) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(session_seed.to_le_bytes());
    hasher.update(grid.width().to_le_bytes());
    hasher.update(grid.height().to_le_bytes());
    hasher.update(SCRAMBLE_STREAM_LABEL.as_bytes());
    finalize_seed(hasher)
}

/// Seeded generator for scrambling `grid`.
#[must_use]
pub fn scramble_rng(session_seed: u64, grid: &Grid) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_scramble_seed(session_seed, grid))
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
