#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that fits, scrambles and prints a Hexspin puzzle.

mod args;
mod config;
mod text;

use anyhow::{Context, Result};
use clap::Parser;
use hexspin_board::query;
use hexspin_core::OperatorKind;
use hexspin_rendering::{Presentation, RenderingBackend, Scene};
use hexspin_system_bootstrap::Session;
use hexspin_system_layout::GridShape;
use tracing_subscriber::EnvFilter;

use crate::{args::Cli, text::TextBackend};

/// Entry point for the Hexspin command-line interface.
fn main() {
    init_tracing();
    if let Err(error) = run(&Cli::parse()) {
        tracing::error!(error = %format!("{error:#}"), "hexspin failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let file = cli.config.as_deref().map(config::load).transpose()?;
    let settings = config::resolve(file, cli)?;
    let selected = settings
        .scramble
        .operators
        .first()
        .copied()
        .unwrap_or(OperatorKind::Ring6);

    let mut session = Session::bootstrap(settings.session).context("failed to set up puzzle")?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    let steps = session
        .scramble(&settings.scramble, seed)
        .context("failed to scramble board")?;
    tracing::info!(seed, moves = steps.len(), "board scrambled");

    let stdout = std::io::stdout();
    let mut backend = TextBackend::new(stdout.lock());
    for line in summary(&session.layout().shape, session.layout().tile_size) {
        backend.line(&line)?;
    }
    backend.line(&format!("seed {seed}, {} scramble moves", steps.len()))?;
    present(&mut backend, &session, selected, "scrambled")?;

    if cli.solve {
        session
            .unscramble(&steps)
            .context("failed to replay inverse scramble")?;
        present(&mut backend, &session, selected, "solved")?;
    }

    backend.line(&format!(
        "misplaced tiles: {}, solved: {}",
        query::misplaced_count(session.board()),
        if session.is_solved() { "yes" } else { "no" }
    ))
}

fn present(
    backend: &mut impl RenderingBackend,
    session: &Session,
    selected: OperatorKind,
    title: &str,
) -> Result<()> {
    let layout = session.layout();
    let scene = Scene::capture(
        session.board(),
        session.catalog(),
        selected,
        layout.tile_size,
        layout.origin,
    )
    .context("failed to capture scene")?;
    backend.present(&Presentation::new(title, scene))
}

fn summary(shape: &GridShape, tile_size: f32) -> Vec<String> {
    let mut lines = vec![
        format!(
            "grid {}x{} ({} cells), board aspect {:.3}",
            shape.width, shape.height, shape.cell_count, shape.aspect
        ),
        format!("tile size {tile_size:.2}px"),
    ];
    if let Some(relaxed) = shape.relaxed {
        lines.push(format!(
            "continuous optimum {:.2}x{:.2}",
            relaxed.width, relaxed.height
        ));
    }
    lines
}
