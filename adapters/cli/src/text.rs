use std::io::Write;

use anyhow::{Context, Result};
use hexspin_rendering::{Presentation, RenderingBackend, TileVisual};

const CELL_WIDTH: usize = 8;

/// Backend that prints the board as rows of `home/rotation` labels.
///
/// Even rows are indented by half a cell to mirror the hex offset. Tiles
/// away from home are marked with `*`.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    pub(crate) fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("failed to write output")
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        let scene = &presentation.scene;
        writeln!(self.out, "== {} ==", presentation.title).context("failed to write title")?;

        let mut rows: Vec<(i32, Vec<&TileVisual>)> = Vec::new();
        for visual in &scene.tiles {
            match rows.last_mut() {
                Some((row, tiles)) if *row == visual.cell.r() => tiles.push(visual),
                _ => rows.push((visual.cell.r(), vec![visual])),
            }
        }

        for (row, tiles) in rows {
            let mut line = String::new();
            if row % 2 == 0 {
                line.push_str(&" ".repeat(CELL_WIDTH / 2));
            }
            for visual in tiles {
                line.push_str(&format!("{:>width$}", label(visual), width = CELL_WIDTH));
            }
            writeln!(self.out, "{}", line.trim_end()).context("failed to write board row")?;
        }

        self.out.flush().context("failed to flush output")
    }
}

fn label(visual: &TileVisual) -> String {
    let marker = if visual.home_key == visual.cell.key() {
        ' '
    } else {
        '*'
    };
    format!("{}/{}{marker}", visual.home_key, visual.rotation.get())
}
