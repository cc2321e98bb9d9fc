use std::path::PathBuf;

use clap::Parser;

/// Width and height given as `WxH`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Dimensions {
    pub(crate) width: f32,
    pub(crate) height: f32,
}

/// Scrambles a hexagonal tile puzzle and prints the board.
#[derive(Debug, Parser)]
#[command(name = "hexspin", version, about = "Scrambles and solves hexagonal tile puzzles")]
pub(crate) struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Target number of cells.
    #[arg(long)]
    pub(crate) cells: Option<u32>,
    /// Image aspect ratio (width over height).
    #[arg(long, conflicts_with = "image")]
    pub(crate) aspect: Option<f64>,
    /// Image size in pixels, e.g. 1200x800.
    #[arg(long, value_parser = parse_dimensions)]
    pub(crate) image: Option<Dimensions>,
    /// Viewport size in pixels, e.g. 1280x720.
    #[arg(long, value_parser = parse_dimensions)]
    pub(crate) viewport: Option<Dimensions>,
    /// Number of scramble moves.
    #[arg(long)]
    pub(crate) moves: Option<u32>,
    /// Scramble seed; random when omitted.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Comma-separated operator ids (ring6, alt3_even, alt3_odd, vertex3).
    #[arg(long, value_delimiter = ',')]
    pub(crate) operators: Option<Vec<String>>,
    /// Replay the inverse scramble and print the solved board.
    #[arg(long)]
    pub(crate) solve: bool,
}

fn parse_dimensions(value: &str) -> Result<Dimensions, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .ok()
            .filter(|number| number.is_finite() && *number > 0.0)
            .ok_or_else(|| format!("`{part}` is not a positive number"))
    };
    Ok(Dimensions {
        width: parse(width)?,
        height: parse(height)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_parse_either_separator() {
        assert_eq!(
            parse_dimensions("1200x800"),
            Ok(Dimensions {
                width: 1200.0,
                height: 800.0
            })
        );
        assert!(parse_dimensions("640X480").is_ok());
        assert!(parse_dimensions("640").is_err());
        assert!(parse_dimensions("0x480").is_err());
    }

    #[test]
    fn aspect_and_image_are_exclusive() {
        let result = Cli::try_parse_from(["hexspin", "--aspect", "1.5", "--image", "300x200"]);
        assert!(result.is_err());
    }

    #[test]
    fn operators_split_on_commas() {
        let cli = Cli::try_parse_from(["hexspin", "--operators", "ring6,vertex3", "--solve"])
            .expect("arguments");
        assert_eq!(
            cli.operators,
            Some(vec!["ring6".to_owned(), "vertex3".to_owned()])
        );
        assert!(cli.solve);
    }
}
