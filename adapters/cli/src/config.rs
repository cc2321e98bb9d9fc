use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use hexspin_core::OperatorKind;
use hexspin_system_bootstrap::{ImageSource, SessionConfig};
use hexspin_system_scramble::{ScrambleConfig, MAX_SCRAMBLE_MOVES};
use serde::Deserialize;

use crate::args::Cli;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Contents of a `hexspin.toml` file. Only `version` is required.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    version: u32,
    #[serde(default)]
    layout: LayoutSection,
    #[serde(default)]
    viewport: ViewportSection,
    #[serde(default)]
    scramble: ScrambleSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutSection {
    target_cells: Option<u32>,
    aspect: Option<f64>,
    image_width: Option<f32>,
    image_height: Option<f32>,
    padding: Option<f64>,
    margin: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewportSection {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScrambleSection {
    moves: Option<u32>,
    seed: Option<u64>,
    operators: Option<Vec<String>>,
}

/// Fully resolved run settings.
#[derive(Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) session: SessionConfig,
    pub(crate) scramble: ScrambleConfig,
    pub(crate) seed: Option<u64>,
}

/// Reads and validates a configuration file.
pub(crate) fn load(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
}

fn parse(contents: &str) -> Result<FileConfig> {
    let config: FileConfig =
        toml::from_str(contents).context("failed to parse config toml contents")?;
    if config.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported config version {}; expected {}",
            config.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    Ok(config)
}

/// Merges defaults, file values and flags, in increasing precedence.
pub(crate) fn resolve(file: Option<FileConfig>, cli: &Cli) -> Result<Settings> {
    let file = file.unwrap_or_default();
    let mut session = SessionConfig::default();

    if let Some(cells) = cli.cells.or(file.layout.target_cells) {
        if cells == 0 {
            bail!("target cell count must be positive");
        }
        session.target_cells = cells;
    }

    let file_image = match (file.layout.image_width, file.layout.image_height) {
        (Some(width), Some(height)) => Some(ImageSource::Size { width, height }),
        (None, None) => None,
        _ => bail!("image_width and image_height must be given together"),
    };
    let image = match (cli.image, cli.aspect) {
        (Some(size), _) => Some(ImageSource::Size {
            width: size.width,
            height: size.height,
        }),
        (None, Some(aspect)) => Some(ImageSource::Aspect(aspect)),
        (None, None) => file_image.or(file.layout.aspect.map(ImageSource::Aspect)),
    };
    if let Some(image) = image {
        if let ImageSource::Size { width, height } = image {
            ensure_positive("image width", width)?;
            ensure_positive("image height", height)?;
        }
        let aspect = image.aspect();
        if !aspect.is_finite() || aspect <= 0.0 {
            bail!("image aspect ratio must be positive, got {aspect}");
        }
        session.image = image;
    }

    if let Some(padding) = file.layout.padding {
        if !padding.is_finite() || padding < 0.0 {
            bail!("padding must be non-negative, got {padding}");
        }
        session.tuning.padding = padding;
    }
    if let Some(margin) = file.layout.margin {
        session.tuning.margin = margin.max(0.0);
    }

    let (width, height) = match cli.viewport {
        Some(size) => (Some(size.width), Some(size.height)),
        None => (file.viewport.width, file.viewport.height),
    };
    session.viewport_width = width.unwrap_or(session.viewport_width);
    session.viewport_height = height.unwrap_or(session.viewport_height);
    ensure_positive("viewport width", session.viewport_width)?;
    ensure_positive("viewport height", session.viewport_height)?;

    let mut scramble = ScrambleConfig::default();
    if let Some(moves) = cli.moves.or(file.scramble.moves) {
        if moves > MAX_SCRAMBLE_MOVES {
            bail!("scramble moves must be at most {MAX_SCRAMBLE_MOVES}, got {moves}");
        }
        scramble.moves = moves;
    }
    if let Some(ids) = cli.operators.as_ref().or(file.scramble.operators.as_ref()) {
        scramble.operators = ids
            .iter()
            .map(|id| OperatorKind::from_id(id.trim()))
            .collect::<Result<Vec<_>, _>>()
            .context("failed to resolve operator list")?;
    }

    Ok(Settings {
        session,
        scramble,
        seed: cli.seed.or(file.scramble.seed),
    })
}

fn ensure_positive(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        bail!("{name} must be positive, got {value}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hexspin").chain(args.iter().copied()))
            .expect("arguments")
    }

    const SAMPLE: &str = r#"
        version = 1

        [layout]
        target_cells = 40
        image_width = 900
        image_height = 600
        padding = 0.25

        [viewport]
        width = 800
        height = 600

        [scramble]
        moves = 12
        seed = 99
        operators = ["ring6", "vertex3"]
    "#;

    #[test]
    fn file_values_apply_without_flags() {
        let settings = resolve(Some(parse(SAMPLE).expect("config")), &cli(&[])).expect("settings");
        assert_eq!(settings.session.target_cells, 40);
        assert_eq!(
            settings.session.image,
            ImageSource::Size {
                width: 900.0,
                height: 600.0
            }
        );
        assert_eq!(settings.session.tuning.padding, 0.25);
        assert_eq!(settings.session.viewport_width, 800.0);
        assert_eq!(settings.scramble.moves, 12);
        assert_eq!(
            settings.scramble.operators,
            vec![OperatorKind::Ring6, OperatorKind::Vertex]
        );
        assert_eq!(settings.seed, Some(99));
    }

    #[test]
    fn flags_override_file_values() {
        let file = parse(SAMPLE).expect("config");
        let settings = resolve(
            Some(file),
            &cli(&["--cells", "75", "--aspect", "1.5", "--seed", "3", "--viewport", "640x480"]),
        )
        .expect("settings");
        assert_eq!(settings.session.target_cells, 75);
        assert_eq!(settings.session.image, ImageSource::Aspect(1.5));
        assert_eq!(settings.session.viewport_height, 480.0);
        assert_eq!(settings.seed, Some(3));
        assert_eq!(settings.scramble.moves, 12);
    }

    #[test]
    fn defaults_apply_without_file() {
        let settings = resolve(None, &cli(&[])).expect("settings");
        assert_eq!(settings.session, SessionConfig::default());
        assert_eq!(settings.scramble, ScrambleConfig::default());
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let error = parse("version = 2").expect_err("version 2");
        assert!(error.to_string().contains("unsupported config version 2"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("version = 1\n[layout]\ncells = 3").is_err());
    }

    #[test]
    fn unknown_operator_is_reported() {
        let error = resolve(None, &cli(&["--operators", "ring6,spiral"])).expect_err("spiral");
        assert!(format!("{error:#}").contains("spiral"));
    }

    #[test]
    fn half_image_size_is_rejected() {
        let file = parse("version = 1\n[layout]\nimage_width = 300").expect("config");
        assert!(resolve(Some(file), &cli(&[])).is_err());
    }

    #[test]
    fn negative_image_size_is_rejected() {
        let file = parse("version = 1\n[layout]\nimage_width = -900\nimage_height = -600")
            .expect("config");
        let error = resolve(Some(file), &cli(&[])).expect_err("negative size");
        assert!(error.to_string().contains("image width"));
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let file = parse("version = 1\n[viewport]\nwidth = 0").expect("config");
        let error = resolve(Some(file), &cli(&[])).expect_err("zero width");
        assert!(error.to_string().contains("viewport width"));
    }

    #[test]
    fn excessive_move_count_is_rejected() {
        let error = resolve(None, &cli(&["--moves", "4294967295"])).expect_err("too many moves");
        assert!(error.to_string().contains("at most"));
        let settings = resolve(None, &cli(&["--moves", "100000"])).expect("limit");
        assert_eq!(settings.scramble.moves, MAX_SCRAMBLE_MOVES);
    }
}
