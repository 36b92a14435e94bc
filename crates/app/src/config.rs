//! Command-line options and calibration loading

use std::path::PathBuf;

use autosketch_config::{
    Anchor, AssetPaths, BrushTable, CalibrationError, CanvasConfig, CanvasRegion,
    ExactColorCoords, PaletteTable, MAX_PADDING_PERCENT, MIN_PADDING_PERCENT,
};
use clap::Parser;
use painting::{DrawMode, DrawTiming, ModeKind, SessionOptions};
use tracing::{debug, info};

/// Draw an image onto a calibrated browser canvas
#[derive(Debug, Parser)]
#[command(name = "autosketch", version, about)]
pub struct Cli {
    /// Image to draw
    pub image: PathBuf,

    /// Color selection mode: palette, exact or smart
    #[arg(short, long, default_value_t = ModeKind::Palette)]
    pub mode: ModeKind,

    /// Calibration directory (defaults to $AUTOSKETCH_ASSETS or ./assets)
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Share of the canvas to use, in percent
    #[arg(
        long,
        value_parser = clap::value_parser!(u32)
            .range(MIN_PADDING_PERCENT as i64..=MAX_PADDING_PERCENT as i64)
    )]
    pub padding: Option<u32>,

    /// Where the image sits inside the padded canvas
    #[arg(long)]
    pub anchor: Option<Anchor>,

    /// Record input actions instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Write the recorded actions of a dry run as JSON
    #[arg(long, requires = "dry_run")]
    pub plan_out: Option<PathBuf>,

    /// Override the number of color clusters
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=256))]
    pub colors: Option<u32>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything the worker needs to start a session
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub image: PathBuf,
    pub region: CanvasRegion,
    pub mode: DrawMode,
    pub options: SessionOptions,
    pub dry_run: bool,
    pub plan_out: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve calibration files and flags into a session configuration
    ///
    /// Fails before any drawing when a calibration file the mode needs is absent.
    pub fn load(cli: &Cli) -> Result<Self, CalibrationError> {
        let paths = cli
            .assets
            .clone()
            .map(AssetPaths::new)
            .unwrap_or_else(AssetPaths::from_env);
        debug!("Calibration directory: {}", paths.root().display());

        let mut canvas = CanvasConfig::load(&paths.canvas())?;
        if let Some(padding) = cli.padding {
            canvas.padding_percent = padding;
        }
        if let Some(anchor) = cli.anchor {
            canvas.anchor = anchor;
        }
        let region = canvas.effective_region();
        info!(
            "Canvas region {}x{} at ({}, {}), padding {}%, anchor {}",
            region.width, region.height, region.x, region.y, canvas.padding_percent, canvas.anchor
        );

        let mode = load_mode(cli.mode, &paths)?;

        let options = SessionOptions {
            cluster_count: cli.colors.map(|k| k as usize),
            timing: if cli.dry_run {
                DrawTiming::instant()
            } else {
                DrawTiming::default()
            },
            ..SessionOptions::default()
        };

        Ok(Self {
            image: cli.image.clone(),
            region,
            mode,
            options,
            dry_run: cli.dry_run,
            plan_out: cli.plan_out.clone(),
        })
    }
}

/// Load the calibration tables a mode depends on
pub fn load_mode(kind: ModeKind, paths: &AssetPaths) -> Result<DrawMode, CalibrationError> {
    let mode = match kind {
        ModeKind::Palette => {
            let table = PaletteTable::load(&paths.palette())?;
            info!("Loaded {} calibrated palette colors", table.len());
            DrawMode::Palette(table)
        }
        ModeKind::Exact => DrawMode::Exact(ExactColorCoords::load(&paths.exact_color())?),
        ModeKind::Smart => DrawMode::Smart {
            exact: ExactColorCoords::load(&paths.exact_color())?,
            brushes: BrushTable::load(&paths.brushes())?,
        },
    };
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autosketch_config::ScreenPoint;

    fn assets_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("autosketch-app-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "autosketch",
            "cat.png",
            "--mode",
            "smart",
            "--padding",
            "80",
            "--anchor",
            "bottom-right",
            "--dry-run",
            "--plan-out",
            "plan.json",
            "--colors",
            "8",
        ])
        .unwrap();
        assert_eq!(cli.mode, ModeKind::Smart);
        assert_eq!(cli.padding, Some(80));
        assert_eq!(cli.anchor, Some(Anchor::BottomRight));
        assert!(cli.dry_run);
        assert_eq!(cli.colors, Some(8));
    }

    #[test]
    fn test_cli_rejects_bad_padding_and_orphan_plan_out() {
        assert!(Cli::try_parse_from(["autosketch", "a.png", "--padding", "40"]).is_err());
        assert!(Cli::try_parse_from(["autosketch", "a.png", "--plan-out", "p.json"]).is_err());
    }

    #[test]
    fn test_missing_canvas_config_fails_fast() {
        let dir = assets_dir("missing");
        let cli = Cli::try_parse_from([
            "autosketch",
            "a.png",
            "--assets",
            dir.to_str().unwrap(),
        ])
        .unwrap();
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_load_exact_mode_with_overrides() {
        let dir = assets_dir("exact");
        let paths = AssetPaths::new(dir.clone());
        CanvasConfig::new(CanvasRegion::new(0, 0, 200, 100))
            .save(&paths.canvas())
            .unwrap();
        ExactColorCoords {
            palette_button: ScreenPoint::new(1, 1),
            r_field: ScreenPoint::new(2, 2),
            g_field: ScreenPoint::new(3, 3),
            b_field: ScreenPoint::new(4, 4),
        }
        .save(&paths.exact_color())
        .unwrap();

        let cli = Cli::try_parse_from([
            "autosketch",
            "a.png",
            "--assets",
            dir.to_str().unwrap(),
            "--mode",
            "exact",
            "--padding",
            "50",
            "--anchor",
            "top-left",
            "--dry-run",
            "--colors",
            "7",
        ])
        .unwrap();
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.region, CanvasRegion::new(0, 0, 100, 50));
        assert_eq!(config.mode.kind(), ModeKind::Exact);
        assert_eq!(config.options.timing, DrawTiming::instant());
        assert_eq!(config.options.cluster_count, Some(7));
        assert!(config.options.exclusive_layers);

        // Smart mode also needs the brush table
        let smart = load_mode(ModeKind::Smart, &paths).unwrap_err();
        assert!(smart.is_missing());
    }
}
