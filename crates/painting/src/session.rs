//! Drawing orchestration
//!
//! A [`DrawingSession`] walks one image through preparation, color
//! analysis and layer construction, then plays the layers through an
//! [`Actuator`]. Progress is reported as human-readable strings through a
//! callback; pause and cancel arrive through the shared [`ControlSignals`].
//!
//! ```text
//! Idle -> Preparing -> ColorAnalysis -> LayerConstruction -> Drawing(i) -> Done
//!                                                                       -> Cancelled
//!                                                                       -> Failed
//! ```

mod mode;

pub use mode::{DrawMode, ModeKind};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use autosketch_config::{CalibrationError, CanvasRegion};
use image::ImageError;
use tracing::{error, info, warn};

use crate::actuator::{Actuator, ActuatorError};
use crate::brush::select_brush;
use crate::constants::NEAR_WHITE_THRESHOLD;
use crate::control::ControlSignals;
use crate::layers::{build_layers, Layer, LayerOptions};
use crate::prepare::load_and_prepare;
use crate::reduce::{reduce_colors, DrawColor, RepresentativeColor};
use crate::renderer::{settle, DrawTiming, LayerOutcome, StrokeRenderer};

/// Where a session is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    Preparing,
    ColorAnalysis,
    LayerConstruction,
    /// Drawing the layer with this index
    Drawing(usize),
    Done,
    Cancelled,
    Failed,
}

/// Errors that end a run in [`DrawState::Failed`]
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("Could not load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("No drawable colors found in the image")]
    ColorAnalysisEmpty,

    #[error("No pixels matched any of the analyzed colors")]
    LayerConstructionEmpty,

    #[error(transparent)]
    Actuator(#[from] ActuatorError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Terminal result of [`DrawingSession::run`]
#[derive(Debug)]
pub enum DrawOutcome {
    Done,
    Cancelled,
    Failed(DrawError),
}

impl DrawOutcome {
    pub fn state(&self) -> DrawState {
        match self {
            DrawOutcome::Done => DrawState::Done,
            DrawOutcome::Cancelled => DrawState::Cancelled,
            DrawOutcome::Failed(_) => DrawState::Failed,
        }
    }
}

/// Tunables layered over the per-mode defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub timing: DrawTiming,
    /// Overrides the mode's requested cluster count
    pub cluster_count: Option<usize>,
    /// Remove pixels claimed by earlier layers from later ones
    pub exclusive_layers: bool,
    /// Overrides the mode's row stride, including smart-mode brush steps
    pub row_step: Option<u32>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timing: DrawTiming::default(),
            cluster_count: None,
            exclusive_layers: true,
            row_step: None,
        }
    }
}

/// One image drawn onto one canvas region
pub struct DrawingSession<A: Actuator> {
    image_path: PathBuf,
    region: CanvasRegion,
    mode: DrawMode,
    actuator: A,
    signals: Arc<ControlSignals>,
    options: SessionOptions,
    state: DrawState,
}

impl<A: Actuator> DrawingSession<A> {
    pub fn new(
        image_path: impl Into<PathBuf>,
        region: CanvasRegion,
        mode: DrawMode,
        actuator: A,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            region,
            mode,
            actuator,
            signals: Arc::new(ControlSignals::new()),
            options: SessionOptions::default(),
            state: DrawState::Idle,
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Observe externally owned signals instead of a fresh set
    pub fn with_signals(mut self, signals: Arc<ControlSignals>) -> Self {
        self.signals = signals;
        self
    }

    /// Shared handle for pausing or cancelling from another thread
    pub fn signals(&self) -> Arc<ControlSignals> {
        Arc::clone(&self.signals)
    }

    /// Toggle pause; returns true when now paused
    pub fn pause_or_resume(&self) -> bool {
        self.signals.toggle_pause()
    }

    pub fn cancel(&self) {
        self.signals.cancel();
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn mode(&self) -> &DrawMode {
        &self.mode
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn into_actuator(self) -> A {
        self.actuator
    }

    /// Run the whole pipeline to a terminal state
    pub fn run(&mut self, progress: &mut dyn FnMut(&str)) -> DrawOutcome {
        info!(
            "Starting {} drawing of {}",
            self.mode.kind(),
            self.image_path.display()
        );
        let outcome = match self.execute(progress) {
            Ok(LayerOutcome::Completed) => {
                progress("Drawing completed successfully!");
                DrawOutcome::Done
            }
            Ok(LayerOutcome::Cancelled) => {
                info!("Drawing cancelled");
                progress("Drawing cancelled by user");
                DrawOutcome::Cancelled
            }
            Err(e) => {
                error!("Drawing failed: {}", e);
                progress(&format!("Drawing failed: {}", e));
                DrawOutcome::Failed(e)
            }
        };
        self.state = outcome.state();
        outcome
    }

    fn analyze(&mut self, progress: &mut dyn FnMut(&str)) -> Result<Vec<Layer>, DrawError> {
        self.state = DrawState::Preparing;
        progress("Preparing image...");
        let prepared = load_and_prepare(&self.image_path, self.region.width, self.region.height)
            .map_err(|source| DrawError::ImageLoad {
                path: self.image_path.clone(),
                source,
            })?;

        self.state = DrawState::ColorAnalysis;
        progress("Analyzing colors...");
        let k = self
            .options
            .cluster_count
            .unwrap_or_else(|| self.mode.cluster_count());
        let mut colors = reduce_colors(
            &prepared.pixels,
            &prepared.paintable,
            k,
            self.mode.maps_to_palette(),
        );
        if self.mode.skips_near_white() {
            colors.retain(|c| !c.centroid.all_channels_above(NEAR_WHITE_THRESHOLD));
        }
        if colors.is_empty() {
            return Err(DrawError::ColorAnalysisEmpty);
        }
        progress(&format!("Found {} colors", colors.len()));

        let colors = calibrated_colors(&self.mode, colors);
        if colors.is_empty() {
            warn!("None of the analyzed colors has a calibrated swatch");
            return Ok(Vec::new());
        }

        self.state = DrawState::LayerConstruction;
        progress("Building color layers...");
        let layers = build_layers(
            &prepared.pixels,
            &colors,
            &prepared.paintable,
            LayerOptions {
                threshold: self.mode.layer_threshold(),
                exclusive: self.options.exclusive_layers,
            },
        );
        if layers.is_empty() {
            return Err(DrawError::LayerConstructionEmpty);
        }
        progress(&format!("Built {} layers", layers.len()));
        Ok(layers)
    }

    fn execute(&mut self, progress: &mut dyn FnMut(&str)) -> Result<LayerOutcome, DrawError> {
        let layers = self.analyze(progress)?;
        let timing = self.options.timing;
        let row_step = self.options.row_step;
        let mut renderer = StrokeRenderer::new(
            &mut self.actuator,
            Arc::clone(&self.signals),
            self.region.origin(),
            timing,
        );

        if !timing.start_delay.is_zero() {
            progress(&format!(
                "Starting in {} seconds...",
                timing.start_delay.as_secs_f32()
            ));
            settle(timing.start_delay);
        }

        let total = layers.len();
        for (i, layer) in layers.iter().enumerate() {
            if !renderer.checkpoint()? {
                return Ok(LayerOutcome::Cancelled);
            }
            self.state = DrawState::Drawing(i);
            let label = layer.color.to_string();
            progress(&format!(
                "Layer {}/{}: {} ({} pixels)",
                i + 1,
                total,
                label,
                layer.pixel_count()
            ));

            let step = match &self.mode {
                DrawMode::Palette(table) => {
                    let swatch = match layer.color {
                        DrawColor::Palette(color) => table.get(color),
                        DrawColor::Exact(_) => None,
                    };
                    let Some(swatch) = swatch else {
                        warn!("No calibrated swatch for {}, skipping layer", label);
                        continue;
                    };
                    renderer.select_palette_color(swatch)?;
                    row_step.unwrap_or(self.mode.fixed_row_step())
                }
                DrawMode::Exact(coords) => {
                    renderer.select_exact_color(coords, layer.color.rgb())?;
                    row_step.unwrap_or(self.mode.fixed_row_step())
                }
                DrawMode::Smart { exact, brushes } => {
                    let choice = select_brush(&layer.mask);
                    renderer.select_exact_color(exact, layer.color.rgb())?;
                    renderer.select_brush(brushes.get(choice.brush))?;
                    row_step.unwrap_or(choice.step)
                }
            };

            let outcome = renderer.draw_layer(&layer.mask, step, &label, progress)?;
            if outcome == LayerOutcome::Cancelled {
                return Ok(LayerOutcome::Cancelled);
            }
            if i + 1 < total {
                settle(timing.between_layers);
            }
        }
        Ok(LayerOutcome::Completed)
    }
}

/// Drop palette colors without a calibrated swatch so they claim no pixels
fn calibrated_colors(
    mode: &DrawMode,
    colors: Vec<RepresentativeColor>,
) -> Vec<RepresentativeColor> {
    let DrawMode::Palette(table) = mode else {
        return colors;
    };
    colors
        .into_iter()
        .filter(|c| {
            let calibrated = match c.color {
                DrawColor::Palette(color) => table.get(color).is_some(),
                DrawColor::Exact(_) => false,
            };
            if !calibrated {
                warn!("No calibrated swatch for {}, skipping color", c.color);
            }
            calibrated
        })
        .collect()
}
