//! Image-to-drawing-plan pipeline for canvas auto-drawing
//!
//! This crate turns a bitmap into color layers and scan-line strokes and
//! plays them through an input actuator:
//! - [`prepare`] - Decode, resolve transparency, enhance and fit to the canvas
//! - [`reduce`] - Cluster pixels into frequency-ordered representative colors
//! - [`distance`] - Weighted perceptual color distance and palette matching
//! - [`layers`] - Per-color pixel masks with optional cumulative exclusion
//! - [`brush`] - Run-length driven brush selection for smart mode
//! - [`planner`] - Scan-line run detection into stroke segments
//! - [`renderer`] - Color selection and stroke playback with pause/cancel
//! - [`session`] - The drawing state machine tying it together

pub mod actuator;
pub mod brush;
pub mod constants;
pub mod control;
pub mod distance;
pub mod enhance;
pub mod layers;
pub mod mask;
pub mod planner;
pub mod prepare;
pub mod reduce;
pub mod renderer;
pub mod session;

pub use actuator::{Actuator, ActuatorAction, ActuatorError, Key, RecordingActuator};
pub use brush::{select_brush, BrushChoice};
pub use control::ControlSignals;
pub use distance::{color_distance, nearest_reference_color};
pub use layers::{build_layers, Layer, LayerOptions};
pub use mask::Mask;
pub use planner::{plan_strokes, StrokeSegment};
pub use prepare::{load_and_prepare, prepare, PreparedImage};
pub use reduce::{reduce_colors, DrawColor, RepresentativeColor};
pub use renderer::{DrawTiming, LayerOutcome, StrokeRenderer};
pub use session::{
    DrawError, DrawMode, DrawOutcome, DrawState, DrawingSession, ModeKind, SessionOptions,
};
