//! Shared calibration data for autosketch
//!
//! This crate is the single source of truth for the static coordinate
//! tables recorded by calibration (palette swatches, canvas rectangle,
//! exact-color entry fields, brush buttons) and for the fixed set of
//! reference colors the target canvas offers.

pub mod calibration;
pub mod canvas;
pub mod color;
pub mod error;
pub mod paths;

pub use calibration::{BrushSize, BrushTable, ExactColorCoords, PaletteTable};
pub use canvas::{
    Anchor, CanvasConfig, CanvasRegion, DEFAULT_PADDING_PERCENT, MAX_PADDING_PERCENT,
    MIN_PADDING_PERCENT,
};
pub use color::{ReferenceColor, Rgb, ScreenPoint};
pub use error::CalibrationError;
pub use paths::{AssetPaths, ASSETS_ENV, DEFAULT_ASSETS_DIR};
