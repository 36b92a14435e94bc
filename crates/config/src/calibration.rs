//! Calibration tables produced by the external calibration screens
//!
//! Each table maps something the drawing core wants to select (a swatch
//! color, an RGB entry field, a brush size) to the screen position that
//! selects it. The core only ever reads these tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canvas::CanvasConfig;
use crate::color::{ReferenceColor, ScreenPoint};
use crate::error::CalibrationError;

/// Read and deserialize a JSON calibration file
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CalibrationError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CalibrationError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            CalibrationError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|source| CalibrationError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize to pretty JSON, creating the parent directory if needed
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CalibrationError> {
    let io_err = |source| CalibrationError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let text = serde_json::to_string_pretty(value).map_err(|source| CalibrationError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(io_err)?;
    debug!("Wrote calibration file {}", path.display());
    Ok(())
}

impl CanvasConfig {
    pub fn load(path: &Path) -> Result<Self, CalibrationError> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), CalibrationError> {
        write_json(path, self)
    }
}

// ============================================================================
// Palette swatches
// ============================================================================

#[derive(Serialize, Deserialize)]
struct PaletteFile {
    colors: BTreeMap<String, ScreenPoint>,
}

/// Swatch click position for each calibrated reference color
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaletteTable {
    swatches: BTreeMap<ReferenceColor, ScreenPoint>,
}

impl PaletteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, color: ReferenceColor, point: ScreenPoint) {
        self.swatches.insert(color, point);
    }

    pub fn get(&self, color: ReferenceColor) -> Option<ScreenPoint> {
        self.swatches.get(&color).copied()
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReferenceColor, ScreenPoint)> + '_ {
        self.swatches.iter().map(|(c, p)| (*c, *p))
    }

    /// Build from the on-disk `{"r,g,b": [x, y]}` map
    pub fn from_keyed(keyed: BTreeMap<String, ScreenPoint>) -> Result<Self, CalibrationError> {
        let mut table = Self::new();
        for (key, point) in keyed {
            let color = ReferenceColor::from_key(&key)
                .ok_or_else(|| CalibrationError::UnknownColorKey(key.clone()))?;
            table.insert(color, point);
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, CalibrationError> {
        let file: PaletteFile = read_json(path)?;
        let table = Self::from_keyed(file.colors)?;
        debug!("Loaded {} palette swatches from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<(), CalibrationError> {
        let file = PaletteFile {
            colors: self.iter().map(|(c, p)| (c.key(), p)).collect(),
        };
        write_json(path, &file)
    }
}

// ============================================================================
// Exact RGB entry
// ============================================================================

/// Positions used to type an arbitrary RGB value into the color selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactColorCoords {
    pub palette_button: ScreenPoint,
    pub r_field: ScreenPoint,
    pub g_field: ScreenPoint,
    pub b_field: ScreenPoint,
}

impl ExactColorCoords {
    pub fn load(path: &Path) -> Result<Self, CalibrationError> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), CalibrationError> {
        write_json(path, self)
    }
}

// ============================================================================
// Brushes
// ============================================================================

/// Brush sizes offered by the canvas, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BrushSize {
    Smallest,
    Small,
    Medium,
    Large,
    Largest,
}

impl BrushSize {
    pub const ALL: [BrushSize; 5] = [
        BrushSize::Smallest,
        BrushSize::Small,
        BrushSize::Medium,
        BrushSize::Large,
        BrushSize::Largest,
    ];

    /// Calibration key; `brush_1` is the largest brush
    pub const fn key(self) -> &'static str {
        match self {
            BrushSize::Largest => "brush_1",
            BrushSize::Large => "brush_2",
            BrushSize::Medium => "brush_3",
            BrushSize::Small => "brush_4",
            BrushSize::Smallest => "brush_5",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.key() == key)
    }

    /// Nominal stroke diameter in canvas pixels
    pub const fn diameter_px(self) -> u32 {
        match self {
            BrushSize::Smallest => 3,
            BrushSize::Small => 9,
            BrushSize::Medium => 14,
            BrushSize::Large => 18,
            BrushSize::Largest => 23,
        }
    }
}

/// Selection position for every brush size
#[derive(Debug, Clone, PartialEq)]
pub struct BrushTable {
    positions: BTreeMap<BrushSize, ScreenPoint>,
}

impl BrushTable {
    /// Build from the on-disk `{"brush_N": [x, y]}` map; all five brushes are required
    pub fn from_keyed(keyed: BTreeMap<String, ScreenPoint>) -> Result<Self, CalibrationError> {
        let mut positions = BTreeMap::new();
        for (key, point) in keyed {
            let brush = BrushSize::from_key(&key).ok_or(CalibrationError::UnknownBrushKey(key))?;
            positions.insert(brush, point);
        }
        if let Some(missing) = BrushSize::ALL.into_iter().find(|b| !positions.contains_key(b)) {
            return Err(CalibrationError::MissingBrush(missing));
        }
        Ok(Self { positions })
    }

    pub fn get(&self, brush: BrushSize) -> ScreenPoint {
        // from_keyed guarantees every size is present
        self.positions.get(&brush).copied().unwrap_or_default()
    }

    pub fn load(path: &Path) -> Result<Self, CalibrationError> {
        Self::from_keyed(read_json(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CalibrationError> {
        let keyed: BTreeMap<&str, ScreenPoint> =
            self.positions.iter().map(|(b, p)| (b.key(), *p)).collect();
        write_json(path, &keyed)
    }
}
