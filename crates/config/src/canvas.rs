//! Canvas rectangle calibration and padding/alignment

use serde::{Deserialize, Serialize};

use crate::color::ScreenPoint;

/// Smallest padding percentage the canvas region may be shrunk to
pub const MIN_PADDING_PERCENT: u32 = 50;

/// Largest padding percentage (the full calibrated rectangle)
pub const MAX_PADDING_PERCENT: u32 = 100;

/// Padding applied when the canvas config does not specify one
pub const DEFAULT_PADDING_PERCENT: u32 = 95;

/// Drawing rectangle in actuator coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct CanvasRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl From<[i32; 4]> for CanvasRegion {
    fn from(r: [i32; 4]) -> Self {
        Self::new(r[0], r[1], r[2].max(0) as u32, r[3].max(0) as u32)
    }
}

impl From<CanvasRegion> for [i32; 4] {
    fn from(r: CanvasRegion) -> Self {
        [r.x, r.y, r.width as i32, r.height as i32]
    }
}

impl CanvasRegion {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Bounding box of the clicked corner points
    ///
    /// Returns `None` for an empty point list.
    pub fn from_corners(points: &[ScreenPoint]) -> Option<Self> {
        let min_x = points.iter().map(|p| p.x).min()?;
        let min_y = points.iter().map(|p| p.y).min()?;
        let max_x = points.iter().map(|p| p.x).max()?;
        let max_y = points.iter().map(|p| p.y).max()?;
        Some(Self::new(
            min_x,
            min_y,
            (max_x - min_x) as u32,
            (max_y - min_y) as u32,
        ))
    }

    pub fn origin(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }

    /// Shrink the region to `padding_percent` of its size and align it
    /// inside the calibrated rectangle according to `anchor`.
    ///
    /// The percentage is clamped to [`MIN_PADDING_PERCENT`, `MAX_PADDING_PERCENT`],
    /// so the result is never larger than `self`.
    pub fn fit(&self, padding_percent: u32, anchor: Anchor) -> Self {
        let percent = padding_percent.clamp(MIN_PADDING_PERCENT, MAX_PADDING_PERCENT);
        let new_w = (self.width as u64 * percent as u64 / 100) as u32;
        let new_h = (self.height as u64 * percent as u64 / 100) as u32;
        let spare_w = (self.width - new_w) as i32;
        let spare_h = (self.height - new_h) as i32;

        let x = match anchor.horizontal() {
            HorizontalAlign::Left => self.x,
            HorizontalAlign::Center => self.x + spare_w / 2,
            HorizontalAlign::Right => self.x + spare_w,
        };
        let y = match anchor.vertical() {
            VerticalAlign::Top => self.y,
            VerticalAlign::Center => self.y + spare_h / 2,
            VerticalAlign::Bottom => self.y + spare_h,
        };

        Self::new(x, y, new_w, new_h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// Where a padded region sits inside the calibrated rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::CenterLeft,
        Anchor::Center,
        Anchor::CenterRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    pub fn horizontal(self) -> HorizontalAlign {
        match self {
            Anchor::TopLeft | Anchor::CenterLeft | Anchor::BottomLeft => HorizontalAlign::Left,
            Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => HorizontalAlign::Center,
            Anchor::TopRight | Anchor::CenterRight | Anchor::BottomRight => HorizontalAlign::Right,
        }
    }

    pub fn vertical(self) -> VerticalAlign {
        match self {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => VerticalAlign::Top,
            Anchor::CenterLeft | Anchor::Center | Anchor::CenterRight => VerticalAlign::Center,
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => {
                VerticalAlign::Bottom
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopCenter => "top-center",
            Anchor::TopRight => "top-right",
            Anchor::CenterLeft => "center-left",
            Anchor::Center => "center",
            Anchor::CenterRight => "center-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomCenter => "bottom-center",
            Anchor::BottomRight => "bottom-right",
        }
    }
}

impl std::str::FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown anchor '{s}'"))
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_padding() -> u32 {
    DEFAULT_PADDING_PERCENT
}

/// Contents of `canvas_config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub canvas_region: CanvasRegion,
    #[serde(default = "default_padding")]
    pub padding_percent: u32,
    #[serde(default)]
    pub anchor: Anchor,
}

impl CanvasConfig {
    pub fn new(canvas_region: CanvasRegion) -> Self {
        Self {
            canvas_region,
            padding_percent: DEFAULT_PADDING_PERCENT,
            anchor: Anchor::default(),
        }
    }

    /// The region actually drawn into, after padding and alignment
    pub fn effective_region(&self) -> CanvasRegion {
        self.canvas_region.fit(self.padding_percent, self.anchor)
    }
}
