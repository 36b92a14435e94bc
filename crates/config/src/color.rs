//! Color and screen-coordinate primitives shared by calibration and drawing

use serde::{Deserialize, Serialize};

/// An 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// True when every channel is above `threshold`
    pub fn all_channels_above(self, threshold: u8) -> bool {
        self.r > threshold && self.g > threshold && self.b > threshold
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// A position in actuator (screen) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this point by an image coordinate
    pub fn offset(self, dx: u32, dy: u32) -> Self {
        Self::new(self.x + dx as i32, self.y + dy as i32)
    }
}

impl From<[i32; 2]> for ScreenPoint {
    fn from(p: [i32; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<ScreenPoint> for [i32; 2] {
    fn from(p: ScreenPoint) -> Self {
        [p.x, p.y]
    }
}

/// The fixed set of swatch colors the target canvas offers.
///
/// Palette calibration only ever records positions for these colors, so
/// the calibration table is keyed by this enum rather than by free RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceColor {
    Black,
    DarkGray,
    Blue,
    White,
    LightGray,
    LightBlue,
    DarkGreen,
    DarkRed,
    DarkBrown,
    LightGreen,
    Red,
    Orange,
    MediumBrown,
    Purple,
    LightPink,
    Yellow,
    Magenta,
    PalePink,
}

impl ReferenceColor {
    /// Every reference color, in calibration order
    pub const ALL: [ReferenceColor; 18] = [
        ReferenceColor::Black,
        ReferenceColor::DarkGray,
        ReferenceColor::Blue,
        ReferenceColor::White,
        ReferenceColor::LightGray,
        ReferenceColor::LightBlue,
        ReferenceColor::DarkGreen,
        ReferenceColor::DarkRed,
        ReferenceColor::DarkBrown,
        ReferenceColor::LightGreen,
        ReferenceColor::Red,
        ReferenceColor::Orange,
        ReferenceColor::MediumBrown,
        ReferenceColor::Purple,
        ReferenceColor::LightPink,
        ReferenceColor::Yellow,
        ReferenceColor::Magenta,
        ReferenceColor::PalePink,
    ];

    pub const fn rgb(self) -> Rgb {
        match self {
            ReferenceColor::Black => Rgb::new(0, 0, 0),
            ReferenceColor::DarkGray => Rgb::new(89, 89, 89),
            ReferenceColor::Blue => Rgb::new(0, 85, 255),
            ReferenceColor::White => Rgb::new(255, 255, 255),
            ReferenceColor::LightGray => Rgb::new(193, 193, 193),
            ReferenceColor::LightBlue => Rgb::new(0, 171, 255),
            ReferenceColor::DarkGreen => Rgb::new(0, 128, 0),
            ReferenceColor::DarkRed => Rgb::new(128, 0, 0),
            ReferenceColor::DarkBrown => Rgb::new(101, 67, 33),
            ReferenceColor::LightGreen => Rgb::new(0, 204, 0),
            ReferenceColor::Red => Rgb::new(239, 19, 11),
            ReferenceColor::Orange => Rgb::new(255, 113, 0),
            ReferenceColor::MediumBrown => Rgb::new(210, 129, 63),
            ReferenceColor::Purple => Rgb::new(145, 0, 255),
            ReferenceColor::LightPink => Rgb::new(255, 175, 175),
            ReferenceColor::Yellow => Rgb::new(255, 228, 0),
            ReferenceColor::Magenta => Rgb::new(255, 0, 255),
            ReferenceColor::PalePink => Rgb::new(255, 192, 203),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ReferenceColor::Black => "Black",
            ReferenceColor::DarkGray => "Dark gray",
            ReferenceColor::Blue => "Blue",
            ReferenceColor::White => "White",
            ReferenceColor::LightGray => "Light gray",
            ReferenceColor::LightBlue => "Light blue",
            ReferenceColor::DarkGreen => "Dark green",
            ReferenceColor::DarkRed => "Dark red",
            ReferenceColor::DarkBrown => "Dark brown",
            ReferenceColor::LightGreen => "Light green",
            ReferenceColor::Red => "Red",
            ReferenceColor::Orange => "Orange",
            ReferenceColor::MediumBrown => "Medium brown",
            ReferenceColor::Purple => "Purple",
            ReferenceColor::LightPink => "Light pink",
            ReferenceColor::Yellow => "Yellow",
            ReferenceColor::Magenta => "Magenta",
            ReferenceColor::PalePink => "Pale pink",
        }
    }

    /// Canonical calibration key, e.g. `"239,19,11"`
    pub fn key(self) -> String {
        self.rgb().to_string()
    }

    /// Parse a calibration key back into a reference color
    pub fn from_key(key: &str) -> Option<Self> {
        let mut parts = key.split(',').map(|p| p.trim().parse::<u8>());
        let (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return None;
        };
        let rgb = Rgb::new(r, g, b);
        Self::ALL.into_iter().find(|c| c.rgb() == rgb)
    }
}

impl std::fmt::Display for ReferenceColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_keys_round_trip() {
        for color in ReferenceColor::ALL {
            assert_eq!(ReferenceColor::from_key(&color.key()), Some(color));
        }
    }

    #[test]
    fn test_from_key_rejects_unknown() {
        assert_eq!(ReferenceColor::from_key("1,2,3"), None);
        assert_eq!(ReferenceColor::from_key("0,0"), None);
        assert_eq!(ReferenceColor::from_key("0,0,0,0"), None);
        assert_eq!(ReferenceColor::from_key("red"), None);
    }

    #[test]
    fn test_key_format() {
        assert_eq!(ReferenceColor::Red.key(), "239,19,11");
        assert_eq!(ReferenceColor::from_key(" 0, 85, 255"), Some(ReferenceColor::Blue));
    }

    #[test]
    fn test_screen_point_serde() {
        let p: ScreenPoint = serde_json::from_str("[12, -4]").unwrap();
        assert_eq!(p, ScreenPoint::new(12, -4));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[12,-4]");
    }

    #[test]
    fn test_all_channels_above() {
        assert!(Rgb::new(241, 250, 255).all_channels_above(240));
        assert!(!Rgb::new(240, 250, 255).all_channels_above(240));
    }
}
