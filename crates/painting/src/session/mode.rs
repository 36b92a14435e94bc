//! Drawing modes and the calibration data each one carries

use std::fmt;
use std::str::FromStr;

use autosketch_config::{BrushTable, ExactColorCoords, PaletteTable};

use crate::constants::{
    EXACT_CLUSTER_COUNT, EXACT_LAYER_THRESHOLD, EXACT_ROW_STEP, PALETTE_CLUSTER_COUNT,
    PALETTE_LAYER_THRESHOLD, PALETTE_ROW_STEP,
};

/// How colors are chosen and strokes sized
#[derive(Debug, Clone, PartialEq)]
pub enum DrawMode {
    /// Snap colors to the calibrated swatches
    Palette(PaletteTable),
    /// Type every cluster color into the RGB entry fields
    Exact(ExactColorCoords),
    /// Exact colors plus a per-layer brush size
    Smart {
        exact: ExactColorCoords,
        brushes: BrushTable,
    },
}

impl DrawMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            DrawMode::Palette(_) => ModeKind::Palette,
            DrawMode::Exact(_) => ModeKind::Exact,
            DrawMode::Smart { .. } => ModeKind::Smart,
        }
    }

    pub fn cluster_count(&self) -> usize {
        match self.kind() {
            ModeKind::Palette => PALETTE_CLUSTER_COUNT,
            ModeKind::Exact | ModeKind::Smart => EXACT_CLUSTER_COUNT,
        }
    }

    pub fn layer_threshold(&self) -> f64 {
        match self.kind() {
            ModeKind::Palette => PALETTE_LAYER_THRESHOLD,
            ModeKind::Exact | ModeKind::Smart => EXACT_LAYER_THRESHOLD,
        }
    }

    pub fn maps_to_palette(&self) -> bool {
        self.kind() == ModeKind::Palette
    }

    /// Near-white cluster colors are treated as background and not drawn
    pub fn skips_near_white(&self) -> bool {
        self.kind() != ModeKind::Palette
    }

    /// Row stride when no brush analysis applies
    pub fn fixed_row_step(&self) -> u32 {
        match self.kind() {
            ModeKind::Palette => PALETTE_ROW_STEP,
            ModeKind::Exact | ModeKind::Smart => EXACT_ROW_STEP,
        }
    }
}

/// Mode tag without calibration data, as chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeKind {
    #[default]
    Palette,
    Exact,
    Smart,
}

impl ModeKind {
    pub const ALL: [ModeKind; 3] = [ModeKind::Palette, ModeKind::Exact, ModeKind::Smart];

    pub fn as_str(self) -> &'static str {
        match self {
            ModeKind::Palette => "palette",
            ModeKind::Exact => "exact",
            ModeKind::Smart => "smart",
        }
    }
}

impl FromStr for ModeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown mode '{}', expected palette, exact or smart", s))
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autosketch_config::ScreenPoint;

    fn coords() -> ExactColorCoords {
        ExactColorCoords {
            palette_button: ScreenPoint::new(0, 0),
            r_field: ScreenPoint::new(1, 0),
            g_field: ScreenPoint::new(2, 0),
            b_field: ScreenPoint::new(3, 0),
        }
    }

    #[test]
    fn test_parameters_per_mode() {
        let palette = DrawMode::Palette(PaletteTable::new());
        assert_eq!(palette.cluster_count(), 12);
        assert_eq!(palette.layer_threshold(), 30.0);
        assert_eq!(palette.fixed_row_step(), 11);
        assert!(palette.maps_to_palette());
        assert!(!palette.skips_near_white());

        let exact = DrawMode::Exact(coords());
        assert_eq!(exact.cluster_count(), 50);
        assert_eq!(exact.layer_threshold(), 25.0);
        assert_eq!(exact.fixed_row_step(), 2);
        assert!(!exact.maps_to_palette());
        assert!(exact.skips_near_white());
    }

    #[test]
    fn test_mode_kind_parse() {
        assert_eq!("palette".parse::<ModeKind>(), Ok(ModeKind::Palette));
        assert_eq!("Smart".parse::<ModeKind>(), Ok(ModeKind::Smart));
        assert!("legacy".parse::<ModeKind>().is_err());
        for kind in ModeKind::ALL {
            assert_eq!(kind.to_string().parse::<ModeKind>(), Ok(kind));
        }
    }
}
