//! Brush selection for smart mode
//!
//! Wide, blocky layers are drawn with a large brush and a tall row stride;
//! thin or speckled layers fall back to the smallest brush so detail
//! survives.

use autosketch_config::BrushSize;
use tracing::debug;

use crate::constants::MIN_PIXELS_FOR_BRUSH_ANALYSIS;
use crate::mask::Mask;
use crate::planner::row_runs;

/// Brush and row stride for one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushChoice {
    pub brush: BrushSize,
    /// Vertical distance between drawn rows
    pub step: u32,
}

impl BrushChoice {
    pub const FINEST: BrushChoice = BrushChoice {
        brush: BrushSize::Smallest,
        step: 2,
    };
}

/// Mean length of the horizontal runs in `mask`, `None` when it has no runs
pub fn mean_run_length(mask: &Mask) -> Option<f64> {
    let mut total = 0usize;
    let mut runs = 0usize;
    for y in 0..mask.height() {
        for (start, end) in row_runs(mask.row(y)) {
            total += end - start + 1;
            runs += 1;
        }
    }
    (runs > 0).then(|| total as f64 / runs as f64)
}

/// Pick a brush from the run-length statistics of a layer
pub fn select_brush(mask: &Mask) -> BrushChoice {
    if mask.count() < MIN_PIXELS_FOR_BRUSH_ANALYSIS {
        return BrushChoice::FINEST;
    }
    let Some(mean) = mean_run_length(mask) else {
        return BrushChoice::FINEST;
    };

    let (brush, step) = if mean > 18.0 {
        (BrushSize::Largest, 18)
    } else if mean > 12.0 {
        (BrushSize::Large, 14)
    } else if mean > 8.0 {
        (BrushSize::Medium, 11)
    } else if mean > 4.0 {
        (BrushSize::Small, 7)
    } else {
        (BrushSize::Smallest, 2)
    };
    debug!("Mean run length {:.1} -> {:?} brush, step {}", mean, brush, step);
    BrushChoice { brush, step }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rows of runs `len` long separated by single gaps
    fn striped(width: u32, height: u32, len: u32) -> Mask {
        Mask::from_fn(width, height, |x, _| x % (len + 1) != len)
    }

    #[test]
    fn test_small_layer_gets_finest() {
        let mask = Mask::filled(7, 7, true);
        assert_eq!(mask.count(), 49);
        assert_eq!(select_brush(&mask), BrushChoice::FINEST);
    }

    #[test]
    fn test_breakpoints() {
        let cases = [
            (40, BrushSize::Largest, 18),
            (19, BrushSize::Largest, 18),
            (18, BrushSize::Large, 14),
            (13, BrushSize::Large, 14),
            (12, BrushSize::Medium, 11),
            (9, BrushSize::Medium, 11),
            (8, BrushSize::Small, 7),
            (5, BrushSize::Small, 7),
            (4, BrushSize::Smallest, 2),
            (1, BrushSize::Smallest, 2),
        ];
        for (len, brush, step) in cases {
            let mask = striped((len + 1) * 4, 20, len);
            assert_eq!(mean_run_length(&mask), Some(len as f64));
            assert_eq!(select_brush(&mask), BrushChoice { brush, step }, "run length {len}");
        }
    }

    #[test]
    fn test_empty_mask() {
        assert_eq!(mean_run_length(&Mask::new(5, 5)), None);
        assert_eq!(select_brush(&Mask::new(100, 100)), BrushChoice::FINEST);
    }
}
