//! Scan-line stroke planning
//!
//! A layer becomes one horizontal drag per run of marked pixels on every
//! `step`-th row.

use autosketch_config::ScreenPoint;
use serde::Serialize;

use crate::mask::Mask;

/// A horizontal run `start..=end` on one image row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrokeSegment {
    pub row: u32,
    pub start: u32,
    pub end: u32,
}

impl StrokeSegment {
    /// Number of pixels covered
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn is_dot(&self) -> bool {
        self.start == self.end
    }

    pub fn start_point(&self, origin: ScreenPoint) -> ScreenPoint {
        origin.offset(self.start, self.row)
    }

    pub fn end_point(&self, origin: ScreenPoint) -> ScreenPoint {
        origin.offset(self.end, self.row)
    }
}

/// Maximal runs of `true` in a row as inclusive `(start, end)` column pairs
pub fn row_runs(row: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (x, &marked) in row.iter().enumerate() {
        match (marked, start) {
            (true, None) => start = Some(x),
            (false, Some(s)) => {
                runs.push((s, x - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, row.len() - 1));
    }
    runs
}

/// Strokes for rows `0, step, 2*step, ...`, top to bottom and left to right
pub fn plan_strokes(mask: &Mask, step: u32) -> Vec<StrokeSegment> {
    let step = step.max(1) as usize;
    let mut strokes = Vec::new();
    for y in (0..mask.height()).step_by(step) {
        strokes.extend(row_runs(mask.row(y)).into_iter().map(|(start, end)| StrokeSegment {
            row: y,
            start: start as u32,
            end: end as u32,
        }));
    }
    strokes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rasterize(strokes: &[StrokeSegment], width: u32, height: u32) -> Mask {
        let mut mask = Mask::new(width, height);
        for s in strokes {
            for x in s.start..=s.end {
                assert!(!mask.get(x, s.row), "pixel drawn twice");
                mask.set(x, s.row, true);
            }
        }
        mask
    }

    #[test]
    fn test_row_runs() {
        assert!(row_runs(&[]).is_empty());
        assert!(row_runs(&[false, false]).is_empty());
        assert_eq!(row_runs(&[true]), vec![(0, 0)]);
        assert_eq!(
            row_runs(&[true, true, false, true, false, false, true, true]),
            vec![(0, 1), (3, 3), (6, 7)]
        );
    }

    #[test]
    fn test_full_square_one_stroke_per_row() {
        let strokes = plan_strokes(&Mask::filled(10, 10, true), 1);
        assert_eq!(strokes.len(), 10);
        for (y, s) in strokes.iter().enumerate() {
            assert_eq!((s.row, s.start, s.end), (y as u32, 0, 9));
        }
    }

    #[test]
    fn test_round_trip_reproduces_mask() {
        let masks = [
            Mask::from_fn(17, 9, |x, y| (x * 7 + y * 3) % 5 < 2),
            Mask::from_fn(12, 12, |x, y| x == y || x + y == 11),
            Mask::from_fn(5, 5, |x, _| x % 2 == 0),
            Mask::new(6, 3),
            Mask::filled(1, 1, true),
        ];
        for mask in masks {
            let strokes = plan_strokes(&mask, 1);
            assert_eq!(rasterize(&strokes, mask.width(), mask.height()), mask);
        }
    }

    #[test]
    fn test_step_skips_rows() {
        let strokes = plan_strokes(&Mask::filled(3, 10, true), 4);
        let rows: Vec<u32> = strokes.iter().map(|s| s.row).collect();
        assert_eq!(rows, vec![0, 4, 8]);
    }

    #[test]
    fn test_screen_points_add_origin() {
        let s = StrokeSegment {
            row: 3,
            start: 2,
            end: 6,
        };
        let origin = ScreenPoint::new(100, 200);
        assert_eq!(s.start_point(origin), ScreenPoint::new(102, 203));
        assert_eq!(s.end_point(origin), ScreenPoint::new(106, 203));
        assert_eq!(s.len(), 5);
        assert!(!s.is_dot());
    }
}
