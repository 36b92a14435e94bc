//! Boolean pixel grids used for the paintable mask and color layers

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use rayon::prelude::*;

/// A width x height grid of booleans, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Create a mask with every pixel set to `value`
    pub fn filled(width: u32, height: u32, value: bool) -> Self {
        Self {
            width,
            height,
            bits: vec![value; width as usize * height as usize],
        }
    }

    /// Create an all-false mask
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, false)
    }

    /// Build a mask row by row in parallel
    ///
    /// `f` receives `(x, y)` and decides membership for that pixel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> bool + Sync,
    {
        let mut mask = Self::new(width, height);
        if width == 0 {
            return mask;
        }
        mask.bits
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, bit) in row.iter_mut().enumerate() {
                    *bit = f(x as u32, y as u32);
                }
            });
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns false for out-of-bounds coordinates
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[self.index(x, y)]
    }

    /// Does nothing for out-of-bounds coordinates
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.bits[i] = value;
        }
    }

    /// One row of the grid
    pub fn row(&self, y: u32) -> &[bool] {
        let start = y as usize * self.width as usize;
        &self.bits[start..start + self.width as usize]
    }

    /// Number of marked pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True when no pixel is marked
    pub fn is_clear(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// Clear every pixel that is marked in `other`
    pub fn subtract(&mut self, other: &Mask) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (bit, &taken) in self.bits.iter_mut().zip(&other.bits) {
            *bit &= !taken;
        }
    }

    /// Mark every pixel that is marked in `other`
    pub fn union_with(&mut self, other: &Mask) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (bit, &set) in self.bits.iter_mut().zip(&other.bits) {
            *bit |= set;
        }
    }

    /// True when no pixel is marked in both masks
    pub fn is_disjoint(&self, other: &Mask) -> bool {
        self.bits.iter().zip(&other.bits).all(|(&a, &b)| !(a && b))
    }

    /// Nearest-neighbor resample to a new size
    pub fn resized(&self, width: u32, height: u32) -> Mask {
        if (width, height) == (self.width, self.height) {
            return self.clone();
        }
        if self.width == 0 || self.height == 0 {
            return Mask::new(width, height);
        }
        let gray = GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { 255 } else { 0 }])
        });
        let scaled = imageops::resize(&gray, width, height, FilterType::Nearest);
        Mask {
            width,
            height,
            bits: scaled.pixels().map(|p| p.0[0] > 127).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_and_bounds() {
        let mut mask = Mask::new(4, 3);
        mask.set(1, 2, true);
        assert!(mask.get(1, 2));
        assert!(!mask.get(2, 1));
        assert!(!mask.get(10, 10));
        mask.set(10, 10, true);
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_from_fn_rows() {
        let mask = Mask::from_fn(5, 4, |x, y| x == y);
        assert_eq!(mask.count(), 4);
        assert_eq!(mask.row(2), &[false, false, true, false, false]);
    }

    #[test]
    fn test_subtract_and_disjoint() {
        let mut a = Mask::filled(3, 3, true);
        let b = Mask::from_fn(3, 3, |x, _| x == 0);
        assert!(!a.is_disjoint(&b));
        a.subtract(&b);
        assert!(a.is_disjoint(&b));
        assert_eq!(a.count(), 6);
        a.union_with(&b);
        assert_eq!(a.count(), 9);
    }

    #[test]
    fn test_resized_nearest() {
        let mask = Mask::from_fn(4, 4, |x, _| x < 2);
        let half = mask.resized(2, 2);
        assert_eq!(half.row(0), &[true, false]);
        assert_eq!(half.row(1), &[true, false]);

        let all = Mask::filled(7, 5, true).resized(3, 2);
        assert_eq!(all.count(), 6);
    }

    #[test]
    fn test_is_clear() {
        assert!(Mask::new(3, 3).is_clear());
        assert!(!Mask::filled(1, 1, true).is_clear());
    }
}
