//! Contrast, saturation and sharpness enhancement
//!
//! Each enhancer builds a "degenerate" version of the image and
//! extrapolates away from it: `out = degenerate + factor * (image - degenerate)`.
//! A factor of 1.0 leaves the image unchanged.

use image::{Rgb as Pixel, RgbImage};
use rayon::prelude::*;

/// ITU-R 601-2 luma in 16.16 fixed point, rounded
#[inline]
fn luma(p: &[u8]) -> u8 {
    ((p[0] as u32 * 19595 + p[1] as u32 * 38470 + p[2] as u32 * 7471 + 0x8000) >> 16) as u8
}

#[inline]
fn extrapolate(degenerate: u8, value: u8, factor: f32) -> u8 {
    let v = degenerate as f32 + factor * (value as f32 - degenerate as f32);
    v.clamp(0.0, 255.0) as u8
}

/// Blend every channel of `image` away from the matching channel of `degenerate`
fn blend_from(degenerate: &RgbImage, image: &RgbImage, factor: f32) -> RgbImage {
    let (w, h) = image.dimensions();
    let src = image.as_raw();
    let deg = degenerate.as_raw();
    let mut out = vec![0u8; src.len()];
    let stride = w as usize * 3;
    if stride == 0 {
        return RgbImage::new(w, h);
    }

    out.par_chunks_mut(stride).enumerate().for_each(|(y, row_out)| {
        let row_src = &src[y * stride..(y + 1) * stride];
        let row_deg = &deg[y * stride..(y + 1) * stride];
        for i in 0..stride {
            row_out[i] = extrapolate(row_deg[i], row_src[i], factor);
        }
    });

    RgbImage::from_raw(w, h, out).unwrap_or_else(|| image.clone())
}

/// Contrast against the uniform image of the mean luma
pub fn contrast(image: &RgbImage, factor: f32) -> RgbImage {
    let count = image.width() as usize * image.height() as usize;
    if count == 0 {
        return image.clone();
    }
    let sum: u64 = image.pixels().map(|p| luma(&p.0) as u64).sum();
    let mean = (sum as f64 / count as f64 + 0.5) as u8;
    let degenerate = RgbImage::from_pixel(image.width(), image.height(), Pixel([mean; 3]));
    blend_from(&degenerate, image, factor)
}

/// Saturation against the per-pixel gray
pub fn color(image: &RgbImage, factor: f32) -> RgbImage {
    let degenerate = RgbImage::from_fn(image.width(), image.height(), |x, y| {
        Pixel([luma(&image.get_pixel(x, y).0); 3])
    });
    blend_from(&degenerate, image, factor)
}

/// Sharpness against a 3x3 smoothed copy
///
/// Smoothing kernel is `[1 1 1; 1 5 1; 1 1 1] / 13`; border pixels are
/// copied through, so they are unaffected by the enhancement.
pub fn sharpness(image: &RgbImage, factor: f32) -> RgbImage {
    blend_from(&smooth(image), image, factor)
}

fn smooth(image: &RgbImage) -> RgbImage {
    let (w, h) = image.dimensions();
    if w < 3 || h < 3 {
        return image.clone();
    }
    let src = image.as_raw();
    let stride = w as usize * 3;
    let mut out = src.clone();

    out.par_chunks_mut(stride)
        .enumerate()
        .skip(1)
        .take(h as usize - 2)
        .for_each(|(y, row_out)| {
            for x in 1..w as usize - 1 {
                for c in 0..3 {
                    let mut acc = 0u32;
                    for dy in 0..3 {
                        let row = (y + dy - 1) * stride;
                        for dx in 0..3 {
                            let weight = if dx == 1 && dy == 1 { 5 } else { 1 };
                            acc += weight * src[row + (x + dx - 1) * 3 + c] as u32;
                        }
                    }
                    row_out[x * 3 + c] = ((acc as f32 / 13.0) + 0.5).min(255.0) as u8;
                }
            }
        });

    RgbImage::from_raw(w, h, out).unwrap_or_else(|| image.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_one_is_identity() {
        let img = RgbImage::from_fn(6, 5, |x, y| Pixel([(x * 40) as u8, (y * 50) as u8, 90]));
        assert_eq!(contrast(&img, 1.0), img);
        assert_eq!(color(&img, 1.0), img);
        assert_eq!(sharpness(&img, 1.0), img);
    }

    #[test]
    fn test_uniform_image_keeps_contrast_and_sharpness() {
        let img = RgbImage::from_pixel(5, 5, Pixel([120, 60, 30]));
        // Only channel-wise distance from the mean luma changes
        let c = contrast(&img, 1.3);
        let mean = luma(&[120, 60, 30]) as f32;
        let expected = (mean + 1.3 * (120.0 - mean)) as u8;
        assert_eq!(c.get_pixel(2, 2).0[0], expected);
        assert_eq!(sharpness(&img, 1.2), img);
    }

    #[test]
    fn test_color_keeps_grays() {
        let img = RgbImage::from_fn(4, 4, |x, _| Pixel([(x * 60) as u8; 3]));
        assert_eq!(color(&img, 1.2), img);
    }

    #[test]
    fn test_color_boosts_saturation() {
        let img = RgbImage::from_pixel(2, 2, Pixel([200, 100, 100]));
        let out = color(&img, 1.2);
        let p = out.get_pixel(0, 0).0;
        assert!(p[0] > 200);
        assert!(p[1] < 100);
    }

    #[test]
    fn test_sharpness_leaves_border() {
        let img = RgbImage::from_fn(5, 5, |x, y| Pixel([((x + y) * 25) as u8, 0, 0]));
        let out = sharpness(&img, 2.0);
        for x in 0..5 {
            assert_eq!(out.get_pixel(x, 0), img.get_pixel(x, 0));
            assert_eq!(out.get_pixel(x, 4), img.get_pixel(x, 4));
        }
    }

    #[test]
    fn test_empty_image() {
        let img = RgbImage::new(0, 0);
        assert_eq!(contrast(&img, 1.3).dimensions(), (0, 0));
        assert_eq!(sharpness(&img, 1.2).dimensions(), (0, 0));
    }
}
