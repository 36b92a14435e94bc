//! Image preparation: transparency, enhancement and fitting to the canvas

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageError, Rgb as Pixel, RgbImage};
use tracing::{debug, info};

use crate::constants::{ALPHA_THRESHOLD, COLOR_FACTOR, CONTRAST_FACTOR, SHARPNESS_FACTOR};
use crate::enhance;
use crate::mask::Mask;

/// Source pixels ready for color analysis
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Enhanced and downscaled RGB grid
    pub pixels: RgbImage,
    /// Pixels eligible for drawing, same dimensions as `pixels`
    pub paintable: Mask,
}

impl PreparedImage {
    /// Wrap an RGB grid in which every pixel is paintable
    pub fn opaque(pixels: RgbImage) -> Self {
        let paintable = Mask::filled(pixels.width(), pixels.height(), true);
        Self { pixels, paintable }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Decode an image file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    let img = image::open(path)?;
    info!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img)
}

/// Split an image into RGB pixels and its paintable mask
///
/// Pixels with alpha at or below [`ALPHA_THRESHOLD`] are not paintable and
/// are forced to white so they take part in neither clustering nor layering.
pub fn split_transparency(img: &DynamicImage) -> (RgbImage, Mask) {
    if !img.color().has_alpha() {
        debug!("Image has no alpha channel; every pixel is paintable");
        let rgb = img.to_rgb8();
        let mask = Mask::filled(rgb.width(), rgb.height(), true);
        return (rgb, mask);
    }

    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mask = Mask::from_fn(w, h, |x, y| rgba.get_pixel(x, y).0[3] > ALPHA_THRESHOLD);
    let rgb = RgbImage::from_fn(w, h, |x, y| {
        if mask.get(x, y) {
            let [r, g, b, _] = rgba.get_pixel(x, y).0;
            Pixel([r, g, b])
        } else {
            Pixel([255, 255, 255])
        }
    });
    debug!(
        "Alpha channel present; {} of {} pixels paintable",
        mask.count(),
        w as usize * h as usize
    );
    (rgb, mask)
}

/// Contrast, then saturation, then sharpness
pub fn enhance(pixels: &RgbImage) -> RgbImage {
    let out = enhance::contrast(pixels, CONTRAST_FACTOR);
    let out = enhance::color(&out, COLOR_FACTOR);
    enhance::sharpness(&out, SHARPNESS_FACTOR)
}

/// Largest size with the same aspect ratio that fits in `max_w` x `max_h`
///
/// Never upscales; each side is at least one pixel.
pub fn fit_dimensions(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let max_w = max_w.max(1);
    let max_h = max_h.max(1);
    if width <= max_w && height <= max_h {
        return (width, height);
    }
    let scale = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}

/// Run the full preparation on a decoded image
pub fn prepare(img: &DynamicImage, max_w: u32, max_h: u32) -> PreparedImage {
    let (rgb, mask) = split_transparency(img);
    let enhanced = enhance(&rgb);

    let (src_w, src_h) = enhanced.dimensions();
    let (w, h) = fit_dimensions(src_w, src_h, max_w, max_h);
    if (w, h) == (src_w, src_h) {
        return PreparedImage {
            pixels: enhanced,
            paintable: mask,
        };
    }

    info!("Resized image from {}x{} to {}x{}", src_w, src_h, w, h);
    PreparedImage {
        pixels: imageops::resize(&enhanced, w, h, FilterType::Lanczos3),
        paintable: mask.resized(w, h),
    }
}

/// Load and prepare in one step
pub fn load_and_prepare(path: &Path, max_w: u32, max_h: u32) -> Result<PreparedImage, ImageError> {
    let img = load_image(path)?;
    Ok(prepare(&img, max_w, max_h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_fit_dimensions_downscale_only() {
        assert_eq!(fit_dimensions(100, 50, 400, 400), (100, 50));
        assert_eq!(fit_dimensions(800, 600, 400, 400), (400, 300));
        assert_eq!(fit_dimensions(600, 800, 400, 400), (300, 400));
        assert_eq!(fit_dimensions(1000, 10, 100, 100), (100, 1));
        assert_eq!(fit_dimensions(5000, 1, 100, 100), (100, 1));
    }

    #[test]
    fn test_split_without_alpha() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Pixel([1, 2, 3])));
        let (rgb, mask) = split_transparency(&img);
        assert_eq!(rgb.get_pixel(0, 0).0, [1, 2, 3]);
        assert_eq!(mask.count(), 6);
    }

    #[test]
    fn test_split_alpha_threshold() {
        let img = RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => Rgba([10, 20, 30, 255]),
            1 => Rgba([10, 20, 30, 200]),
            _ => Rgba([10, 20, 30, 201]),
        });
        let (rgb, mask) = split_transparency(&DynamicImage::ImageRgba8(img));
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(2, 0));
        assert_eq!(rgb.get_pixel(1, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(2, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_fully_transparent_mask_is_clear() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0]));
        let prepared = prepare(&DynamicImage::ImageRgba8(img), 100, 100);
        assert!(prepared.paintable.is_clear());
    }

    #[test]
    fn test_prepare_resizes_pixels_and_mask_together() {
        let img = RgbaImage::from_fn(40, 20, |x, _| {
            if x < 20 { Rgba([200, 0, 0, 255]) } else { Rgba([0, 0, 0, 0]) }
        });
        let prepared = prepare(&DynamicImage::ImageRgba8(img), 10, 10);
        assert_eq!(prepared.pixels.dimensions(), (10, 5));
        assert_eq!(prepared.paintable.width(), 10);
        assert_eq!(prepared.paintable.height(), 5);
        assert!(prepared.paintable.get(0, 2));
        assert!(!prepared.paintable.get(9, 2));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("autosketch-no-such-image.png");
        assert!(load_image(&path).is_err());
    }
}
