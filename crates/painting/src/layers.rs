//! Layer builder: one pixel mask per representative color

use image::RgbImage;
use tracing::debug;

use crate::distance::color_distance;
use crate::mask::Mask;
use crate::reduce::{DrawColor, RepresentativeColor};
use autosketch_config::Rgb;

/// Membership rules for a layer build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerOptions {
    /// A pixel joins a layer when its distance to the centroid is strictly below this
    pub threshold: f64,
    /// Remove pixels already claimed by an earlier layer
    pub exclusive: bool,
}

/// Pixels to draw in a single color
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub color: DrawColor,
    pub centroid: Rgb,
    pub mask: Mask,
}

impl Layer {
    pub fn pixel_count(&self) -> usize {
        self.mask.count()
    }
}

/// Build layers in the order of `colors`, dropping empty ones
pub fn build_layers(
    pixels: &RgbImage,
    colors: &[RepresentativeColor],
    paintable: &Mask,
    options: LayerOptions,
) -> Vec<Layer> {
    let (w, h) = pixels.dimensions();
    let mut claimed = Mask::new(w, h);
    let mut layers = Vec::with_capacity(colors.len());

    for rep in colors {
        let centroid = rep.centroid;
        let mut mask = Mask::from_fn(w, h, |x, y| {
            paintable.get(x, y)
                && color_distance(Rgb::from(pixels.get_pixel(x, y).0), centroid) < options.threshold
        });
        if options.exclusive {
            mask.subtract(&claimed);
            claimed.union_with(&mask);
        }

        let count = mask.count();
        if count == 0 {
            debug!("Layer {} is empty, dropping", rep.color);
            continue;
        }
        debug!("Layer {}: {} pixels", rep.color, count);
        layers.push(Layer {
            color: rep.color,
            centroid,
            mask,
        });
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::reduce_colors;
    use autosketch_config::ReferenceColor;
    use image::Rgb as Pixel;

    fn rep(color: DrawColor, centroid: Rgb) -> RepresentativeColor {
        RepresentativeColor {
            color,
            centroid,
            frequency: 0,
        }
    }

    fn gradient() -> RgbImage {
        RgbImage::from_fn(20, 20, |x, y| Pixel([(x * 12) as u8, (y * 12) as u8, 40]))
    }

    #[test]
    fn test_solid_image_one_full_layer() {
        let img = RgbImage::from_pixel(10, 10, Pixel([239, 19, 11]));
        let mask = Mask::filled(10, 10, true);
        let colors = vec![rep(DrawColor::Palette(ReferenceColor::Red), Rgb::new(239, 19, 11))];
        let layers = build_layers(
            &img,
            &colors,
            &mask,
            LayerOptions {
                threshold: 30.0,
                exclusive: false,
            },
        );
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].pixel_count(), 100);
    }

    #[test]
    fn test_uses_centroid_not_palette_key() {
        // Centroid far from the Red swatch but equal to the pixels
        let img = RgbImage::from_pixel(3, 3, Pixel([180, 60, 60]));
        let colors = vec![rep(DrawColor::Palette(ReferenceColor::Red), Rgb::new(180, 60, 60))];
        let layers = build_layers(
            &img,
            &colors,
            &Mask::filled(3, 3, true),
            LayerOptions {
                threshold: 30.0,
                exclusive: true,
            },
        );
        assert_eq!(layers[0].pixel_count(), 9);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Distance 0 is not below a threshold of 0
        let img = RgbImage::from_pixel(1, 1, Pixel([0, 0, 0]));
        let centroid = Rgb::new(0, 0, 0);
        let layers = build_layers(
            &img,
            &[rep(DrawColor::Exact(centroid), centroid)],
            &Mask::filled(1, 1, true),
            LayerOptions {
                threshold: 0.0,
                exclusive: false,
            },
        );
        assert!(layers.is_empty());
    }

    #[test]
    fn test_unpaintable_pixels_excluded() {
        let img = RgbImage::from_pixel(4, 4, Pixel([0, 0, 0]));
        let paintable = Mask::from_fn(4, 4, |x, _| x < 2);
        let layers = build_layers(
            &img,
            &[rep(DrawColor::Exact(Rgb::new(0, 0, 0)), Rgb::new(0, 0, 0))],
            &paintable,
            LayerOptions {
                threshold: 25.0,
                exclusive: true,
            },
        );
        assert_eq!(layers[0].mask, paintable);
    }

    #[test]
    fn test_exclusive_layers_are_disjoint() {
        let img = gradient();
        let paintable = Mask::filled(20, 20, true);
        let colors = reduce_colors(&img, &paintable, 8, false);
        let layers = build_layers(
            &img,
            &colors,
            &paintable,
            LayerOptions {
                threshold: 60.0,
                exclusive: true,
            },
        );
        assert!(layers.len() > 1);
        for (i, a) in layers.iter().enumerate() {
            for b in &layers[i + 1..] {
                assert!(a.mask.is_disjoint(&b.mask));
            }
        }
    }

    #[test]
    fn test_overlap_without_exclusion() {
        let img = RgbImage::from_pixel(2, 2, Pixel([100, 100, 100]));
        let colors = vec![
            rep(DrawColor::Exact(Rgb::new(100, 100, 100)), Rgb::new(100, 100, 100)),
            rep(DrawColor::Exact(Rgb::new(105, 100, 100)), Rgb::new(105, 100, 100)),
        ];
        let paintable = Mask::filled(2, 2, true);
        let shared = build_layers(
            &img,
            &colors,
            &paintable,
            LayerOptions {
                threshold: 30.0,
                exclusive: false,
            },
        );
        assert_eq!(shared.len(), 2);

        let exclusive = build_layers(
            &img,
            &colors,
            &paintable,
            LayerOptions {
                threshold: 30.0,
                exclusive: true,
            },
        );
        assert_eq!(exclusive.len(), 1);
    }
}
