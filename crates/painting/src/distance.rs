//! Weighted perceptual color distance
//!
//! One metric serves both palette nearest-match and per-pixel layer
//! membership; the layer thresholds are tuned against it.

use autosketch_config::{ReferenceColor, Rgb};

use crate::constants::{WEIGHT_B, WEIGHT_G, WEIGHT_R};

/// sqrt(0.30 dR^2 + 0.59 dG^2 + 0.11 dB^2)
#[inline]
pub fn color_distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    (WEIGHT_R * dr * dr + WEIGHT_G * dg * dg + WEIGHT_B * db * db).sqrt()
}

/// Closest reference color; ties go to the earlier entry of [`ReferenceColor::ALL`]
pub fn nearest_reference_color(target: Rgb) -> ReferenceColor {
    let mut best = ReferenceColor::ALL[0];
    let mut best_dist = f64::INFINITY;
    for candidate in ReferenceColor::ALL {
        let dist = color_distance(target, candidate.rgb());
        if dist < best_dist {
            best_dist = dist;
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_colors() -> Vec<Rgb> {
        let steps = [0u8, 17, 64, 128, 200, 241, 255];
        let mut out = Vec::new();
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    out.push(Rgb::new(r, g, b));
                }
            }
        }
        out
    }

    #[test]
    fn test_distance_formula() {
        let d = color_distance(Rgb::new(10, 0, 0), Rgb::new(0, 0, 0));
        assert!((d - (0.30f64 * 100.0).sqrt()).abs() < 1e-12);
        let d = color_distance(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255));
        assert!((d - 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_symmetric_and_zero_iff_equal() {
        let colors = sample_colors();
        for &a in colors.iter().step_by(7) {
            for &b in &colors {
                assert_eq!(color_distance(a, b), color_distance(b, a));
                assert_eq!(color_distance(a, b) == 0.0, a == b);
            }
        }
    }

    #[test]
    fn test_reference_colors_map_to_themselves() {
        for color in ReferenceColor::ALL {
            assert_eq!(nearest_reference_color(color.rgb()), color);
        }
    }

    #[test]
    fn test_nearest_is_minimal() {
        for target in sample_colors() {
            let chosen = nearest_reference_color(target);
            let chosen_dist = color_distance(target, chosen.rgb());
            for other in ReferenceColor::ALL {
                assert!(chosen_dist <= color_distance(target, other.rgb()));
            }
        }
    }

    #[test]
    fn test_near_red_maps_to_red() {
        assert_eq!(nearest_reference_color(Rgb::new(230, 30, 20)), ReferenceColor::Red);
    }
}
