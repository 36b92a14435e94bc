//! Color reduction: cluster paintable pixels into a few representative colors

use std::collections::HashMap;
use std::fmt;

use autosketch_config::{ReferenceColor, Rgb};
use image::RgbImage;
use rayon::prelude::*;
use tracing::debug;

use crate::constants::{KMEANS_MAX_ITERATIONS, KMEANS_TOLERANCE, NEAR_WHITE_THRESHOLD};
use crate::distance::nearest_reference_color;
use crate::mask::Mask;

/// The color a layer is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawColor {
    /// A calibrated palette swatch
    Palette(ReferenceColor),
    /// An arbitrary value typed into the RGB entry fields
    Exact(Rgb),
}

impl DrawColor {
    pub fn rgb(self) -> Rgb {
        match self {
            DrawColor::Palette(c) => c.rgb(),
            DrawColor::Exact(rgb) => rgb,
        }
    }
}

impl fmt::Display for DrawColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawColor::Palette(c) => write!(f, "{}", c.name()),
            DrawColor::Exact(rgb) => write!(f, "RGB({}, {}, {})", rgb.r, rgb.g, rgb.b),
        }
    }
}

/// One cluster of source pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepresentativeColor {
    pub color: DrawColor,
    /// Cluster centroid, used for layer membership even after palette mapping
    pub centroid: Rgb,
    /// Number of source pixels in the cluster
    pub frequency: usize,
}

/// Distinct colors of the paintable, non-background pixels with their counts
///
/// Sorted by descending count, then by color, so clustering is deterministic.
pub fn color_histogram(pixels: &RgbImage, paintable: &Mask) -> Vec<(Rgb, usize)> {
    let mut counts: HashMap<Rgb, usize> = HashMap::new();
    for (x, y, p) in pixels.enumerate_pixels() {
        if !paintable.get(x, y) {
            continue;
        }
        let rgb = Rgb::from(p.0);
        if rgb.all_channels_above(NEAR_WHITE_THRESHOLD) {
            continue;
        }
        *counts.entry(rgb).or_default() += 1;
    }
    let mut distinct: Vec<(Rgb, usize)> = counts.into_iter().collect();
    distinct.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    distinct
}

/// Reduce the prepared image to at most `k` representative colors
///
/// The result is ordered by descending frequency. With `map_to_palette`
/// every centroid is replaced by its nearest reference color and later
/// duplicates are dropped. An empty result means there is nothing to draw.
pub fn reduce_colors(
    pixels: &RgbImage,
    paintable: &Mask,
    k: usize,
    map_to_palette: bool,
) -> Vec<RepresentativeColor> {
    let distinct = color_histogram(pixels, paintable);
    if distinct.is_empty() {
        debug!("No paintable non-background pixels");
        return Vec::new();
    }

    let k = k.min(distinct.len());
    if k == 0 {
        return Vec::new();
    }
    debug!(
        "Clustering {} distinct colors into {} clusters",
        distinct.len(),
        k
    );

    let mut clusters = kmeans(&distinct, k);
    clusters.sort_by(|a, b| b.1.cmp(&a.1));

    let mut out: Vec<RepresentativeColor> = Vec::with_capacity(clusters.len());
    for (centroid, frequency) in clusters {
        let color = if map_to_palette {
            let key = DrawColor::Palette(nearest_reference_color(centroid));
            if out.iter().any(|c| c.color == key) {
                continue;
            }
            key
        } else {
            DrawColor::Exact(centroid)
        };
        out.push(RepresentativeColor {
            color,
            centroid,
            frequency,
        });
    }
    out
}

#[inline]
fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

fn to_point(rgb: Rgb) -> [f64; 3] {
    [rgb.r as f64, rgb.g as f64, rgb.b as f64]
}

/// Index of the closest centroid; ties go to the lowest index
fn nearest_centroid(point: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(point, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Farthest-point seeding starting from the most frequent color
fn seed_centroids(points: &[[f64; 3]], k: usize) -> Vec<[f64; 3]> {
    let mut centroids = vec![points[0]];
    let mut min_dist: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &points[0]))
        .collect();

    while centroids.len() < k {
        let mut far = 0;
        for (i, &d) in min_dist.iter().enumerate() {
            if d > min_dist[far] {
                far = i;
            }
        }
        if min_dist[far] == 0.0 {
            break;
        }
        let seed = points[far];
        centroids.push(seed);
        for (d, p) in min_dist.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &seed));
        }
    }
    centroids
}

/// Weighted Lloyd iterations over distinct colors
///
/// Returns `(truncated centroid, member pixel count)` for each non-empty cluster.
fn kmeans(distinct: &[(Rgb, usize)], k: usize) -> Vec<(Rgb, usize)> {
    let points: Vec<[f64; 3]> = distinct.iter().map(|&(rgb, _)| to_point(rgb)).collect();
    let mut centroids = seed_centroids(&points, k);
    let mut counts = vec![0usize; centroids.len()];

    for iteration in 0..KMEANS_MAX_ITERATIONS {
        let assignment: Vec<usize> = points
            .par_iter()
            .map(|p| nearest_centroid(p, &centroids))
            .collect();

        let mut sums = vec![[0.0f64; 3]; centroids.len()];
        counts = vec![0usize; centroids.len()];
        for ((&cluster, p), &(_, weight)) in assignment.iter().zip(&points).zip(distinct) {
            let w = weight as f64;
            for c in 0..3 {
                sums[cluster][c] += p[c] * w;
            }
            counts[cluster] += weight;
        }

        let mut max_shift = 0.0f64;
        for (i, centroid) in centroids.iter_mut().enumerate() {
            if counts[i] == 0 {
                continue;
            }
            let n = counts[i] as f64;
            let updated = [sums[i][0] / n, sums[i][1] / n, sums[i][2] / n];
            max_shift = max_shift.max(squared_distance(centroid, &updated).sqrt());
            *centroid = updated;
        }

        if max_shift <= KMEANS_TOLERANCE {
            debug!("k-means converged after {} iterations", iteration + 1);
            break;
        }
    }

    centroids
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(c, n)| {
            let rgb = Rgb::new(c[0] as u8, c[1] as u8, c[2] as u8);
            (rgb, n)
        })
        .collect()
}
