/// Alpha above which a source pixel is considered solid (0-255 scale).
pub const ALPHA_THRESHOLD: u8 = 200;

/// Channel value above which a color counts as near-white background.
pub const NEAR_WHITE_THRESHOLD: u8 = 240;

/// Enhancement multipliers, applied in this order.
pub const CONTRAST_FACTOR: f32 = 1.3;
pub const COLOR_FACTOR: f32 = 1.2;
pub const SHARPNESS_FACTOR: f32 = 1.2;

/// Perceptual channel weights for color distance.
pub const WEIGHT_R: f64 = 0.30;
pub const WEIGHT_G: f64 = 0.59;
pub const WEIGHT_B: f64 = 0.11;

/// Layer membership thresholds (strictly below).
pub const PALETTE_LAYER_THRESHOLD: f64 = 30.0;
pub const EXACT_LAYER_THRESHOLD: f64 = 25.0;

/// Requested cluster counts per mode.
pub const PALETTE_CLUSTER_COUNT: usize = 12;
pub const EXACT_CLUSTER_COUNT: usize = 50;

/// Fixed row strides.
pub const PALETTE_ROW_STEP: u32 = 11;
pub const EXACT_ROW_STEP: u32 = 2;

/// Layers smaller than this always get the smallest brush.
pub const MIN_PIXELS_FOR_BRUSH_ANALYSIS: usize = 50;

/// Progress is reported once every this many strokes.
pub const PROGRESS_STROKE_INTERVAL: usize = 20;

/// K-means limits.
pub const KMEANS_MAX_ITERATIONS: usize = 50;
pub const KMEANS_TOLERANCE: f64 = 0.5;
