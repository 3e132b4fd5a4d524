//! Colorimetric constants and extraction defaults
//!
//! The conversion constants are the rounded forms used by the classic
//! EasyRGB/CIE formulas. They are not interchangeable with the exact
//! rational forms (216/24389, 24389/27) used by some libraries.

/// D65 Standard Illuminant Reference
///
/// CIE Standard Illuminant D65, 2° observer, on the 0–100 XYZ scale.
pub mod d65 {
    /// D65 white point in CIE XYZ (Xn, Yn, Zn)
    pub const WHITE_POINT_XYZ: [f64; 3] = [95.047, 100.000, 108.883];
}

/// Re-export D65 white point at top level for convenience
pub const D65_WHITE_POINT_XYZ: [f64; 3] = d65::WHITE_POINT_XYZ;

/// CIE Lab companding constants
pub mod cie {
    /// Threshold between the cube-root and linear segments
    pub const EPSILON: f64 = 0.008856;

    /// Slope of the linear segment
    pub const KAPPA_SLOPE: f64 = 7.787;

    /// Offset of the linear segment
    pub const OFFSET: f64 = 16.0 / 116.0;
}

/// sRGB transfer function and primaries
pub mod srgb {
    /// Branch point of the decoding (inverse gamma) curve, on encoded values
    pub const DECODE_THRESHOLD: f64 = 0.04045;

    /// Branch point of the encoding curve, on linear values
    pub const ENCODE_THRESHOLD: f64 = 0.0031308;

    pub const GAMMA: f64 = 2.4;

    /// Linear sRGB → XYZ (D65)
    pub const TO_XYZ: [[f64; 3]; 3] = [
        [0.4124, 0.3576, 0.1805],
        [0.2126, 0.7152, 0.0722],
        [0.0193, 0.1192, 0.9505],
    ];

    /// XYZ (D65) → linear sRGB
    pub const FROM_XYZ: [[f64; 3]; 3] = [
        [3.2406, -1.5372, -0.4986],
        [-0.9689, 1.8758, 0.0415],
        [0.0557, -0.2040, 1.0570],
    ];
}

/// Adobe RGB (1998) source normalization
pub mod adobe {
    /// Adobe RGB → XYZ (D65), applied to 8-bit channel values
    pub const TO_XYZ: [[f64; 3]; 3] = [
        [0.57667, 0.18556, 0.18823],
        [0.29734, 0.62736, 0.07529],
        [0.02703, 0.07069, 0.99134],
    ];
}

/// Dominant color extraction defaults
pub mod extraction {
    /// Longest image side allowed before downsizing
    pub const MAX_DIMENSION: u32 = 300;

    /// Numerator of `round(scale / sqrt(min(width, height)))`
    pub const SPATIAL_RADIUS_SCALE: f64 = 150.0;

    /// Segmentation color bandwidth
    pub const RANGE_RADIUS: u32 = 8;

    /// Smallest region (in pixels) kept by segmentation
    pub const MIN_DENSITY: u32 = 300;

    /// Sampling grid divisor: stride = dimension / SAMPLE_GRID + 1
    pub const SAMPLE_GRID: u32 = 40;

    /// Fraction of all samples a color must exceed to be classified
    pub const MIN_FREQUENCY: f64 = 0.02;

    /// ΔE2000 below which two classified colors are duplicates
    pub const MERGE_THRESHOLD: f64 = 10.0;
}
