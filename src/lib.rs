//! # colorfinder
//!
//! A Rust crate for finding the dominant, human-nameable colors of a photograph.
//!
//! This library provides:
//! - sRGB ↔ XYZ ↔ Lab conversion with the classic D65 formulas
//! - CIEDE2000 perceptual color difference, scalar and batched
//! - Closest-color lookup against a reference palette
//! - A dominant color pipeline: downsize, segment, sample, classify, merge
//!
//! ## Example
//!
//! ```rust,no_run
//! use colorfinder::{find_image_colors, ExtractionConfig, ReferencePalette, SourceColorSpace};
//! use std::path::Path;
//!
//! let palette = ReferencePalette::color_checker_24()?;
//! let result = find_image_colors(
//!     Path::new("photo.jpg"),
//!     SourceColorSpace::Srgb,
//!     &palette,
//!     &ExtractionConfig::default(),
//! )?;
//! for color in result.by_frequency() {
//!     println!("{:<16} {} ({} samples)", color.label, color.hex(), color.count);
//! }
//! # Ok::<(), colorfinder::ColorError>(())
//! ```

use std::path::Path;

pub mod calibration;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod image_loader;
pub mod reference;
pub mod segmentation;

pub use calibration::SourceColorSpace;
pub use color::{
    delta_e_2000, delta_e_2000_batch, lab_to_srgb, srgb_to_lab, ColorMode, Lab, PaletteMatch,
    PaletteMatcher, Weights, Xyz,
};
pub use config::ExtractionConfig;
pub use error::{ColorError, Result};
pub use extraction::{ClassifiedColor, DominantColorExtractor, ExtractionResult};
pub use reference::{PaletteEntry, ReferencePalette};
pub use segmentation::{MeanShiftSegmenter, Passthrough, Segmentation, SegmentationParams, Segmenter};

/// Name a single color by its closest palette entry
///
/// `color` is read in `mode`; `mode` strings such as `"rgb"` can be parsed
/// with [`str::parse`].
///
/// # Errors
///
/// Returns `ColorError` if:
/// - `color` does not have exactly three components
/// - A component is NaN or infinite
/// - The palette is empty
pub fn find_color<'p>(
    color: &[f64],
    mode: ColorMode,
    palette: &'p ReferencePalette,
) -> Result<PaletteMatch<'p>> {
    color::closest(color, mode, palette)
}

/// Extract the dominant colors of an image file
///
/// Uses the built-in mean-shift segmenter. Build a
/// [`DominantColorExtractor`] directly to plug in another [`Segmenter`].
///
/// # Errors
///
/// Returns `ColorError` if:
/// - Image cannot be loaded or decoded
/// - The configuration or palette is invalid
/// - Segmentation fails or exceeds its deadline
pub fn find_image_colors(
    path: &Path,
    source: SourceColorSpace,
    palette: &ReferencePalette,
    config: &ExtractionConfig,
) -> Result<ExtractionResult> {
    DominantColorExtractor::new(config.clone()).extract_path(path, source, palette)
}
