//! Color conversion, perceptual difference and palette matching
//!
//! This module handles color space conversions, CIEDE2000 color
//! difference and closest-color lookup against reference palettes.

pub mod conversion;
pub mod difference;
pub mod matching;

pub use conversion::{
    finite, hex, lab_components, lab_from_slice, lab_to_srgb, lab_to_xyz, rgb8_to_lab,
    srgb_to_lab, srgb_to_xyz, to_rgb8, triple, xyz_to_lab, xyz_to_srgb, Lab, Xyz,
};
pub use difference::{delta_e_2000, delta_e_2000_batch, delta_e_2000_weighted, delta_e_76, Weights};
pub use matching::{closest, ColorMode, PaletteMatch, PaletteMatcher};
