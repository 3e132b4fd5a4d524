//! Source color space normalization
//!
//! Photographs tagged with a wide-gamut working space are brought into sRGB
//! before segmentation, so every later stage can assume sRGB pixels.

pub mod source_space;

pub use source_space::SourceColorSpace;
