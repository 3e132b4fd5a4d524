//! Source color space of an input image
//!
//! Implements the fixed Adobe RGB (1998) conversion applied to images that
//! were not encoded as sRGB.

use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::color::{to_rgb8, xyz_to_srgb, Xyz};
use crate::constants::adobe;
use crate::{ColorError, Result};

/// Color space the input pixels are encoded in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceColorSpace {
    /// Standard sRGB, used as-is
    #[default]
    Srgb,
    /// Adobe RGB (1998), converted to sRGB before extraction
    Adobe,
}

impl SourceColorSpace {
    /// Bring an image into sRGB
    ///
    /// sRGB images are returned untouched. Adobe images go through the
    /// Adobe → XYZ matrix on 8-bit values, and the rounded result is read
    /// as XYZ on a 0–255 scale before encoding back to sRGB.
    pub fn normalize(self, image: RgbImage) -> RgbImage {
        match self {
            SourceColorSpace::Srgb => image,
            SourceColorSpace::Adobe => {
                let mut image = image;
                for pixel in image.pixels_mut() {
                    *pixel = Rgb(adobe_to_srgb(pixel.0));
                }
                tracing::trace!("converted Adobe RGB pixels to sRGB");
                image
            }
        }
    }
}

/// Convert one Adobe RGB pixel to sRGB
pub fn adobe_to_srgb(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(f64::from);
    let xyz = adobe::TO_XYZ.map(|row| row[0] * r + row[1] * g + row[2] * b);

    // 8-bit intermediate, rescaled from 0-255 to the 0-100 XYZ range
    let [x, y, z] = to_rgb8(xyz).map(|v| f64::from(v) / 255.0 * 100.0);
    to_rgb8(xyz_to_srgb(Xyz::new(x, y, z)))
}

impl FromStr for SourceColorSpace {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "srgb" => Ok(SourceColorSpace::Srgb),
            "adobe" | "adobergb" => Ok(SourceColorSpace::Adobe),
            _ => Err(ColorError::InvalidColorSpace(s.to_string())),
        }
    }
}

impl fmt::Display for SourceColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceColorSpace::Srgb => f.write_str("srgb"),
            SourceColorSpace::Adobe => f.write_str("adobe"),
        }
    }
}
