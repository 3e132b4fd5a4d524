//! Closest-color lookup against a reference palette
//!
//! A plain linear scan with CIEDE2000; palettes hold tens to a few hundred
//! entries, so nothing cleverer is needed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{
    conversion::{finite, lab_components, srgb_to_lab, triple, xyz_to_lab, Lab, Xyz},
    difference::{delta_e_2000_weighted, Weights},
};
use crate::reference::{PaletteEntry, ReferencePalette};
use crate::{ColorError, Result};

/// Color space of a value handed to the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// sRGB, 0–255 per channel
    Rgb,
    /// CIE XYZ, 0–100 scale
    Xyz,
    /// CIE Lab
    Lab,
}

impl ColorMode {
    /// Interpret a triple in this mode and convert it to Lab
    pub fn to_lab(self, color: [f64; 3]) -> Lab {
        let [c0, c1, c2] = color;
        match self {
            ColorMode::Rgb => srgb_to_lab(color),
            ColorMode::Xyz => xyz_to_lab(Xyz::new(c0, c1, c2)),
            ColorMode::Lab => Lab::new(c0, c1, c2),
        }
    }
}

impl FromStr for ColorMode {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "rgb" | "srgb" => Ok(ColorMode::Rgb),
            "xyz" => Ok(ColorMode::Xyz),
            "lab" => Ok(ColorMode::Lab),
            _ => Err(ColorError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorMode::Rgb => "rgb",
            ColorMode::Xyz => "xyz",
            ColorMode::Lab => "lab",
        };
        f.write_str(name)
    }
}

/// The palette entry closest to a queried color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteMatch<'p> {
    pub entry: &'p PaletteEntry,
    /// CIEDE2000 distance from the query to `entry`
    pub distance: f64,
}

/// Matches colors against one reference palette
#[derive(Debug, Clone, Copy)]
pub struct PaletteMatcher<'p> {
    palette: &'p ReferencePalette,
    weights: Weights,
}

impl<'p> PaletteMatcher<'p> {
    /// Create a matcher using reference CIEDE2000 weights
    pub fn new(palette: &'p ReferencePalette) -> Self {
        Self {
            palette,
            weights: Weights::default(),
        }
    }

    /// Create a matcher with custom CIEDE2000 weights
    pub fn with_weights(palette: &'p ReferencePalette, weights: Weights) -> Self {
        Self { palette, weights }
    }

    pub fn palette(&self) -> &'p ReferencePalette {
        self.palette
    }

    /// Find the closest palette entry to `color`, given in `mode`
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` if `color` is not a triple and
    /// `EmptyPalette` if there is nothing to match against.
    pub fn closest(&self, color: &[f64], mode: ColorMode) -> Result<PaletteMatch<'p>> {
        let color = triple(color)?;
        self.closest_lab(mode.to_lab(color))
    }

    /// Find the closest palette entry to a Lab color
    ///
    /// Ties go to the entry listed first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for non-finite components and
    /// `EmptyPalette` if there is nothing to match against.
    pub fn closest_lab(&self, lab: Lab) -> Result<PaletteMatch<'p>> {
        finite(lab_components(lab))?;
        let mut best: Option<PaletteMatch<'p>> = None;

        for entry in self.palette {
            let distance = delta_e_2000_weighted(lab, entry.lab, self.weights);
            let better = match best {
                None => true,
                Some(current) => distance < current.distance,
            };
            if better {
                best = Some(PaletteMatch { entry, distance });
            }
        }

        best.ok_or(ColorError::EmptyPalette)
    }
}

/// Find the closest palette entry to `color`, given in `mode`
///
/// Shorthand for [`PaletteMatcher::closest`] with reference weights.
pub fn closest<'p>(
    color: &[f64],
    mode: ColorMode,
    palette: &'p ReferencePalette,
) -> Result<PaletteMatch<'p>> {
    PaletteMatcher::new(palette).closest(color, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::conversion::{lab_to_xyz, rgb8_to_lab};

    fn build_palette(entries: &[(&str, [f64; 3])]) -> ReferencePalette {
        ReferencePalette::new(
            entries
                .iter()
                .map(|(label, [l, a, b])| PaletteEntry::new(*label, Lab::new(*l, *a, *b)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("rgb".parse::<ColorMode>().unwrap(), ColorMode::Rgb);
        assert_eq!("sRGB".parse::<ColorMode>().unwrap(), ColorMode::Rgb);
        assert_eq!("XYZ".parse::<ColorMode>().unwrap(), ColorMode::Xyz);
        assert_eq!(" Lab ".parse::<ColorMode>().unwrap(), ColorMode::Lab);
        assert!(matches!(
            "hsv".parse::<ColorMode>(),
            Err(ColorError::InvalidMode(mode)) if mode == "hsv"
        ));
    }

    #[test]
    fn test_exact_match_has_zero_distance() {
        let palette = build_palette(&[
            ("black", [0.0, 0.0, 0.0]),
            ("gray", [50.0, 0.0, 0.0]),
            ("white", [100.0, 0.0, 0.0]),
        ]);
        let found = closest(&[50.0, 0.0, 0.0], ColorMode::Lab, &palette).unwrap();
        assert_eq!(found.entry.label, "gray");
        assert_eq!(found.distance, 0.0);
    }

    #[test]
    fn test_rgb_and_xyz_modes_convert_first() {
        let red = rgb8_to_lab([200, 30, 30]);
        let palette = build_palette(&[
            ("blue", [30.0, 20.0, -60.0]),
            ("red", [red.l, red.a, red.b]),
        ]);

        let by_rgb = closest(&[200.0, 30.0, 30.0], ColorMode::Rgb, &palette).unwrap();
        assert_eq!(by_rgb.entry.label, "red");
        assert!(by_rgb.distance < 1e-9);

        let xyz = lab_to_xyz(red);
        let by_xyz = closest(&[xyz.x, xyz.y, xyz.z], ColorMode::Xyz, &palette).unwrap();
        assert_eq!(by_xyz.entry.label, "red");
        assert!(by_xyz.distance < 1e-6);
    }

    #[test]
    fn test_ties_go_to_first_entry() {
        // both entries sit at the same ΔE from the query
        let palette = build_palette(&[
            ("darker", [40.0, 0.0, 0.0]),
            ("lighter", [60.0, 0.0, 0.0]),
        ]);
        let first = closest(&[50.0, 0.0, 0.0], ColorMode::Lab, &palette).unwrap();
        let d_dark = first.distance;
        assert_eq!(first.entry.label, "darker");

        for _ in 0..10 {
            let again = closest(&[50.0, 0.0, 0.0], ColorMode::Lab, &palette).unwrap();
            assert_eq!(again.entry.label, "darker");
            assert_eq!(again.distance, d_dark);
        }

        let duplicated = build_palette(&[
            ("original", [50.0, 10.0, 10.0]),
            ("copy", [50.0, 10.0, 10.0]),
        ]);
        let found = closest(&[52.0, 9.0, 11.0], ColorMode::Lab, &duplicated).unwrap();
        assert_eq!(found.entry.label, "original");
    }

    #[test]
    fn test_invalid_dimension() {
        let palette = build_palette(&[("gray", [50.0, 0.0, 0.0])]);
        assert!(matches!(
            closest(&[50.0, 0.0], ColorMode::Lab, &palette),
            Err(ColorError::InvalidDimension { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_non_finite_query_is_rejected() {
        let palette = build_palette(&[("gray", [50.0, 0.0, 0.0])]);
        assert!(matches!(
            closest(&[f64::NAN, 0.0, 0.0], ColorMode::Lab, &palette),
            Err(ColorError::InvalidParameter { .. })
        ));
        assert!(matches!(
            PaletteMatcher::new(&palette).closest_lab(Lab::new(50.0, f64::INFINITY, 0.0)),
            Err(ColorError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_empty_palette() {
        let empty = ReferencePalette::new(Vec::new()).unwrap();
        assert!(matches!(
            closest(&[50.0, 0.0, 0.0], ColorMode::Lab, &empty),
            Err(ColorError::EmptyPalette)
        ));
    }

    #[test]
    fn test_named_colors_classification() {
        let palette = ReferencePalette::named_colors_140().unwrap();
        let matcher = PaletteMatcher::new(&palette);

        let found = matcher.closest(&[255.0, 99.0, 71.0], ColorMode::Rgb).unwrap();
        assert_eq!(found.entry.label, "tomato");
        assert!(found.distance < 1e-3);

        // aqua and cyan are the same color; the earlier entry wins
        let found = matcher.closest(&[0.0, 255.0, 255.0], ColorMode::Rgb).unwrap();
        assert_eq!(found.entry.label, "aqua");
    }

    #[test]
    fn test_color_checker_classification() {
        let palette = ReferencePalette::color_checker_24().unwrap();
        let matcher = PaletteMatcher::new(&palette);

        let found = matcher.closest(&[175.0, 54.0, 60.0], ColorMode::Rgb).unwrap();
        assert_eq!(found.entry.label, "red");

        let found = matcher.closest(&[8.0, 130.0, 165.0], ColorMode::Rgb).unwrap();
        assert_eq!(found.entry.label, "cyan");
    }
}
