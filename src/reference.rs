//! Reference palettes: named colors used as classification targets
//!
//! A palette is loaded once, validated, and then only read. It is passed
//! explicitly into every matching or extraction call and is `Send + Sync`,
//! so concurrent extractions can share one behind `&` or `Arc`.
//!
//! # File Format
//!
//! JSON array of entries; `name` is accepted as an alias for `label` and
//! unknown keys (such as a cached `srgb` triple) are ignored:
//!
//! ```json
//! [
//!   { "label": "dark skin", "lab": [38.0156, 11.7992, 13.6598] },
//!   { "name": "white 9.5", "lab": [95.8167, -0.1712, 0.4706] }
//! ]
//! ```
//!
//! # Bundled Palettes
//!
//! - [`ReferencePalette::color_checker_24`]: the 24 ColorChecker patches,
//!   a narrow palette of photographic reference colors
//! - [`ReferencePalette::named_colors_140`]: the 140 HTML/CSS named colors,
//!   a wide palette of everyday color names
//!
//! Both store the sRGB value each entry was defined by next to its Lab.
//! The Lab values are computed from that sRGB with this crate's own
//! converter; they are not the spectrophotometric Lab measurements
//! published for the physical ColorChecker chart, which differ by a few
//! ΔE. A pixel of exactly the stored sRGB therefore matches its entry at
//! ΔE 0, which says nothing about agreement with a measured chart.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{lab_components, Lab};
use crate::{ColorError, Result};

const COLOR_CHECKER_24: &str = include_str!("../data/colorchecker24.json");
const NAMED_COLORS_140: &str = include_str!("../data/named140.json");

/// Serde adapter storing a Lab color as `[L, a, b]`
pub(crate) mod lab_array {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::color::{lab_components, Lab};

    pub fn serialize<S: Serializer>(lab: &Lab, serializer: S) -> Result<S::Ok, S::Error> {
        lab_components(*lab).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Lab, D::Error> {
        let [l, a, b] = <[f64; 3]>::deserialize(deserializer)?;
        Ok(Lab::new(l, a, b))
    }
}

/// One named reference color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Human-readable name, unique within its palette
    #[serde(alias = "name")]
    pub label: String,

    /// Reference color in CIE Lab (D65)
    #[serde(with = "lab_array")]
    pub lab: Lab,
}

impl PaletteEntry {
    pub fn new(label: impl Into<String>, lab: Lab) -> Self {
        Self {
            label: label.into(),
            lab,
        }
    }
}

/// An ordered, immutable list of reference colors
///
/// Order matters: when two entries are equally close to a color, the one
/// listed first wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReferencePalette {
    entries: Vec<PaletteEntry>,
}

impl ReferencePalette {
    /// Build a palette, checking that labels are unique and Lab values finite
    ///
    /// # Errors
    ///
    /// Returns `PaletteError` for duplicate labels or non-finite components.
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.label.as_str()) {
                return Err(ColorError::PaletteError {
                    message: format!("duplicate label '{}'", entry.label),
                    source: None,
                });
            }
            if !lab_components(entry.lab).iter().all(|c| c.is_finite()) {
                return Err(ColorError::PaletteError {
                    message: format!("non-finite Lab value for '{}'", entry.label),
                    source: None,
                });
            }
        }

        Ok(Self { entries })
    }

    /// Parse a palette from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<PaletteEntry> = serde_json::from_str(json)
            .map_err(|e| ColorError::palette("Failed to parse palette JSON", e))?;
        Self::new(entries)
    }

    /// Load a palette from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ColorError::palette(format!("Failed to read palette: {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// The 24-patch ColorChecker chart
    ///
    /// Lab values are derived from the published sRGB patch colors, not
    /// taken from measured chart data.
    pub fn color_checker_24() -> Result<Self> {
        Self::from_json_str(COLOR_CHECKER_24)
    }

    /// The 140 HTML/CSS named colors, in alphabetical order
    ///
    /// Lab values are derived from the CSS sRGB definitions. `aqua`/`cyan`
    /// and `fuchsia`/`magenta` share a color; the first of each pair wins
    /// matches.
    pub fn named_colors_140() -> Result<Self> {
        Self::from_json_str(NAMED_COLORS_140)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PaletteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by label
    pub fn get(&self, label: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }
}

impl<'a> IntoIterator for &'a ReferencePalette {
    type Item = &'a PaletteEntry;
    type IntoIter = std::slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
