//! Classification of frequent colors and near-duplicate merging

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::sampling::{unpack_rgb, ColorCount};
use crate::color::{delta_e_2000, hex, lab_to_srgb, to_rgb8, ColorMode, Lab, PaletteMatcher};
use crate::reference::{lab_array, PaletteEntry};
use crate::Result;

/// A palette label reached by the sampled colors of an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedColor {
    pub label: String,

    /// Lab value of the matched palette entry
    #[serde(with = "lab_array")]
    pub lab: Lab,

    /// `lab` rendered to 8-bit sRGB
    pub rgb: [u8; 3],

    /// Number of samples classified under this label
    pub count: usize,
}

impl ClassifiedColor {
    pub fn new(entry: &PaletteEntry, count: usize) -> Self {
        Self {
            label: entry.label.clone(),
            lab: entry.lab,
            rgb: to_rgb8(lab_to_srgb(entry.lab)),
            count,
        }
    }

    /// `#RRGGBB` form of [`ClassifiedColor::rgb`]
    pub fn hex(&self) -> String {
        hex(self.rgb)
    }
}

/// Classify every color seen more than `min_frequency · total` times
///
/// Colors are matched as sRGB; counts of raw colors landing on the same
/// label are summed.
pub fn classify(
    counts: &ColorCount,
    min_frequency: f64,
    matcher: &PaletteMatcher<'_>,
) -> Result<BTreeMap<String, ClassifiedColor>> {
    let total: usize = counts.values().sum();
    let threshold = min_frequency * total as f64;
    let mut classified: BTreeMap<String, ClassifiedColor> = BTreeMap::new();

    for (&key, &count) in counts {
        if count as f64 <= threshold {
            continue;
        }

        let rgb = unpack_rgb(key).map(f64::from);
        let found = matcher.closest(&rgb, ColorMode::Rgb)?;
        tracing::trace!(?rgb, label = %found.entry.label, distance = found.distance, count);

        classified
            .entry(found.entry.label.clone())
            .and_modify(|color| color.count += count)
            .or_insert_with(|| ClassifiedColor::new(found.entry, count));
    }

    Ok(classified)
}

/// Drop colors that sit within `threshold` ΔE2000 of a more frequent one
///
/// Entries are visited by count, highest first, with labels breaking ties;
/// each is kept only if it is at least `threshold` away from everything
/// already kept. The surviving set does not depend on input order, and no
/// two survivors are closer than `threshold`.
pub fn merge_close(entries: Vec<ClassifiedColor>, threshold: f64) -> Vec<ClassifiedColor> {
    let mut ordered = entries;
    ordered.sort_by(|a, b| {
        Reverse(a.count)
            .cmp(&Reverse(b.count))
            .then_with(|| a.label.cmp(&b.label))
    });

    let mut kept: Vec<ClassifiedColor> = Vec::with_capacity(ordered.len());
    for candidate in ordered {
        let duplicate = kept
            .iter()
            .find(|survivor| delta_e_2000(survivor.lab, candidate.lab) < threshold);

        match duplicate {
            Some(survivor) => tracing::debug!(
                dropped = %candidate.label,
                kept = %survivor.label,
                "merged near-duplicate color"
            ),
            None => kept.push(candidate),
        }
    }

    kept
}
