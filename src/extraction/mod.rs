//! Dominant color extraction
//!
//! The pipeline runs one way, each stage building a fresh value from the
//! previous one:
//!
//! 1. **Downsize** so the longer side fits `max_dimension`
//! 2. **Normalize** the source color space to sRGB
//! 3. **Segment** into color-homogeneous regions
//! 4. **Sample** the segmented image on a regular grid
//! 5. **Count** each distinct sampled color
//! 6. **Classify** frequent colors against the reference palette
//! 7. **Merge** near-duplicate labels

pub mod merge;
pub mod sampling;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::calibration::SourceColorSpace;
use crate::color::PaletteMatcher;
use crate::config::ExtractionConfig;
use crate::image_loader::load_image;
use crate::reference::ReferencePalette;
use crate::segmentation::{MeanShiftSegmenter, SegmentationParams, Segmenter};
use crate::{ColorError, Result};

pub use merge::{classify, merge_close, ClassifiedColor};
pub use sampling::{count_colors, downsize, pack_rgb, sample_grid, unpack_rgb, ColorCount};

/// Colors found in one image, keyed by palette label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub colors: BTreeMap<String, ClassifiedColor>,

    /// Number of grid samples taken from the segmented image
    pub sample_count: usize,

    /// Regions reported by the segmenter
    pub region_count: usize,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&ClassifiedColor> {
        self.colors.get(label)
    }

    /// Colors ordered by sample count, most frequent first
    pub fn by_frequency(&self) -> Vec<&ClassifiedColor> {
        let mut colors: Vec<_> = self.colors.values().collect();
        colors.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        colors
    }
}

/// Extracts dominant, palette-named colors from images
///
/// The extractor holds no per-image state; one instance can serve many
/// images, from several threads when the segmenter allows it.
#[derive(Debug, Clone)]
pub struct DominantColorExtractor<S = MeanShiftSegmenter> {
    config: ExtractionConfig,
    segmenter: S,
}

impl DominantColorExtractor {
    /// Create an extractor using the built-in mean-shift segmenter
    ///
    /// Regions smaller than `min_density` pixels (300 by default) are
    /// absorbed into a neighbor, so an image with fewer pixels than that
    /// collapses into a single region and yields one color. Use
    /// [`Passthrough`](crate::segmentation::Passthrough) for tiny or
    /// already segmented images.
    pub fn new(config: ExtractionConfig) -> Self {
        Self::with_segmenter(config, MeanShiftSegmenter::default())
    }
}

/// Default configuration with the mean-shift segmenter; see
/// [`DominantColorExtractor::new`] for how tiny images behave.
impl Default for DominantColorExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl<S: Segmenter> DominantColorExtractor<S> {
    pub fn with_segmenter(config: ExtractionConfig, segmenter: S) -> Self {
        Self { config, segmenter }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Load an image from disk and extract its colors
    pub fn extract_path(
        &self,
        path: &Path,
        source: SourceColorSpace,
        palette: &ReferencePalette,
    ) -> Result<ExtractionResult> {
        let image = load_image(path)?;
        self.extract(image, source, palette)
    }

    /// Extract the dominant colors of an image
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` for an empty image or an out-of-range config
    /// - `EmptyPalette` when there is nothing to classify against
    /// - segmentation failures and `SegmentationTimeout`, unmodified
    pub fn extract(
        &self,
        image: RgbImage,
        source: SourceColorSpace,
        palette: &ReferencePalette,
    ) -> Result<ExtractionResult> {
        self.config.validate()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(ColorError::InvalidParameter {
                parameter: "image".to_string(),
                value: format!("{}x{}", image.width(), image.height()),
            });
        }
        if palette.is_empty() {
            return Err(ColorError::EmptyPalette);
        }

        let image = downsize(image, self.config.max_dimension);
        let image = source.normalize(image);
        let (width, height) = image.dimensions();

        let params = SegmentationParams::for_image(width, height, &self.config);
        let started = Instant::now();
        let segmentation = self.segmenter.segment(&image, params)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if let Some(limit_ms) = self.config.segmentation_timeout_ms {
            if elapsed_ms > limit_ms {
                return Err(ColorError::SegmentationTimeout {
                    elapsed_ms,
                    limit_ms,
                });
            }
        }
        if segmentation.image.dimensions() != (width, height) {
            return Err(ColorError::SegmentationError {
                message: format!(
                    "segmenter returned {}x{} for a {}x{} image",
                    segmentation.image.width(),
                    segmentation.image.height(),
                    width,
                    height
                ),
                source: None,
            });
        }

        let samples = sample_grid(&segmentation.image, self.config.sample_grid);
        let counts = count_colors(&samples);
        tracing::debug!(
            width,
            height,
            elapsed_ms,
            regions = segmentation.region_count,
            samples = samples.len(),
            distinct = counts.len(),
            "segmented and sampled image"
        );

        let matcher = PaletteMatcher::new(palette);
        let classified = classify(&counts, self.config.min_frequency, &matcher)?;
        if classified.is_empty() {
            tracing::warn!(
                distinct = counts.len(),
                "no color exceeded the minimum frequency"
            );
        }

        let merged = merge_close(
            classified.into_values().collect(),
            self.config.merge_threshold,
        );
        tracing::debug!(colors = merged.len(), "extracted dominant colors");

        Ok(ExtractionResult {
            colors: merged
                .into_iter()
                .map(|color| (color.label.clone(), color))
                .collect(),
            sample_count: samples.len(),
            region_count: segmentation.region_count,
        })
    }
}
