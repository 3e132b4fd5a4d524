//! Region segmentation
//!
//! Segmentation partitions an image into spatially contiguous,
//! color-homogeneous regions and repaints each pixel with its region's
//! representative color. Extraction only depends on the [`Segmenter`]
//! contract, so any conforming implementation can be plugged in.

pub mod mean_shift;

use std::collections::VecDeque;

use image::RgbImage;

use crate::config::ExtractionConfig;
use crate::Result;

pub use mean_shift::MeanShiftSegmenter;

/// Tuning for one segmentation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentationParams {
    /// Spatial window radius in pixels
    pub spatial_radius: u32,
    /// Color bandwidth
    pub range_radius: u32,
    /// Regions smaller than this many pixels are absorbed by a neighbor
    pub min_density: u32,
}

impl SegmentationParams {
    /// Derive parameters for an image of the given size
    ///
    /// The spatial radius shrinks as the image grows:
    /// `round(spatial_radius_scale / sqrt(min(width, height)))`.
    pub fn for_image(width: u32, height: u32, config: &ExtractionConfig) -> Self {
        let shorter = width.min(height);
        let spatial_radius = if shorter == 0 {
            0
        } else {
            (config.spatial_radius_scale / f64::from(shorter).sqrt()).round() as u32
        };

        Self {
            spatial_radius,
            range_radius: config.range_radius,
            min_density: config.min_density,
        }
    }
}

/// Output of a segmenter
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Same-sized image, each pixel painted with its region color
    pub image: RgbImage,
    /// Region index per pixel, row-major
    pub labels: Vec<u32>,
    pub region_count: usize,
}

/// Partitions an image into color-homogeneous regions
///
/// Implementations must be deterministic for a given input and return an
/// image with the same dimensions as the one they were given.
pub trait Segmenter: Send + Sync {
    fn segment(&self, image: &RgbImage, params: SegmentationParams) -> Result<Segmentation>;
}

impl<S: Segmenter + ?Sized> Segmenter for Box<S> {
    fn segment(&self, image: &RgbImage, params: SegmentationParams) -> Result<Segmentation> {
        (**self).segment(image, params)
    }
}

/// Treats the input as already segmented
///
/// Pixels are returned unchanged; regions are the 4-connected runs of
/// identical color.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Segmenter for Passthrough {
    fn segment(&self, image: &RgbImage, _params: SegmentationParams) -> Result<Segmentation> {
        let (labels, region_count) = label_regions(image, 0);
        Ok(Segmentation {
            image: image.clone(),
            labels,
            region_count,
        })
    }
}

/// Label 4-connected regions by breadth-first region growing
///
/// Neighboring pixels join the same region when no channel differs by more
/// than `tolerance`. Labels are assigned in row-major order of each
/// region's first pixel.
pub(crate) fn label_regions(image: &RgbImage, tolerance: u8) -> (Vec<u32>, usize) {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut labels = vec![u32::MAX; width * height];
    let mut queue = VecDeque::new();
    let mut next_label = 0u32;

    for start in 0..labels.len() {
        if labels[start] != u32::MAX {
            continue;
        }

        labels[start] = next_label;
        queue.push_back(start);

        while let Some(index) = queue.pop_front() {
            let (x, y) = (index % width, index / width);
            let color = image.get_pixel(x as u32, y as u32).0;

            for neighbor in neighbors(x, y, width, height) {
                if labels[neighbor] != u32::MAX {
                    continue;
                }
                let other = image
                    .get_pixel((neighbor % width) as u32, (neighbor / width) as u32)
                    .0;
                if within(color, other, tolerance) {
                    labels[neighbor] = next_label;
                    queue.push_back(neighbor);
                }
            }
        }

        next_label += 1;
    }

    (labels, next_label as usize)
}

/// Row-major indices of the 4-connected neighbors of `(x, y)`
pub(crate) fn neighbors(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = usize> {
    let left = (x > 0).then(|| y * width + x - 1);
    let right = (x + 1 < width).then(|| y * width + x + 1);
    let up = (y > 0).then(|| (y - 1) * width + x);
    let down = (y + 1 < height).then(|| (y + 1) * width + x);
    [left, right, up, down].into_iter().flatten()
}

fn within(a: [u8; 3], b: [u8; 3], tolerance: u8) -> bool {
    a.iter().zip(b.iter()).all(|(p, q)| p.abs_diff(*q) <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_spatial_radius_formula() {
        let config = ExtractionConfig::default();

        let params = SegmentationParams::for_image(300, 225, &config);
        assert_eq!(params.spatial_radius, 10);
        assert_eq!(params.range_radius, 8);
        assert_eq!(params.min_density, 300);

        // 150 / sqrt(100) = 15
        assert_eq!(SegmentationParams::for_image(100, 400, &config).spatial_radius, 15);
        assert_eq!(SegmentationParams::for_image(0, 10, &config).spatial_radius, 0);
    }

    #[test]
    fn test_passthrough_checkerboard_regions() {
        let mut image = RgbImage::new(4, 2);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = if (x + y) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            };
        }

        let params = SegmentationParams::for_image(4, 2, &ExtractionConfig::default());
        let segmentation = Passthrough.segment(&image, params).unwrap();

        assert_eq!(segmentation.image, image);
        // no two same-colored cells touch along an edge
        assert_eq!(segmentation.region_count, 8);
        assert_eq!(segmentation.labels, (0..8).collect::<Vec<u32>>());
    }

    #[test]
    fn test_label_regions_with_tolerance() {
        let mut image = RgbImage::from_pixel(3, 1, Rgb([100, 100, 100]));
        image.put_pixel(1, 0, Rgb([103, 99, 100]));
        image.put_pixel(2, 0, Rgb([200, 10, 10]));

        let (labels, count) = label_regions(&image, 3);
        assert_eq!(labels, vec![0, 0, 1]);
        assert_eq!(count, 2);

        let (_, strict) = label_regions(&image, 0);
        assert_eq!(strict, 3);
    }

    #[test]
    fn test_boxed_segmenter() {
        let segmenter: Box<dyn Segmenter> = Box::new(Passthrough);
        let image = RgbImage::from_pixel(2, 2, Rgb([7, 8, 9]));
        let params = SegmentationParams::for_image(2, 2, &ExtractionConfig::default());
        assert_eq!(segmenter.segment(&image, params).unwrap().region_count, 1);
    }
}
