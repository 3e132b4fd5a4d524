//! Mean-shift segmentation
//!
//! Three passes over the image:
//!
//! 1. **Filtering**: every pixel climbs to the local mode of the joint
//!    position/color density, using a square spatial window and a
//!    Euclidean color bandwidth.
//! 2. **Labeling**: neighbors whose filtered colors differ by at most one
//!    level per channel are grown into regions.
//! 3. **Absorption**: regions below `min_density` pixels are merged into
//!    the adjacent region with the closest mean color, smallest first.
//!
//! Every pixel is finally painted with the mean original color of its region.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use image::{Rgb, RgbImage};

use super::{label_regions, neighbors, Segmentation, SegmentationParams, Segmenter};
use crate::Result;

/// Tolerance used when growing regions from filtered pixels
const MODE_TOLERANCE: u8 = 1;

/// Mean-shift segmenter
#[derive(Debug, Clone, Copy)]
pub struct MeanShiftSegmenter {
    max_iterations: usize,
    epsilon: f64,
}

impl Default for MeanShiftSegmenter {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            epsilon: 1.0,
        }
    }
}

impl MeanShiftSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration cap and convergence distance of the filtering pass
    pub fn with_termination(mut self, max_iterations: usize, epsilon: f64) -> Self {
        self.max_iterations = max_iterations.max(1);
        self.epsilon = epsilon;
        self
    }

    /// Move every pixel to its local density mode
    pub fn filter(&self, image: &RgbImage, params: SegmentationParams) -> RgbImage {
        let (width, height) = image.dimensions();
        let radius = i64::from(params.spatial_radius);
        let bandwidth = f64::from(params.range_radius).powi(2);
        let epsilon = self.epsilon * self.epsilon;

        let mut filtered = RgbImage::new(width, height);
        for (x0, y0, pixel) in image.enumerate_pixels() {
            let mut position = [f64::from(x0), f64::from(y0)];
            let mut color = pixel.0.map(f64::from);

            for _ in 0..self.max_iterations {
                let (cx, cy) = (position[0].round() as i64, position[1].round() as i64);
                let x_range = (cx - radius).max(0)..=(cx + radius).min(i64::from(width) - 1);
                let y_range = (cy - radius).max(0)..=(cy + radius).min(i64::from(height) - 1);

                let mut count = 0.0;
                let mut sum_position = [0.0; 2];
                let mut sum_color = [0.0; 3];
                for y in y_range {
                    for x in x_range.clone() {
                        let sample = image.get_pixel(x as u32, y as u32).0.map(f64::from);
                        if distance_squared(&sample, &color) > bandwidth {
                            continue;
                        }
                        count += 1.0;
                        sum_position[0] += x as f64;
                        sum_position[1] += y as f64;
                        for (total, value) in sum_color.iter_mut().zip(sample) {
                            *total += value;
                        }
                    }
                }

                if count == 0.0 {
                    break;
                }

                let next_position = sum_position.map(|v| v / count);
                let next_color = sum_color.map(|v| v / count);
                let shift = distance_squared(&next_position, &position)
                    + distance_squared(&next_color, &color);

                position = next_position;
                color = next_color;
                if shift <= epsilon {
                    break;
                }
            }

            filtered.put_pixel(x0, y0, Rgb(color.map(|v| v.round().clamp(0.0, 255.0) as u8)));
        }

        filtered
    }
}

impl Segmenter for MeanShiftSegmenter {
    fn segment(&self, image: &RgbImage, params: SegmentationParams) -> Result<Segmentation> {
        let filtered = self.filter(image, params);
        let (labels, initial_count) = label_regions(&filtered, MODE_TOLERANCE);

        let mut regions = Regions::collect(image, &labels, initial_count);
        regions.absorb_small(params.min_density as usize);
        let (labels, region_count) = regions.relabel(&labels);

        tracing::debug!(
            initial_regions = initial_count,
            regions = region_count,
            spatial_radius = params.spatial_radius,
            range_radius = params.range_radius,
            "mean-shift segmentation"
        );

        let colors = regions.mean_colors();
        let (width, height) = image.dimensions();
        let painted = RgbImage::from_fn(width, height, |x, y| {
            let index = y as usize * width as usize + x as usize;
            Rgb(colors[labels[index] as usize])
        });

        Ok(Segmentation {
            image: painted,
            labels,
            region_count,
        })
    }
}

/// Region statistics with a union-find over merged regions
struct Regions {
    size: Vec<usize>,
    sum: Vec<[u64; 3]>,
    parent: Vec<usize>,
    adjacent: Vec<BTreeSet<usize>>,
}

impl Regions {
    fn collect(image: &RgbImage, labels: &[u32], count: usize) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let mut size = vec![0; count];
        let mut sum = vec![[0u64; 3]; count];
        let mut adjacent = vec![BTreeSet::new(); count];

        for (index, pixel) in image.pixels().enumerate() {
            let region = labels[index] as usize;
            size[region] += 1;
            for (total, value) in sum[region].iter_mut().zip(pixel.0) {
                *total += u64::from(value);
            }
            for neighbor in neighbors(index % width, index / width, width, height) {
                let other = labels[neighbor] as usize;
                if other != region {
                    adjacent[region].insert(other);
                }
            }
        }

        Self {
            size,
            sum,
            parent: (0..count).collect(),
            adjacent,
        }
    }

    fn find(&mut self, region: usize) -> usize {
        let mut root = region;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = region;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn mean(&self, region: usize) -> [f64; 3] {
        let size = self.size[region].max(1) as f64;
        self.sum[region].map(|v| v as f64 / size)
    }

    /// Merge undersized regions into their closest-colored neighbor
    fn absorb_small(&mut self, min_density: usize) {
        let mut pending: BinaryHeap<Reverse<(usize, usize)>> = (0..self.size.len())
            .filter(|&region| self.size[region] < min_density)
            .map(|region| Reverse((self.size[region], region)))
            .collect();

        while let Some(Reverse((size, region))) = pending.pop() {
            // stale entry: merged away or grown since it was queued
            if self.parent[region] != region || self.size[region] != size {
                continue;
            }

            let color = self.mean(region);
            let target = self.adjacent[region]
                .iter()
                .map(|&other| (distance_squared(&self.mean(other), &color), other))
                .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                .map(|(_, other)| other);

            // a lone region covering the whole image has nowhere to go
            let Some(target) = target else { continue };

            self.merge(region, target);
            if self.size[target] < min_density {
                pending.push(Reverse((self.size[target], target)));
            }
        }
    }

    fn merge(&mut self, region: usize, target: usize) {
        self.parent[region] = target;
        self.size[target] += self.size[region];
        let sum = self.sum[region];
        for (total, value) in self.sum[target].iter_mut().zip(sum) {
            *total += value;
        }

        let moved = std::mem::take(&mut self.adjacent[region]);
        for other in moved {
            self.adjacent[other].remove(&region);
            if other != target {
                self.adjacent[other].insert(target);
                self.adjacent[target].insert(other);
            }
        }
        self.adjacent[target].remove(&region);
    }

    /// Compact surviving regions to `0..n` in row-major first-pixel order
    fn relabel(&mut self, labels: &[u32]) -> (Vec<u32>, usize) {
        let mut compact = vec![u32::MAX; self.parent.len()];
        let mut next = 0u32;
        let mut relabeled = Vec::with_capacity(labels.len());

        for &label in labels {
            let root = self.find(label as usize);
            if compact[root] == u32::MAX {
                compact[root] = next;
                next += 1;
            }
            relabeled.push(compact[root]);
        }

        // keep the root statistics addressable by compact label
        let mut size = vec![0; next as usize];
        let mut sum = vec![[0u64; 3]; next as usize];
        for (root, &label) in compact.iter().enumerate() {
            if label != u32::MAX {
                size[label as usize] = self.size[root];
                sum[label as usize] = self.sum[root];
            }
        }
        self.size = size;
        self.sum = sum;

        (relabeled, next as usize)
    }

    fn mean_colors(&self) -> Vec<[u8; 3]> {
        (0..self.size.len())
            .map(|region| self.mean(region).map(|v| v.round().clamp(0.0, 255.0) as u8))
            .collect()
    }
}

fn distance_squared<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    a.iter().zip(b.iter()).map(|(p, q)| (p - q).powi(2)).sum()
}
