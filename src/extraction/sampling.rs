//! Downsizing, grid sampling and color counting

use std::collections::HashMap;

use image::imageops::{self, FilterType};
use image::RgbImage;

/// Frequency of each distinct sampled color, keyed by [`pack_rgb`]
pub type ColorCount = HashMap<u32, usize>;

/// Shrink an image so its longer side is at most `max_dimension`
///
/// The shorter side is scaled with integer arithmetic (truncating, never
/// below one pixel). Images already within the cap are returned unchanged.
pub fn downsize(image: RgbImage, max_dimension: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let longer = width.max(height);
    if longer <= max_dimension {
        return image;
    }

    let scale = |side: u32| {
        let scaled = u64::from(side) * u64::from(max_dimension) / u64::from(longer);
        (scaled as u32).max(1)
    };
    let (new_width, new_height) = if width >= height {
        (max_dimension, scale(height))
    } else {
        (scale(width), max_dimension)
    };

    tracing::debug!(width, height, new_width, new_height, "downsizing image");
    imageops::resize(&image, new_width, new_height, FilterType::Triangle)
}

/// Sampling stride along a dimension
pub fn stride(dimension: u32, grid: u32) -> usize {
    (dimension / grid.max(1) + 1) as usize
}

/// Sample pixel colors on a regular 2-D grid
///
/// Visits every `(x, y)` with `x` a multiple of `width / grid + 1` and `y`
/// a multiple of `height / grid + 1`, in row-major order.
pub fn sample_grid(image: &RgbImage, grid: u32) -> Vec<[u8; 3]> {
    let (width, height) = image.dimensions();
    let (stride_x, stride_y) = (stride(width, grid), stride(height, grid));

    (0..height)
        .step_by(stride_y)
        .flat_map(|y| (0..width).step_by(stride_x).map(move |x| (x, y)))
        .map(|(x, y)| image.get_pixel(x, y).0)
        .collect()
}

/// Pack an 8-bit color into an exact integer key: `R + G·256 + B·65536`
pub fn pack_rgb([r, g, b]: [u8; 3]) -> u32 {
    u32::from(r) | u32::from(g) << 8 | u32::from(b) << 16
}

/// Inverse of [`pack_rgb`]
pub fn unpack_rgb(key: u32) -> [u8; 3] {
    [key as u8, (key >> 8) as u8, (key >> 16) as u8]
}

/// Tally how often each color occurs
pub fn count_colors(samples: &[[u8; 3]]) -> ColorCount {
    let mut counts = ColorCount::new();
    for &sample in samples {
        *counts.entry(pack_rgb(sample)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_downsize_landscape() {
        let image = RgbImage::new(600, 401);
        let small = downsize(image, 300);
        assert_eq!(small.dimensions(), (300, 200));
    }

    #[test]
    fn test_downsize_portrait_and_sliver() {
        assert_eq!(downsize(RgbImage::new(450, 900), 300).dimensions(), (150, 300));
        assert_eq!(downsize(RgbImage::new(2, 1000), 300).dimensions(), (1, 300));
    }

    #[test]
    fn test_downsize_is_idempotent() {
        let image = RgbImage::from_fn(640, 480, |x, y| Rgb([x as u8, y as u8, 7]));
        let once = downsize(image, 300);
        let twice = downsize(once.clone(), 300);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_small_image_untouched() {
        let image = RgbImage::from_fn(300, 120, |x, y| Rgb([x as u8, y as u8, 1]));
        assert_eq!(downsize(image.clone(), 300), image);
    }

    #[test]
    fn test_sample_grid_strides() {
        // 100 / 40 + 1 = 3 horizontally, 10 / 40 + 1 = 1 vertically
        let image = RgbImage::from_fn(100, 10, |x, y| Rgb([x as u8, y as u8, 0]));
        let samples = sample_grid(&image, 40);

        assert_eq!(samples.len(), 34 * 10);
        assert_eq!(samples[0], [0, 0, 0]);
        assert_eq!(samples[1], [3, 0, 0]);
        assert_eq!(samples[34], [0, 1, 0]);
    }

    #[test]
    fn test_sample_grid_covers_every_row_and_column() {
        let image = RgbImage::from_fn(81, 81, |x, y| Rgb([x as u8, y as u8, 0]));
        let samples = sample_grid(&image, 40);

        // stride 3 reaches x = 78 and y = 78
        assert!(samples.contains(&[78, 78, 0]));
        assert!(samples.contains(&[78, 0, 0]));
        assert!(samples.contains(&[0, 78, 0]));
    }

    #[test]
    fn test_pack_rgb() {
        assert_eq!(pack_rgb([1, 2, 3]), 1 + 2 * 256 + 3 * 65536);
        assert_eq!(unpack_rgb(pack_rgb([250, 0, 17])), [250, 0, 17]);
    }

    #[test]
    fn test_count_colors() {
        let counts = count_colors(&[[1, 1, 1], [2, 2, 2], [1, 1, 1]]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&pack_rgb([1, 1, 1])], 2);
        assert_eq!(counts[&pack_rgb([2, 2, 2])], 1);
    }
}
