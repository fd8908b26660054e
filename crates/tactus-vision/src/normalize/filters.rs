// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-size Gaussian smoothing and Gaussian-weighted adaptive thresholding
// on 8-bit grayscale buffers.

use image::imageops::crop_imm;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;

type FloatImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// How pixels beyond the image edge are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// Mirror without repeating the edge pixel: `dcb|abcd|cba`.
    Reflect101,
    /// Repeat the edge pixel: `aaa|abcd|ddd`.
    Replicate,
}

/// Sigma derived from a kernel size when none is given.
///
/// `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`, so a 5-tap kernel gets 1.1 and a
/// 15-tap kernel gets 2.6.
pub fn auto_sigma(ksize: u32) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian kernel with `ksize` taps (odd).
pub fn gaussian_kernel(ksize: u32) -> Vec<f32> {
    let sigma = auto_sigma(ksize);
    let half = (ksize / 2) as i32;
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Separable `ksize` x `ksize` Gaussian blur.
///
/// Filtering runs in `f32` and is rounded to nearest once at the end, so
/// uniform regions are preserved exactly.
pub fn gaussian_blur(src: &GrayImage, ksize: u32, border: BorderMode) -> GrayImage {
    let (width, height) = src.dimensions();
    if width == 0 || height == 0 {
        return src.clone();
    }
    let smoothed = smooth(src, &gaussian_kernel(ksize), border);
    GrayImage::from_fn(width, height, |x, y| {
        Luma([smoothed.get_pixel(x, y).0[0].round().clamp(0.0, 255.0) as u8])
    })
}

fn smooth(src: &GrayImage, kernel: &[f32], border: BorderMode) -> FloatImage {
    let (width, height) = src.dimensions();
    match border {
        // imageproc pads by continuity, which is replication.
        BorderMode::Replicate => {
            let float = FloatImage::from_fn(width, height, |x, y| {
                Luma([src.get_pixel(x, y).0[0] as f32])
            });
            separable_filter_equal(&float, kernel)
        }
        BorderMode::Reflect101 => {
            let radius = (kernel.len() / 2) as u32;
            let padded = FloatImage::from_fn(width + 2 * radius, height + 2 * radius, |x, y| {
                let sx = reflect_101(x as i64 - radius as i64, width);
                let sy = reflect_101(y as i64 - radius as i64, height);
                Luma([src.get_pixel(sx, sy).0[0] as f32])
            });
            let filtered = separable_filter_equal(&padded, kernel);
            crop_imm(&filtered, radius, radius, width, height).to_image()
        }
    }
}

/// Map a possibly out-of-range coordinate into `0..len` by reflection.
fn reflect_101(index: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let folded = index.rem_euclid(period);
    (if folded < len { folded } else { period - folded }) as u32
}

/// Binarize against a Gaussian-weighted local mean.
///
/// A pixel becomes 255 when `pixel - mean > -ceil(offset)` and 0 otherwise,
/// where `mean` is the `block_size` x `block_size` Gaussian-weighted
/// neighbourhood mean, taken with replicated borders.
pub fn adaptive_threshold_gaussian(src: &GrayImage, block_size: u32, offset: f32) -> GrayImage {
    let mean = gaussian_blur(src, block_size, BorderMode::Replicate);
    let delta = offset.ceil() as i32;
    let (width, height) = src.dimensions();

    let mut output = GrayImage::new(width, height);
    for (x, y, pixel) in src.enumerate_pixels() {
        let local = mean.get_pixel(x, y).0[0] as i32;
        let value = if pixel.0[0] as i32 - local > -delta {
            255u8
        } else {
            0u8
        };
        output.put_pixel(x, y, Luma([value]));
    }
    output
}
