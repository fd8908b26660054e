// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image normalization — conditions a raw photograph of Braille for symbol
// detection: grayscale, Gaussian smoothing, and optional adaptive
// binarization with morphological cleanup.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use tactus_core::config::NormalizeConfig;
use tactus_core::error::{Result, TactusError};
use tracing::{debug, info, instrument};

use super::filters::{BorderMode, adaptive_threshold_gaussian, gaussian_blur};

/// A single-channel image ready for the symbol detector.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    source: String,
    image: GrayImage,
}

impl NormalizedImage {
    pub fn new(source: impl Into<String>, image: GrayImage) -> Self {
        Self {
            source: source.into(),
            image,
        }
    }

    /// Path or name of the image this buffer was derived from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_gray(self) -> GrayImage {
        self.image
    }
}

/// Converts raw images into [`NormalizedImage`]s.
///
/// The caller's image is never modified; every step produces a new buffer.
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    config: NormalizeConfig,
}

impl ImageNormalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    // -- Entry points ---------------------------------------------------------

    /// Decode and normalize an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn normalize_path(&self, path: impl AsRef<Path>) -> Result<NormalizedImage> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let image = image::open(path).map_err(|err| TactusError::ImageLoad {
            source_name: source.clone(),
            reason: err.to_string(),
        })?;
        info!(
            width = image.width(),
            height = image.height(),
            "Braille image loaded"
        );
        Ok(self.normalize(&image, source))
    }

    /// Decode and normalize encoded image bytes (JPEG, PNG, etc.).
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn normalize_bytes(&self, data: &[u8], source: &str) -> Result<NormalizedImage> {
        let image = image::load_from_memory(data).map_err(|err| TactusError::ImageLoad {
            source_name: source.to_owned(),
            reason: err.to_string(),
        })?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Braille image decoded from bytes"
        );
        Ok(self.normalize(&image, source))
    }

    /// Run the normalization pipeline on a decoded image.
    ///
    /// 1. Grayscale (single-channel 8-bit input passes through untouched)
    /// 2. Gaussian smoothing with a fixed kernel, edges mirrored
    /// 3. Optional adaptive Gaussian binarization
    /// 4. Optional morphological opening, then closing (binarized output only)
    #[instrument(skip_all, fields(source = %source.as_ref(), binarize = self.config.binarize))]
    pub fn normalize(&self, image: &DynamicImage, source: impl AsRef<str>) -> NormalizedImage {
        let gray = to_grayscale(image);
        let mut output = gaussian_blur(&gray, self.config.blur_kernel, BorderMode::Reflect101);
        debug!(kernel = self.config.blur_kernel, "Gaussian smoothing applied");

        if self.config.binarize {
            output = adaptive_threshold_gaussian(
                &output,
                self.config.threshold_block_size,
                self.config.threshold_offset,
            );
            debug!(
                block_size = self.config.threshold_block_size,
                offset = self.config.threshold_offset,
                "Adaptive binarization applied"
            );

            if self.config.morphology {
                output = clean_up(&output);
                debug!("Morphological open + close applied");
            }
        }

        NormalizedImage::new(source.as_ref(), output)
    }
}

/// Single-channel copy of `image`.
fn to_grayscale(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        other => other.to_luma8(),
    }
}

/// Opening removes white speckle, then closing fills small holes in what is
/// left. A 3x3 square element is the L-infinity ball of radius 1.
fn clean_up(binary: &GrayImage) -> GrayImage {
    let opened = morphology::open(binary, Norm::LInf, 1);
    morphology::close(&opened, Norm::LInf, 1)
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn ramp(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| Luma([(x * 3) as u8]))
    }

    #[test]
    fn color_input_becomes_single_channel() {
        let rgb = RgbImage::from_pixel(12, 8, Rgb([200, 200, 200]));
        let out = ImageNormalizer::default().normalize(&DynamicImage::ImageRgb8(rgb), "rgb");

        assert_eq!(out.width(), 12);
        assert_eq!(out.height(), 8);
        assert!(out.as_gray().pixels().all(|p| p.0[0] == 200));
        assert_eq!(out.source(), "rgb");
    }

    #[test]
    fn caller_image_is_not_modified() {
        let mut gray = GrayImage::from_pixel(10, 10, Luma([10u8]));
        gray.put_pixel(5, 5, Luma([250u8]));
        let original = DynamicImage::ImageLuma8(gray);
        let before = original.clone();

        let _ = ImageNormalizer::default().normalize(&original, "in-memory");
        assert_eq!(original, before);
    }

    #[test]
    fn normalization_is_stable_on_smoothed_input() {
        let normalizer = ImageNormalizer::default();
        let once = normalizer.normalize(&DynamicImage::ImageLuma8(ramp(64, 16)), "ramp");
        let twice = normalizer.normalize(&DynamicImage::ImageLuma8(once.as_gray().clone()), "ramp");

        let max_drift = once
            .as_gray()
            .pixels()
            .zip(twice.as_gray().pixels())
            .map(|(a, b)| (a.0[0] as i32 - b.0[0] as i32).abs())
            .max()
            .unwrap_or(0);
        assert!(max_drift <= 1, "drift {max_drift} exceeds rounding error");
    }

    #[test]
    fn smoothing_mirrors_at_the_image_edge() {
        let mut gray = GrayImage::from_pixel(9, 1, Luma([0u8]));
        gray.put_pixel(0, 0, Luma([255u8]));
        let out = ImageNormalizer::default()
            .normalize(&DynamicImage::ImageLuma8(gray), "edge")
            .into_gray();
        assert_eq!(out.get_pixel(0, 0).0[0], 94);
        assert_eq!(out.get_pixel(1, 0).0[0], 62);
    }

    #[test]
    fn default_path_does_not_binarize() {
        let out = ImageNormalizer::default().normalize(&DynamicImage::ImageLuma8(ramp(40, 4)), "ramp");
        assert!(out.as_gray().pixels().any(|p| p.0[0] != 0 && p.0[0] != 255));
    }

    #[test]
    fn binarized_output_is_two_level_with_dark_dots() {
        let mut gray = GrayImage::from_pixel(48, 48, Luma([220u8]));
        for y in 20..27 {
            for x in 20..27 {
                gray.put_pixel(x, y, Luma([20u8]));
            }
        }
        let config = NormalizeConfig {
            binarize: true,
            ..NormalizeConfig::default()
        };
        let out = ImageNormalizer::new(config).normalize(&DynamicImage::ImageLuma8(gray), "dot");

        assert!(out.as_gray().pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(out.as_gray().get_pixel(23, 23).0[0], 0);
        assert_eq!(out.as_gray().get_pixel(3, 3).0[0], 255);
    }

    #[test]
    fn opening_then_closing_removes_isolated_white_pixel() {
        let mut binary = GrayImage::from_pixel(9, 9, Luma([0u8]));
        binary.put_pixel(4, 4, Luma([255u8]));
        let cleaned = clean_up(&binary);
        assert!(cleaned.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn closing_fills_pinhole_in_foreground() {
        let mut binary = GrayImage::from_pixel(9, 9, Luma([255u8]));
        binary.put_pixel(4, 4, Luma([0u8]));
        let cleaned = clean_up(&binary);
        assert_eq!(cleaned.get_pixel(4, 4).0[0], 255);
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"definitely not a png").expect("write fixture");

        let err = ImageNormalizer::default().normalize_path(&path).unwrap_err();
        match err {
            TactusError::ImageLoad { source_name, .. } => {
                assert!(source_name.ends_with("not-an-image.png"));
            }
            other => panic!("expected ImageLoad, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_bytes_are_an_image_load_error() {
        let err = ImageNormalizer::default()
            .normalize_bytes(b"\x00\x01\x02", "upload-7")
            .unwrap_err();
        assert!(err.to_string().contains("upload-7"));
    }

    #[test]
    fn png_bytes_round_trip_through_decoder() {
        let gray = GrayImage::from_pixel(6, 6, Luma([128u8]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(gray)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");

        let out = ImageNormalizer::default()
            .normalize_bytes(&bytes, "mem.png")
            .expect("png should decode");
        assert!(out.as_gray().pixels().all(|p| p.0[0] == 128));
    }
}
