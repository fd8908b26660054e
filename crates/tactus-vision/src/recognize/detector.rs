// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Symbol detector capability.
//
// The detector model itself lives outside this crate. Anything that turns a
// normalized image into labelled boxes can plug in through `SymbolDetector`.

use std::path::{Path, PathBuf};

use tactus_core::error::{Result, TactusError};
use tactus_core::types::Detection;
use tracing::{debug, instrument};

use crate::normalize::NormalizedImage;

/// Turns a normalized image into an unordered set of labelled boxes.
///
/// Implementations are shared across batch workers, so they must be
/// `Send + Sync` and must not keep per-image state.
pub trait SymbolDetector: Send + Sync {
    /// Short name for logs (e.g. "yolo-braille-v2").
    fn name(&self) -> &str;

    /// Detect glyph candidates. No ordering or line structure is implied.
    fn detect(&self, image: &NormalizedImage) -> Result<Vec<Detection>>;
}

/// Returns the same detections for every image.
///
/// Useful for embedding pre-computed results and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    detections: Vec<Detection>,
}

impl StaticDetector {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }
}

impl SymbolDetector for StaticDetector {
    fn name(&self) -> &str {
        "static"
    }

    fn detect(&self, _image: &NormalizedImage) -> Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }
}

/// Suffix appended to an image path to find its detections file.
pub const SIDECAR_SUFFIX: &str = ".detections.json";

/// Reads detections produced by an external model run from a JSON file next
/// to each image (`page.jpg` → `page.jpg.detections.json`).
///
/// The file holds a JSON array of detections:
/// `[{"label": 0, "bbox": {"x1": 10, "y1": 10, "x2": 40, "y2": 50}, "confidence": 0.93}]`.
#[derive(Debug, Clone, Default)]
pub struct SidecarDetector;

impl SidecarDetector {
    pub fn new() -> Self {
        Self
    }

    /// Location of the detections file for `image_path`.
    pub fn sidecar_path(image_path: impl AsRef<Path>) -> PathBuf {
        let mut path = image_path.as_ref().as_os_str().to_owned();
        path.push(SIDECAR_SUFFIX);
        PathBuf::from(path)
    }
}

impl SymbolDetector for SidecarDetector {
    fn name(&self) -> &str {
        "sidecar-json"
    }

    #[instrument(skip_all, fields(source = %image.source()))]
    fn detect(&self, image: &NormalizedImage) -> Result<Vec<Detection>> {
        let path = Self::sidecar_path(image.source());
        let data = std::fs::read_to_string(&path).map_err(|err| {
            TactusError::Detector(format!(
                "cannot read detections file {}: {err}",
                path.display()
            ))
        })?;
        let detections: Vec<Detection> = serde_json::from_str(&data).map_err(|err| {
            TactusError::Detector(format!(
                "malformed detections file {}: {err}",
                path.display()
            ))
        })?;
        debug!(count = detections.len(), "detections read from sidecar");
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;
    use tactus_core::types::{BoundingBox, SymbolId};

    #[test]
    fn static_detector_returns_its_detections() {
        let det = Detection::new(SymbolId(4), BoundingBox::new(0.0, 0.0, 5.0, 5.0), 0.8);
        let detector = StaticDetector::new(vec![det]);
        let image = NormalizedImage::new("any", GrayImage::new(1, 1));
        assert_eq!(detector.detect(&image).unwrap(), vec![det]);
    }

    #[test]
    fn sidecar_path_appends_suffix() {
        assert_eq!(
            SidecarDetector::sidecar_path("/scans/page-1.jpg"),
            PathBuf::from("/scans/page-1.jpg.detections.json")
        );
    }

    #[test]
    fn sidecar_detections_are_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image_path = dir.path().join("page.png");
        std::fs::write(
            SidecarDetector::sidecar_path(&image_path),
            r#"[{"label": 2, "bbox": {"x1": 1, "y1": 2, "x2": 3, "y2": 4}, "confidence": 0.5}]"#,
        )
        .expect("write sidecar");

        let image = NormalizedImage::new(image_path.display().to_string(), GrayImage::new(1, 1));
        let detections = SidecarDetector::new().detect(&image).expect("sidecar should parse");
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, SymbolId(2));
        assert_eq!(detections[0].confidence, 0.5);
    }

    #[test]
    fn missing_sidecar_is_a_detector_error() {
        let image = NormalizedImage::new("/nonexistent/page.png", GrayImage::new(1, 1));
        let err = SidecarDetector::new().detect(&image).unwrap_err();
        assert!(matches!(err, TactusError::Detector(_)));
    }
}
