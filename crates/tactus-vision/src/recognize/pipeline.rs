// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-image recognition pipeline:
// raw image → normalize → detect → reconstruct lines → assemble text.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use image::DynamicImage;
use tactus_core::config::PipelineConfig;
use tactus_core::error::Result;
use tactus_core::labels::LabelTable;
use tactus_core::types::{Detection, Recognition, RecognitionId};
use tracing::{info, instrument};

use super::assemble::TextAssembler;
use super::detector::SymbolDetector;
use super::reconstruct::LineReconstructor;
use crate::normalize::{ImageNormalizer, NormalizedImage};

/// Runs the full recognition pipeline for one image at a time.
///
/// Cheap to clone; the label table and detector are shared. Holds no
/// per-image state, so one instance can serve many workers.
#[derive(Clone)]
pub struct Recognizer {
    normalizer: ImageNormalizer,
    reconstructor: LineReconstructor,
    assembler: TextAssembler,
    detector: Arc<dyn SymbolDetector>,
}

impl Recognizer {
    pub fn new(
        config: &PipelineConfig,
        table: Arc<LabelTable>,
        detector: Arc<dyn SymbolDetector>,
    ) -> Self {
        Self {
            normalizer: ImageNormalizer::new(config.normalize.clone()),
            reconstructor: LineReconstructor::new(config.reconstruct.clone()),
            assembler: TextAssembler::new(table),
            detector,
        }
    }

    pub fn table(&self) -> &LabelTable {
        self.assembler.table()
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Recognise the Braille in an image file.
    ///
    /// Any failure is scoped to `path` so the message names the image.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), detector = self.detector.name()))]
    pub fn recognize_path(&self, path: impl AsRef<Path>) -> Result<Recognition> {
        let source = path.as_ref().display().to_string();
        self.normalizer
            .normalize_path(path.as_ref())
            .and_then(|normalized| self.recognize_normalized(&normalized))
            .map_err(|err| err.in_image(&source))
    }

    /// Recognise an already-decoded image.
    pub fn recognize_image(&self, image: &DynamicImage, source: &str) -> Result<Recognition> {
        let normalized = self.normalizer.normalize(image, source);
        self.recognize_normalized(&normalized)
            .map_err(|err| err.in_image(source))
    }

    /// Detect, reconstruct, and assemble from a normalized image.
    pub fn recognize_normalized(&self, image: &NormalizedImage) -> Result<Recognition> {
        let detections = self.detector.detect(image)?;
        self.recognize_detections(image.source(), &detections)
    }

    /// Reconstruct and assemble from detections produced elsewhere.
    #[instrument(skip(self, detections), fields(detections = detections.len()))]
    pub fn recognize_detections(&self, source: &str, detections: &[Detection]) -> Result<Recognition> {
        let lines = self.reconstructor.reconstruct(detections)?;
        let text = self.assembler.assemble(&lines)?;
        let layout = self.assembler.layout(&lines)?;

        info!(
            lines = lines.len(),
            symbols = detections.len(),
            "Braille recognised"
        );

        Ok(Recognition {
            id: RecognitionId::new(),
            source: source.to_owned(),
            text,
            lines: layout,
            detection_count: detections.len(),
            table_fingerprint: self.table().fingerprint().to_owned(),
            recognized_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognize::detector::StaticDetector;
    use image::{GrayImage, Luma};
    use tactus_core::error::TactusError;
    use tactus_core::labels::LabelEntry;
    use tactus_core::types::{BoundingBox, SymbolId};

    fn abc_table() -> Arc<LabelTable> {
        let entries = [("A", "⠁"), ("B", "⠃"), ("C", "⠉")]
            .iter()
            .map(|(text, cell)| LabelEntry {
                text: (*text).into(),
                cell: (*cell).into(),
            })
            .collect();
        Arc::new(LabelTable::from_entries("abc", entries).unwrap())
    }

    fn det(label: u32, x1: f32, y1: f32) -> Detection {
        Detection::new(
            SymbolId(label),
            BoundingBox::from_origin_size(x1, y1, 30.0, 40.0),
            0.95,
        )
    }

    fn recognizer(detections: Vec<Detection>) -> Recognizer {
        Recognizer::new(
            &PipelineConfig::default(),
            abc_table(),
            Arc::new(StaticDetector::new(detections)),
        )
    }

    fn page() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 240, Luma([230u8])))
    }

    #[test]
    fn two_row_page_end_to_end() {
        let recognizer = recognizer(vec![det(2, 10.0, 150.0), det(1, 50.0, 12.0), det(0, 10.0, 10.0)]);
        let result = recognizer.recognize_image(&page(), "synthetic").unwrap();

        assert_eq!(result.text, "A B \nC \n");
        assert_eq!(result.detection_count, 3);
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].symbols[1].text, "B");
        assert_eq!(result.source, "synthetic");
        assert_eq!(result.table_fingerprint, recognizer.table().fingerprint());
        assert_eq!(recognizer.detector_name(), "static");
    }

    #[test]
    fn failure_names_the_image() {
        let recognizer = recognizer(vec![det(9, 0.0, 0.0)]);
        let err = recognizer.recognize_image(&page(), "page-4.png").unwrap_err();
        assert!(err.to_string().starts_with("image page-4.png: "));
        assert!(matches!(err.root(), TactusError::UnknownSymbol { .. }));
    }

    #[test]
    fn missing_file_is_scoped_image_load_error() {
        let err = recognizer(vec![])
            .recognize_path("/nonexistent/braille.jpg")
            .unwrap_err();
        assert!(matches!(err.root(), TactusError::ImageLoad { .. }));
        assert!(err.to_string().contains("/nonexistent/braille.jpg"));
    }

    #[test]
    fn empty_detection_set_is_empty_text() {
        let result = recognizer(vec![]).recognize_image(&page(), "blank").unwrap();
        assert_eq!(result.text, "");
        assert!(result.lines.is_empty());
    }

    #[test]
    fn recognition_serializes_with_layout() {
        let result = recognizer(vec![det(0, 10.0, 10.0)])
            .recognize_detections("json", &[det(0, 10.0, 10.0)])
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["text"], "A \n");
        assert_eq!(json["lines"][0]["symbols"][0]["label"], 0);
        assert_eq!(json["lines"][0]["symbols"][0]["bbox"]["x1"], 10.0);
    }
}
