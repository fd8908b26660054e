// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Braille recognition and encoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Index into the label table, as emitted by the symbol detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Position of this symbol in the label table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis-aligned bounding box in pixel coordinates of the source image.
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a box from its top-left corner and size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Whether every coordinate is finite and the box has positive area.
    pub fn is_valid(&self) -> bool {
        let finite = self.x1.is_finite()
            && self.y1.is_finite()
            && self.x2.is_finite()
            && self.y2.is_finite();
        finite && self.x2 > self.x1 && self.y2 > self.y1
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

/// One labelled glyph candidate emitted by the symbol detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: SymbolId,
    pub bbox: BoundingBox,
    /// Detector confidence in `[0, 1]`. Carried through, never used for ordering.
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

impl Detection {
    pub fn new(label: SymbolId, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            label,
            bbox,
            confidence,
        }
    }
}

/// Detections judged to lie on the same horizontal text row, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// `y1` of the first detection assigned to this line.
    pub representative_y1: f32,
    pub detections: Vec<Detection>,
}

impl Line {
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Labels of this line, left to right.
    pub fn labels(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.detections.iter().map(|d| d.label)
    }
}

/// A recognised symbol with its resolved text, for overlay-drawing callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSymbol {
    pub label: SymbolId,
    pub text: String,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

/// Layout metadata for one reconstructed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLine {
    pub symbols: Vec<LayoutSymbol>,
}

/// Unique identifier for a recognition run over one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecognitionId(pub Uuid);

impl RecognitionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecognitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecognitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The result of recognising one Braille image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recognition {
    pub id: RecognitionId,
    /// Path or name of the source image.
    pub source: String,
    /// Assembled text, one line per reconstructed row.
    pub text: String,
    pub lines: Vec<LayoutLine>,
    pub detection_count: usize,
    /// SHA-256 fingerprint of the label table used for decoding.
    pub table_fingerprint: String,
    pub recognized_at: DateTime<Utc>,
}
