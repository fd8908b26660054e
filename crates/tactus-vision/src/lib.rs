// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tactus-vision — Braille recognition and encoding for Tactus.
//
// Normalizes photographed or scanned Braille pages, reconstructs reading
// order from symbol detections, assembles text through the label table, and
// encodes text back into Braille cells. Batches run on a bounded tokio pool.

pub mod encode;
pub mod normalize;
pub mod recognize;

// Re-export the primary types so callers can use `tactus_vision::Recognizer` etc.
pub use encode::{BrailleEncoder, CellGeometry, EncodedLine, EncodedToken, synthetic_detections};
pub use normalize::{ImageNormalizer, NormalizedImage};
pub use recognize::{
    ImageOutcome, LineReconstructor, Recognizer, SidecarDetector, StaticDetector, SymbolDetector,
    TextAssembler, recognize_batch,
};
