// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Forward direction: text to Braille cells.

pub mod encoder;

pub use encoder::{
    BrailleEncoder, BrailleSymbol, CellGeometry, EncodedLine, EncodedToken, synthetic_detections,
};
