// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Normalization pipeline — grayscale, smoothing, adaptive binarization, and
// morphological cleanup ahead of symbol detection.

pub mod filters;
pub mod normalizer;

pub use normalizer::{ImageNormalizer, NormalizedImage};
