// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition — detections to lines to text, for one image or a batch.

pub mod assemble;
pub mod batch;
pub mod detector;
pub mod pipeline;
pub mod reconstruct;

pub use assemble::TextAssembler;
pub use batch::{ImageOutcome, recognize_batch};
pub use detector::{SIDECAR_SUFFIX, SidecarDetector, StaticDetector, SymbolDetector};
pub use pipeline::Recognizer;
pub use reconstruct::LineReconstructor;
