// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tactus — Core types, error definitions, configuration, and the Braille
// label table shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod labels;
pub mod types;

pub use config::PipelineConfig;
pub use error::TactusError;
pub use labels::{LabelEntry, LabelTable};
pub use types::*;
