// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Tactus.

use thiserror::Error;

use crate::types::{BoundingBox, SymbolId};

/// Top-level error type for all Tactus operations.
#[derive(Debug, Error)]
pub enum TactusError {
    // -- Recognition errors --
    #[error("failed to load image {source_name}: {reason}")]
    ImageLoad { source_name: String, reason: String },

    #[error(
        "detection #{index} has an invalid bounding box ({}, {}, {}, {}): \
         expected finite coordinates with x2 > x1 and y2 > y1",
        .bbox.x1, .bbox.y1, .bbox.x2, .bbox.y2
    )]
    InvalidDetection { index: usize, bbox: BoundingBox },

    #[error("symbol {label} is not in the label table ({table_len} entries)")]
    UnknownSymbol { label: SymbolId, table_len: usize },

    #[error("symbol detector failed: {0}")]
    Detector(String),

    // -- Forward (text → Braille) errors --
    #[error("cannot encode {token:?} at line {line}, column {column}: not in the label table")]
    UnencodableText {
        token: String,
        line: usize,
        column: usize,
    },

    // -- Resources / configuration --
    #[error("label table error: {0}")]
    LabelTable(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Batch processing --
    #[error("worker failed: {0}")]
    Worker(String),

    /// Scopes an error to the image it occurred in.
    #[error("image {image}: {source}")]
    InImage {
        image: String,
        #[source]
        source: Box<TactusError>,
    },

    // -- Storage / serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TactusError {
    /// Wrap this error so its message names the offending image.
    ///
    /// Already-scoped errors are returned unchanged.
    pub fn in_image(self, image: impl Into<String>) -> Self {
        match self {
            Self::InImage { .. } => self,
            other => Self::InImage {
                image: image.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with any image scoping removed.
    pub fn root(&self) -> &TactusError {
        match self {
            Self::InImage { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TactusError>;
