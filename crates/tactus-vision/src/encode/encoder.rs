// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text → Braille encoding through the shared label table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tactus_core::error::{Result, TactusError};
use tactus_core::labels::LabelTable;
use tactus_core::types::{BoundingBox, Detection, SymbolId};
use tracing::{debug, instrument};

/// Unicode blank Braille pattern, used for word spaces.
pub const BLANK_CELL: char = '\u{2800}';

/// One encoded symbol: its id in the table and its Braille cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrailleSymbol {
    pub id: SymbolId,
    pub cell: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncodedToken {
    Symbol(BrailleSymbol),
    /// A run of whitespace in the input.
    Space,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedLine {
    pub tokens: Vec<EncodedToken>,
}

impl EncodedLine {
    pub fn symbols(&self) -> impl Iterator<Item = &BrailleSymbol> {
        self.tokens.iter().filter_map(|token| match token {
            EncodedToken::Symbol(symbol) => Some(symbol),
            EncodedToken::Space => None,
        })
    }

    /// Render as a string of Braille cells, spaces as [`BLANK_CELL`].
    pub fn to_cells(&self) -> String {
        let mut cells = String::new();
        for token in &self.tokens {
            match token {
                EncodedToken::Symbol(symbol) => cells.push_str(&symbol.cell),
                EncodedToken::Space => cells.push(BLANK_CELL),
            }
        }
        cells
    }
}

/// Encodes text into Braille using the same table recognition decodes with.
#[derive(Debug, Clone)]
pub struct BrailleEncoder {
    table: Arc<LabelTable>,
}

impl BrailleEncoder {
    pub fn new(table: Arc<LabelTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LabelTable {
        &self.table
    }

    /// Tokenize `text` line by line.
    ///
    /// Lines split on `\n` (a trailing `\r` is dropped). Within a line the
    /// longest table token matching at each position wins, and each
    /// whitespace run becomes one [`EncodedToken::Space`]. The first
    /// character no table token covers fails with
    /// [`TactusError::UnencodableText`], with 1-based line and column counted
    /// in characters.
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn encode(&self, text: &str) -> Result<Vec<EncodedLine>> {
        let lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| self.encode_line(line, index + 1))
            .collect::<Result<Vec<_>>>()?;
        debug!(lines = lines.len(), "text encoded");
        Ok(lines)
    }

    /// Encode and render every line as cells, joined with `\n`.
    pub fn encode_to_cells(&self, text: &str) -> Result<String> {
        let lines = self.encode(text)?;
        Ok(lines
            .iter()
            .map(EncodedLine::to_cells)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn encode_line(&self, line: &str, line_number: usize) -> Result<EncodedLine> {
        let mut tokens = Vec::new();
        let mut rest = line;
        let mut column = 1;

        while let Some(first) = rest.chars().next() {
            if first.is_whitespace() {
                let run = rest
                    .find(|c: char| !c.is_whitespace())
                    .unwrap_or(rest.len());
                column += rest[..run].chars().count();
                rest = &rest[run..];
                tokens.push(EncodedToken::Space);
                continue;
            }

            let (id, len) =
                self.table
                    .longest_prefix(rest)
                    .ok_or_else(|| TactusError::UnencodableText {
                        token: first.to_string(),
                        line: line_number,
                        column,
                    })?;
            tokens.push(EncodedToken::Symbol(BrailleSymbol {
                id,
                cell: self.table.cell(id)?.to_owned(),
            }));
            column += rest[..len].chars().count();
            rest = &rest[len..];
        }

        Ok(EncodedLine { tokens })
    }
}

/// Layout of a virtual page for [`synthetic_detections`], in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellGeometry {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    /// Horizontal advance per token, including spaces.
    pub cell_pitch: f32,
    /// Vertical advance per line. Keep it above the reconstruction
    /// tolerance or neighbouring lines merge.
    pub line_pitch: f32,
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self {
            origin_x: 20.0,
            origin_y: 20.0,
            cell_width: 30.0,
            cell_height: 40.0,
            cell_pitch: 40.0,
            line_pitch: 140.0,
        }
    }
}

/// Place encoded lines on a virtual page as detections.
///
/// Spaces advance the pen without producing a detection, and every line
/// advances by one line pitch even when it holds no symbols.
pub fn synthetic_detections(lines: &[EncodedLine], geometry: CellGeometry) -> Vec<Detection> {
    let mut detections = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let y = geometry.origin_y + row as f32 * geometry.line_pitch;
        for (column, token) in line.tokens.iter().enumerate() {
            if let EncodedToken::Symbol(symbol) = token {
                let x = geometry.origin_x + column as f32 * geometry.cell_pitch;
                detections.push(Detection::new(
                    symbol.id,
                    BoundingBox::from_origin_size(x, y, geometry.cell_width, geometry.cell_height),
                    1.0,
                ));
            }
        }
    }
    detections
}
