// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text assembly — turns reconstructed lines into output text and layout
// metadata using the label table.

use std::sync::Arc;

use tactus_core::error::Result;
use tactus_core::labels::LabelTable;
use tactus_core::types::{LayoutLine, LayoutSymbol, Line};
use tracing::{debug, instrument};

/// Maps detected labels to text through a shared [`LabelTable`].
#[derive(Debug, Clone)]
pub struct TextAssembler {
    table: Arc<LabelTable>,
}

impl TextAssembler {
    pub fn new(table: Arc<LabelTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LabelTable {
        &self.table
    }

    /// Serialize lines to text.
    ///
    /// Every symbol is followed by one space, including the last one on a
    /// line, and every line ends with `\n`, including the last line:
    /// `[[A, B], [C]]` becomes `"A B \nC \n"`. Existing consumers compare
    /// output byte for byte, so the trailing spaces stay.
    ///
    /// A label outside the table aborts with
    /// [`TactusError::UnknownSymbol`](tactus_core::TactusError::UnknownSymbol)
    /// rather than silently dropping the symbol.
    #[instrument(skip_all, fields(lines = lines.len()))]
    pub fn assemble(&self, lines: &[Line]) -> Result<String> {
        let mut text = String::new();
        for line in lines {
            for label in line.labels() {
                text.push_str(self.table.text(label)?);
                text.push(' ');
            }
            text.push('\n');
        }
        debug!(bytes = text.len(), "text assembled");
        Ok(text)
    }

    /// Per-line symbols with their text and original boxes.
    pub fn layout(&self, lines: &[Line]) -> Result<Vec<LayoutLine>> {
        lines
            .iter()
            .map(|line| {
                let symbols = line
                    .detections
                    .iter()
                    .map(|d| {
                        Ok(LayoutSymbol {
                            label: d.label,
                            text: self.table.text(d.label)?.to_owned(),
                            bbox: d.bbox,
                            confidence: d.confidence,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(LayoutLine { symbols })
            })
            .collect()
    }
}
