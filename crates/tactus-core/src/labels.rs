// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label table — maps detector class indices to text and Braille cells.
//
// The table is loaded once (built-in resource or a JSON file) and is
// read-only afterwards. Share it across workers behind an `Arc`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use crate::error::{Result, TactusError};
use crate::types::SymbolId;

/// Built-in Portuguese grade 1 table.
const BUILTIN_TABLE_JSON: &str = include_str!("../resources/labels.json");

/// One row of the label table. Its position in the table is its [`SymbolId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    /// Textual representation (what recognition outputs).
    pub text: String,
    /// Unicode Braille cell(s) (what encoding outputs).
    pub cell: String,
}

/// On-disk shape of a label table file.
#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    name: Option<String>,
    labels: Vec<LabelEntry>,
}

/// Immutable mapping between symbol indices, text tokens, and Braille cells.
#[derive(Debug, Clone)]
pub struct LabelTable {
    name: String,
    entries: Vec<LabelEntry>,
    by_text: HashMap<String, SymbolId>,
    /// Length in chars of the longest text token.
    max_token_chars: usize,
    fingerprint: String,
}

impl LabelTable {
    /// The table bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLE_JSON)
    }

    /// Load a table from a JSON file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|err| {
            TactusError::LabelTable(format!("cannot read {}: {err}", path.display()))
        })?;
        let table = Self::from_json(&data)?;
        info!(
            name = %table.name,
            entries = table.len(),
            fingerprint = %table.fingerprint,
            "label table loaded"
        );
        Ok(table)
    }

    /// Parse a table from its JSON representation.
    pub fn from_json(data: &str) -> Result<Self> {
        let file: TableFile = serde_json::from_str(data)
            .map_err(|err| TactusError::LabelTable(format!("malformed table: {err}")))?;
        Self::from_entries(file.name.unwrap_or_else(|| "unnamed".into()), file.labels)
    }

    /// Build a table from entries; entry `i` gets `SymbolId(i)`.
    pub fn from_entries(name: impl Into<String>, entries: Vec<LabelEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(TactusError::LabelTable("table has no entries".into()));
        }
        let mut by_text = HashMap::with_capacity(entries.len());
        let mut max_token_chars = 0;
        for (index, entry) in entries.iter().enumerate() {
            if entry.text.is_empty() {
                return Err(TactusError::LabelTable(format!(
                    "entry {index} has empty text"
                )));
            }
            if entry.text.chars().any(char::is_whitespace) {
                return Err(TactusError::LabelTable(format!(
                    "entry {index} text {:?} contains whitespace",
                    entry.text
                )));
            }
            let id = SymbolId(index as u32);
            if let Some(previous) = by_text.insert(entry.text.clone(), id) {
                return Err(TactusError::LabelTable(format!(
                    "text {:?} appears at both {previous} and {index}",
                    entry.text
                )));
            }
            max_token_chars = max_token_chars.max(entry.text.chars().count());
        }

        let fingerprint = fingerprint_entries(&entries);
        let table = Self {
            name: name.into(),
            entries,
            by_text,
            max_token_chars,
            fingerprint,
        };
        debug!(name = %table.name, entries = table.len(), "label table built");
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowercase hex SHA-256 over the table contents.
    ///
    /// Two tables with the same entries in the same order share a fingerprint
    /// regardless of their names.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn get(&self, id: SymbolId) -> Option<&LabelEntry> {
        self.entries.get(id.index())
    }

    /// Text for `id`, or [`TactusError::UnknownSymbol`].
    pub fn text(&self, id: SymbolId) -> Result<&str> {
        self.entry(id).map(|entry| entry.text.as_str())
    }

    /// Braille cell for `id`, or [`TactusError::UnknownSymbol`].
    pub fn cell(&self, id: SymbolId) -> Result<&str> {
        self.entry(id).map(|entry| entry.cell.as_str())
    }

    /// Exact reverse lookup of a text token.
    pub fn lookup_text(&self, token: &str) -> Option<SymbolId> {
        self.by_text.get(token).copied()
    }

    /// Longest table token that prefixes `input`.
    ///
    /// Returns the symbol and the byte length of the matched prefix.
    pub fn longest_prefix(&self, input: &str) -> Option<(SymbolId, usize)> {
        let boundaries: Vec<usize> = input
            .char_indices()
            .map(|(i, _)| i)
            .skip(1)
            .chain(std::iter::once(input.len()))
            .take(self.max_token_chars)
            .collect();
        boundaries
            .iter()
            .rev()
            .find_map(|&end| self.lookup_text(&input[..end]).map(|id| (id, end)))
    }

    /// All entries with their ids, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &LabelEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (SymbolId(i as u32), entry))
    }

    fn entry(&self, id: SymbolId) -> Result<&LabelEntry> {
        self.get(id).ok_or_else(|| TactusError::UnknownSymbol {
            label: id,
            table_len: self.entries.len(),
        })
    }
}

fn fingerprint_entries(entries: &[LabelEntry]) -> String {
    let mut hasher = Sha256::new();
    for entry in entries {
        hasher.update(entry.text.as_bytes());
        hasher.update([0x1f]);
        hasher.update(entry.cell.as_bytes());
        hasher.update([0x1e]);
    }
    hex::encode(hasher.finalize())
}
