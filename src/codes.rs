//! Code table derivation from a finished Huffman tree.

use std::fmt;

use tracing::debug;

use crate::error::{CompressError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node};

/// Bit sequence assigned to one symbol. `false` is 0, `true` is 1, first bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    pub symbol: u8,
    pub bits: Vec<bool>,
}

impl CodeEntry {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_prefix_of(&self, other: &CodeEntry) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for CodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// One [`CodeEntry`] per symbol, stored in frequency-table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    entries: Vec<CodeEntry>,
    positions: [Option<u8>; 256],
}

impl CodeTable {
    /// Walk `tree` depth-first, 0 for left and 1 for right, and record the
    /// path to every leaf. The tree is consumed.
    ///
    /// A tree that is a single leaf has an empty path; that symbol is given
    /// the one-bit code `0` so every symbol still costs at least one bit.
    pub fn generate(tree: HuffmanTree, table: &FrequencyTable) -> Result<Self> {
        let mut slots: Vec<Option<CodeEntry>> = vec![None; table.len()];
        let mut stack = vec![(tree.root(), Vec::new())];

        while let Some((id, path)) = stack.pop() {
            match *tree.node(id) {
                Node::Leaf { symbol, .. } => {
                    let pos = table
                        .position_of(symbol)
                        .ok_or(CompressError::MissingCode(symbol))?;
                    let bits = if path.is_empty() { vec![false] } else { path };
                    slots[pos] = Some(CodeEntry { symbol, bits });
                }
                Node::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((right, right_path));
                    stack.push((left, left_path));
                }
            }
        }

        let mut entries = Vec::with_capacity(slots.len());
        let mut positions = [None; 256];
        for (slot, symbol) in slots.into_iter().zip(table.symbols()) {
            let entry = slot.ok_or(CompressError::MissingCode(symbol.id))?;
            positions[entry.symbol as usize] = Some(entries.len() as u8);
            entries.push(entry);
        }

        let codes = Self { entries, positions };
        debug!(
            symbols = codes.len(),
            max_code_length = codes.max_code_length(),
            "code table generated"
        );
        Ok(codes)
    }

    pub fn get(&self, symbol: u8) -> Option<&CodeEntry> {
        self.positions[symbol as usize].map(|pos| &self.entries[pos as usize])
    }

    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_code_length(&self) -> usize {
        self.entries.iter().map(CodeEntry::len).max().unwrap_or(0)
    }

    /// Exact number of payload bits needed to encode the source `table` describes.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .symbols()
            .iter()
            .filter_map(|s| self.get(s.id).map(|code| s.count * code.len() as u64))
            .sum()
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{} {}", std::ascii::escape_default(entry.symbol), entry)?;
        }
        Ok(())
    }
}
