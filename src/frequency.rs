//! Frequency analysis of byte sources
//!
//! Counts every byte value with a direct-indexed table and remembers the order
//! in which distinct bytes first appeared. That order drives priority queue
//! loading, so it is part of the output format.

use std::fmt;
use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CompressError, Result};

/// A distinct byte value and the number of times it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: u8,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    symbols: Vec<Symbol>,
    positions: [Option<u8>; 256],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            positions: [None; 256],
            total: 0,
        }
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every byte produced by `reader` until end of stream.
    pub fn analyze<R: Read>(mut reader: R) -> Result<Self> {
        let mut counter = Counter::new();
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => counter.feed(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        let table = counter.finish()?;
        debug!(
            distinct = table.len(),
            total = table.total(),
            "frequency table built"
        );
        Ok(table)
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counter = Counter::new();
        counter.feed(data);
        // a slice length always fits in u64, so the total cannot overflow
        counter.finish().unwrap_or_default()
    }

    /// Build a table from explicit `(symbol, count)` pairs, kept in the given order.
    pub fn from_symbols<I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = Self::new();
        for (id, count) in symbols {
            table.push(id, count)?;
        }
        Ok(table)
    }

    pub(crate) fn push(&mut self, id: u8, count: u64) -> Result<()> {
        if count == 0 {
            return Err(CompressError::ZeroCount(id));
        }
        if self.positions[id as usize].is_some() {
            return Err(CompressError::DuplicateSymbol(id));
        }
        self.total = self
            .total
            .checked_add(count)
            .ok_or(CompressError::CountOverflow)?;
        // at most 256 distinct ids, so the position fits a u8
        self.positions[id as usize] = Some(self.symbols.len() as u8);
        self.symbols.push(Symbol { id, count });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in first-occurrence order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Sum of all counts, which is the length of the original source.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count_of(&self, id: u8) -> u64 {
        self.position_of(id)
            .map(|pos| self.symbols[pos].count)
            .unwrap_or(0)
    }

    pub fn position_of(&self, id: u8) -> Option<usize> {
        self.positions[id as usize].map(usize::from)
    }

    /// Shannon entropy of the source in bits per byte.
    pub fn entropy_bits(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let len = self.total as f64;
        let mut entropy = 0.0;
        for symbol in &self.symbols {
            let p = symbol.count as f64 / len;
            entropy -= p * p.log2();
        }
        entropy
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            writeln!(
                f,
                "\t{}\t{}",
                std::ascii::escape_default(symbol.id),
                symbol.count
            )?;
        }
        write!(f, "**** Byte Count: {} ****", self.total)
    }
}

struct Counter {
    counts: [u64; 256],
    order: Vec<u8>,
}

impl Counter {
    fn new() -> Self {
        Self {
            counts: [0; 256],
            order: Vec::new(),
        }
    }

    fn feed(&mut self, data: &[u8]) {
        for &b in data {
            let slot = &mut self.counts[b as usize];
            if *slot == 0 {
                self.order.push(b);
            }
            *slot += 1;
        }
    }

    fn finish(self) -> Result<FrequencyTable> {
        let counts = self.counts;
        FrequencyTable::from_symbols(self.order.into_iter().map(|b| (b, counts[b as usize])))
    }
}
