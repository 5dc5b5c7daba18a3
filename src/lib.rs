//! sigma-huffman: byte-oriented Huffman compression.
//!
//! A source is compressed into two artifacts:
//! - the packed payload, the raw concatenation of per-byte codes with no header
//! - the frequency table, a text file of `<symbol> <count>` lines
//!
//! The decompressor rebuilds the same tree from the table alone, and the sum
//! of the counts tells it where the payload ends.
//!
//! ```
//! use sigma_huffman::Compressor;
//!
//! let compressor = Compressor::default();
//! let output = compressor.compress(b"abracadabra")?;
//! let restored = compressor.decompress(&output.table, &output.data)?;
//! assert_eq!(restored, b"abracadabra");
//! # Ok::<(), sigma_huffman::error::CompressError>(())
//! ```

pub mod bitstream;
pub mod codes;
pub mod config;
pub mod error;
pub mod frequency;
pub mod queue;
pub mod store;
pub mod tree;

use std::io::{Read, Seek, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bitstream::PackStats;
use crate::codes::CodeTable;
use crate::config::CompressionConfig;
use crate::error::{CompressError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

pub use crate::error::ErrorKind;

/// Compressed payload together with the table needed to decode it
#[derive(Debug, Clone)]
pub struct CompressedOutput {
    pub table: FrequencyTable,
    pub data: Vec<u8>,
    pub metadata: CompressionMetadata,
}

/// Statistics about one compression run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionMetadata {
    pub original_size: u64,
    pub compressed_size: u64,
    pub payload_bits: u64,
    pub distinct_symbols: usize,
    pub max_code_length: usize,
    pub entropy_bits: f64,
    pub ratio: f64,
}

impl CompressionMetadata {
    fn new(table: &FrequencyTable, codes: &CodeTable, stats: PackStats) -> Self {
        let ratio = if stats.symbols == 0 {
            1.0
        } else {
            stats.bytes as f64 / stats.symbols as f64
        };
        Self {
            original_size: stats.symbols,
            compressed_size: stats.bytes,
            payload_bits: stats.bits,
            distinct_symbols: table.len(),
            max_code_length: codes.max_code_length(),
            entropy_bits: table.entropy_bits(),
            ratio,
        }
    }
}

/// Runs compression and decompression. Every call owns its own table, tree
/// and codes; nothing is kept between calls.
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress an in-memory buffer
    pub fn compress(&self, data: &[u8]) -> Result<CompressedOutput> {
        if data.is_empty() {
            return Err(CompressError::EmptyInput);
        }
        self.check_size(data.len() as u64)?;

        let table = FrequencyTable::from_bytes(data);
        let codes = CodeTable::generate(HuffmanTree::build(&table)?, &table)?;
        let mut packed = Vec::new();
        packed.try_reserve(codes.encoded_bits(&table).div_ceil(8) as usize)?;
        let stats = bitstream::pack(data, &codes, &mut packed)?;

        let metadata = CompressionMetadata::new(&table, &codes, stats);
        Ok(CompressedOutput {
            table,
            data: packed,
            metadata,
        })
    }

    /// Decompress a payload produced with `table`
    pub fn decompress(&self, table: &FrequencyTable, payload: &[u8]) -> Result<Vec<u8>> {
        self.check_size(table.total())?;
        let tree = HuffmanTree::build(table)?;
        bitstream::unpack_bytes(payload, &tree, table.total())
    }

    /// Compress a seekable source into `sink`. The source is read twice,
    /// once to count and once to encode.
    pub fn compress_stream<R, W>(
        &self,
        mut source: R,
        sink: W,
    ) -> Result<(FrequencyTable, CompressionMetadata)>
    where
        R: Read + Seek,
        W: Write,
    {
        let table = FrequencyTable::analyze(&mut source)?;
        self.check_size(table.total())?;
        let codes = CodeTable::generate(HuffmanTree::build(&table)?, &table)?;

        source.rewind()?;
        let stats = bitstream::pack(&mut source, &codes, sink)?;
        if stats.symbols != table.total() {
            // the source changed between the two passes
            return Err(CompressError::TruncatedStream {
                expected: table.total(),
                decoded: stats.symbols,
            });
        }

        let metadata = CompressionMetadata::new(&table, &codes, stats);
        Ok((table, metadata))
    }

    /// Decode `packed` into `sink` using `table`. Returns the number of bytes written.
    pub fn decompress_stream<R, W>(&self, table: &FrequencyTable, packed: R, sink: W) -> Result<u64>
    where
        R: Read,
        W: Write,
    {
        self.check_size(table.total())?;
        let tree = HuffmanTree::build(table)?;
        bitstream::unpack(packed, &tree, table.total(), sink)
    }

    /// Compress `input`, writing the payload and the frequency table to the given paths
    pub fn compress_file(
        &self,
        input: &Path,
        payload: &Path,
        table_path: &Path,
    ) -> Result<CompressionMetadata> {
        let source = store::open_source_with_capacity(input, self.config.io_buffer_size)?;
        let sink = store::open_sink_with_capacity(payload, self.config.io_buffer_size)?;
        let (table, metadata) = self.compress_stream(source, sink)?;
        store::save_frequency_table(&table, table_path)?;

        info!(
            input = %input.display(),
            payload = %payload.display(),
            original_size = metadata.original_size,
            compressed_size = metadata.compressed_size,
            "file compressed"
        );
        Ok(metadata)
    }

    /// Restore the original file from a payload and its frequency table
    pub fn decompress_file(&self, payload: &Path, table_path: &Path, output: &Path) -> Result<u64> {
        let table = store::load_frequency_table(table_path)?;
        let source = store::open_source_with_capacity(payload, self.config.io_buffer_size)?;
        let sink = store::open_sink_with_capacity(output, self.config.io_buffer_size)?;
        let written = self.decompress_stream(&table, source, sink)?;

        info!(
            payload = %payload.display(),
            output = %output.display(),
            bytes = written,
            "file decompressed"
        );
        Ok(written)
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.config.max_input_size {
            return Err(CompressError::InputTooLarge {
                size,
                limit: self.config.max_input_size,
            });
        }
        Ok(())
    }
}
