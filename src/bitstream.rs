//! Bit-level packing and unpacking of Huffman codes
//!
//! Codes are written back to back with no framing. The first bit of the
//! stream is the least-significant bit of the first byte, and the last byte
//! is padded with zero bits. The decoder stops after a known number of
//! symbols, so padding is never read as data.

use std::io::{self, Read, Write};

use bitstream_io::{BitRead, BitReader, BitWrite, BitWriter, LittleEndian};
use tracing::debug;

use crate::codes::CodeTable;
use crate::error::{CompressError, Result};
use crate::tree::{HuffmanTree, Node};

const CHUNK: usize = 8192;

/// Counters reported by [`pack`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    pub symbols: u64,
    pub bits: u64,
    pub bytes: u64,
}

/// Encode every byte of `source` with `codes` and write the packed bits to `sink`.
pub fn pack<R: Read, W: Write>(mut source: R, codes: &CodeTable, sink: W) -> Result<PackStats> {
    let mut writer = BitWriter::endian(sink, LittleEndian);
    let mut stats = PackStats::default();
    let mut buf = [0u8; CHUNK];

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..n] {
            let code = codes.get(byte).ok_or(CompressError::MissingCode(byte))?;
            for &bit in &code.bits {
                writer.write_bit(bit)?;
            }
            stats.symbols += 1;
            stats.bits += code.len() as u64;
        }
    }

    writer.byte_align()?;
    writer.into_writer().flush()?;
    stats.bytes = stats.bits.div_ceil(8);
    debug!(
        symbols = stats.symbols,
        bits = stats.bits,
        bytes = stats.bytes,
        "payload packed"
    );
    Ok(stats)
}

pub fn pack_bytes(data: &[u8], codes: &CodeTable) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    output.try_reserve(data.len())?;
    pack(data, codes, &mut output)?;
    Ok(output)
}

/// Decode exactly `count` symbols from `packed` by walking `tree`, writing
/// them to `sink`. Returns the number of symbols written.
pub fn unpack<R: Read, W: Write>(
    packed: R,
    tree: &HuffmanTree,
    count: u64,
    mut sink: W,
) -> Result<u64> {
    let mut reader = BitReader::endian(packed, LittleEndian);
    let mut pending = Vec::with_capacity(CHUNK);
    let mut decoded = 0u64;

    while decoded < count {
        let symbol = next_symbol(&mut reader, tree).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                CompressError::TruncatedStream {
                    expected: count,
                    decoded,
                }
            } else {
                CompressError::IoError(e)
            }
        })?;
        pending.push(symbol);
        decoded += 1;
        if pending.len() == CHUNK {
            sink.write_all(&pending)?;
            pending.clear();
        }
    }

    sink.write_all(&pending)?;
    sink.flush()?;
    debug!(symbols = decoded, "payload unpacked");
    Ok(decoded)
}

pub fn unpack_bytes(packed: &[u8], tree: &HuffmanTree, count: u64) -> Result<Vec<u8>> {
    let len = usize::try_from(count).map_err(|_| CompressError::InputTooLarge {
        size: count,
        limit: usize::MAX as u64,
    })?;
    let mut output = Vec::new();
    output.try_reserve_exact(len)?;
    unpack(packed, tree, count, &mut output)?;
    Ok(output)
}

fn next_symbol<R: Read>(
    reader: &mut BitReader<R, LittleEndian>,
    tree: &HuffmanTree,
) -> io::Result<u8> {
    let mut id = tree.root();
    // a lone leaf still spends its one-bit code
    if let Node::Leaf { symbol, .. } = *tree.node(id) {
        reader.read_bit()?;
        return Ok(symbol);
    }
    loop {
        match *tree.node(id) {
            Node::Leaf { symbol, .. } => return Ok(symbol),
            Node::Internal { left, right, .. } => {
                id = if reader.read_bit()? { right } else { left };
            }
        }
    }
}
