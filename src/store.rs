//! File access and the persisted frequency table format.
//!
//! A table file has one `"<symbol> <count>"` line per distinct byte, in
//! first-occurrence order. Loading is strict: any malformed line fails the
//! whole load.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{CompressError, Result};
use crate::frequency::FrequencyTable;

pub fn open_source(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

pub fn open_source_with_capacity(path: &Path, capacity: usize) -> Result<BufReader<File>> {
    Ok(BufReader::with_capacity(capacity, File::open(path)?))
}

/// Create (or truncate) `path` for writing.
pub fn open_sink(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

pub fn open_sink_with_capacity(path: &Path, capacity: usize) -> Result<BufWriter<File>> {
    Ok(BufWriter::with_capacity(capacity, File::create(path)?))
}

pub fn write_frequency_table<W: Write>(table: &FrequencyTable, mut writer: W) -> Result<()> {
    for symbol in table.symbols() {
        writeln!(writer, "{} {}", symbol.id, symbol.count)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_frequency_table<R: BufRead>(reader: R) -> Result<FrequencyTable> {
    let mut table = FrequencyTable::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let mut fields = line.split_whitespace();
        let (id, count) = match (fields.next(), fields.next(), fields.next()) {
            (None, _, _) => continue,
            (Some(id), Some(count), None) => (id, count),
            _ => {
                return Err(CompressError::malformed(
                    line_no,
                    "expected `<symbol> <count>`",
                ))
            }
        };
        let id: u8 = id.parse().map_err(|_| {
            CompressError::malformed(line_no, format!("symbol `{id}` is not a byte value"))
        })?;
        let count: u64 = count.parse().map_err(|_| {
            CompressError::malformed(line_no, format!("count `{count}` is not a number"))
        })?;
        table.push(id, count).map_err(|e| match e {
            CompressError::DuplicateSymbol(_)
            | CompressError::ZeroCount(_)
            | CompressError::CountOverflow => CompressError::malformed(line_no, e.to_string()),
            other => other,
        })?;
    }
    Ok(table)
}

pub fn save_frequency_table(table: &FrequencyTable, path: &Path) -> Result<()> {
    write_frequency_table(table, open_sink(path)?)?;
    debug!(path = %path.display(), symbols = table.len(), "frequency table saved");
    Ok(())
}

pub fn load_frequency_table(path: &Path) -> Result<FrequencyTable> {
    let table = read_frequency_table(open_source(path)?)?;
    debug!(path = %path.display(), symbols = table.len(), "frequency table loaded");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(text: &str) -> Result<FrequencyTable> {
        read_frequency_table(text.as_bytes())
    }

    #[test]
    fn test_text_format() {
        let table = FrequencyTable::from_bytes(b"aaab\n");
        let mut out = Vec::new();
        write_frequency_table(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "97 3\n98 1\n10 1\n");
    }

    #[test]
    fn test_parse_preserves_order() {
        let table = parse("98 1\n97 3\n").unwrap();
        assert_eq!(table.symbols()[0].id, b'b');
        assert_eq!(table.symbols()[1].id, b'a');
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let table = parse("\n97 3\n\n  \n98 1\n\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_malformed_lines() {
        for (text, line) in [
            ("97 3\n300 1\n", 2),
            ("97\n", 1),
            ("97 3 4\n", 1),
            ("x 3\n", 1),
            ("97 -1\n", 1),
            ("97 0\n", 1),
            ("97 3\n98 1\n97 2\n", 3),
            ("1 18446744073709551615\n2 1\n", 2),
        ] {
            match parse(text) {
                Err(CompressError::MalformedTable { line: l, .. }) => {
                    assert_eq!(l, line, "wrong line for {text:?}")
                }
                other => panic!("expected malformed table for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_frequency_table(&dir.path().join("absent.tab")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freq.tab");
        let table = FrequencyTable::from_bytes(b"hello, table");
        save_frequency_table(&table, &path).unwrap();
        assert_eq!(load_frequency_table(&path).unwrap(), table);
    }
}
