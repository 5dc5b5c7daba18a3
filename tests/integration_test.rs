//! Integration tests for sigma-huffman

use std::fs;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sigma_huffman::codes::CodeTable;
use sigma_huffman::config::CompressionConfig;
use sigma_huffman::error::CompressError;
use sigma_huffman::frequency::FrequencyTable;
use sigma_huffman::store;
use sigma_huffman::tree::HuffmanTree;
use sigma_huffman::*;

fn roundtrip(data: &[u8]) {
    let compressor = Compressor::default();
    let compressed = compressor.compress(data).unwrap();
    let decompressed = compressor
        .decompress(&compressed.table, &compressed.data)
        .unwrap();
    assert_eq!(decompressed, data);
}

#[test]
fn test_full_lifecycle() {
    roundtrip(&b"the quick brown fox jumps over the lazy dog".repeat(50));
}

#[test]
fn test_random_roundtrips() {
    let mut rng = StdRng::seed_from_u64(0xdead_cafe);
    for _ in 0..40 {
        let len = rng.gen_range(1..3000);
        let alphabet = rng.gen_range(1..=256u32);
        let data: Vec<u8> = (0..len)
            .map(|_| rng.gen_range(0..alphabet) as u8)
            .collect();
        roundtrip(&data);
    }
}

#[test]
fn test_binary_data() {
    let data: Vec<u8> = (0..=255).cycle().take(2000).collect();
    roundtrip(&data);
}

#[test]
fn test_large_data() {
    let compressor = Compressor::default();
    let data = vec![0xABu8; 100_000];
    let compressed = compressor.compress(&data).unwrap();
    // one bit per byte
    assert_eq!(compressed.data.len(), 12_500);
    assert!(compressed.metadata.ratio < 0.5);
    let decompressed = compressor
        .decompress(&compressed.table, &compressed.data)
        .unwrap();
    assert_eq!(decompressed, data);
}

#[test]
fn test_aaab_scenario() {
    let compressor = Compressor::default();
    let compressed = compressor.compress(b"aaab").unwrap();
    assert_eq!(
        compressed.table,
        FrequencyTable::from_symbols([(b'a', 3), (b'b', 1)]).unwrap()
    );
    assert_eq!(compressed.data.len(), 1);

    // decode from the persisted text form, as a separate process would
    let mut text = Vec::new();
    store::write_frequency_table(&compressed.table, &mut text).unwrap();
    assert_eq!(text, b"97 3\n98 1\n");
    let reloaded = store::read_frequency_table(&text[..]).unwrap();
    assert_eq!(
        compressor.decompress(&reloaded, &compressed.data).unwrap(),
        b"aaab"
    );
}

#[test]
fn test_single_symbol_scenario() {
    roundtrip(b"zzzz");
    roundtrip(b"z");
}

#[test]
fn test_empty_input_error() {
    let compressor = Compressor::default();
    let err = compressor.compress(b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_determinism() {
    let data = b"she sells sea shells by the sea shore".repeat(9);
    let a = Compressor::default().compress(&data).unwrap();
    let b = Compressor::default().compress(&data).unwrap();
    assert_eq!(a.table, b.table);
    assert_eq!(a.data, b.data);

    let tree_a = HuffmanTree::build(&a.table).unwrap();
    let tree_b = HuffmanTree::build(&b.table).unwrap();
    assert_eq!(tree_a, tree_b);
    assert_eq!(
        CodeTable::generate(tree_a, &a.table).unwrap(),
        CodeTable::generate(tree_b, &b.table).unwrap()
    );
}

#[test]
fn test_truncated_payload() {
    let compressor = Compressor::default();
    let data = b"truncation must be detected, not papered over";
    let compressed = compressor.compress(data).unwrap();
    let short = &compressed.data[..compressed.data.len() - 2];
    let err = compressor.decompress(&compressed.table, short).unwrap_err();
    assert!(matches!(err, CompressError::TruncatedStream { .. }));
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("original.txt");
    let payload = dir.path().join("compressed.huf");
    let table = dir.path().join("freq.tab");
    let output = dir.path().join("decompressed.txt");

    let data = b"It was the best of times, it was the worst of times.\n".repeat(40);
    fs::write(&input, &data).unwrap();

    let compressor = Compressor::default();
    let metadata = compressor.compress_file(&input, &payload, &table).unwrap();
    assert_eq!(metadata.original_size, data.len() as u64);
    assert_eq!(
        fs::metadata(&payload).unwrap().len(),
        metadata.compressed_size
    );
    assert!(metadata.compressed_size < data.len() as u64);

    let written = compressor
        .decompress_file(&payload, &table, &output)
        .unwrap();
    assert_eq!(written, data.len() as u64);
    assert_eq!(fs::read(&output).unwrap(), data);
}

#[test]
fn test_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, b"").unwrap();

    let err = Compressor::default()
        .compress_file(&input, &dir.path().join("e.huf"), &dir.path().join("e.tab"))
        .unwrap_err();
    assert!(matches!(err, CompressError::EmptyInput));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Compressor::default()
        .compress_file(
            &dir.path().join("nope.txt"),
            &dir.path().join("n.huf"),
            &dir.path().join("n.tab"),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_malformed_table_file() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("p.huf");
    let table = dir.path().join("p.tab");
    fs::write(&payload, [0x07]).unwrap();
    fs::write(&table, "97 3\n98 one\n").unwrap();

    let err = Compressor::default()
        .decompress_file(&payload, &table, &dir.path().join("out.txt"))
        .unwrap_err();
    assert!(matches!(err, CompressError::MalformedTable { line: 2, .. }));
}

#[test]
fn test_compression_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, r#"{"io_buffer_size": 16, "table_extension": "freq"}"#).unwrap();
    let config = CompressionConfig::from_json_file(&config_path).unwrap();
    assert_eq!(config.io_buffer_size, 16);
    assert_eq!(
        config.table_path_for(std::path::Path::new("a.txt")),
        std::path::PathBuf::from("a.txt.freq")
    );

    // tiny buffers exercise the chunk boundaries of the file path
    let input = dir.path().join("in.bin");
    let data: Vec<u8> = (0..5000u32).map(|i| (i % 31) as u8).collect();
    fs::write(&input, &data).unwrap();
    let compressor = Compressor::new(config);
    let payload = compressor.config().payload_path_for(&input);
    let table = compressor.config().table_path_for(&input);
    compressor.compress_file(&input, &payload, &table).unwrap();

    let output = dir.path().join("out.bin");
    compressor.decompress_file(&payload, &table, &output).unwrap();
    assert_eq!(fs::read(&output).unwrap(), data);
}
