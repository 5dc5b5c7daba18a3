//! sigma-huffman command line
//!
//! ```bash
//! # writes notes.txt.huf and notes.txt.tab
//! sigma-huffman compress notes.txt
//!
//! sigma-huffman decompress notes.txt.huf --table notes.txt.tab --output notes.out
//!
//! # dump frequency table, tree and codes
//! sigma-huffman inspect notes.txt.tab
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use sigma_huffman::codes::CodeTable;
use sigma_huffman::config::CompressionConfig;
use sigma_huffman::frequency::FrequencyTable;
use sigma_huffman::store;
use sigma_huffman::tree::HuffmanTree;
use sigma_huffman::Compressor;

#[derive(Parser, Debug)]
#[command(name = "sigma-huffman")]
#[command(version)]
#[command(about = "Huffman compression with a separate frequency table", long_about = None)]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file into a payload and a frequency table
    Compress(CompressArgs),
    /// Restore a file from a payload and its frequency table
    Decompress(DecompressArgs),
    /// Print the frequency table, tree and codes described by a table file
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct CompressArgs {
    input: PathBuf,

    /// Payload path, defaults to `<input>.huf`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frequency table path, defaults to `<input>.tab`
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Print the frequency and code tables
    #[arg(long)]
    show_tables: bool,

    /// Print statistics as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct DecompressArgs {
    payload: PathBuf,

    #[arg(short, long)]
    table: PathBuf,

    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    table: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = match &cli.config {
        Some(path) => CompressionConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CompressionConfig::default(),
    };
    let compressor = Compressor::new(config);

    match cli.command {
        Command::Compress(args) => compress(&compressor, args),
        Command::Decompress(args) => decompress(&compressor, args),
        Command::Inspect(args) => inspect(args),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

fn compress(compressor: &Compressor, args: CompressArgs) -> Result<()> {
    let config = compressor.config();
    let payload = args
        .output
        .unwrap_or_else(|| config.payload_path_for(&args.input));
    let table_path = args
        .table
        .unwrap_or_else(|| config.table_path_for(&args.input));

    let metadata = compressor
        .compress_file(&args.input, &payload, &table_path)
        .with_context(|| format!("failed to compress {}", args.input.display()))?;

    if args.show_tables {
        let table = store::load_frequency_table(&table_path)?;
        let codes = CodeTable::generate(HuffmanTree::build(&table)?, &table)?;
        println!("{table}");
        print!("{codes}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        println!("**** Bytes Written: {} ****", metadata.compressed_size);
        println!(
            "{} -> {} ({:.1}%), table in {}",
            args.input.display(),
            payload.display(),
            metadata.ratio * 100.0,
            table_path.display()
        );
    }
    Ok(())
}

fn decompress(compressor: &Compressor, args: DecompressArgs) -> Result<()> {
    let written = compressor
        .decompress_file(&args.payload, &args.table, &args.output)
        .with_context(|| format!("failed to decompress {}", args.payload.display()))?;
    println!("{} bytes written to {}", written, args.output.display());
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let table: FrequencyTable = store::load_frequency_table(&args.table)
        .with_context(|| format!("failed to load table {}", args.table.display()))?;
    let tree = HuffmanTree::build(&table)?;
    println!("{table}");
    print!("{tree}");
    let codes = CodeTable::generate(tree, &table)?;
    print!("{codes}");
    Ok(())
}
