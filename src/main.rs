use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use rhuffman::{
    build_tree, compress, count_frequencies, decompress, roundtrip, Config, HuffmanEncoder,
    OutputPaths,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    // Command to execute
    #[command(subcommand)]
    command: Commands,

    /// Path of a TOML file overriding the output file suffixes
    #[arg(short, long, global = true, env = "RHUFFMAN_CONFIG")]
    config: Option<PathBuf>,

    /// Log pass details
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a file and store its frequency table beside it
    Compress(CompressArgs),
    /// Decompress a file with a stored frequency table
    Decompress(DecompressArgs),
    /// Compress then decompress a file, as a self check
    Roundtrip(InputArgs),
    /// Print the code table of a file
    Codes(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path of the input file
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// Path of the input file
    #[arg(short, long)]
    input: PathBuf,

    /// Path of the output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path of the frequency table file
    #[arg(short, long)]
    table: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecompressArgs {
    /// Path of the compressed file
    #[arg(short, long)]
    input: PathBuf,

    /// Path of the frequency table file
    #[arg(short, long)]
    table: PathBuf,

    /// Path of the output file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => Config::new(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Compress(args) => {
            let paths = OutputPaths::derive(&args.input, &config);
            let output = args.output.unwrap_or(paths.compressed);
            let table = args.table.unwrap_or(paths.table);
            compress(&args.input, &output, &table).context("Error during compression")?;
        }
        Commands::Decompress(args) => {
            let output = args
                .output
                .unwrap_or_else(|| OutputPaths::derive(&args.input, &config).decompressed);
            decompress(&args.input, &args.table, &output)
                .context("Error during decompression")?;
        }
        Commands::Roundtrip(args) => {
            let paths = OutputPaths::derive(&args.input, &config);
            let stats = roundtrip(&args.input, &paths).context("Error during roundtrip")?;
            println!(
                "{} -> {} ({} bits) -> {}",
                args.input.display(),
                paths.compressed.display(),
                stats.bits,
                paths.decompressed.display()
            );
        }
        Commands::Codes(args) => {
            let file = File::open(&args.input)
                .with_context(|| format!("Cannot open {}", args.input.display()))?;
            let counts = count_frequencies(file)?;
            let encoder = HuffmanEncoder::new(&build_tree(&counts)?);
            for (symbol, code) in encoder.table().iter() {
                println!(
                    "{:#04x} {:?}\t{}\t{}",
                    symbol,
                    symbol as char,
                    counts.get(symbol).unwrap_or_default(),
                    code
                );
            }
        }
    }

    Ok(())
}
