//! Huffman coding of byte streams.
//!
//! The compressed stream carries no header: the tree used to encode it must be
//! available to the decoder. Within one run it is kept in memory
//! ([`roundtrip`]); across runs [`compress`] writes the frequency table to a
//! side file that [`decompress`] rebuilds the same tree from.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use log::info;

pub mod bitmanipulation;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod header;
pub mod table;
pub mod tree;

pub use config::Config;
pub use decoder::HuffmanDecoder;
pub use encoder::HuffmanEncoder;
pub use error::{HuffmanError, Result};
pub use frequency::{count_frequencies, FrequencyMap};
pub use header::Header;
pub use table::{Code, CodeTable};
pub use tree::HuffmanTree;

/// Builds the Huffman tree of `counts`; fails on an empty map.
pub fn build_tree(counts: &FrequencyMap) -> Result<HuffmanTree> {
    HuffmanTree::create(counts)
}

/// Encodes `source` with the codes of `tree` into `sink`; returns the bit count.
pub fn encode<R: Read, W: Write>(tree: &HuffmanTree, source: R, sink: W) -> Result<usize> {
    HuffmanEncoder::new(tree).encode(source, sink)
}

/// Decodes the bit stream `source` into `sink`; returns the symbol count.
pub fn decode<R: Read, W: Write>(tree: &HuffmanTree, source: R, sink: W) -> Result<usize> {
    HuffmanDecoder::new(tree).decode(source, sink)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_bytes: usize,
    pub compressed_bytes: usize,
    pub bits: usize,
}

impl CompressionStats {
    /// Compressed size over original size.
    pub fn ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.compressed_bytes as f64 / self.original_bytes as f64
    }
}

/// Files produced from one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub compressed: PathBuf,
    pub decompressed: PathBuf,
    pub table: PathBuf,
}

impl OutputPaths {
    /// Replaces the extension of `input` with the suffixes of `config`:
    /// `notes.txt` gives `notes_compressed.huf`, `notes_decompressed.txt`
    /// and `notes.freq` with the default configuration.
    pub fn derive(input: &Path, config: &Config) -> Self {
        let base = input.with_extension("");
        let with_suffix = |suffix: &str| {
            let mut name = OsString::from(base.as_os_str());
            name.push(suffix);
            PathBuf::from(name)
        };
        OutputPaths {
            compressed: with_suffix(&config.compressed_suffix),
            decompressed: with_suffix(&config.decompressed_suffix),
            table: with_suffix(&config.table_suffix),
        }
    }
}

/// Compresses `input` into `output` and writes its frequency table to `table`.
/// The input is read twice: once to count, once to encode.
pub fn compress(
    input: &Path,
    output: &Path,
    table: &Path,
) -> Result<(HuffmanTree, CompressionStats)> {
    let counts = count_frequencies(File::open(input)?)?;
    if counts.is_empty() {
        return Err(HuffmanError::InvalidInput(format!(
            "{} is empty, nothing to compress",
            input.display()
        )));
    }
    let tree = build_tree(&counts)?;
    let bits = encode(&tree, File::open(input)?, File::create(output)?)?;

    let mut writer = BufWriter::new(File::create(table)?);
    Header::new(counts.clone()).write(&mut writer)?;

    let stats = CompressionStats {
        original_bytes: counts.total(),
        compressed_bytes: fs::metadata(output)?.len() as usize,
        bits,
    };
    info!(
        "compressed {} ({} bytes) into {} ({} bytes, ratio {:.3})",
        input.display(),
        stats.original_bytes,
        output.display(),
        stats.compressed_bytes,
        stats.ratio()
    );
    Ok((tree, stats))
}

/// Decompresses `input` using the frequency table stored in `table`.
/// Returns the number of bytes written to `output`.
pub fn decompress(input: &Path, table: &Path, output: &Path) -> Result<usize> {
    let header = Header::read(&mut BufReader::new(File::open(table)?))?;
    let tree = build_tree(&header.counts)?;
    let written = decode(&tree, File::open(input)?, File::create(output)?)?;
    check_length(written, header.filesize)?;

    info!(
        "decompressed {} into {} ({} bytes)",
        input.display(),
        output.display(),
        written
    );
    Ok(written)
}

/// Compresses `input` and decompresses the result again with the tree kept
/// in memory, writing all three files of `paths`.
pub fn roundtrip(input: &Path, paths: &OutputPaths) -> Result<CompressionStats> {
    let (tree, stats) = compress(input, &paths.compressed, &paths.table)?;
    let written = decode(
        &tree,
        File::open(&paths.compressed)?,
        File::create(&paths.decompressed)?,
    )?;
    check_length(written, stats.original_bytes)?;

    info!(
        "decompressed {} into {}",
        paths.compressed.display(),
        paths.decompressed.display()
    );
    Ok(stats)
}

fn check_length(written: usize, expected: usize) -> Result<()> {
    if written != expected {
        return Err(HuffmanError::corrupt(format!(
            "decoded {} symbols, expected {}",
            written, expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::{build_tree, count_frequencies, decode, encode, Config, HuffmanError, OutputPaths};

    #[test]
    fn derives_paths_from_input() {
        let paths = OutputPaths::derive(Path::new("dir/notes.txt"), &Config::default());
        assert_eq!(
            paths,
            OutputPaths {
                compressed: PathBuf::from("dir/notes_compressed.huf"),
                decompressed: PathBuf::from("dir/notes_decompressed.txt"),
                table: PathBuf::from("dir/notes.freq"),
            }
        );
    }

    #[test]
    fn derives_paths_without_extension() {
        let config = Config {
            table_suffix: ".table".into(),
            ..Config::default()
        };
        let paths = OutputPaths::derive(Path::new("README"), &config);
        assert_eq!(paths.table, PathBuf::from("README.table"));
    }

    #[test]
    fn aaaa_roundtrip_in_memory() {
        let counts = count_frequencies("aaaa".as_bytes()).unwrap();
        let tree = build_tree(&counts).unwrap();

        let mut compressed = Vec::new();
        assert_eq!(encode(&tree, "aaaa".as_bytes(), &mut compressed).unwrap(), 4);

        let mut output = Vec::new();
        assert_eq!(decode(&tree, &compressed[..], &mut output).unwrap(), 4);
        assert_eq!(output, b"aaaa");
    }

    #[test]
    fn build_tree_rejects_empty_input() {
        let counts = count_frequencies("".as_bytes()).unwrap();
        assert!(matches!(
            build_tree(&counts),
            Err(HuffmanError::InvalidInput(_))
        ));
    }
}
