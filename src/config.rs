use std::{fs, path::PathBuf};

use serde_derive::Deserialize;

use crate::HuffmanError;

/// Naming of the files derived from an input path.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub compressed_suffix: String,
    pub decompressed_suffix: String,
    pub table_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compressed_suffix: "_compressed.huf".into(),
            decompressed_suffix: "_decompressed.txt".into(),
            table_suffix: ".freq".into(),
        }
    }
}

impl Config {
    pub fn new(path: &PathBuf) -> Result<Self, HuffmanError> {
        let content =
            fs::read_to_string(path).map_err(|e| HuffmanError::MissingConfigurationFile {
                config_file_path: path.clone(),
                source: e,
            })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, HuffmanError> {
        toml::from_str(content).map_err(HuffmanError::InvalidConfig)
    }
}
