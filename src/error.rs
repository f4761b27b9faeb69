use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Symbol {symbol:#04x} has no code in the table")]
    LookupFailure { symbol: u8 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Bit stream ended in the middle of a code, {consumed} bits into the walk")]
    TruncatedInput { consumed: usize },

    #[error("Corrupted stream: {0}")]
    CorruptStream(String),

    #[error("Configuration file not found at \"{:?}\"", .config_file_path.as_path())]
    MissingConfigurationFile {
        config_file_path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration file")]
    InvalidConfig(#[from] toml::de::Error),
}

impl HuffmanError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        HuffmanError::CorruptStream(msg.into())
    }
}
