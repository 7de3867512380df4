// Error types for the file cache.
// Covers configuration validation, filesystem failures, and undecodable cache files.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache file {}: {reason}", .path.display())]
    CorruptCache { path: PathBuf, reason: String },

    #[error("Encoding error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
