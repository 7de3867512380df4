// Store configuration.
// Defines the format tags, the full store config, and the partial options used to update it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Serialization format of the cache file. The tag doubles as the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Format {
    /// Framed binary encoding standing in for a language-native literal.
    #[serde(rename = "native")]
    Native,
    #[default]
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "bin")]
    Binary,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Native, Format::Json, Format::Binary];

    /// Tag used in configuration and as the file extension.
    pub fn tag(&self) -> &'static str {
        match self {
            Format::Native => "native",
            Format::Json => "json",
            Format::Binary => "bin",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Format {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Format::ALL
            .into_iter()
            .find(|format| format.tag() == s)
            .ok_or_else(|| {
                StoreError::InvalidConfiguration(format!(
                    "unrecognized format '{}', expected one of: native, json, bin",
                    s
                ))
            })
    }
}

/// Complete configuration of a file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the cache file. Must already exist.
    pub directory: PathBuf,
    /// File name without extension.
    pub filename: String,
    pub format: Format,
    /// Compact JSON output. Ignored by the other formats.
    pub minify: bool,
}

impl StoreConfig {
    pub fn new(directory: impl Into<PathBuf>, filename: impl Into<String>, format: Format) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            format,
            minify: false,
        }
    }

    /// Check the invariants every committed configuration must hold.
    pub fn validate(&self) -> Result<()> {
        validate_directory(&self.directory)?;
        if self.filename.is_empty() {
            return Err(StoreError::InvalidConfiguration(
                "filename must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Return a copy with every provided option applied.
    pub fn merged(&self, options: StoreOptions) -> Self {
        let mut next = self.clone();
        if let Some(path) = options.path {
            next.directory = path;
        }
        if let Some(filename) = options.filename {
            next.filename = filename;
        }
        if let Some(format) = options.format {
            next.format = format;
        }
        if let Some(minify) = options.minify {
            next.minify = minify;
        }
        next
    }
}

/// Fails unless `path` exists and is a directory. Never creates it.
pub(crate) fn validate_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(StoreError::InvalidConfiguration(format!(
            "directory does not exist: {}",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(StoreError::InvalidConfiguration(format!(
            "not a directory: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Partial configuration. Absent fields leave the current value untouched.
///
/// Deserialization rejects unknown keys, so a typo such as `"minfy"` is an
/// error instead of a silent no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = Some(minify);
        self
    }

    /// Parse options from a JSON object such as `{"type": "bin", "minify": true}`.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(invalid_options)
    }

    /// Parse options from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(invalid_options)
    }
}

fn invalid_options(err: serde_json::Error) -> StoreError {
    StoreError::InvalidConfiguration(err.to_string())
}
