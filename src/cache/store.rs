// Cache store for reading and writing the cache file.
// Handles configuration updates, format dispatch, and filesystem operations.
//
// There is no locking: concurrent stores against the same file race and the
// last writer wins, possibly leaving interleaved content behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::codec;
use super::paths::cache_file_path;
use crate::config::{Format, StoreConfig, StoreOptions, validate_directory};
use crate::error::{Result, StoreError};

/// A single-file cache addressed by directory, filename, and format.
#[derive(Debug, Clone)]
pub struct FileStore {
    config: StoreConfig,
}

impl FileStore {
    /// Create a store, failing if the configuration is invalid.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Apply a partial configuration. Nothing changes unless the result validates.
    pub fn configure(&mut self, options: StoreOptions) -> Result<()> {
        let next = self.config.merged(options);
        next.validate()?;
        debug!(
            path = %next.directory.display(),
            filename = %next.filename,
            format = %next.format,
            minify = next.minify,
            "store configured"
        );
        self.config = next;
        Ok(())
    }

    /// Apply options given as a JSON object, e.g. `{"type": "bin"}`.
    pub fn configure_json(&mut self, text: &str) -> Result<()> {
        self.configure(StoreOptions::from_json(text)?)
    }

    /// Apply options given as a decoded JSON value.
    pub fn configure_value(&mut self, value: serde_json::Value) -> Result<()> {
        self.configure(StoreOptions::from_value(value)?)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Full path of the cache file.
    pub fn file_path(&self) -> PathBuf {
        cache_file_path(
            &self.config.directory,
            &self.config.filename,
            self.config.format,
        )
    }

    /// Serialize `value` and write it to the cache file, replacing any previous content.
    pub fn store<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let path = self.file_path();
        let bytes = codec::encode(self.config.format, value, self.config.minify)?;
        fs::write(&path, &bytes)?;
        debug!(path = %path.display(), format = %self.config.format, bytes = bytes.len(), "cache stored");
        Ok(())
    }

    /// Read the cache file back.
    ///
    /// A missing file is created empty first. An empty file yields `None`
    /// for every format; only non-empty content that fails to decode is an error.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let path = self.file_path();

        if !path.exists() {
            // Append mode so a file written in the meantime is never truncated.
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            debug!(path = %path.display(), "cache file created empty");
        }

        let bytes = fs::read(&path)?;
        if bytes.is_empty() {
            debug!(path = %path.display(), "cache empty");
            return Ok(None);
        }

        match codec::decode(self.config.format, &bytes, &path) {
            Ok(value) => {
                debug!(path = %path.display(), format = %self.config.format, bytes = bytes.len(), "cache loaded");
                Ok(Some(value))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache file could not be decoded");
                Err(e)
            }
        }
    }

    /// Check if the cache file exists.
    pub fn exists(&self) -> bool {
        self.file_path().exists()
    }

    /// Get the modification time of the cache file.
    pub fn modified_at(&self) -> Result<DateTime<Utc>> {
        let modified = fs::metadata(self.file_path())?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }

    pub fn path(&self) -> &Path {
        &self.config.directory
    }

    /// Point the store at another existing directory.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        validate_directory(&path)?;
        self.config.directory = path;
        Ok(())
    }

    pub fn filename(&self) -> &str {
        &self.config.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) -> Result<()> {
        let filename = filename.into();
        if filename.is_empty() {
            return Err(StoreError::InvalidConfiguration(
                "filename must not be empty".to_string(),
            ));
        }
        self.config.filename = filename;
        Ok(())
    }

    pub fn format(&self) -> Format {
        self.config.format
    }

    pub fn set_format(&mut self, format: Format) {
        self.config.format = format;
    }

    /// Set the format from its tag. The new tag is checked before anything changes.
    pub fn set_format_tag(&mut self, tag: &str) -> Result<()> {
        self.config.format = tag.parse()?;
        Ok(())
    }

    pub fn minify(&self) -> bool {
        self.config.minify
    }

    pub fn set_minify(&mut self, minify: bool) {
        self.config.minify = minify;
    }
}
