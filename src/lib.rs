// File-backed cache store.
// Persists one value per configuration to `{directory}/{filename}.{format}` and reads it back.

//! ```no_run
//! use std::collections::HashMap;
//! use filecache::{FileStore, Format, StoreConfig};
//!
//! # fn main() -> filecache::Result<()> {
//! let store = FileStore::new(StoreConfig::new("/var/cache/app", "settings", Format::Json))?;
//! store.store(&HashMap::from([("theme", "dark")]))?;
//! let settings: Option<HashMap<String, String>> = store.load()?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{FileStore, cache_file_path, default_cache_dir};
pub use config::{Format, StoreConfig, StoreOptions};
pub use error::{Result, StoreError};
