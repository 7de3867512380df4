// Cache module for the single-file store.
// Path derivation, per-format codecs, and the store itself.

pub(crate) mod codec;
pub mod paths;
pub mod store;

pub use paths::{cache_file_path, default_cache_dir};
pub use store::FileStore;
