// Cache path utilities.
// Derives the cache file location from a store configuration.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::config::Format;

/// Platform cache directory for an application (~/.cache/<app> on Linux).
/// The directory is not created.
pub fn default_cache_dir(app: &str) -> Option<PathBuf> {
    ProjectDirs::from("", "", app).map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the cache file: `{directory}/{filename}.{tag}`.
pub fn cache_file_path(directory: &Path, filename: &str, format: Format) -> PathBuf {
    directory.join(format!("{}.{}", filename, format.tag()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_path() {
        let dir = Path::new("/var/cache/app");

        let json_p = cache_file_path(dir, "settings", Format::Json);
        assert_eq!(json_p, PathBuf::from("/var/cache/app/settings.json"));

        let bin_p = cache_file_path(dir, "settings", Format::Binary);
        assert!(bin_p.ends_with("settings.bin"));

        let native_p = cache_file_path(dir, "settings", Format::Native);
        assert!(native_p.ends_with("settings.native"));
    }

    #[test]
    fn test_filename_dots_are_kept() {
        let p = cache_file_path(Path::new("/tmp"), "v1.2", Format::Json);
        assert!(p.ends_with("v1.2.json"));
    }

    #[test]
    fn test_default_cache_dir() {
        // Verifies path construction only; nothing is created.
        if let Some(dir) = default_cache_dir("filecache-test") {
            assert!(dir.to_string_lossy().contains("filecache-test"));
        }
    }
}
