//! Scratch storage for uploaded assets.
//!
//! Uploaded bytes are written to uniquely named files so that downstream
//! tools (ffmpeg, the analyzer) can work with filesystem paths.

use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes uploaded assets to uniquely named scratch files.
///
/// The store only creates files; callers own cleanup. Nothing in the
/// pipeline deletes saved assets, so they persist for the lifetime of
/// the temp directory.
pub struct TempFileStore {
    dir: PathBuf,
}

impl TempFileStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Write `bytes` to a newly allocated file with the given extension.
    ///
    /// The file name is unique for the process. The extension is preserved
    /// so tools that dispatch on it keep working. IO failures propagate.
    pub fn save(&self, bytes: &[u8], extension: &str) -> Result<PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix("upload_")
            .suffix(&format!(".{}", extension.trim_start_matches('.')))
            .tempfile_in(&self.dir)?;

        file.write_all(bytes)?;

        // Persist the file past the handle; cleanup is the caller's concern.
        let (_, path) = file.keep().map_err(|e| e.error)?;

        debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_preserves_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempFileStore::new(dir.path()).unwrap();

        let path = store.save(b"fake image data", "jpg").unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"fake image data");
    }

    #[test]
    fn test_save_allocates_unique_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempFileStore::new(dir.path()).unwrap();

        let a = store.save(b"a", "mp4").unwrap();
        let b = store.save(b"b", "mp4").unwrap();
        assert_ne!(a, b);
        assert!(a.exists() && b.exists());
    }

    #[test]
    fn test_save_leading_dot_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempFileStore::new(dir.path()).unwrap();

        let path = store.save(b"x", ".png").unwrap();
        assert!(path.to_string_lossy().ends_with(".png"));
        assert!(!path.to_string_lossy().ends_with("..png"));
    }
}
