//! Library file scanner
//!
//! One recursive walk of the root folder yielding every regular file, in an
//! order that is stable for a given filesystem snapshot (entries sorted by
//! name at each level). Symlinks are not followed.
//!
//! Hidden entries and volume system folders are never yielded, whether or
//! not the janitor ran first.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// File scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Scan result with statistics
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Regular files found, in walk order
    pub files: Vec<PathBuf>,
    /// Count of files by lowercased extension ("" for none)
    pub by_extension: BTreeMap<String, usize>,
    /// Entries that could not be read during the walk
    pub errors: Vec<String>,
}

/// Library file scanner
pub struct FileScanner {
    ignore_names: Vec<String>,
}

impl FileScanner {
    /// Create new file scanner with default ignore list
    ///
    /// Dot-prefixed names are always skipped; on top of that the folders
    /// Android and Windows create at a volume root are skipped.
    pub fn new() -> Self {
        Self {
            ignore_names: vec![
                "LOST.DIR".to_string(),
                "System Volume Information".to_string(),
                "$RECYCLE.BIN".to_string(),
                "Thumbs.db".to_string(),
            ],
        }
    }

    /// Scan directory for regular files
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        Ok(self.scan_with_stats(root_path)?.files)
    }

    /// Scan with statistics
    pub fn scan_with_stats(&self, root_path: &Path) -> Result<ScanResult, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let mut result = ScanResult::default();

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        let ext = entry
                            .path()
                            .extension()
                            .map(|ext| ext.to_string_lossy().to_lowercase())
                            .unwrap_or_default();
                        *result.by_extension.entry(ext).or_insert(0) += 1;
                        result.files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    result.errors.push(e.to_string());
                }
            }
        }

        tracing::debug!(
            files = result.files.len(),
            errors = result.errors.len(),
            "Scan complete"
        );

        Ok(result)
    }

    /// Check if entry should be processed
    fn should_process_entry(&self, entry: &DirEntry) -> bool {
        // The root itself is always walked, whatever its name
        if entry.depth() == 0 {
            return true;
        }

        let file_name = entry.file_name().to_string_lossy();
        if file_name.starts_with('.') {
            return false;
        }

        !self.ignore_names.iter().any(|name| *name == file_name)
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}
