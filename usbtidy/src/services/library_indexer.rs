//! Library indexer
//!
//! Walks the root folder once and classifies every regular file by its
//! resolved (artist, album) pair. The whole index is built before anything
//! moves, so placement never races the walk that produced it.
//!
//! A file that cannot be read or classified either aborts the run
//! ([`OnError::Abort`], the default) or is left out of the index and
//! reported ([`OnError::Skip`]).

use crate::error::{Error, Result};
use crate::services::file_scanner::FileScanner;
use crate::services::metadata_extractor::TagReader;
use crate::services::tag_resolver::TagResolver;
use crate::types::{FileFailure, LibraryIndex, ResolvedKey};
use std::path::Path;
use tracing::{debug, info, warn};
use usbtidy_common::OnError;

/// Indexing counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Regular files the walk yielded
    pub files_seen: usize,
    /// Files added to the index
    pub files_indexed: usize,
    /// Files left out of the index (skip policy only)
    pub failures: Vec<FileFailure>,
    /// Walk errors; anything below an unreadable entry was never seen
    pub walk_errors: Vec<String>,
}

/// Builds a [`LibraryIndex`] from a directory tree
pub struct LibraryIndexer<R: TagReader> {
    reader: R,
    resolver: TagResolver,
    scanner: FileScanner,
    on_error: OnError,
}

impl<R: TagReader> LibraryIndexer<R> {
    pub fn new(reader: R, resolver: TagResolver) -> Self {
        Self {
            reader,
            resolver,
            scanner: FileScanner::new(),
            on_error: OnError::Abort,
        }
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    /// Walk `root` and group its files by resolved (artist, album)
    pub fn index(&self, root: &Path) -> Result<(LibraryIndex, IndexReport)> {
        let scan = self.scanner.scan_with_stats(root)?;
        info!("  Found {} files under \"{}\"", scan.files.len(), root.display());
        debug!(by_extension = ?scan.by_extension, "Scan statistics");

        let mut index = LibraryIndex::new();
        let mut report = IndexReport {
            files_seen: scan.files.len(),
            walk_errors: scan.errors,
            ..Default::default()
        };

        for path in scan.files {
            match self.classify(&path) {
                Ok(key) => {
                    debug!("  Mapped \"{}\" -> {}", path.display(), key);
                    index.insert(&key, path);
                    report.files_indexed += 1;
                }
                Err(e) => match self.on_error {
                    OnError::Abort => return Err(e),
                    OnError::Skip => {
                        warn!("  Skipping: {}", e);
                        report.failures.push(FileFailure::new(&path, &e));
                    }
                },
            }
        }

        info!(
            artists = index.artist_count(),
            albums = index.album_count(),
            files = report.files_indexed,
            skipped = report.failures.len(),
            walk_errors = report.walk_errors.len(),
            "Index built"
        );

        Ok((index, report))
    }

    /// Read and resolve one file
    pub fn classify(&self, path: &Path) -> Result<ResolvedKey> {
        let tags = self
            .reader
            .read(path)
            .map_err(|e| Error::metadata(path, e))?;
        self.resolver
            .resolve_key(&tags)
            .map_err(|e| Error::resolution(path, e))
    }
}
