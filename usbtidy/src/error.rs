//! Error types for usbtidy
//!
//! Each service owns the error enum for its own failure domain
//! (`ScanError`, `MetadataError`, `ResolutionError`, `FilesystemError`).
//! [`Error`] wraps them with the path of the file being processed so a
//! fatal error still says which file stopped the run.

use crate::services::file_scanner::ScanError;
use crate::services::fs_ops::FilesystemError;
use crate::services::metadata_extractor::MetadataError;
use crate::services::tag_resolver::ResolutionError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for usbtidy operations
#[derive(Debug, Error)]
pub enum Error {
    /// Root folder could not be walked
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// File could not be parsed as tagged audio
    #[error("Failed to read tags from {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },

    /// Tags were readable but artist or album is missing
    #[error("Cannot classify {path}: {source}")]
    Resolution {
        path: PathBuf,
        #[source]
        source: ResolutionError,
    },

    /// Directory creation, move or removal failed
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Result type alias for usbtidy operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn metadata(path: impl Into<PathBuf>, source: MetadataError) -> Self {
        Error::Metadata {
            path: path.into(),
            source,
        }
    }

    pub fn resolution(path: impl Into<PathBuf>, source: ResolutionError) -> Self {
        Error::Resolution {
            path: path.into(),
            source,
        }
    }

    /// The file this error concerns, when it concerns a single file
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Metadata { path, .. } | Error::Resolution { path, .. } => Some(path),
            Error::Filesystem(e) => e.path(),
            Error::Scan(_) => None,
        }
    }
}
