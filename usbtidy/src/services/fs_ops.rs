//! Filesystem operations used by placement
//!
//! [`LibraryFs`] is the narrow set of mutations the placement engine
//! performs. [`RealFs`] applies them; [`DryRunFs`] only logs what would be
//! done.
//!
//! Moves try an atomic rename first and fall back to copy + delete only
//! when the destination is on another volume.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Filesystem errors
#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move {from} -> {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another file already sits at the destination; it is never overwritten
    #[error("Refusing to move {from}: destination {to} already exists")]
    DestinationExists { from: PathBuf, to: PathBuf },

    #[error("Path has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FilesystemError {
    /// The path the failed operation was acting on
    pub fn path(&self) -> Option<&Path> {
        match self {
            FilesystemError::CreateDir { path, .. }
            | FilesystemError::Remove { path, .. }
            | FilesystemError::ReadDir { path, .. } => Some(path),
            FilesystemError::Move { from, .. }
            | FilesystemError::DestinationExists { from, .. } => Some(from),
            FilesystemError::NoFileName(path) => Some(path),
        }
    }
}

/// How a file reached its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    /// Same-volume rename
    Renamed,
    /// Copy followed by deleting the source
    Copied,
}

/// Filesystem mutations needed to place files
pub trait LibraryFs {
    /// Create `path` and any missing parents; succeed if it already exists
    fn ensure_dir(&self, path: &Path) -> Result<(), FilesystemError>;

    fn exists(&self, path: &Path) -> bool;

    /// Move `from` to the full destination path `to`
    fn move_file(&self, from: &Path, to: &Path) -> Result<MoveMethod, FilesystemError>;
}

impl<T: LibraryFs + ?Sized> LibraryFs for &T {
    fn ensure_dir(&self, path: &Path) -> Result<(), FilesystemError> {
        (**self).ensure_dir(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<MoveMethod, FilesystemError> {
        (**self).move_file(from, to)
    }
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl LibraryFs for RealFs {
    fn ensure_dir(&self, path: &Path) -> Result<(), FilesystemError> {
        fs::create_dir_all(path).map_err(|source| FilesystemError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as occupied
        fs::symlink_metadata(path).is_ok()
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<MoveMethod, FilesystemError> {
        match fs::rename(from, to) {
            Ok(()) => Ok(MoveMethod::Renamed),
            Err(e) if is_cross_device(&e) => {
                warn!(
                    error = %e,
                    file = %from.display(),
                    "Rename crosses volumes, falling back to copy+remove"
                );
                copy_then_remove(from, to)?;
                Ok(MoveMethod::Copied)
            }
            Err(source) => Err(FilesystemError::Move {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            }),
        }
    }
}

/// `rename` refused because source and destination are on different volumes
fn is_cross_device(e: &io::Error) -> bool {
    // EXDEV on Linux and the BSDs, ERROR_NOT_SAME_DEVICE on Windows
    #[cfg(unix)]
    const CROSS_DEVICE: i32 = 18;
    #[cfg(windows)]
    const CROSS_DEVICE: i32 = 17;
    #[cfg(not(any(unix, windows)))]
    const CROSS_DEVICE: i32 = -1;

    e.raw_os_error() == Some(CROSS_DEVICE)
}

/// Copy `from` to `to`, then delete `from`. On failure exactly one of the
/// two files is left.
fn copy_then_remove(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    if let Err(source) = fs::copy(from, to) {
        // Don't leave a partial copy behind
        let _ = fs::remove_file(to);
        return Err(FilesystemError::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        });
    }

    if let Err(source) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(FilesystemError::Remove {
            path: from.to_path_buf(),
            source,
        });
    }

    Ok(())
}

/// Logs intended mutations without performing them.
///
/// Remembers the destinations it would have filled so a later file bound
/// for the same path is refused, as it would be on a real run.
#[derive(Debug, Default)]
pub struct DryRunFs {
    planned: RefCell<HashSet<PathBuf>>,
}

impl DryRunFs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LibraryFs for DryRunFs {
    fn ensure_dir(&self, path: &Path) -> Result<(), FilesystemError> {
        if !path.is_dir() {
            info!("  Would create directory \"{}\"", path.display());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.planned.borrow().contains(path) || fs::symlink_metadata(path).is_ok()
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<MoveMethod, FilesystemError> {
        info!("  Would move \"{}\" -> \"{}\"", from.display(), to.display());
        self.planned.borrow_mut().insert(to.to_path_buf());
        Ok(MoveMethod::Renamed)
    }
}
