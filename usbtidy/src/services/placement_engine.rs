//! Placement engine
//!
//! Materializes `root/artist/album` for every bucket of a [`LibraryIndex`]
//! and moves each file into its album directory, keeping the file name.
//!
//! - A file already at its destination is skipped without touching the
//!   filesystem, so a second run over the same index is a no-op.
//! - A destination occupied by a different file is never overwritten; the
//!   move is refused with [`FilesystemError::DestinationExists`].
//! - Nothing is transactional. Under [`OnError::Abort`] the first failure
//!   stops placement with earlier moves already done.

use crate::services::fs_ops::{FilesystemError, LibraryFs, MoveMethod};
use crate::types::{FileFailure, LibraryIndex};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use usbtidy_common::OnError;

/// Placement counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementReport {
    /// Files renamed into place
    pub moved: usize,
    /// Files copied then deleted (rename was not possible)
    pub copied: usize,
    /// Files that were already where they belong
    pub already_placed: usize,
    /// Files left where they were because of an error (skip policy only)
    pub failures: Vec<FileFailure>,
}

impl PlacementReport {
    pub fn relocated(&self) -> usize {
        self.moved + self.copied
    }
}

/// Moves indexed files into `Artist/Album` directories
pub struct PlacementEngine<F: LibraryFs> {
    fs: F,
    sanitize: bool,
    on_error: OnError,
}

impl<F: LibraryFs> PlacementEngine<F> {
    /// New engine with sanitized directory names and abort-on-error
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            sanitize: true,
            on_error: OnError::Abort,
        }
    }

    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    /// Directory an artist's albums live in
    pub fn artist_dir(&self, root: &Path, artist: &str) -> PathBuf {
        root.join(self.dir_name(artist))
    }

    /// Directory an album's files are placed in
    pub fn album_dir(&self, root: &Path, artist: &str, album: &str) -> PathBuf {
        self.artist_dir(root, artist).join(self.dir_name(album))
    }

    fn dir_name(&self, value: &str) -> String {
        if self.sanitize {
            sanitize_component(value)
        } else {
            value.to_string()
        }
    }

    /// Place every file of `index` under `root`
    pub fn place(
        &self,
        root: &Path,
        index: &LibraryIndex,
    ) -> Result<PlacementReport, FilesystemError> {
        let mut report = PlacementReport::default();

        for (artist, albums) in index.artists() {
            let artist_dir = self.artist_dir(root, artist);
            info!("  Ensuring directory \"{}\"", artist_dir.display());
            if let Err(e) = self.fs.ensure_dir(&artist_dir) {
                let files = albums.values().flatten();
                self.fail_all(files, e, &mut report)?;
                continue;
            }

            for (album, files) in albums {
                let album_dir = self.album_dir(root, artist, album);
                info!("  Ensuring directory \"{}\"", album_dir.display());
                if let Err(e) = self.fs.ensure_dir(&album_dir) {
                    self.fail_all(files.iter(), e, &mut report)?;
                    continue;
                }

                for file in files {
                    match self.place_file(file, &album_dir) {
                        Ok(Placed::AlreadyThere) => report.already_placed += 1,
                        Ok(Placed::Moved(MoveMethod::Renamed)) => report.moved += 1,
                        Ok(Placed::Moved(MoveMethod::Copied)) => report.copied += 1,
                        Err(e) => self.fail(file, e, &mut report)?,
                    }
                }
            }
        }

        info!(
            moved = report.relocated(),
            already_placed = report.already_placed,
            failed = report.failures.len(),
            "Placement complete"
        );

        Ok(report)
    }

    fn place_file(&self, file: &Path, album_dir: &Path) -> Result<Placed, FilesystemError> {
        let file_name = file
            .file_name()
            .ok_or_else(|| FilesystemError::NoFileName(file.to_path_buf()))?;
        let destination = album_dir.join(file_name);

        if file == destination {
            debug!("  \"{}\" exists. Skipping.", file.display());
            return Ok(Placed::AlreadyThere);
        }

        if self.fs.exists(&destination) {
            return Err(FilesystemError::DestinationExists {
                from: file.to_path_buf(),
                to: destination,
            });
        }

        debug!("  Moving \"{}\" -> \"{}\"", file.display(), album_dir.display());
        self.fs.move_file(file, &destination).map(Placed::Moved)
    }

    /// Record or propagate a per-file failure according to the policy
    fn fail(
        &self,
        file: &Path,
        error: FilesystemError,
        report: &mut PlacementReport,
    ) -> Result<(), FilesystemError> {
        match self.on_error {
            OnError::Abort => Err(error),
            OnError::Skip => {
                warn!(file = %file.display(), "Left in place: {}", error);
                report.failures.push(FileFailure::new(file, &error));
                Ok(())
            }
        }
    }

    /// A directory could not be created: every file bound for it fails
    fn fail_all<'a>(
        &self,
        files: impl Iterator<Item = &'a PathBuf>,
        error: FilesystemError,
        report: &mut PlacementReport,
    ) -> Result<(), FilesystemError> {
        match self.on_error {
            OnError::Abort => Err(error),
            OnError::Skip => {
                warn!("{}", error);
                report
                    .failures
                    .extend(files.map(|file| FileFailure::new(file, &error)));
                Ok(())
            }
        }
    }
}

enum Placed {
    AlreadyThere,
    Moved(MoveMethod),
}

/// Make a tag value safe to use as one directory name on a FAT volume.
///
/// Path separators, FAT-reserved characters and control characters become
/// `_`. Leading dots are dropped so the directory is not hidden (the
/// janitor would delete it on the next run); trailing dots and spaces are
/// dropped because FAT strips them. A name with nothing left becomes `_`.
pub fn sanitize_component(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced
        .trim()
        .trim_start_matches('.')
        .trim_end_matches(|c| c == '.' || c == ' ')
        .trim();

    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}
