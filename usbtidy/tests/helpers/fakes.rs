//! Stand-ins for the indexer's tag reader and the placement filesystem

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use usbtidy::services::fs_ops::{FilesystemError, LibraryFs, MoveMethod, RealFs};
use usbtidy::services::metadata_extractor::{MetadataError, TagReader};
use usbtidy::{TagSet, TagValue};

/// Tag reader answering from a table keyed by file name.
///
/// A file name missing from the table reads as an unsupported format.
#[derive(Default)]
pub struct FakeReader {
    tags: HashMap<String, TagSet>,
}

impl FakeReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `file_name` with arbitrary fields
    pub fn with_tags(mut self, file_name: &str, fields: Vec<(&str, TagValue)>) -> Self {
        self.tags
            .insert(file_name.to_string(), fields.into_iter().collect());
        self
    }

    /// Register `file_name` with album artist (`TPE2`) and album (`TALB`)
    pub fn with_album(self, file_name: &str, artist: &str, album: &str) -> Self {
        self.with_tags(
            file_name,
            vec![("TPE2", artist.into()), ("TALB", album.into())],
        )
    }
}

impl TagReader for FakeReader {
    fn read(&self, path: &Path) -> Result<TagSet, MetadataError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.tags
            .get(&name)
            .cloned()
            .ok_or(MetadataError::UnsupportedFormat(name))
    }
}

/// Real filesystem that records every mutation it is asked for
#[derive(Default)]
pub struct RecordingFs {
    pub ensured: RefCell<Vec<PathBuf>>,
    pub moves: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl RecordingFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_count(&self) -> usize {
        self.moves.borrow().len()
    }
}

impl LibraryFs for RecordingFs {
    fn ensure_dir(&self, path: &Path) -> Result<(), FilesystemError> {
        self.ensured.borrow_mut().push(path.to_path_buf());
        RealFs.ensure_dir(path)
    }

    fn exists(&self, path: &Path) -> bool {
        RealFs.exists(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<MoveMethod, FilesystemError> {
        self.moves
            .borrow_mut()
            .push((from.to_path_buf(), to.to_path_buf()));
        RealFs.move_file(from, to)
    }
}

/// Create a file (and its parents) holding `contents`
pub fn touch(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}
