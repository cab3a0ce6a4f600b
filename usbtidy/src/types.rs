//! Core data types shared between the services.
//!
//! These are plain data: no filesystem access and no tag parsing happens
//! here. The services in [`crate::services`] produce and consume them.

use crate::services::tag_resolver::{ResolutionError, SemanticField};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::path::{Path, PathBuf};

/// One tag field's value as stored in the file.
///
/// Multi-valued frames (MP4 list atoms, repeated Vorbis comments, ID3v2.4
/// null-separated text) keep every value in stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Scalar(String),
    Multi(Vec<String>),
}

impl TagValue {
    /// The value a resolver should use: the scalar itself, or the *last*
    /// element of a multi-valued field. `None` for an empty list.
    pub fn authoritative(&self) -> Option<&str> {
        match self {
            TagValue::Scalar(s) => Some(s),
            TagValue::Multi(values) => values.last().map(String::as_str),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Scalar(value.to_string())
    }
}

impl From<Vec<&str>> for TagValue {
    fn from(values: Vec<&str>) -> Self {
        TagValue::Multi(values.into_iter().map(str::to_string).collect())
    }
}

/// All tag fields read from one file, keyed by the container's native
/// field identifier (`TPE2`, `aART`, `ALBUMARTIST`, ...).
///
/// Immutable once built; use [`TagSetBuilder`] to assemble one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    fields: BTreeMap<String, TagValue>,
}

impl TagSet {
    pub fn builder() -> TagSetBuilder {
        TagSetBuilder::default()
    }

    pub fn get(&self, field: &str) -> Option<&TagValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, TagValue)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, TagValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Accumulates text values per field; a field seen twice becomes `Multi`.
#[derive(Debug, Default)]
pub struct TagSetBuilder {
    fields: BTreeMap<String, Vec<String>>,
}

impl TagSetBuilder {
    /// Append one stored value. Embedded NUL separators (ID3v2.4 style
    /// multi-value text) are split into separate values.
    pub fn push(&mut self, field: &str, value: &str) -> &mut Self {
        let values = self.fields.entry(field.to_string()).or_default();
        values.extend(value.split('\0').map(str::to_string));
        self
    }

    pub fn build(self) -> TagSet {
        let fields = self
            .fields
            .into_iter()
            .map(|(field, mut values)| {
                let value = if values.len() == 1 {
                    TagValue::Scalar(values.remove(0))
                } else {
                    TagValue::Multi(values)
                };
                (field, value)
            })
            .collect();
        TagSet { fields }
    }
}

/// The (artist, album) pair a file is filed under.
///
/// Both parts are non-empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedKey {
    artist: String,
    album: String,
}

impl ResolvedKey {
    pub fn new(
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Result<Self, ResolutionError> {
        let artist = artist.into();
        let album = album.into();
        if artist.trim().is_empty() {
            return Err(ResolutionError::Blank(SemanticField::Artist));
        }
        if album.trim().is_empty() {
            return Err(ResolutionError::Blank(SemanticField::Album));
        }
        Ok(Self { artist, album })
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }
}

impl fmt::Display for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \u{2013} {}", self.artist, self.album)
    }
}

/// Albums of one artist, each with its files in walk order
pub type AlbumMap = BTreeMap<String, Vec<PathBuf>>;

/// In-memory grouping of source files: artist → album → files.
///
/// Entries are created on first use and never removed. Lives for one run.
/// Artists and albums iterate in sorted (byte-wise) order, not in the order
/// they were first seen; files keep walk order within an album.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryIndex {
    artists: BTreeMap<String, AlbumMap>,
}

impl LibraryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` to the file list of `key`'s album
    pub fn insert(&mut self, key: &ResolvedKey, path: PathBuf) {
        self.artists
            .entry(key.artist.clone())
            .or_default()
            .entry(key.album.clone())
            .or_default()
            .push(path);
    }

    pub fn artists(&self) -> btree_map::Iter<'_, String, AlbumMap> {
        self.artists.iter()
    }

    pub fn albums(&self, artist: &str) -> Option<&AlbumMap> {
        self.artists.get(artist)
    }

    pub fn files(&self, artist: &str, album: &str) -> Option<&[PathBuf]> {
        self.artists
            .get(artist)
            .and_then(|albums| albums.get(album))
            .map(Vec::as_slice)
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    /// Number of distinct (artist, album) pairs
    pub fn album_count(&self) -> usize {
        self.artists.values().map(BTreeMap::len).sum()
    }

    pub fn file_count(&self) -> usize {
        self.artists
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

/// A file that was left alone because of an error, under the skip policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl FileFailure {
    pub fn new(path: impl AsRef<Path>, reason: impl fmt::Display) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
