//! Audio tag extraction service
//!
//! Reads the tag container of one audio file using lofty and hands it back
//! as a [`TagSet`] keyed by the container's native field identifiers:
//! `TPE2`/`TALB` for ID3v2, `aART`/`soal` for MP4, `ALBUMARTIST` for
//! Vorbis comments, and so on. ID3v1 tags are keyed like ID3v2.
//!
//! The container is detected from the file's content, not its extension.
//! Audio properties are not decoded.

use crate::types::TagSet;
use lofty::config::ParseOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{ItemValue, Tag, TagType};
use std::path::Path;
use thiserror::Error;

/// Metadata extraction errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Container could not be parsed (corrupt header, truncated file)
    #[error("Failed to read file: {0}")]
    ReadError(String),

    /// Content is not a recognized audio container
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Audio file carries no tag container at all
    #[error("No metadata found")]
    NoMetadata,

    /// I/O error (file open/read)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Source of tag sets, one file at a time
pub trait TagReader {
    fn read(&self, path: &Path) -> Result<TagSet, MetadataError>;
}

/// Lofty-backed tag reader
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TagReader for MetadataExtractor {
    fn read(&self, path: &Path) -> Result<TagSet, MetadataError> {
        let probe = Probe::open(path)
            .map_err(|e| MetadataError::ReadError(e.to_string()))?
            .options(ParseOptions::new().read_properties(false))
            .guess_file_type()?;

        if probe.file_type().is_none() {
            let hint = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown content".to_string());
            return Err(MetadataError::UnsupportedFormat(hint));
        }

        let tagged_file = probe
            .read()
            .map_err(|e| MetadataError::ReadError(e.to_string()))?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .ok_or(MetadataError::NoMetadata)?;

        let tags = tag_set_from(tag);

        tracing::trace!(
            file = %path.display(),
            file_type = ?tagged_file.file_type(),
            tag_type = ?tag.tag_type(),
            fields = tags.len(),
            "Extracted tags"
        );

        Ok(tags)
    }
}

/// Convert a lofty tag back into native field identifiers.
///
/// Binary items (pictures, private frames) are dropped.
fn tag_set_from(tag: &Tag) -> TagSet {
    let key_space = native_key_space(tag.tag_type());
    let mut builder = TagSet::builder();

    for item in tag.items() {
        let Some(field) = item.key().map_key(key_space, true) else {
            continue;
        };
        match item.value() {
            ItemValue::Text(text) | ItemValue::Locator(text) => {
                builder.push(field, text);
            }
            ItemValue::Binary(_) => {}
        }
    }

    builder.build()
}

/// ID3v1 has no key names of its own; its fields are a subset of ID3v2's.
fn native_key_space(tag_type: TagType) -> TagType {
    match tag_type {
        TagType::Id3v1 => TagType::Id3v2,
        other => other,
    }
}
