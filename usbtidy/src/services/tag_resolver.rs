//! Tag resolution
//!
//! Picks the one authoritative artist and album for a file out of the
//! several tag fields that may carry them. Candidate fields are tried in
//! priority order and the first one present wins; for a multi-valued field
//! the last value wins.
//!
//! Nothing here touches the filesystem.

use crate::types::{ResolvedKey, TagSet};
use std::fmt;
use thiserror::Error;
use usbtidy_common::config::{OrganizeConfig, DEFAULT_ALBUM_FIELDS, DEFAULT_ARTIST_FIELDS};

/// The two values a file is classified by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticField {
    Artist,
    Album,
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticField::Artist => f.write_str("artist"),
            SemanticField::Album => f.write_str("album"),
        }
    }
}

/// Resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// None of the candidate fields is present in the tag set
    #[error("no {field} tag (looked for {})", .candidates.join(", "))]
    NotFound {
        field: SemanticField,
        candidates: Vec<String>,
    },

    /// The winning field holds only whitespace
    #[error("{0} tag is blank")]
    Blank(SemanticField),
}

/// Outcome of scanning one candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    NotFound,
}

impl Resolution {
    pub fn ok_or(self, err: ResolutionError) -> Result<String, ResolutionError> {
        match self {
            Resolution::Resolved(value) => Ok(value),
            Resolution::NotFound => Err(err),
        }
    }
}

/// Resolve one semantic value from `tags` using `fields` in priority order.
///
/// A field holding an empty list counts as absent.
pub fn resolve<S: AsRef<str>>(tags: &TagSet, fields: &[S]) -> Resolution {
    fields
        .iter()
        .filter_map(|field| tags.get(field.as_ref()))
        .find_map(|value| value.authoritative())
        .map(|value| Resolution::Resolved(value.to_string()))
        .unwrap_or(Resolution::NotFound)
}

/// Candidate field lists for artist and album, highest priority first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPriority {
    pub artist: Vec<String>,
    pub album: Vec<String>,
}

impl FieldPriority {
    pub fn new(artist: Vec<String>, album: Vec<String>) -> Self {
        Self { artist, album }
    }

    pub fn from_config(config: &OrganizeConfig) -> Self {
        Self::new(config.artist_fields.clone(), config.album_fields.clone())
    }

    fn candidates(&self, field: SemanticField) -> &[String] {
        match field {
            SemanticField::Artist => &self.artist,
            SemanticField::Album => &self.album,
        }
    }
}

impl Default for FieldPriority {
    fn default() -> Self {
        Self::new(
            DEFAULT_ARTIST_FIELDS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_ALBUM_FIELDS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

/// Turns a [`TagSet`] into a [`ResolvedKey`]
#[derive(Debug, Clone, Default)]
pub struct TagResolver {
    priority: FieldPriority,
}

impl TagResolver {
    pub fn new(priority: FieldPriority) -> Self {
        Self { priority }
    }

    pub fn resolve_field(
        &self,
        tags: &TagSet,
        field: SemanticField,
    ) -> Result<String, ResolutionError> {
        let candidates = self.priority.candidates(field);
        resolve(tags, candidates).ok_or(ResolutionError::NotFound {
            field,
            candidates: candidates.to_vec(),
        })
    }

    pub fn resolve_key(&self, tags: &TagSet) -> Result<ResolvedKey, ResolutionError> {
        let artist = self.resolve_field(tags, SemanticField::Artist)?;
        let album = self.resolve_field(tags, SemanticField::Album)?;
        ResolvedKey::new(artist, album)
    }
}
