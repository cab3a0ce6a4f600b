//! usbtidy library interface
//!
//! Organizes the audio files on a removable volume into `Artist/Album/File`
//! using their embedded tags, and strips the clutter desktop operating
//! systems leave behind so a car head-unit's file browser shows a clean
//! library.
//!
//! Stages of one run, in order:
//! - [`services::janitor`]: dot-directories, `LOST.DIR`, AppleDouble sidecars
//! - [`services::library_indexer`]: walk + read tags + resolve (artist, album)
//! - [`services::placement_engine`]: create directories, move files
//!
//! [`pipeline::run`] drives all of them from a [`config::Settings`].

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod types;

pub use crate::error::{Error, Result};
pub use crate::types::{LibraryIndex, ResolvedKey, TagSet, TagValue};
