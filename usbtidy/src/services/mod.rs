//! Service modules for the organize workflow
//!
//! Each service owns one stage and its error type. The indexer and the
//! placement engine take their I/O through traits ([`TagReader`],
//! [`LibraryFs`]) so they can run against fakes.

pub mod file_scanner;
pub mod fs_ops;
pub mod janitor;
pub mod library_indexer;
pub mod metadata_extractor;
pub mod placement_engine;
pub mod tag_resolver;

pub use file_scanner::{FileScanner, ScanError, ScanResult};
pub use fs_ops::{DryRunFs, FilesystemError, LibraryFs, MoveMethod, RealFs};
pub use janitor::{Janitor, JanitorReport};
pub use library_indexer::{IndexReport, LibraryIndexer};
pub use metadata_extractor::{MetadataError, MetadataExtractor, TagReader};
pub use placement_engine::{sanitize_component, PlacementEngine, PlacementReport};
pub use tag_resolver::{FieldPriority, Resolution, ResolutionError, SemanticField, TagResolver};
