//! Pipeline orchestration
//!
//! Runs the stages in order: janitor pre-pass, index, place, and the
//! optional prune of emptied directories. Each stage finishes before the
//! next starts.

use crate::config::Settings;
use crate::error::Result;
use crate::services::fs_ops::{DryRunFs, LibraryFs, RealFs};
use crate::services::janitor::{Janitor, JanitorReport};
use crate::services::library_indexer::{IndexReport, LibraryIndexer};
use crate::services::metadata_extractor::{MetadataExtractor, TagReader};
use crate::services::placement_engine::{PlacementEngine, PlacementReport};
use crate::services::tag_resolver::TagResolver;
use crate::types::LibraryIndex;
use tracing::info;

/// What one run did
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Pre-pass cleanup plus the post-placement prune
    pub cleanup: JanitorReport,
    pub index: IndexReport,
    pub placement: PlacementReport,
}

impl RunSummary {
    /// Files that were skipped because of an error, plus entries the walk
    /// could not read
    pub fn failed(&self) -> usize {
        self.index.failures.len() + self.index.walk_errors.len() + self.placement.failures.len()
    }
}

/// Run the full organize pipeline with the lofty tag reader
pub fn run(settings: &Settings) -> Result<RunSummary> {
    run_with_reader(settings, MetadataExtractor::new())
}

/// Run the full organize pipeline reading tags through `reader`
pub fn run_with_reader<R: TagReader>(settings: &Settings, reader: R) -> Result<RunSummary> {
    let root = settings.root.as_path();
    let janitor = Janitor::new().dry_run(settings.dry_run);
    let mut summary = RunSummary::default();

    if settings.dry_run {
        info!("Dry run: nothing on the volume will change.");
    }

    // Phase 1: Cleanup
    if settings.skip_clean {
        info!("Skipping cleanup.");
    } else {
        summary.cleanup = janitor.pre_pass(root, &settings.janitor)?;
    }

    // Phase 2: Index
    info!("Indexing library.");
    let indexer = LibraryIndexer::new(reader, TagResolver::new(settings.priority.clone()))
        .with_on_error(settings.on_error);
    let (index, index_report) = indexer.index(root)?;
    summary.index = index_report;

    // Phase 3: Place
    info!("Organizing files.");
    summary.placement = if settings.dry_run {
        place(settings, &index, DryRunFs::new())?
    } else {
        place(settings, &index, RealFs)?
    };

    // Phase 4: Prune
    if settings.janitor.prune_empty_dirs {
        summary.cleanup += janitor.prune_empty_dirs(root)?;
    }

    info!(
        indexed = summary.index.files_indexed,
        moved = summary.placement.relocated(),
        already_placed = summary.placement.already_placed,
        failed = summary.failed(),
        "Done."
    );

    Ok(summary)
}

fn place<F: LibraryFs>(
    settings: &Settings,
    index: &LibraryIndex,
    fs: F,
) -> Result<PlacementReport> {
    let engine = PlacementEngine::new(fs)
        .with_sanitize(settings.sanitize)
        .with_on_error(settings.on_error);
    Ok(engine.place(&settings.root, index)?)
}
