//! Volume cleanup
//!
//! Removes what desktop operating systems leave on a removable volume:
//! dot-directories (`.Spotlight-V100`, `.Trashes`, `.fseventsd`, ...), an
//! empty Android `LOST.DIR`, AppleDouble `._*` sidecar files and
//! `.DS_Store`. After organizing, optionally prunes directories that the
//! moves left empty.
//!
//! Every step tolerates its targets being absent.

use crate::services::fs_ops::FilesystemError;
use std::fs;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use usbtidy_common::config::JanitorConfig;
use walkdir::WalkDir;

/// Name of the directory Android creates for recovered file fragments
pub const LOST_DIR: &str = "LOST.DIR";

/// Finder's per-directory view settings file
const DS_STORE: &str = ".DS_Store";

/// Prefix of AppleDouble resource-fork sidecar files
const APPLE_DOUBLE_PREFIX: &str = "._";

/// Cleanup counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JanitorReport {
    pub dirs_removed: usize,
    pub files_removed: usize,
}

impl AddAssign for JanitorReport {
    fn add_assign(&mut self, other: Self) {
        self.dirs_removed += other.dirs_removed;
        self.files_removed += other.files_removed;
    }
}

/// Removes desktop OS artifacts from a volume
#[derive(Debug, Clone, Copy, Default)]
pub struct Janitor {
    dry_run: bool,
}

impl Janitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only log what would be removed
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the cleanup steps enabled in `config`, in the order
    /// `LOST.DIR` → dot-directories → dotfiles.
    pub fn pre_pass(
        &self,
        root: &Path,
        config: &JanitorConfig,
    ) -> Result<JanitorReport, FilesystemError> {
        let mut report = JanitorReport::default();
        if config.remove_lost_dir {
            report += self.remove_lost_dir(root)?;
        }
        if config.remove_dot_dirs {
            report += self.remove_dot_dirs(root)?;
        }
        if config.clean_dotfiles {
            report += self.clean_dotfiles(root)?;
        }
        Ok(report)
    }

    /// Remove `root/LOST.DIR` if it exists and is empty
    pub fn remove_lost_dir(&self, root: &Path) -> Result<JanitorReport, FilesystemError> {
        info!("Checking for `{}` to remove.", LOST_DIR);
        let path = root.join(LOST_DIR);
        if !path.is_dir() {
            info!("  Not present, skipping.");
            return Ok(JanitorReport::default());
        }

        if !is_empty_dir(&path)? {
            warn!("  `{}` is not empty, leaving it in place.", LOST_DIR);
            return Ok(JanitorReport::default());
        }

        info!("  Removing `{}`.", LOST_DIR);
        self.remove_dir(&path)?;
        Ok(JanitorReport {
            dirs_removed: 1,
            files_removed: 0,
        })
    }

    /// Remove every directory below `root` whose name starts with a dot
    pub fn remove_dot_dirs(&self, root: &Path) -> Result<JanitorReport, FilesystemError> {
        info!("Removing dot-directories.");
        let targets = collect_dot_dirs(root);

        for dir in &targets {
            info!("  Removing \"{}\"", dir.display());
            if !self.dry_run {
                fs::remove_dir_all(dir).map_err(|source| FilesystemError::Remove {
                    path: dir.clone(),
                    source,
                })?;
            }
        }

        Ok(JanitorReport {
            dirs_removed: targets.len(),
            files_removed: 0,
        })
    }

    /// Delete AppleDouble `._*` sidecars and `.DS_Store` files
    pub fn clean_dotfiles(&self, root: &Path) -> Result<JanitorReport, FilesystemError> {
        info!("Cleaning up dotfiles.");
        let targets: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_desktop_dotfile(entry.file_name()))
            .map(|entry| entry.into_path())
            .collect();

        for file in &targets {
            debug!("  Removing \"{}\"", file.display());
            if !self.dry_run {
                fs::remove_file(file).map_err(|source| FilesystemError::Remove {
                    path: file.clone(),
                    source,
                })?;
            }
        }

        info!("  Removed {} dotfiles.", targets.len());
        Ok(JanitorReport {
            dirs_removed: 0,
            files_removed: targets.len(),
        })
    }

    /// Remove directories below `root` that are empty, deepest first, so
    /// a chain of nested empty directories goes in one pass. `root` itself
    /// is kept.
    pub fn prune_empty_dirs(&self, root: &Path) -> Result<JanitorReport, FilesystemError> {
        info!("Pruning empty directories.");
        let mut report = JanitorReport::default();

        let dirs: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.into_path())
            .collect();

        for dir in dirs {
            if is_empty_dir(&dir)? {
                debug!("  Removing empty \"{}\"", dir.display());
                self.remove_dir(&dir)?;
                report.dirs_removed += 1;
            }
        }

        Ok(report)
    }

    fn remove_dir(&self, path: &Path) -> Result<(), FilesystemError> {
        if self.dry_run {
            return Ok(());
        }
        fs::remove_dir(path).map_err(|source| FilesystemError::Remove {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Top-most dot-directories below `root`; their contents go with them
fn collect_dot_dirs(root: &Path) -> Vec<PathBuf> {
    let mut targets = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error accessing entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.') {
            targets.push(entry.into_path());
            walker.skip_current_dir();
        }
    }

    targets
}

fn is_desktop_dotfile(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name == DS_STORE || name.starts_with(APPLE_DOUBLE_PREFIX)
}

fn is_empty_dir(path: &Path) -> Result<bool, FilesystemError> {
    let mut entries = fs::read_dir(path).map_err(|source| FilesystemError::ReadDir {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(entries.next().is_none())
}
