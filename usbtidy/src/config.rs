//! Runtime settings for one run
//!
//! Built from the loaded [`TomlConfig`], then adjusted by command-line
//! flags (see [`crate::cli::Cli::apply`]).

use crate::services::tag_resolver::FieldPriority;
use std::path::PathBuf;
use tracing::{info, warn};
use usbtidy_common::config::{ConfigSource, JanitorConfig, CONFIG_ENV_VAR};
use usbtidy_common::{OnError, TomlConfig};

/// Runtime settings for the organize pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Volume root to organize
    pub root: PathBuf,
    /// Log intended changes without touching the filesystem
    pub dry_run: bool,
    /// Skip the janitor pre-pass
    pub skip_clean: bool,
    pub on_error: OnError,
    /// Sanitize artist/album strings before using them as directory names
    pub sanitize: bool,
    pub priority: FieldPriority,
    pub janitor: JanitorConfig,
    /// Default tracing filter
    pub log_level: String,
}

impl Settings {
    /// Settings for `root` taken from a config file
    pub fn from_config(root: impl Into<PathBuf>, config: &TomlConfig) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
            skip_clean: false,
            on_error: config.organize.on_error,
            sanitize: config.organize.sanitize,
            priority: FieldPriority::from_config(&config.organize),
            janitor: config.janitor.clone(),
            log_level: config.logging.level.clone(),
        }
    }

    /// Settings for `root` with compiled defaults
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &TomlConfig::default())
    }
}

/// Log which configuration this run is using
pub fn report_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::CommandLine(path)
        | ConfigSource::Environment(path)
        | ConfigSource::PlatformDefault(path) => info!("Config: {}", path.display()),
        ConfigSource::EnvironmentMissing(path) => warn!(
            "{} points to missing file {}, using compiled defaults",
            CONFIG_ENV_VAR,
            path.display()
        ),
        ConfigSource::CompiledDefaults => info!("Config: compiled defaults"),
    }
}
