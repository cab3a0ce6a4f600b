//! Configuration loading and config file resolution
//!
//! Config file resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. `USBTIDY_CONFIG` environment variable
//! 3. `<platform config dir>/usbtidy/config.toml`
//! 4. Compiled defaults (fallback)
//!
//! A missing file at the platform location is not an error. A file that was
//! named explicitly on the command line must exist.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an alternate config file
pub const CONFIG_ENV_VAR: &str = "USBTIDY_CONFIG";

/// Artist field candidates, highest priority first.
///
/// The leading four are ID3v2 album artist, ID3v2 track artist, MP4 album
/// artist and MP4 artist sort order. The rest cover the MP4 track artist,
/// Vorbis comments and APE.
pub const DEFAULT_ARTIST_FIELDS: &[&str] = &[
    "TPE2",
    "TPE1",
    "aART",
    "soar",
    "\u{a9}ART",
    "ALBUMARTIST",
    "ARTIST",
    "Album Artist",
    "Artist",
];

/// Album field candidates, highest priority first.
pub const DEFAULT_ALBUM_FIELDS: &[&str] = &["TALB", "soal", "\u{a9}alb", "ALBUM", "Album"];

/// What to do when a single file cannot be classified or moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Stop the whole run on the first failure
    #[default]
    Abort,
    /// Log the failure, leave the file where it is, and continue
    Skip,
}

/// Top-level contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub organize: OrganizeConfig,
    pub janitor: JanitorConfig,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when neither `-v` nor `RUST_LOG` is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[organize]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeConfig {
    pub on_error: OnError,
    /// Replace path separators and FAT-reserved characters in directory names
    pub sanitize: bool,
    pub artist_fields: Vec<String>,
    pub album_fields: Vec<String>,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            on_error: OnError::default(),
            sanitize: true,
            artist_fields: DEFAULT_ARTIST_FIELDS.iter().map(|s| s.to_string()).collect(),
            album_fields: DEFAULT_ALBUM_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// `[janitor]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    pub remove_lost_dir: bool,
    pub remove_dot_dirs: bool,
    pub clean_dotfiles: bool,
    /// Remove directories left empty after organizing (off unless asked for)
    pub prune_empty_dirs: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            remove_lost_dir: true,
            remove_dot_dirs: true,
            clean_dotfiles: true,
            prune_empty_dirs: false,
        }
    }
}

impl TomlConfig {
    /// Parse and validate a config file's contents
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read {} failed: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject configurations the organizer cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.organize.artist_fields.is_empty() {
            return Err(Error::Config(
                "organize.artist_fields must list at least one tag field".to_string(),
            ));
        }
        if self.organize.album_fields.is_empty() {
            return Err(Error::Config(
                "organize.album_fields must list at least one tag field".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    /// `USBTIDY_CONFIG` named a file that does not exist; compiled defaults
    /// were used instead
    EnvironmentMissing(PathBuf),
    PlatformDefault(PathBuf),
    CompiledDefaults,
}

/// Resolves and loads the config file for one invocation
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Pick the config file to use, without reading it
    pub fn resolve(&self) -> ConfigSource {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return ConfigSource::CommandLine(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return ConfigSource::Environment(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config directory
        if let Some(path) = platform_config_path() {
            if path.is_file() {
                return ConfigSource::PlatformDefault(path);
            }
        }

        // Priority 4: Compiled defaults
        ConfigSource::CompiledDefaults
    }

    /// Resolve and load the configuration
    ///
    /// An explicit `--config` path that cannot be read is an error. A stale
    /// `USBTIDY_CONFIG` falls back to the defaults and is reported as
    /// [`ConfigSource::EnvironmentMissing`], for the caller to warn about
    /// once logging is up.
    pub fn load(&self) -> Result<(TomlConfig, ConfigSource)> {
        let source = match self.resolve() {
            ConfigSource::Environment(path) if !path.is_file() => {
                ConfigSource::EnvironmentMissing(path)
            }
            resolved => resolved,
        };

        let config = match &source {
            ConfigSource::CommandLine(path) => {
                if !path.is_file() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                TomlConfig::load(path)?
            }
            ConfigSource::Environment(path) => TomlConfig::load(path)?,
            ConfigSource::PlatformDefault(path) => TomlConfig::load(path)?,
            ConfigSource::EnvironmentMissing(_) | ConfigSource::CompiledDefaults => {
                debug!("No config file found, using compiled defaults");
                TomlConfig::default()
            }
        };

        if let ConfigSource::CommandLine(path)
        | ConfigSource::Environment(path)
        | ConfigSource::PlatformDefault(path) = &source
        {
            debug!("Config file: {}", path.display());
        }

        Ok((config, source))
    }
}

/// `<config dir>/usbtidy/config.toml` for the current platform
pub fn platform_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("usbtidy").join("config.toml"))
}
