//! Command-line arguments

use crate::config::Settings;
use clap::Parser;
use std::path::PathBuf;
use usbtidy_common::OnError;

/// usbtidy - Sort a music stick into Artist/Album folders
///
/// Reads the tags of every file under ROOT, moves each file into
/// ROOT/<artist>/<album>/, and removes the hidden clutter desktop systems
/// leave on removable volumes.
#[derive(Parser, Debug)]
#[command(name = "usbtidy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root folder of the volume to organize
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Log every tag resolution and move/skip decision
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file (overrides USBTIDY_CONFIG and the platform default)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip files that cannot be classified or moved instead of stopping
    #[arg(short, long)]
    pub keep_going: bool,

    /// Show what would change without touching the volume
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Do not remove dot-directories, LOST.DIR or dotfiles first
    #[arg(long)]
    pub skip_clean: bool,

    /// Remove directories left empty after organizing
    #[arg(long)]
    pub prune_empty: bool,

    /// Use artist and album names as directory names verbatim.
    /// WARNING: a name starting with '.' becomes a hidden directory, and the
    /// dot-directory cleanup deletes it with its contents on the next run
    #[arg(long)]
    pub no_sanitize: bool,
}

impl Cli {
    /// Layer the flags that were given over `settings`
    pub fn apply(&self, settings: &mut Settings) {
        settings.root = self.root.clone();
        settings.dry_run |= self.dry_run;
        settings.skip_clean |= self.skip_clean;
        if self.keep_going {
            settings.on_error = OnError::Skip;
        }
        if self.prune_empty {
            settings.janitor.prune_empty_dirs = true;
        }
        if self.no_sanitize {
            settings.sanitize = false;
        }
    }

    /// Tracing filter: `-v` forces debug, otherwise the configured level
    pub fn log_filter(&self, configured: &str) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            configured.to_string()
        }
    }

    /// ROOT must exist and be a directory
    pub fn validate(&self) -> Result<(), String> {
        if !self.root.exists() {
            return Err(format!(
                "Root folder does not exist: {}\n\n  Tip: Check the volume is mounted.\n  Example:\n    usbtidy /media/$USER/MUSIC",
                self.root.display()
            ));
        }
        if !self.root.is_dir() {
            return Err(format!("Root is not a directory: {}", self.root.display()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from(["usbtidy", "-k", "-n", "--prune-empty", "--no-sanitize", "/mnt/usb"]);
        let mut settings = Settings::new("/elsewhere");

        cli.apply(&mut settings);

        assert_eq!(settings.root, PathBuf::from("/mnt/usb"));
        assert_eq!(settings.on_error, OnError::Skip);
        assert!(settings.dry_run);
        assert!(settings.janitor.prune_empty_dirs);
        assert!(!settings.sanitize);
        assert!(!settings.skip_clean);
    }

    #[test]
    fn test_absent_flags_keep_config_values() {
        let cli = Cli::parse_from(["usbtidy", "/mnt/usb"]);
        let mut settings = Settings::new("/mnt/usb");
        settings.on_error = OnError::Skip;
        settings.janitor.prune_empty_dirs = true;

        cli.apply(&mut settings);

        assert_eq!(settings.on_error, OnError::Skip);
        assert!(settings.janitor.prune_empty_dirs);
        assert!(settings.sanitize);
    }

    #[test]
    fn test_verbose_forces_debug() {
        let cli = Cli::parse_from(["usbtidy", "-v", "/mnt/usb"]);
        assert_eq!(cli.log_filter("warn"), "debug");

        let cli = Cli::parse_from(["usbtidy", "/mnt/usb"]);
        assert_eq!(cli.log_filter("warn"), "warn");
    }

    #[test]
    fn test_validate_rejects_missing_and_file_roots() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("track.mp3");
        std::fs::write(&file, b"").unwrap();

        let cli_for = |root: &std::path::Path| Cli::parse_from([OsStr::new("usbtidy"), root.as_os_str()]);

        assert!(cli_for(&dir.path().join("nope")).validate().is_err());
        assert!(cli_for(&file).validate().is_err());
        assert!(cli_for(dir.path()).validate().is_ok());
    }

    #[test]
    fn test_root_is_required() {
        assert!(Cli::try_parse_from(["usbtidy"]).is_err());
    }

    #[test]
    fn test_no_sanitize_help_warns_about_hidden_dirs() {
        use clap::CommandFactory;

        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("hidden directory"), "{}", help);
    }
}
