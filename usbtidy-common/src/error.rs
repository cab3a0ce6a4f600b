//! Error types shared by the usbtidy crates

use thiserror::Error;

/// Result type for config loading
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while locating, reading or validating configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Config file missing, unreadable, malformed or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}
