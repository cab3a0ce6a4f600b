//! # usbtidy common library
//!
//! Shared code for the usbtidy workspace:
//! - Error type used by configuration loading
//! - TOML configuration model and config file resolution

pub mod config;
pub mod error;

pub use config::{OnError, TomlConfig};
pub use error::{Error, Result};
