//! Test Helper Utilities
//!
//! Shared utilities for testing usbtidy

#![allow(dead_code)]

pub mod audio_generator;
pub mod fakes;
pub mod log_capture;

// Re-export commonly used items
pub use audio_generator::{generate_test_wav, write_album_track, write_tagged_wav, AudioConfig};
pub use fakes::{touch, FakeReader, RecordingFs};
pub use log_capture::{capture_logs, LogCapture};
