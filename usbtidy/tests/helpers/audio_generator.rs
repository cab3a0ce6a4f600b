//! Audio Test Fixture Generator
//!
//! Writes short WAV files with hound and tags them with an ID3v2 chunk
//! through lofty, the same container a tagged `.wav` from a ripper carries.

use lofty::config::WriteOptions;
use lofty::tag::{ItemKey, Tag, TagExt, TagType};
use std::path::{Path, PathBuf};

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 0.1,
            sample_rate: 8000,
            channels: 1,
        }
    }
}

/// Generate an untagged test WAV file (440Hz tone)
pub fn generate_test_wav(path: &Path, config: &AudioConfig) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;

    for i in 0..total_samples {
        let t = i as f32 / config.sample_rate as f32;
        let sample = (0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin() * i16::MAX as f32) as i16;
        for _ in 0..config.channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}

/// Generate a WAV file carrying an ID3v2 tag with `fields`
pub fn write_tagged_wav(path: &Path, fields: &[(ItemKey, &str)]) -> anyhow::Result<PathBuf> {
    generate_test_wav(path, &AudioConfig::default())?;

    let mut tag = Tag::new(TagType::Id3v2);
    for (key, value) in fields {
        tag.insert_text(key.clone(), value.to_string());
    }
    tag.save_to_path(path, WriteOptions::default())?;

    Ok(path.to_path_buf())
}

/// Generate a WAV file tagged with album artist (`TPE2`) and album (`TALB`)
pub fn write_album_track(path: &Path, artist: &str, album: &str) -> anyhow::Result<PathBuf> {
    write_tagged_wav(
        path,
        &[(ItemKey::AlbumArtist, artist), (ItemKey::AlbumTitle, album)],
    )
}
