//! Clip sources — the audio-access collaborator.
//!
//! The core never touches storage itself: a [`ClipSource`] hands it fully
//! materialized sample buffers with their native rates. [`WavClipSource`]
//! is the provided baseline implementation reading WAV files from a root
//! directory.

use std::path::{Path, PathBuf};

use crate::error::{AssembleError, Result};

/// One loaded clip: channel-major samples plus the native sample rate.
///
/// A mono clip has exactly one channel; a multi-channel clip contributes
/// one row per channel when stacked.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// Channel-major samples.
    pub channels: Vec<Vec<f32>>,
    /// The rate the clip was recorded at, in Hz.
    pub sample_rate: u32,
}

/// Supplies per-clip sample buffers to the assembler.
///
/// Implementations load from whatever backs the dataset (files, archives,
/// network caches); the assembler only requires that a returned clip is
/// complete and channel-major.
pub trait ClipSource {
    /// Loads one clip by identifier.
    fn load_clip(&self, id: &str) -> Result<Clip>;
}

/// Reads clips as WAV files resolved against a root directory.
///
/// The clip identifier is the file path relative to the root, with or
/// without the `.wav` extension. Integer samples are normalized to
/// `[-1, 1]` float.
#[derive(Debug, Clone)]
pub struct WavClipSource {
    root: PathBuf,
}

impl WavClipSource {
    /// Creates a source rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, id: &str) -> PathBuf {
        let direct = self.root.join(id);
        if direct.exists() || id.ends_with(".wav") {
            direct
        } else {
            self.root.join(format!("{id}.wav"))
        }
    }
}

impl ClipSource for WavClipSource {
    fn load_clip(&self, id: &str) -> Result<Clip> {
        let path = self.resolve(id);
        tracing::debug!("loading clip '{}' from {}", id, path.display());
        let reader = hound::WavReader::open(&path).map_err(|e| AssembleError::ClipLoad {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        if channels == 0 {
            return Err(AssembleError::ClipLoad {
                id: id.to_string(),
                reason: "WAV declares zero channels".to_string(),
            });
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| AssembleError::ClipLoad {
                    id: id.to_string(),
                    reason: e.to_string(),
                })?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| AssembleError::ClipLoad {
                        id: id.to_string(),
                        reason: e.to_string(),
                    })?
            }
        };

        let frames = interleaved.len() / channels;
        let mut deinterleaved = vec![Vec::with_capacity(frames); channels];
        for (i, sample) in interleaved.into_iter().enumerate() {
            deinterleaved[i % channels].push(sample);
        }
        Ok(Clip {
            channels: deinterleaved,
            sample_rate: spec.sample_rate,
        })
    }
}
