//! In-memory sounds.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Immutable stereo sample buffer. Cloning shares the samples.
#[derive(Debug, Clone)]
pub struct Sound {
    /// Interleaved left/right frames.
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl Sound {
    /// Load a WAV file.
    ///
    /// Integer formats are scaled to -1.0..1.0. Mono files play on both
    /// sides; channels past the second are dropped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels as usize;

        if spec.sample_rate == 0 {
            return Err(Error::SoundLoad(format!(
                "{} declares a sample rate of 0",
                path.display()
            )));
        }
        if channels == 0 {
            return Err(Error::SoundLoad(format!(
                "{} declares zero channels",
                path.display()
            )));
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let sound = match channels {
            1 => Self::from_mono(&interleaved, spec.sample_rate),
            2 => Self::from_stereo(interleaved, spec.sample_rate),
            n => {
                let stereo = interleaved
                    .chunks_exact(n)
                    .flat_map(|frame| [frame[0], frame[1]])
                    .collect();
                Self::from_stereo(stereo, spec.sample_rate)
            }
        };

        debug!(
            "Loaded {}: {} frames, {} Hz, {} channel(s)",
            path.display(),
            sound.frames(),
            spec.sample_rate,
            channels
        );

        Ok(sound)
    }

    /// Interleaved stereo samples. A trailing half frame is dropped.
    pub fn from_stereo(mut samples: Vec<f32>, sample_rate: u32) -> Self {
        samples.truncate(samples.len() - samples.len() % 2);
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn from_mono(samples: &[f32], sample_rate: u32) -> Self {
        let stereo = samples.iter().flat_map(|&s| [s, s]).collect();
        Self::from_stereo(stereo, sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length in frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Left/right pair at `index`, silence past the end.
    #[inline]
    pub fn frame(&self, index: usize) -> (f32, f32) {
        match self.samples.get(index * 2..index * 2 + 2) {
            Some(&[l, r]) => (l, r),
            _ => (0.0, 0.0),
        }
    }
}
