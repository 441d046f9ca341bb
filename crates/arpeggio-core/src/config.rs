//! Mixer configuration.

use crate::{Error, Result};

/// Configuration for the voice mixer and its output stream.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Number of voice channels, i.e. the most sounds that can ring at once.
    pub channels: usize,

    /// Output device index, `None` for the host default.
    pub output_device: Option<usize>,

    /// Capacity of the control -> audio command queue.
    pub command_capacity: usize,

    /// Rate used until a device reports its own (offline rendering, tests).
    pub sample_rate: f64,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            channels: 512,
            output_device: None,
            command_capacity: 4096,
            sample_rate: 44100.0,
        }
    }
}

impl MixerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::InvalidConfig("mixer needs at least one channel".into()));
        }
        if self.command_capacity == 0 {
            return Err(Error::InvalidConfig(
                "command_capacity must be non-zero".into(),
            ));
        }
        if self.sample_rate < 8000.0 || self.sample_rate > 384000.0 {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        Ok(())
    }
}
