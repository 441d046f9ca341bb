//! Piano configuration.

use crate::keymap::MAX_OCTAVE;
use crate::{Error, Result};
use arpeggio_core::{LimiterConfig, MixerConfig};
use std::path::PathBuf;

/// Song loaded on the first playback toggle.
pub const DEFAULT_MIDI_FILE: &str = "assets/MIDI/Thomas_Bergersen_-_Made_of_Air_(2_Pianos).mid";

/// Directory holding one `<note>.wav` per key (`A0.wav`, `Bb0.wav`, ...).
pub const DEFAULT_SOUND_DIR: &str = "assets/notes";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PianoConfig {
    pub midi_file: PathBuf,
    pub sound_dir: PathBuf,

    /// Song position the first playback starts from. Once a run reaches the
    /// end, later runs start from 0.
    pub start_position_ms: f64,

    /// Frames a key stays lit after it sounds.
    pub highlight_frames: u32,

    pub left_octave: u8,
    pub right_octave: u8,

    pub mixer: MixerConfig,
    pub limiter: LimiterConfig,
}

impl Default for PianoConfig {
    fn default() -> Self {
        Self {
            midi_file: PathBuf::from(DEFAULT_MIDI_FILE),
            sound_dir: PathBuf::from(DEFAULT_SOUND_DIR),
            start_position_ms: (2 * 60 + 15) as f64 * 1000.0,
            highlight_frames: 30,
            left_octave: 4,
            right_octave: 5,
            mixer: MixerConfig::default(),
            limiter: LimiterConfig::default(),
        }
    }
}

impl PianoConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.start_position_ms.is_finite() || self.start_position_ms < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "start_position_ms {} must be a non-negative number",
                self.start_position_ms
            )));
        }
        if self.highlight_frames == 0 {
            return Err(Error::InvalidConfig(
                "highlight_frames must be at least 1".into(),
            ));
        }
        if self.left_octave > MAX_OCTAVE || self.right_octave > MAX_OCTAVE {
            return Err(Error::InvalidConfig(format!(
                "octaves must be 0-{MAX_OCTAVE} (left {}, right {})",
                self.left_octave, self.right_octave
            )));
        }
        self.mixer.validate()?;
        self.limiter.validate()?;
        Ok(())
    }
}
