//! Builder for configuring and constructing a [`PianoEngine`].

use crate::config::PianoConfig;
use crate::sounds::SoundBank;
use crate::{PianoEngine, Result};
use arpeggio_core::{channel_pool, MixerRenderer};
use arpeggio_midi::Keyboard;
use std::path::PathBuf;

#[cfg(feature = "std")]
use arpeggio_core::AudioSystem;

enum SoundSource {
    Directory,
    Synthesized,
    Bank(SoundBank),
}

/// Key sounds come from `config.sound_dir` unless
/// [`synthesized_sounds`](Self::synthesized_sounds) or
/// [`sounds`](Self::sounds) says otherwise.
///
/// # Example
///
/// ```ignore
/// use arpeggio::prelude::*;
///
/// let piano = PianoEngine::builder()
///     .midi_file("assets/MIDI/song.mid")
///     .start_position_ms(0.0)
///     .channels(256)
///     .build()?;
/// ```
pub struct PianoEngineBuilder {
    config: PianoConfig,
    sounds: SoundSource,
}

impl Default for PianoEngineBuilder {
    fn default() -> Self {
        Self {
            config: PianoConfig::default(),
            sounds: SoundSource::Directory,
        }
    }
}

impl PianoEngineBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: PianoConfig) -> Self {
        self.config = config;
        self
    }

    /// Song loaded on the first playback toggle.
    pub fn midi_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.midi_file = path.into();
        self
    }

    /// Directory of per-key WAV samples.
    pub fn sound_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sound_dir = path.into();
        self.sounds = SoundSource::Directory;
        self
    }

    /// Use generated tones instead of sample files.
    pub fn synthesized_sounds(mut self) -> Self {
        self.sounds = SoundSource::Synthesized;
        self
    }

    /// Use an already loaded sound bank.
    pub fn sounds(mut self, bank: SoundBank) -> Self {
        self.sounds = SoundSource::Bank(bank);
        self
    }

    /// Song position of the first playback start (default: 2:15).
    pub fn start_position_ms(mut self, position_ms: f64) -> Self {
        self.config.start_position_ms = position_ms;
        self
    }

    /// Frames a key stays lit (default: 30).
    pub fn highlight_frames(mut self, frames: u32) -> Self {
        self.config.highlight_frames = frames;
        self
    }

    /// Set number of mixer channels (default: 512).
    pub fn channels(mut self, count: usize) -> Self {
        self.config.mixer.channels = count;
        self
    }

    /// Set output device index (default: host default device).
    pub fn output_device(mut self, index: usize) -> Self {
        self.config.mixer.output_device = Some(index);
        self
    }

    /// Open the output device and build the engine on it.
    #[cfg(feature = "std")]
    pub fn build(self) -> Result<PianoEngine> {
        self.config.validate()?;

        let audio = AudioSystem::builder()
            .config(self.config.mixer.clone())
            .build()?;
        let sounds = resolve_sounds(self.sounds, &self.config, audio.sample_rate())?;
        let engine = PianoEngine::new(audio.mixer().clone(), sounds, self.config)?;

        Ok(engine.with_audio(audio))
    }

    /// Build without an output device.
    ///
    /// The returned renderer mixes at `config.mixer.sample_rate`; the caller
    /// pulls audio from it with [`MixerRenderer::process`].
    pub fn build_offline(self) -> Result<(PianoEngine, MixerRenderer)> {
        self.config.validate()?;

        let (mixer, renderer) = channel_pool(&self.config.mixer)?;
        let sounds = resolve_sounds(self.sounds, &self.config, renderer.sample_rate())?;
        let engine = PianoEngine::new(mixer, sounds, self.config)?;

        Ok((engine, renderer))
    }
}

fn resolve_sounds(source: SoundSource, config: &PianoConfig, sample_rate: f64) -> Result<SoundBank> {
    let keyboard = Keyboard::piano();
    match source {
        SoundSource::Directory => SoundBank::load(&config.sound_dir, &keyboard),
        SoundSource::Synthesized => Ok(SoundBank::synthesized(&keyboard, sample_rate as u32)),
        SoundSource::Bank(bank) => Ok(bank),
    }
}
