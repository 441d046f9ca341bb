//! PianoEngine: keyboard, sounds, limiter and song playback behind one handle.

use crate::config::PianoConfig;
use crate::keymap::{Hand, HandKeyMap};
use crate::playback::{Playback, ToggleOutcome};
use crate::sounds::SoundBank;
use crate::Result;
use arpeggio_core::{Channel, Mixer, VoiceLimiter};
use arpeggio_midi::{Keyboard, MidiNoteFile, PianoKey};
use std::path::Path;
use tracing::{debug, warn};

#[cfg(feature = "std")]
use arpeggio_core::AudioSystem;

/// Velocity for notes typed on the computer keyboard.
pub const TYPED_VELOCITY: u8 = 127;

/// A lit key and how many more frames it stays lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub key: PianoKey,
    pub frames_left: u32,
}

/// Virtual piano driven by a front end.
///
/// The front end forwards key presses and calls [`frame`](Self::frame) once
/// per display frame with its clock in milliseconds. Sound goes to the mixer
/// the engine was built on.
///
/// # Example
///
/// ```ignore
/// use arpeggio::prelude::*;
///
/// let mut piano = PianoEngine::builder().synthesized_sounds().build()?;
/// piano.type_char('z');
/// piano.toggle_playback(0.0)?;
/// piano.frame(16.0);
/// ```
pub struct PianoEngine {
    keyboard: Keyboard,
    keymap: HandKeyMap,
    sounds: SoundBank,
    limiter: VoiceLimiter,
    playback: Playback,
    midi_loaded: bool,
    highlights: Vec<Highlight>,
    config: PianoConfig,

    #[cfg(feature = "std")]
    audio: Option<AudioSystem>,
}

impl PianoEngine {
    pub fn builder() -> crate::PianoEngineBuilder {
        crate::PianoEngineBuilder::default()
    }

    /// Engine playing through `mixer`, with no output device attached.
    pub fn new(mixer: Mixer, sounds: SoundBank, config: PianoConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            keyboard: Keyboard::piano(),
            keymap: HandKeyMap::new(config.left_octave, config.right_octave),
            sounds,
            limiter: VoiceLimiter::new(mixer, config.limiter),
            playback: Playback::new(config.start_position_ms),
            midi_loaded: false,
            highlights: Vec::new(),
            config,
            #[cfg(feature = "std")]
            audio: None,
        })
    }

    #[cfg(feature = "std")]
    pub(crate) fn with_audio(mut self, audio: AudioSystem) -> Self {
        self.audio = Some(audio);
        self
    }

    /// The output this engine plays through, if built on a device.
    #[cfg(feature = "std")]
    pub fn audio(&self) -> Option<&AudioSystem> {
        self.audio.as_ref()
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn keymap(&self) -> &HandKeyMap {
        &self.keymap
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn sounds(&self) -> &SoundBank {
        &self.sounds
    }

    pub fn config(&self) -> &PianoConfig {
        &self.config
    }

    pub fn mixer(&self) -> &Mixer {
        self.limiter.mixer()
    }

    /// Notes started by the engine that were still ringing at the last prune.
    pub fn active_voices(&self) -> usize {
        self.limiter.active_count()
    }

    /// Sound `key` and light it up.
    ///
    /// Returns the mixer channel the note plays on, `None` when the key has no
    /// sound or the note was dropped.
    pub fn press(&mut self, key: PianoKey, velocity: u8) -> Option<Channel> {
        let label = self.keyboard.label(key)?.to_owned();
        debug!("Key {label} velocity {velocity}");

        self.highlight(key);
        match self.sounds.get(key) {
            Some(sound) => self.limiter.play(sound, velocity),
            None => {
                warn!("No sound loaded for {label}");
                None
            }
        }
    }

    /// Handle a typed character. Returns the key it played, if any.
    pub fn type_char(&mut self, c: char) -> Option<PianoKey> {
        let key = self.keymap.key(c, &self.keyboard)?;
        self.press(key, TYPED_VELOCITY);
        Some(key)
    }

    /// Move a hand up or down an octave. Returns the hand's new octave.
    pub fn shift_octave(&mut self, hand: Hand, up: bool) -> u8 {
        let octave = self.keymap.shift(hand, up);
        debug!("{hand:?} hand octave {octave}");
        octave
    }

    /// Replace the song. Returns the number of playable notes.
    pub fn load_midi(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let file = MidiNoteFile::load(path)?;
        let count = self.playback.load(&file, &self.keyboard);
        self.midi_loaded = true;
        Ok(count)
    }

    /// Start, pause or resume the song.
    ///
    /// The configured MIDI file is loaded on first use. A failed load is
    /// logged and returned; the next call tries again.
    pub fn toggle_playback(&mut self, now_ms: f64) -> Result<ToggleOutcome> {
        if !self.midi_loaded {
            let path = self.config.midi_file.clone();
            if let Err(e) = self.load_midi(&path) {
                warn!("Could not load {}: {e}", path.display());
                return Err(e);
            }
        }
        Ok(self.playback.toggle(now_ms))
    }

    /// Advance one display frame.
    ///
    /// Ages highlights, forgets finished voices and plays every song note
    /// that came due by `now_ms`. Returns the number of song notes played.
    pub fn frame(&mut self, now_ms: f64) -> usize {
        self.highlights.retain_mut(|h| {
            h.frames_left = h.frames_left.saturating_sub(1);
            h.frames_left > 0
        });

        self.limiter.prune();

        let due = self.playback.poll(now_ms);
        for note in &due {
            self.press(note.key, note.velocity);
        }
        due.len()
    }

    /// Keys currently lit.
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Frames left on `key`'s highlight, `None` if it is dark.
    pub fn highlight_of(&self, key: PianoKey) -> Option<u32> {
        self.highlights
            .iter()
            .find(|h| h.key == key)
            .map(|h| h.frames_left)
    }

    /// Pause the song, silence every channel and clear highlights.
    pub fn stop_all(&mut self) -> Result<()> {
        self.playback.pause();
        self.highlights.clear();
        self.limiter.mixer().stop_all()?;
        Ok(())
    }

    fn highlight(&mut self, key: PianoKey) {
        let frames_left = self.config.highlight_frames;
        match self.highlights.iter_mut().find(|h| h.key == key) {
            Some(h) => h.frames_left = frames_left,
            None => self.highlights.push(Highlight { key, frames_left }),
        }
    }
}
