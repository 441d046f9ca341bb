//! One sample per piano key.

use crate::Result;
use arpeggio_core::Sound;
use arpeggio_midi::{KeyColor, Keyboard, Note, PianoKey};
use std::path::Path;
use tracing::info;

/// Per-key sounds, indexed like the keyboard.
#[derive(Debug, Clone)]
pub struct SoundBank {
    white: Vec<Option<Sound>>,
    black: Vec<Option<Sound>>,
}

impl SoundBank {
    /// A bank with no sounds yet.
    pub fn empty(keyboard: &Keyboard) -> Self {
        Self {
            white: vec![None; keyboard.white_count()],
            black: vec![None; keyboard.black_count()],
        }
    }

    /// Load `<dir>/<sample name>.wav` for every key (`A0.wav`, `Bb0.wav`, ...).
    ///
    /// A missing or unreadable file fails the whole load.
    pub fn load(dir: impl AsRef<Path>, keyboard: &Keyboard) -> Result<Self> {
        let dir = dir.as_ref();
        let mut bank = Self::empty(keyboard);
        for key in keyboard.keys() {
            let Some(name) = keyboard.sample_name(key) else {
                continue;
            };
            let sound = Sound::load(dir.join(format!("{name}.wav")))?;
            bank.insert(key, sound);
        }
        info!("Loaded {} key sounds from {}", bank.len(), dir.display());
        Ok(bank)
    }

    /// Plucked-string tones for every key, for running without sample files.
    pub fn synthesized(keyboard: &Keyboard, sample_rate: u32) -> Self {
        let mut bank = Self::empty(keyboard);
        for key in keyboard.keys() {
            let Some(note) = keyboard.midi_for_key(key).and_then(Note::from_midi) else {
                continue;
            };
            bank.insert(key, pluck(note.frequency(), sample_rate, 1.5));
        }
        bank
    }

    pub fn insert(&mut self, key: PianoKey, sound: Sound) {
        let slots = match key.color {
            KeyColor::White => &mut self.white,
            KeyColor::Black => &mut self.black,
        };
        if let Some(slot) = slots.get_mut(key.index) {
            *slot = Some(sound);
        }
    }

    pub fn get(&self, key: PianoKey) -> Option<&Sound> {
        match key.color {
            KeyColor::White => self.white.get(key.index),
            KeyColor::Black => self.black.get(key.index),
        }
        .and_then(Option::as_ref)
    }

    /// Number of keys with a sound.
    pub fn len(&self) -> usize {
        self.white.iter().chain(&self.black).flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decaying sine with a quieter octave partial.
fn pluck(frequency: f64, sample_rate: u32, seconds: f64) -> Sound {
    let frames = (seconds * sample_rate as f64) as usize;
    let step = std::f64::consts::TAU * frequency / sample_rate as f64;
    let samples: Vec<f32> = (0..frames)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let phase = step * i as f64;
            let envelope = (-3.0 * t).exp();
            (envelope * (0.7 * phase.sin() + 0.3 * (2.0 * phase).sin())) as f32
        })
        .collect();
    Sound::from_mono(&samples, sample_rate)
}
