//! The 88-key piano layout.
//!
//! Keys run from A0 (MIDI 21) to C8 (MIDI 108): 52 white keys and 36 black
//! keys, each color indexed left to right from 0. Black keys carry two names:
//! the sharp label shown on the key (`A#0`) and the flat name used for the
//! sample file (`Bb0`).

use crate::note::{midi_to_note_name, Note};
use std::collections::HashMap;

/// Lowest key on the piano (A0).
pub const LOWEST_KEY: u8 = 21;
/// Highest key on the piano (C8).
pub const HIGHEST_KEY: u8 = 108;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum KeyColor {
    White,
    Black,
}

/// A key on the piano, addressed by color and position within that color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PianoKey {
    pub color: KeyColor,
    pub index: usize,
}

impl PianoKey {
    pub const fn white(index: usize) -> Self {
        Self {
            color: KeyColor::White,
            index,
        }
    }

    pub const fn black(index: usize) -> Self {
        Self {
            color: KeyColor::Black,
            index,
        }
    }

    pub fn is_black(&self) -> bool {
        self.color == KeyColor::Black
    }
}

#[derive(Debug, Clone)]
pub struct Keyboard {
    white_notes: Vec<String>,
    black_notes: Vec<String>,
    black_labels: Vec<String>,
    white_midi: Vec<u8>,
    black_midi: Vec<u8>,
    white_map: HashMap<String, usize>,
    black_map: HashMap<String, usize>,
}

impl Keyboard {
    /// Standard 88-key piano.
    pub fn piano() -> Self {
        let mut keyboard = Self {
            white_notes: Vec::with_capacity(52),
            black_notes: Vec::with_capacity(36),
            black_labels: Vec::with_capacity(36),
            white_midi: Vec::with_capacity(52),
            black_midi: Vec::with_capacity(36),
            white_map: HashMap::with_capacity(52),
            black_map: HashMap::with_capacity(36),
        };

        for midi in LOWEST_KEY..=HIGHEST_KEY {
            let Some(note) = Note::from_midi(midi) else {
                continue;
            };

            if note.is_black() {
                let index = keyboard.black_labels.len();
                keyboard.black_map.insert(note.name(), index);
                keyboard.black_labels.push(note.name());
                keyboard.black_notes.push(flat_name(note));
                keyboard.black_midi.push(midi);
            } else {
                let index = keyboard.white_notes.len();
                keyboard.white_map.insert(note.name(), index);
                keyboard.white_notes.push(note.name());
                keyboard.white_midi.push(midi);
            }
        }

        keyboard
    }

    pub fn white_count(&self) -> usize {
        self.white_notes.len()
    }

    pub fn black_count(&self) -> usize {
        self.black_notes.len()
    }

    /// White key names, `A0` through `C8`.
    pub fn white_notes(&self) -> &[String] {
        &self.white_notes
    }

    /// Black key names with flats (`Bb0`, `Db1`, ...).
    pub fn black_notes(&self) -> &[String] {
        &self.black_notes
    }

    /// Black key names with sharps (`A#0`, `C#1`, ...).
    pub fn black_labels(&self) -> &[String] {
        &self.black_labels
    }

    /// Looks a sharp-spelled note name up in the black map, then the white map.
    pub fn key_for_name(&self, name: &str) -> Option<PianoKey> {
        if let Some(&index) = self.black_map.get(name) {
            return Some(PianoKey::black(index));
        }
        self.white_map.get(name).map(|&index| PianoKey::white(index))
    }

    /// `None` for notes below A0 or above C8.
    pub fn key_for_midi(&self, midi: u8) -> Option<PianoKey> {
        midi_to_note_name(midi).and_then(|name| self.key_for_name(&name))
    }

    pub fn midi_for_key(&self, key: PianoKey) -> Option<u8> {
        match key.color {
            KeyColor::White => self.white_midi.get(key.index).copied(),
            KeyColor::Black => self.black_midi.get(key.index).copied(),
        }
    }

    /// Label shown on the key (sharps for black keys).
    pub fn label(&self, key: PianoKey) -> Option<&str> {
        match key.color {
            KeyColor::White => self.white_notes.get(key.index),
            KeyColor::Black => self.black_labels.get(key.index),
        }
        .map(String::as_str)
    }

    /// File stem of the key's sample (flats for black keys).
    pub fn sample_name(&self, key: PianoKey) -> Option<&str> {
        match key.color {
            KeyColor::White => self.white_notes.get(key.index),
            KeyColor::Black => self.black_notes.get(key.index),
        }
        .map(String::as_str)
    }

    /// All keys, white keys first.
    pub fn keys(&self) -> impl Iterator<Item = PianoKey> + '_ {
        (0..self.white_count())
            .map(PianoKey::white)
            .chain((0..self.black_count()).map(PianoKey::black))
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::piano()
    }
}

/// `A#0` -> `Bb0`, `C#1` -> `Db1`: the letter and octave of the next semitone.
fn flat_name(note: Note) -> String {
    let above = note.transpose(1).unwrap_or(note);
    let letter = &crate::note::NOTE_NAMES[above.pitch_class() as usize][..1];
    format!("{letter}b{}", above.octave())
}
