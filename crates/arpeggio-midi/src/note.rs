//! MIDI note numbers and their names.
//!
//! Names use scientific pitch notation with sharps: the pitch-class letter, an
//! optional `#`, then the octave. Middle C (MIDI 60) is `C4`, the lowest MIDI
//! note is `C-1` and the highest is `G9`.
//!
//! # Example
//! ```ignore
//! use arpeggio_midi::{midi_to_note_name, Note};
//!
//! assert_eq!(midi_to_note_name(61).as_deref(), Some("C#4"));
//! assert_eq!("A4".parse::<Note>()?.midi(), 69);
//! ```

use crate::error::Error;
use core::fmt;
use core::str::FromStr;

/// Pitch-class names, indexed by `midi % 12`.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch classes that sit on black keys.
const BLACK_PITCH_CLASSES: [u8; 5] = [1, 3, 6, 8, 10];

/// Converts a MIDI note number to its name, e.g. 60 -> `"C4"`, 61 -> `"C#4"`.
///
/// Returns `None` for values above 127.
pub fn midi_to_note_name(midi: u8) -> Option<String> {
    Note::from_midi(midi).map(|note| note.name())
}

/// MIDI note number (0-127).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Note(u8);

impl Note {
    pub const MIDDLE_C: Note = Note(60);
    pub const CONCERT_A: Note = Note(69);

    /// Returns `None` if the value is > 127.
    pub const fn from_midi(midi: u8) -> Option<Note> {
        if midi > 127 {
            return None;
        }
        Some(Note(midi))
    }

    pub const fn midi(self) -> u8 {
        self.0
    }

    /// Returns -1 to 9.
    pub const fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    /// 0-11, where 0 = C.
    pub const fn pitch_class(self) -> u8 {
        self.0 % 12
    }

    /// True for C#, D#, F#, G# and A#.
    pub fn is_black(self) -> bool {
        BLACK_PITCH_CLASSES.contains(&self.pitch_class())
    }

    /// Frequency in Hz (A4 = 440 Hz, equal temperament).
    pub fn frequency(self) -> f64 {
        440.0 * 2f64.powf((self.0 as f64 - 69.0) / 12.0)
    }

    pub fn name(self) -> String {
        format!("{}{}", NOTE_NAMES[self.pitch_class() as usize], self.octave())
    }

    /// Returns `None` if result would be out of MIDI range (0-127).
    pub fn transpose(self, semitones: i8) -> Option<Note> {
        let shifted = self.0 as i16 + semitones as i16;
        u8::try_from(shifted).ok().and_then(Note::from_midi)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            NOTE_NAMES[self.pitch_class() as usize],
            self.octave()
        )
    }
}

impl From<Note> for u8 {
    fn from(note: Note) -> u8 {
        note.0
    }
}

impl TryFrom<u8> for Note {
    type Error = String;

    fn try_from(midi: u8) -> Result<Self, Self::Error> {
        Note::from_midi(midi).ok_or_else(|| format!("MIDI note {midi} out of range (0-127)"))
    }
}

/// Parses `C4`, `C#4`, `Db4` and `C-1` style names. Letters are case-insensitive.
impl FromStr for Note {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidNoteName(s.to_string());
        let mut chars = s.chars();

        let base: i32 = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let (accidental, octave) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };

        let octave: i32 = octave.parse().map_err(|_| invalid())?;
        let midi = octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|m| m.checked_add(base + accidental));

        midi.and_then(|m| u8::try_from(m).ok())
            .and_then(Note::from_midi)
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_names() {
        assert_eq!(midi_to_note_name(60).as_deref(), Some("C4"));
        assert_eq!(midi_to_note_name(61).as_deref(), Some("C#4"));
        assert_eq!(midi_to_note_name(72).as_deref(), Some("C5"));
        assert_eq!(midi_to_note_name(69).as_deref(), Some("A4"));
        assert_eq!(midi_to_note_name(21).as_deref(), Some("A0"));
        assert_eq!(midi_to_note_name(108).as_deref(), Some("C8"));
    }

    #[test]
    fn test_note_name_range_edges() {
        assert_eq!(midi_to_note_name(0).as_deref(), Some("C-1"));
        assert_eq!(midi_to_note_name(11).as_deref(), Some("B-1"));
        assert_eq!(midi_to_note_name(127).as_deref(), Some("G9"));
        assert_eq!(midi_to_note_name(128), None);
        assert_eq!(midi_to_note_name(255), None);
    }

    #[test]
    fn test_octave_and_pitch_class() {
        let note = Note::from_midi(61).unwrap();
        assert_eq!(note.octave(), 4);
        assert_eq!(note.pitch_class(), 1);
        assert!(note.is_black());
        assert!(!Note::MIDDLE_C.is_black());
    }

    #[test]
    fn test_frequency() {
        assert!((Note::CONCERT_A.frequency() - 440.0).abs() < 0.01);
        assert!((Note::MIDDLE_C.frequency() - 261.63).abs() < 0.1);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("C4".parse::<Note>().unwrap(), Note::MIDDLE_C);
        assert_eq!("c#4".parse::<Note>().unwrap().midi(), 61);
        assert_eq!("Db4".parse::<Note>().unwrap().midi(), 61);
        assert_eq!("C-1".parse::<Note>().unwrap().midi(), 0);
        assert_eq!("G9".parse::<Note>().unwrap().midi(), 127);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("H4".parse::<Note>().is_err());
        assert!("C".parse::<Note>().is_err());
        assert!("G#9".parse::<Note>().is_err()); // 128
        assert!("Cb-1".parse::<Note>().is_err()); // -1
        assert!("".parse::<Note>().is_err());
        assert!("C9999".parse::<Note>().is_err());
        assert!("C-9999".parse::<Note>().is_err());
        assert!("C2147483647".parse::<Note>().is_err());
        assert!("C99999999999".parse::<Note>().is_err());
    }

    #[test]
    fn test_every_name_parses_back() {
        for n in 0..=127u8 {
            let name = midi_to_note_name(n).unwrap();
            assert_eq!(name.parse::<Note>().unwrap().midi(), n, "{name}");
        }
    }

    #[test]
    fn test_transpose() {
        assert_eq!(Note::MIDDLE_C.transpose(12).map(Note::midi), Some(72));
        assert_eq!(Note::from_midi(127).unwrap().transpose(1), None);
        assert_eq!(Note::from_midi(0).unwrap().transpose(-1), None);
    }
}
