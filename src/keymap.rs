//! Computer-keyboard bindings for the two hands.
//!
//! Each hand covers one octave with twelve keys laid out like a piano: the
//! bottom letter row (or top letter row) for white keys and the row above for
//! black keys.

use arpeggio_midi::{Keyboard, PianoKey, NOTE_NAMES};

pub const MAX_OCTAVE: u8 = 8;

/// Left hand keys for C, C#, D, ... B.
pub const LEFT_HAND_KEYS: [char; 12] = ['Z', 'S', 'X', 'D', 'C', 'V', 'G', 'B', 'H', 'N', 'J', 'M'];

/// Right hand keys for C, C#, D, ... B.
pub const RIGHT_HAND_KEYS: [char; 12] = ['R', '5', 'T', '6', 'Y', 'U', '8', 'I', '9', 'O', '0', 'P'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn keys(self) -> &'static [char; 12] {
        match self {
            Hand::Left => &LEFT_HAND_KEYS,
            Hand::Right => &RIGHT_HAND_KEYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandKeyMap {
    left_octave: u8,
    right_octave: u8,
}

impl Default for HandKeyMap {
    fn default() -> Self {
        Self::new(4, 5)
    }
}

impl HandKeyMap {
    /// Octaves above [`MAX_OCTAVE`] are clamped.
    pub fn new(left_octave: u8, right_octave: u8) -> Self {
        Self {
            left_octave: left_octave.min(MAX_OCTAVE),
            right_octave: right_octave.min(MAX_OCTAVE),
        }
    }

    pub fn octave(&self, hand: Hand) -> u8 {
        match hand {
            Hand::Left => self.left_octave,
            Hand::Right => self.right_octave,
        }
    }

    fn octave_mut(&mut self, hand: Hand) -> &mut u8 {
        match hand {
            Hand::Left => &mut self.left_octave,
            Hand::Right => &mut self.right_octave,
        }
    }

    /// Move a hand one octave up (`up`) or down, staying within 0-8.
    /// Returns the hand's octave afterwards.
    pub fn shift(&mut self, hand: Hand, up: bool) -> u8 {
        let octave = self.octave_mut(hand);
        *octave = if up {
            (*octave + 1).min(MAX_OCTAVE)
        } else {
            octave.saturating_sub(1)
        };
        *octave
    }

    /// Note name bound to a typed character, case-insensitive.
    pub fn note_name(&self, c: char) -> Option<String> {
        let c = c.to_ascii_uppercase();
        [Hand::Left, Hand::Right].into_iter().find_map(|hand| {
            hand.keys()
                .iter()
                .position(|&k| k == c)
                .map(|pitch| format!("{}{}", NOTE_NAMES[pitch], self.octave(hand)))
        })
    }

    /// Piano key bound to a typed character, `None` if unbound or off the keyboard.
    pub fn key(&self, c: char, keyboard: &Keyboard) -> Option<PianoKey> {
        self.note_name(c)
            .and_then(|name| keyboard.key_for_name(&name))
    }

    /// `(character, note name)` pairs for one hand, for on-screen labels.
    pub fn bindings(&self, hand: Hand) -> Vec<(char, String)> {
        hand.keys()
            .iter()
            .zip(NOTE_NAMES)
            .map(|(&c, name)| (c, format!("{name}{}", self.octave(hand))))
            .collect()
    }
}
