//! MIDI side of the Arpeggio virtual piano.
//!
//! Provides note naming, the 88-key keyboard layout, and Standard MIDI File
//! flattening into a time-sorted list of struck notes.
//!
//! # Example
//!
//! ```ignore
//! use arpeggio_midi::{midi_to_note_name, Keyboard, MidiNoteFile};
//!
//! assert_eq!(midi_to_note_name(60).as_deref(), Some("C4"));
//!
//! let keyboard = Keyboard::piano();
//! let song = MidiNoteFile::load("assets/MIDI/song.mid")?;
//! for note in &song.notes {
//!     let key = keyboard.key_for_midi(note.note);
//!     println!("{:.0} ms: {:?} @ {}", note.time_ms, key, note.velocity);
//! }
//! ```

// Error types
pub mod error;
pub use error::{Error, Result};

// Note naming
pub mod note;
pub use note::{midi_to_note_name, Note, NOTE_NAMES};

// Piano layout
pub mod keyboard;
pub use keyboard::{KeyColor, Keyboard, PianoKey};

// MIDI file types
pub use file::{MidiNoteFile, TimedNote, DEFAULT_TEMPO_US};

// Utility functions
pub use utils::velocity_to_gain;

pub(crate) mod file;
pub(crate) mod utils;
