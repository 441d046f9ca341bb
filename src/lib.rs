//! # Arpeggio - Virtual Piano Engine
//!
//! An 88-key piano you can play from the computer keyboard, with Standard
//! MIDI File playback on top.
//!
//! ## Architecture
//!
//! Arpeggio is an umbrella crate that coordinates:
//! - **arpeggio-midi** - Note naming, keyboard layout, MIDI file flattening
//! - **arpeggio-core** - Voice mixer, soft limiter, CPAL output
//!
//! The front end (window, drawing, input) is left to the caller: it forwards
//! typed characters to [`PianoEngine::type_char`], calls
//! [`PianoEngine::frame`] once per display frame and draws
//! [`PianoEngine::highlights`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use arpeggio::prelude::*;
//!
//! let mut piano = PianoEngine::builder()
//!     .sound_dir("assets/notes")
//!     .midi_file("assets/MIDI/song.mid")
//!     .build()?;
//!
//! piano.type_char('z'); // C4
//! piano.toggle_playback(0.0)?;
//! loop {
//!     piano.frame(clock_ms());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default) - CPAL output device support

/// Re-export of arpeggio-core for direct access
pub use arpeggio_core as core;

/// Re-export of arpeggio-midi for direct access
pub use arpeggio_midi as midi;

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::PianoConfig;

pub mod keymap;
pub use keymap::{Hand, HandKeyMap, LEFT_HAND_KEYS, RIGHT_HAND_KEYS};

pub mod playback;
pub use playback::{Playback, PlaybackNote, ToggleOutcome};

mod sounds;
pub use sounds::SoundBank;

mod builder;
mod engine;

pub use builder::PianoEngineBuilder;
pub use engine::{Highlight, PianoEngine, TYPED_VELOCITY};

pub use arpeggio_core::{LimiterConfig, MixerConfig, MixerRenderer, Sound, VoiceLimiter};
pub use arpeggio_midi::{midi_to_note_name, KeyColor, Keyboard, MidiNoteFile, PianoKey};

#[cfg(feature = "std")]
pub use arpeggio_core::AudioSystem;

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{PianoEngine, PianoEngineBuilder, PianoConfig};

    // Keyboard
    pub use crate::{Hand, KeyColor, Keyboard, PianoKey};

    // Playback
    pub use crate::{MidiNoteFile, Playback, PlaybackNote, ToggleOutcome};
}
