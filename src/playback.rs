//! Song playback cursor.
//!
//! Holds a loaded song as a flat, time-sorted list of key presses and hands
//! out the ones that became due since the last poll. Time is supplied by the
//! caller in milliseconds, so the cursor is independent of any real clock.

use arpeggio_midi::{midi_to_note_name, Keyboard, MidiNoteFile, PianoKey};
use tracing::{debug, info};

/// One key press of a loaded song.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlaybackNote {
    /// Milliseconds from the start of the song.
    pub time_ms: f64,
    pub key: PianoKey,
    pub velocity: u8,
}

/// What a call to [`Playback::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToggleOutcome {
    /// Started a new run from the given song position.
    Started { from_ms: f64 },
    /// Continued a paused run at the given song position.
    Resumed { at_ms: f64 },
    Paused,
}

#[derive(Debug, Clone)]
pub struct Playback {
    notes: Vec<PlaybackNote>,
    cursor: usize,
    active: bool,
    /// Caller clock value at which song time 0 lies.
    origin_ms: f64,
    start_position_ms: f64,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Playback {
    /// Empty playback whose first run starts at `start_position_ms`.
    pub fn new(start_position_ms: f64) -> Self {
        Self {
            notes: Vec::new(),
            cursor: 0,
            active: false,
            origin_ms: 0.0,
            start_position_ms: start_position_ms.max(0.0),
        }
    }

    /// Replace the song with the notes of `file` that fall on the keyboard.
    ///
    /// Stops playback and rewinds the cursor. Returns the number of notes kept.
    pub fn load(&mut self, file: &MidiNoteFile, keyboard: &Keyboard) -> usize {
        let notes: Vec<PlaybackNote> = file
            .notes
            .iter()
            .filter_map(|note| {
                let key = midi_to_note_name(note.note).and_then(|name| keyboard.key_for_name(&name))?;
                Some(PlaybackNote {
                    time_ms: note.time_ms,
                    key,
                    velocity: note.velocity,
                })
            })
            .collect();

        let dropped = file.notes.len() - notes.len();
        if dropped > 0 {
            debug!("Dropped {dropped} notes outside the keyboard range");
        }

        self.set_notes(notes);
        info!("Loaded {} notes", self.notes.len());
        self.notes.len()
    }

    /// Replace the song with an already mapped note list, sorted by time.
    pub fn set_notes(&mut self, mut notes: Vec<PlaybackNote>) {
        notes.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        self.notes = notes;
        self.cursor = 0;
        self.active = false;
    }

    pub fn notes(&self) -> &[PlaybackNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Index of the next note to play.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Song position the next fresh start begins at.
    pub fn start_position_ms(&self) -> f64 {
        self.start_position_ms
    }

    pub fn set_start_position_ms(&mut self, position_ms: f64) {
        self.start_position_ms = position_ms.max(0.0);
    }

    /// Current song position for caller time `now_ms`, while playing.
    pub fn position_ms(&self, now_ms: f64) -> Option<f64> {
        self.active.then(|| now_ms - self.origin_ms)
    }

    /// Index of the first note at or after `time_ms`.
    ///
    /// Returns 0 when nothing is loaded and `len()` when every note is earlier.
    pub fn find_first_note_after(&self, time_ms: f64) -> usize {
        for (i, note) in self.notes.iter().enumerate() {
            if note.time_ms >= time_ms {
                return i;
            }
        }
        self.notes.len()
    }

    /// Start, resume or pause.
    ///
    /// A stopped playback whose cursor sits at the beginning or the end starts
    /// a new run from the start position; one stopped mid-song resumes at the
    /// timestamp of the next unplayed note.
    pub fn toggle(&mut self, now_ms: f64) -> ToggleOutcome {
        if self.active {
            self.active = false;
            info!("Playback paused at note {}", self.cursor);
            return ToggleOutcome::Paused;
        }

        self.active = true;
        if self.cursor == 0 || self.cursor >= self.notes.len() {
            let from_ms = self.start_position_ms;
            self.cursor = self.find_first_note_after(from_ms);
            self.origin_ms = now_ms - from_ms;
            info!("Playback started at {from_ms} ms");
            ToggleOutcome::Started { from_ms }
        } else {
            let at_ms = self.notes[self.cursor].time_ms;
            self.origin_ms = now_ms - at_ms;
            info!("Playback resumed at {at_ms} ms");
            ToggleOutcome::Resumed { at_ms }
        }
    }

    /// Stop without rewinding; the next toggle resumes.
    pub fn pause(&mut self) {
        self.active = false;
    }

    /// Notes that became due by `now_ms`, in order.
    ///
    /// Reaching the end stops playback, and later runs start from 0.
    pub fn poll(&mut self, now_ms: f64) -> Vec<PlaybackNote> {
        if !self.active {
            return Vec::new();
        }

        let song_ms = now_ms - self.origin_ms;
        let start = self.cursor;
        while self.cursor < self.notes.len() && self.notes[self.cursor].time_ms <= song_ms {
            self.cursor += 1;
        }
        let due = self.notes[start..self.cursor].to_vec();

        if self.cursor >= self.notes.len() {
            self.active = false;
            self.start_position_ms = 0.0;
            info!("Playback finished");
        }
        due
    }
}
