//! MIDI File loading
//!
//! Flattens a Standard MIDI File (parsed with `midly`) into a single list of
//! struck notes with absolute wall-clock timestamps. Tracks are merged, tempo
//! changes from any track apply from their position onward, and only Note On
//! events with a non-zero velocity survive.

use crate::error::{Error, Result};
use midly::{MetaMessage, MidiMessage, Smf, Timing, Track, TrackEventKind};
use std::path::Path;
use tracing::debug;

/// Tempo assumed until the first tempo event (120 BPM).
pub const DEFAULT_TEMPO_US: u32 = 500_000;

/// A struck note with absolute timestamp
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedNote {
    /// Milliseconds from the start of the file
    pub time_ms: f64,

    /// MIDI note number (0-127)
    pub note: u8,

    /// Strike velocity (1-127)
    pub velocity: u8,
}

/// A MIDI file reduced to its note strikes, sorted by time
#[derive(Debug, Clone, Default)]
pub struct MidiNoteFile {
    pub notes: Vec<TimedNote>,

    /// Ticks per quarter note, `None` for SMPTE timecode files
    pub ticks_per_beat: Option<u16>,

    /// Time of the last event in the file (notes, meta and end-of-track included)
    pub duration_ms: f64,
}

/// Converts tick deltas to seconds under the current tempo.
#[derive(Debug, Clone, Copy)]
enum TickClock {
    Metrical { ticks_per_beat: u16, tempo_us: u32 },
    Timecode { seconds_per_tick: f64 },
}

impl TickClock {
    fn from_timing(timing: Timing) -> Result<Self> {
        match timing {
            Timing::Metrical(tpb) if tpb.as_int() == 0 => Err(Error::MidiFileParse(
                "header declares zero ticks per beat".into(),
            )),
            Timing::Metrical(tpb) => Ok(TickClock::Metrical {
                ticks_per_beat: tpb.as_int(),
                tempo_us: DEFAULT_TEMPO_US,
            }),
            Timing::Timecode(fps, subframes) => {
                let ticks_per_second = fps.as_f32() as f64 * subframes as f64;
                if ticks_per_second <= 0.0 {
                    return Err(Error::MidiFileParse(
                        "header declares zero ticks per frame".into(),
                    ));
                }
                Ok(TickClock::Timecode {
                    seconds_per_tick: 1.0 / ticks_per_second,
                })
            }
        }
    }

    fn seconds(&self, ticks: u64) -> f64 {
        match *self {
            TickClock::Metrical {
                ticks_per_beat,
                tempo_us,
            } => ticks as f64 * tempo_us as f64 / (ticks_per_beat as f64 * 1_000_000.0),
            TickClock::Timecode { seconds_per_tick } => ticks as f64 * seconds_per_tick,
        }
    }

    /// Timecode files keep absolute time, so tempo events don't apply.
    fn set_tempo(&mut self, us_per_beat: u32) {
        if let TickClock::Metrical { tempo_us, .. } = self {
            *tempo_us = us_per_beat;
        }
    }

    fn ticks_per_beat(&self) -> Option<u16> {
        match *self {
            TickClock::Metrical { ticks_per_beat, .. } => Some(ticks_per_beat),
            TickClock::Timecode { .. } => None,
        }
    }
}

impl MidiNoteFile {
    /// Load and flatten a MIDI file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        Self::parse(&data)
    }

    /// Flatten MIDI file bytes
    pub fn parse(data: &[u8]) -> Result<Self> {
        let smf = Smf::parse(data)?;
        let mut clock = TickClock::from_timing(smf.header.timing)?;

        debug!(
            "Parsing MIDI file: {} tracks, timing {:?}",
            smf.tracks.len(),
            smf.header.timing
        );

        let merged = Self::merge_tracks(&smf.tracks);

        let mut notes = Vec::new();
        let mut seconds = 0.0;
        let mut last_tick = 0u64;

        for (tick, kind) in merged {
            seconds += clock.seconds(tick - last_tick);
            last_tick = tick;

            match kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, vel },
                    ..
                } if vel.as_int() > 0 => notes.push(TimedNote {
                    time_ms: seconds * 1000.0,
                    note: key.as_int(),
                    velocity: vel.as_int(),
                }),
                TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => {
                    clock.set_tempo(tempo.as_int());
                }
                _ => {}
            }
        }

        let duration_ms = seconds * 1000.0;

        debug!(
            "Flattened {} notes, duration: {:.2} s",
            notes.len(),
            seconds
        );

        Ok(Self {
            notes,
            ticks_per_beat: clock.ticks_per_beat(),
            duration_ms,
        })
    }

    /// Interleave all tracks by absolute tick.
    ///
    /// The sort is stable and tracks are visited in file order, so at equal
    /// ticks earlier tracks come first.
    fn merge_tracks<'a>(tracks: &'a [Track<'a>]) -> Vec<(u64, TrackEventKind<'a>)> {
        let mut merged = Vec::with_capacity(tracks.iter().map(Vec::len).sum());

        for track in tracks {
            let mut tick = 0u64;
            for event in track {
                tick += event.delta.as_int() as u64;
                merged.push((tick, event.kind));
            }
        }

        merged.sort_by_key(|(tick, _)| *tick);
        merged
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes with `start_ms <= time_ms < end_ms`
    pub fn notes_in_range(&self, start_ms: f64, end_ms: f64) -> &[TimedNote] {
        let start_idx = self.notes.partition_point(|n| n.time_ms < start_ms);
        let end_idx = self.notes.partition_point(|n| n.time_ms < end_ms);
        &self.notes[start_idx..end_idx.max(start_idx)]
    }
}
