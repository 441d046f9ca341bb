//! Fixtures for arpeggio integration tests.
//!
//! Songs are written with midly at 500 ticks per beat and the default tempo,
//! so one tick is one millisecond.

#![allow(dead_code)]

use arpeggio::Keyboard;
use hound::{SampleFormat, WavSpec, WavWriter};
use midly::num::{u15, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::{Path, PathBuf};

pub const TEST_SAMPLE_RATE: u32 = 44100;

/// Float comparison tolerance for mixed output.
pub const MIX_EPSILON: f32 = 1e-4;

/// Write a single-track song of `(time_ms, note, velocity)` note-ons.
pub fn write_song(dir: &Path, name: &str, notes: &[(u32, u8, u8)]) -> PathBuf {
    let mut sorted = notes.to_vec();
    sorted.sort_by_key(|&(time, _, _)| time);

    let mut track = Vec::with_capacity(sorted.len() + 1);
    let mut last = 0;
    for (time, key, vel) in sorted {
        track.push(TrackEvent {
            delta: u28::new(time - last),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn {
                    key: u7::new(key),
                    vel: u7::new(vel),
                },
            },
        });
        last = time;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(500)),
    ));
    smf.tracks.push(track);

    let path = dir.join(name);
    smf.save(&path).expect("write MIDI file");
    path
}

/// Write a 16-bit mono WAV.
pub fn write_wav(path: &Path, samples: &[i16]) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: TEST_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("create WAV");
    for &s in samples {
        writer.write_sample(s).expect("write sample");
    }
    writer.finalize().expect("finalize WAV");
}

/// A sound directory with one `frames`-long half-scale WAV per key.
pub fn write_sound_dir(dir: &Path, frames: usize) -> PathBuf {
    let notes = dir.join("notes");
    std::fs::create_dir_all(&notes).expect("create sound dir");

    let keyboard = Keyboard::piano();
    let samples = vec![16384i16; frames];
    for key in keyboard.keys() {
        let name = keyboard.sample_name(key).expect("key has a sample name");
        write_wav(&notes.join(format!("{name}.wav")), &samples);
    }
    notes
}

/// Peak absolute amplitude.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}
