//! Integration tests for MIDI file flattening.
//!
//! Files are built with midly's writer so each test states its timeline directly.

use arpeggio_midi::{Error, Keyboard, MidiNoteFile, PianoKey};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{
    Format, Fps, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

fn note_on(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(vel),
            },
        },
    }
}

fn note_off(delta: u32, key: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(64),
            },
        },
    }
}

fn tempo(delta: u32, us_per_beat: u32) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(us_per_beat))),
    }
}

fn end_of_track(delta: u32) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

fn encode(smf: &Smf) -> Vec<u8> {
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes).expect("write MIDI");
    bytes
}

fn metrical(tracks: Vec<Vec<TrackEvent<'static>>>) -> Vec<u8> {
    let format = if tracks.len() > 1 {
        Format::Parallel
    } else {
        Format::SingleTrack
    };
    encode(&Smf {
        header: Header::new(format, Timing::Metrical(u15::new(480))),
        tracks,
    })
}

#[test]
fn test_default_tempo_timestamps() {
    let data = metrical(vec![vec![
        note_on(0, 60, 100),
        note_off(480, 60),
        note_on(0, 62, 90),
        note_on(960, 64, 80),
        end_of_track(0),
    ]]);

    let file = MidiNoteFile::parse(&data).unwrap();
    let times: Vec<f64> = file.notes.iter().map(|n| n.time_ms).collect();
    assert_eq!(times, vec![0.0, 500.0, 1500.0]);
    assert_eq!(file.notes[1].note, 62);
    assert_eq!(file.notes[1].velocity, 90);
}

#[test]
fn test_zero_velocity_note_on_is_dropped() {
    let data = metrical(vec![vec![
        note_on(0, 60, 100),
        note_on(240, 60, 0),
        note_on(240, 67, 1),
        end_of_track(0),
    ]]);

    let file = MidiNoteFile::parse(&data).unwrap();
    assert_eq!(file.len(), 2);
    assert!(file.notes.iter().all(|n| n.velocity > 0));
    assert_eq!(file.notes[1].note, 67);
}

#[test]
fn test_tempo_change_in_conductor_track_applies_to_other_tracks() {
    // Conductor doubles the speed after one beat.
    let conductor = vec![tempo(0, 500_000), tempo(480, 250_000), end_of_track(0)];
    let melody = vec![
        note_on(480, 60, 100), // 1 beat  @ 120 BPM = 500 ms
        note_on(480, 62, 100), // +1 beat @ 240 BPM = 750 ms
        note_on(960, 64, 100), // +2 beats @ 240 BPM = 1250 ms
        end_of_track(0),
    ];

    let file = MidiNoteFile::parse(&metrical(vec![conductor, melody])).unwrap();
    let times: Vec<f64> = file.notes.iter().map(|n| n.time_ms).collect();
    assert_eq!(times.len(), 3);
    assert!((times[0] - 500.0).abs() < 1e-9);
    assert!((times[1] - 750.0).abs() < 1e-9);
    assert!((times[2] - 1250.0).abs() < 1e-9);
}

#[test]
fn test_tracks_are_merged_in_time_order() {
    let left = vec![note_on(0, 48, 70), note_on(960, 50, 70), end_of_track(0)];
    let right = vec![note_on(480, 72, 90), note_on(960, 74, 90), end_of_track(0)];

    let file = MidiNoteFile::parse(&metrical(vec![left, right])).unwrap();
    let keys: Vec<u8> = file.notes.iter().map(|n| n.note).collect();
    assert_eq!(keys, vec![48, 72, 50, 74]);
    assert!(file.notes.windows(2).all(|w| w[0].time_ms <= w[1].time_ms));
}

#[test]
fn test_equal_ticks_keep_track_order() {
    let first = vec![note_on(480, 60, 100), end_of_track(0)];
    let second = vec![note_on(480, 64, 100), end_of_track(0)];

    let file = MidiNoteFile::parse(&metrical(vec![first, second])).unwrap();
    let keys: Vec<u8> = file.notes.iter().map(|n| n.note).collect();
    assert_eq!(keys, vec![60, 64]);
}

#[test]
fn test_timecode_file_ignores_tempo() {
    // 25 fps * 40 ticks per frame = 1000 ticks per second
    let smf = Smf {
        header: Header::new(Format::SingleTrack, Timing::Timecode(Fps::Fps25, 40)),
        tracks: vec![vec![
            tempo(0, 250_000),
            note_on(1000, 60, 100),
            note_on(500, 61, 100),
            end_of_track(0),
        ]],
    };

    let file = MidiNoteFile::parse(&encode(&smf)).unwrap();
    assert_eq!(file.ticks_per_beat, None);
    assert!((file.notes[0].time_ms - 1000.0).abs() < 1e-6);
    assert!((file.notes[1].time_ms - 1500.0).abs() < 1e-6);
}

#[test]
fn test_load_from_disk_and_map_to_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.mid");
    let data = metrical(vec![vec![
        note_on(0, 21, 100),  // A0
        note_on(0, 22, 100),  // A#0
        note_on(0, 12, 100),  // C0, off the keyboard
        note_on(0, 108, 100), // C8
        end_of_track(0),
    ]]);
    std::fs::write(&path, data).unwrap();

    let file = MidiNoteFile::load(&path).unwrap();
    let keyboard = Keyboard::piano();
    let keys: Vec<Option<PianoKey>> = file
        .notes
        .iter()
        .map(|n| keyboard.key_for_midi(n.note))
        .collect();

    assert_eq!(
        keys,
        vec![
            Some(PianoKey::white(0)),
            Some(PianoKey::black(0)),
            None,
            Some(PianoKey::white(51)),
        ]
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = MidiNoteFile::load(dir.path().join("missing.mid"));
    assert!(matches!(result, Err(Error::Io(_))));
}
