//! Song playback through the engine, built offline.

mod helpers;

use arpeggio::prelude::*;
use arpeggio::MixerRenderer;
use helpers::write_song;

/// The renderer must outlive the engine or every note is refused.
fn piano(midi_file: &std::path::Path, start_ms: f64) -> (PianoEngine, MixerRenderer) {
    PianoEngine::builder()
        .synthesized_sounds()
        .channels(64)
        .midi_file(midi_file)
        .start_position_ms(start_ms)
        .build_offline()
        .expect("offline engine")
}

#[test]
fn test_first_toggle_loads_and_plays() {
    let dir = tempfile::tempdir().unwrap();
    // note 10 sits below A0 and is dropped
    let song = write_song(
        dir.path(),
        "song.mid",
        &[(0, 60, 127), (100, 64, 64), (150, 10, 90), (200, 21, 100)],
    );
    let (mut piano, _renderer) = piano(&song, 0.0);

    assert_eq!(
        piano.toggle_playback(1000.0).unwrap(),
        ToggleOutcome::Started { from_ms: 0.0 }
    );
    assert_eq!(piano.playback().len(), 3);

    assert_eq!(piano.frame(1000.0), 1);
    let c4 = piano.keyboard().key_for_name("C4").unwrap();
    assert_eq!(piano.highlight_of(c4), Some(30));

    assert_eq!(piano.frame(1050.0), 0);
    assert_eq!(piano.frame(1100.0), 1);
    assert_eq!(piano.active_voices(), 2);

    assert_eq!(piano.frame(1300.0), 1);
    assert!(!piano.playback().is_active());
    assert_eq!(piano.highlight_of(PianoKey::white(0)), Some(30));
    assert_eq!(piano.frame(1400.0), 0);
}

#[test]
fn test_pause_and_resume() {
    let dir = tempfile::tempdir().unwrap();
    let song = write_song(dir.path(), "song.mid", &[(0, 60, 100), (1000, 62, 100), (2000, 64, 100)]);
    let (mut piano, _renderer) = piano(&song, 0.0);

    piano.toggle_playback(0.0).unwrap();
    assert_eq!(piano.frame(0.0), 1);
    assert_eq!(piano.toggle_playback(500.0).unwrap(), ToggleOutcome::Paused);
    assert_eq!(piano.frame(5000.0), 0);

    assert_eq!(
        piano.toggle_playback(10_000.0).unwrap(),
        ToggleOutcome::Resumed { at_ms: 1000.0 }
    );
    assert_eq!(piano.frame(10_000.0), 1);
    assert_eq!(piano.frame(10_999.0), 0);
    assert_eq!(piano.frame(11_000.0), 1);
    assert!(!piano.playback().is_active());
}

#[test]
fn test_default_start_position_then_from_top() {
    let dir = tempfile::tempdir().unwrap();
    let song = write_song(
        dir.path(),
        "song.mid",
        &[(134_000, 60, 100), (135_000, 62, 100), (136_000, 64, 100)],
    );
    let (mut piano, _renderer) = PianoEngine::builder()
        .synthesized_sounds()
        .midi_file(&song)
        .build_offline()
        .unwrap();

    assert_eq!(
        piano.toggle_playback(0.0).unwrap(),
        ToggleOutcome::Started { from_ms: 135_000.0 }
    );
    assert_eq!(piano.playback().cursor(), 1);
    assert_eq!(piano.frame(0.0), 1);
    assert_eq!(piano.frame(1000.0), 1);
    assert!(!piano.playback().is_active());

    assert_eq!(
        piano.toggle_playback(2000.0).unwrap(),
        ToggleOutcome::Started { from_ms: 0.0 }
    );
    assert_eq!(piano.playback().cursor(), 0);
    assert_eq!(piano.frame(2000.0), 0);
    assert_eq!(piano.frame(136_000.0), 1);
}

#[test]
fn test_failed_load_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("later.mid");
    let (mut piano, _renderer) = piano(&missing, 0.0);

    assert!(matches!(piano.toggle_playback(0.0), Err(arpeggio::Error::Midi(_))));
    assert!(!piano.playback().is_active());

    write_song(dir.path(), "later.mid", &[(0, 60, 100)]);
    assert_eq!(
        piano.toggle_playback(10.0).unwrap(),
        ToggleOutcome::Started { from_ms: 0.0 }
    );
    assert_eq!(piano.frame(10.0), 1);
}

#[test]
fn test_loading_new_song_stops_playback() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_song(dir.path(), "a.mid", &[(0, 60, 100), (5000, 62, 100)]);
    let second = write_song(dir.path(), "b.mid", &[(0, 72, 100)]);
    let (mut piano, _renderer) = piano(&first, 0.0);

    piano.toggle_playback(0.0).unwrap();
    piano.frame(0.0);
    assert!(piano.playback().is_active());

    assert_eq!(piano.load_midi(&second).unwrap(), 1);
    assert!(!piano.playback().is_active());
    assert_eq!(piano.playback().cursor(), 0);
}

#[test]
fn test_find_first_note_after_loaded_song() {
    let dir = tempfile::tempdir().unwrap();
    let song = write_song(
        dir.path(),
        "song.mid",
        &[(1000, 60, 100), (2000, 62, 100), (3000, 64, 100), (4000, 65, 100)],
    );
    let (mut piano, _renderer) = piano(&song, 0.0);
    piano.load_midi(&song).unwrap();

    let playback = piano.playback();
    assert_eq!(playback.find_first_note_after(2500.0), 2);
    assert_eq!(playback.find_first_note_after(5000.0), 4);
    assert_eq!(playback.find_first_note_after(0.0), 0);
}
