//! # Play MIDI
//!
//! Plays a short melody on the computer-keyboard bindings, then plays a MIDI
//! file through the 60 fps frame loop until the song ends.
//!
//! **Concepts:** Key bindings, playback toggling, frame loop, soft limiter
//!
//! ```bash
//! cargo run --example play_midi -- path/to/song.mid [start_ms]
//! ```
//!
//! Uses samples from `assets/notes` when present, generated tones otherwise.

use arpeggio::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_micros(16_667);

fn main() -> arpeggio::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let config = PianoConfig::default();
    let midi_file = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.midi_file.clone());
    let start_ms = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.start_position_ms);

    let mut builder = PianoEngine::builder()
        .config(config)
        .midi_file(midi_file)
        .start_position_ms(start_ms);
    if !Path::new(arpeggio::config::DEFAULT_SOUND_DIR).is_dir() {
        println!("No sample directory, using generated tones");
        builder = builder.synthesized_sounds();
    }
    let mut piano = builder.build()?;

    if let Some(audio) = piano.audio() {
        println!(
            "Output: {} at {} Hz",
            audio.current_output_device_name(),
            audio.sample_rate()
        );
    }

    // "Z X C V B N M" on the left hand: C4 up to B4
    println!("Typing a scale...");
    for c in "zxcvbnm".chars() {
        piano.type_char(c);
        std::thread::sleep(Duration::from_millis(200));
        piano.frame(0.0);
    }

    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;

    piano.toggle_playback(now_ms())?;
    println!("Playing {} notes...", piano.playback().len());

    while piano.playback().is_active() {
        let played = piano.frame(now_ms());
        if played > 0 {
            let lit: Vec<&str> = piano
                .highlights()
                .iter()
                .filter_map(|h| piano.keyboard().label(h.key))
                .collect();
            println!("{:>8.0} ms  {}", now_ms(), lit.join(" "));
        }
        std::thread::sleep(FRAME);
    }

    // let the last notes ring out
    std::thread::sleep(Duration::from_secs(2));
    Ok(())
}
