//! Fixed pool of voice channels.
//!
//! The control side ([`Mixer`], [`Channel`]) and the audio side
//! ([`MixerRenderer`]) share one busy flag and one volume per channel. Starting
//! and stopping sounds goes through a bounded command queue so the renderer
//! owns every voice and never takes a lock.
//!
//! A channel is busy from the moment `play` is called until the renderer runs
//! out of samples for it (or processes a `stop`).

use crate::config::MixerConfig;
use crate::lockfree::ChannelState;
use crate::sound::Sound;
use crate::{Error, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::Arc;

enum Command {
    Play { channel: usize, sound: Sound },
    Stop { channel: usize },
}

/// Create a connected mixer/renderer pair.
///
/// The renderer starts at `config.sample_rate`; an output stream resets it to
/// the device rate with [`MixerRenderer::set_sample_rate`].
pub fn channel_pool(config: &MixerConfig) -> Result<(Mixer, MixerRenderer)> {
    config.validate()?;

    let shared: Arc<[ChannelState]> = (0..config.channels)
        .map(|_| ChannelState::default())
        .collect();
    let (tx, rx) = bounded(config.command_capacity);

    let mixer = Mixer {
        shared: shared.clone(),
        commands: tx,
    };
    let renderer = MixerRenderer {
        shared,
        commands: rx,
        voices: (0..config.channels).map(|_| None).collect(),
        sample_rate: config.sample_rate,
    };

    Ok((mixer, renderer))
}

/// Control side of the channel pool. Cheap to clone.
#[derive(Clone)]
pub struct Mixer {
    shared: Arc<[ChannelState]>,
    commands: Sender<Command>,
}

impl Mixer {
    pub fn num_channels(&self) -> usize {
        self.shared.len()
    }

    /// First idle channel, or `None` when every channel is busy.
    pub fn find_channel(&self) -> Option<Channel> {
        self.shared
            .iter()
            .position(|state| !state.is_busy())
            .map(|index| Channel {
                index,
                mixer: self.clone(),
            })
    }

    /// Handle to a specific channel.
    pub fn channel(&self, index: usize) -> Option<Channel> {
        (index < self.num_channels()).then(|| Channel {
            index,
            mixer: self.clone(),
        })
    }

    /// Number of channels currently playing.
    pub fn busy_count(&self) -> usize {
        self.shared.iter().filter(|state| state.is_busy()).count()
    }

    /// Stop every channel.
    pub fn stop_all(&self) -> Result<()> {
        for index in 0..self.num_channels() {
            if self.shared[index].is_busy() {
                self.send(Command::Stop { channel: index })?;
            }
        }
        Ok(())
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => Error::CommandQueueFull,
            TrySendError::Disconnected(_) => Error::MixerDisconnected,
        })
    }
}

/// Handle to one voice channel.
#[derive(Clone)]
pub struct Channel {
    index: usize,
    mixer: Mixer,
}

impl Channel {
    pub fn index(&self) -> usize {
        self.index
    }

    fn state(&self) -> &ChannelState {
        &self.mixer.shared[self.index]
    }

    /// Volume in 0.0..=1.0; out of range values are clamped. Takes effect on
    /// the next rendered block, including for a sound already playing.
    pub fn set_volume(&self, volume: f32) {
        self.state().set_volume(volume);
    }

    pub fn volume(&self) -> f32 {
        self.state().volume()
    }

    /// Start `sound` from its beginning, replacing whatever this channel plays.
    pub fn play(&self, sound: &Sound) -> Result<()> {
        self.state().set_busy(true);
        let sent = self.mixer.send(Command::Play {
            channel: self.index,
            sound: sound.clone(),
        });
        if sent.is_err() {
            self.state().set_busy(false);
        }
        sent
    }

    pub fn stop(&self) -> Result<()> {
        self.mixer.send(Command::Stop {
            channel: self.index,
        })
    }

    /// True while the channel is playing.
    pub fn get_busy(&self) -> bool {
        self.state().is_busy()
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("index", &self.index)
            .field("busy", &self.get_busy())
            .field("volume", &self.volume())
            .finish()
    }
}

/// A sound in flight on one channel.
struct Voice {
    sound: Sound,
    /// Read position in source frames.
    position: f64,
    /// Source frames per output frame.
    step: f64,
}

impl Voice {
    fn new(sound: Sound, output_rate: f64) -> Self {
        let step = if output_rate > 0.0 {
            sound.sample_rate() as f64 / output_rate
        } else {
            1.0
        };
        Self {
            sound,
            position: 0.0,
            step,
        }
    }

    #[inline]
    fn sample(&self) -> (f32, f32) {
        let idx = self.position.floor() as usize;
        let frac = self.position.fract() as f32;

        let (l0, r0) = self.sound.frame(idx);
        let next_idx = (idx + 1).min(self.sound.frames().saturating_sub(1));
        let (l1, r1) = self.sound.frame(next_idx);

        (l0 + (l1 - l0) * frac, r0 + (r1 - r0) * frac)
    }

    /// Mix into interleaved stereo `output`. Returns false once the sound has ended.
    fn render(&mut self, output: &mut [f32], volume: f32) -> bool {
        let len = self.sound.frames() as f64;

        for frame in output.chunks_exact_mut(2) {
            if self.position >= len {
                return false;
            }
            let (left, right) = self.sample();
            frame[0] += left * volume;
            frame[1] += right * volume;
            self.position += self.step;
        }

        self.position < len
    }
}

/// Audio side of the channel pool.
pub struct MixerRenderer {
    shared: Arc<[ChannelState]>,
    commands: Receiver<Command>,
    voices: Vec<Option<Voice>>,
    sample_rate: f64,
}

impl MixerRenderer {
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Applies to sounds started after the call.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Render one block of interleaved stereo into `output`, overwriting it.
    pub fn process(&mut self, output: &mut [f32]) {
        output.fill(0.0);
        self.apply_commands();

        for (index, slot) in self.voices.iter_mut().enumerate() {
            let Some(voice) = slot else {
                continue;
            };

            let volume = self.shared[index].volume();
            if !voice.render(output, volume) {
                *slot = None;
                self.shared[index].set_busy(false);
            }
        }
    }

    fn apply_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                Command::Play { channel, sound } => {
                    // a zero-rate sound would never advance
                    if sound.is_empty() || sound.sample_rate() == 0 {
                        self.voices[channel] = None;
                        self.shared[channel].set_busy(false);
                    } else {
                        self.voices[channel] = Some(Voice::new(sound, self.sample_rate));
                        self.shared[channel].set_busy(true);
                    }
                }
                Command::Stop { channel } => {
                    self.voices[channel] = None;
                    self.shared[channel].set_busy(false);
                }
            }
        }
    }
}
