//! Voice mixer for the Arpeggio virtual piano.
//!
//! # Primary API
//!
//! - [`Sound`]: an in-memory stereo sample, loaded from WAV
//! - [`Mixer`] / [`Channel`]: a fixed pool of voice channels (control side)
//! - [`MixerRenderer`]: mixes busy channels into an output buffer (audio side)
//! - [`VoiceLimiter`]: plays notes at a velocity-scaled volume that backs off
//!   as more notes ring at once
//! - [`AudioSystem`] / [`AudioSystemBuilder`]: CPAL output driving the mixer
//!   (feature `"std"`)
//!
//! # Example
//!
//! ```ignore
//! use arpeggio_core::{AudioSystem, LimiterConfig, Sound, VoiceLimiter};
//!
//! let system = AudioSystem::builder().channels(512).build()?;
//! let mut limiter = VoiceLimiter::new(system.mixer().clone(), LimiterConfig::default());
//!
//! let c4 = Sound::load("assets/notes/C4.wav")?;
//! limiter.play(&c4, 100);
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::MixerConfig;

pub(crate) mod lockfree;

mod sound;
pub use sound::Sound;

mod mixer;
pub use mixer::{channel_pool, Channel, Mixer, MixerRenderer};

pub mod limiter;
pub use limiter::{
    limiter_factor, note_volume, LimiterConfig, VoiceLimiter, BASE_NOTE_VOLUME, LIMITER_THRESHOLD,
};

#[cfg(feature = "std")]
mod output;

#[cfg(feature = "std")]
mod system;
#[cfg(feature = "std")]
pub use system::{AudioSystem, AudioSystemBuilder};
