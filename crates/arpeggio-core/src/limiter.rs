//! Soft voice limiter.
//!
//! Each note plays at `base_volume * velocity / 127`. Once more than
//! `threshold` notes are ringing, that volume is further scaled by
//! `sqrt(threshold / playing)`, so the summed loudness of a dense passage grows
//! much slower than the note count.

use crate::mixer::{Channel, Mixer};
use crate::sound::Sound;
use crate::{Error, Result};
use tracing::{trace, warn};

/// Notes that may ring before the limiter starts backing off.
pub const LIMITER_THRESHOLD: usize = 16;

/// Volume of a full-velocity note with the limiter idle.
pub const BASE_NOTE_VOLUME: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LimiterConfig {
    pub threshold: usize,
    pub base_volume: f32,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            threshold: LIMITER_THRESHOLD,
            base_volume: BASE_NOTE_VOLUME,
        }
    }
}

impl LimiterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(Error::InvalidConfig(
                "limiter threshold must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.base_volume) {
            return Err(Error::InvalidConfig(format!(
                "base_volume {} out of range (0.0-1.0)",
                self.base_volume
            )));
        }
        Ok(())
    }
}

/// 1.0 up to `threshold` playing notes, then `sqrt(threshold / num_playing)`.
#[inline]
pub fn limiter_factor(num_playing: usize, threshold: usize) -> f32 {
    if num_playing <= threshold {
        return 1.0;
    }
    (threshold as f32 / num_playing as f32).sqrt()
}

/// Volume for a new note given how many are already playing.
#[inline]
pub fn note_volume(num_playing: usize, velocity: u8, config: &LimiterConfig) -> f32 {
    let velocity_factor = velocity.min(127) as f32 / 127.0;
    config.base_volume * limiter_factor(num_playing, config.threshold) * velocity_factor
}

/// Plays sounds on free mixer channels and remembers which ones are ringing.
pub struct VoiceLimiter {
    mixer: Mixer,
    active: Vec<Channel>,
    config: LimiterConfig,
}

impl VoiceLimiter {
    pub fn new(mixer: Mixer, config: LimiterConfig) -> Self {
        Self {
            mixer,
            active: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    /// Channels started through this limiter that are still playing, as of
    /// the last [`prune`](Self::prune).
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Forget channels that have finished.
    pub fn prune(&mut self) {
        self.active.retain(Channel::get_busy);
    }

    /// Play `sound` at a velocity-scaled, limited volume.
    ///
    /// Returns the channel it landed on, or `None` if every channel was busy
    /// (the note is dropped).
    pub fn play(&mut self, sound: &Sound, velocity: u8) -> Option<Channel> {
        self.prune();

        let num_playing = self.active.len();
        let volume = note_volume(num_playing, velocity, &self.config);

        let Some(channel) = self.mixer.find_channel() else {
            warn!(
                "All {} channels busy, dropping note (velocity {velocity})",
                self.mixer.num_channels()
            );
            return None;
        };

        channel.set_volume(volume);
        if let Err(e) = channel.play(sound) {
            warn!("Channel {} could not start: {e}", channel.index());
            return None;
        }

        trace!(
            "Channel {} playing at {volume:.3} ({num_playing} already ringing)",
            channel.index()
        );

        self.active.push(channel.clone());
        Some(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_factor_below_threshold() {
        assert_eq!(limiter_factor(0, 16), 1.0);
        assert_eq!(limiter_factor(8, 16), 1.0);
        assert_eq!(limiter_factor(16, 16), 1.0);
    }

    #[test]
    fn test_factor_above_threshold() {
        assert_relative_eq!(limiter_factor(32, 16), 0.5f32.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(limiter_factor(64, 16), 0.5, epsilon = 1e-6);
        assert!(limiter_factor(17, 16) < 1.0);
    }

    #[test]
    fn test_note_volume() {
        let config = LimiterConfig::default();
        assert_relative_eq!(note_volume(0, 127, &config), 0.6, epsilon = 1e-6);
        assert_relative_eq!(note_volume(0, 0, &config), 0.0);
        assert_relative_eq!(
            note_volume(32, 127, &config),
            0.6 * 0.5f32.sqrt(),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            note_volume(4, 64, &config),
            0.6 * 64.0 / 127.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_volume_never_exceeds_base() {
        let config = LimiterConfig::default();
        for playing in 0..600 {
            for velocity in [0u8, 1, 64, 127, 200] {
                let v = note_volume(playing, velocity, &config);
                assert!((0.0..=config.base_volume).contains(&v));
            }
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(LimiterConfig::default().validate().is_ok());
        let zero = LimiterConfig {
            threshold: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
        let loud = LimiterConfig {
            base_volume: 1.5,
            ..Default::default()
        };
        assert!(loud.validate().is_err());
    }
}
