//! Per-channel state shared between the control thread and the audio callback.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, Ordering};

/// Busy flag and volume of one mixer channel.
///
/// The control side marks a channel busy as soon as it queues a sound; the
/// renderer clears the flag when the sound runs out or is stopped. Aligned to
/// a cache line so neighbouring channels don't share one.
#[derive(Debug)]
#[repr(align(64))]
pub(crate) struct ChannelState {
    busy: AtomicBool,
    volume: AtomicF32,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            busy: AtomicBool::new(false),
            volume: AtomicF32::new(1.0),
        }
    }
}

impl ChannelState {
    #[inline]
    pub(crate) fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::Release);
    }

    #[inline]
    pub(crate) fn volume(&self) -> f32 {
        self.volume.load(Ordering::Relaxed)
    }

    /// Clamped to 0.0..=1.0; NaN mutes.
    #[inline]
    pub(crate) fn set_volume(&self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.volume.store(volume, Ordering::Relaxed);
    }
}
