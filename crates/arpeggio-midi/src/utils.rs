//! MIDI utility functions

/// Velocity (0-127) as a linear gain in 0.0..=1.0.
///
/// Front ends use it to show how hard a key was struck; the mixer applies the
/// same scaling when a note is played.
#[inline]
pub fn velocity_to_gain(velocity: u8) -> f32 {
    velocity.min(127) as f32 / 127.0
}
