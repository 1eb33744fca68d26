use crate::CoreResult;

use std::{path::Path, time::Duration};

/// Audio sink driven by the player controller.
///
/// Mirrors the handful of operations a media element exposes: load a source,
/// start/pause, rate, seek and position. Implemented by [`RodioOutput`] for
/// real playback and by fakes in tests.
///
/// [`RodioOutput`]: crate::player::RodioOutput
pub trait AudioOutput {
    /// Replace the current source. Position resets to zero and the output
    /// is left paused. On error the previous source stays loaded.
    fn load(&mut self, source: &Path) -> CoreResult<()>;

    /// Begin or resume playback.
    fn play(&mut self) -> CoreResult<()>;

    /// Pause playback, keeping the position.
    fn pause(&mut self);

    /// Apply a playback rate (1.0 = normal speed).
    fn set_rate(&mut self, rate: f32);

    /// Jump to an absolute position in the current source.
    fn seek_to(&mut self, position: Duration) -> CoreResult<()>;

    /// Current position in the current source.
    fn position(&self) -> Duration;

    /// Total length of the current source, when known.
    fn duration(&self) -> Option<Duration>;

    /// `true` once the current source has played to its end.
    fn is_finished(&self) -> bool;
}
