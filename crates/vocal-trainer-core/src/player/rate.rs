use std::fmt;

/// Default lower bound of the rate slider.
pub const DEFAULT_MIN_RATE: f32 = 0.5;
/// Default upper bound of the rate slider.
pub const DEFAULT_MAX_RATE: f32 = 2.0;

/// Inclusive range a playback rate is clamped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBounds {
    min: f32,
    max: f32,
}

impl RateBounds {
    /// Build bounds, swapping the ends if given backwards and falling back
    /// to the defaults for non-positive or non-finite values.
    pub fn new(min: f32, max: f32) -> Self {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        let min = if valid(min) { min } else { DEFAULT_MIN_RATE };
        let max = if valid(max) { max } else { DEFAULT_MAX_RATE };
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Lower bound.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Clamp `rate` into the range. NaN maps to normal speed, then clamps.
    pub fn clamp(&self, rate: f32) -> PlaybackRate {
        let rate = if rate.is_nan() { 1.0 } else { rate };
        PlaybackRate(rate.clamp(self.min, self.max))
    }
}

impl Default for RateBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_RATE,
            max: DEFAULT_MAX_RATE,
        }
    }
}

/// A playback rate already clamped to some [`RateBounds`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PlaybackRate(f32);

impl PlaybackRate {
    /// Normal speed.
    pub const NORMAL: PlaybackRate = PlaybackRate(1.0);

    /// Raw multiplier.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Slider label, one decimal followed by `x` (`"1.0x"`).
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x", self.0)
    }
}
