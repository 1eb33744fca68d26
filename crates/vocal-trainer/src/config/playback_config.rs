use crate::config::{default_message, default_rate_max, default_rate_min, default_seek_step_secs};

use serde::{Deserialize, Serialize};
use vocal_trainer_core::RateBounds;

/// Transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Slowest selectable rate.
    #[serde(default = "default_rate_min")]
    pub rate_min: f32,
    /// Fastest selectable rate.
    #[serde(default = "default_rate_max")]
    pub rate_max: f32,
    /// Seconds moved by the forward/back commands.
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: f64,
    /// Shown for tracks without their own message.
    #[serde(default = "default_message")]
    pub default_message: String,
}

impl PlaybackConfig {
    pub(crate) fn rate_bounds(&self) -> RateBounds {
        RateBounds::new(self.rate_min, self.rate_max)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            rate_min: default_rate_min(),
            rate_max: default_rate_max(),
            seek_step_secs: default_seek_step_secs(),
            default_message: default_message(),
        }
    }
}
