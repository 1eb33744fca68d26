use crate::config::{default_probe_attempts, default_probe_interval_ms, default_recording_enabled};

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use vocal_trainer_core::ProbePolicy;

/// Microphone recording settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Set to `false` to hide recording entirely.
    #[serde(default = "default_recording_enabled")]
    pub enabled: bool,
    /// Where saved takes go (None = data directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Times the clip duration is probed before giving up.
    #[serde(default = "default_probe_attempts")]
    pub probe_attempts: u32,
    /// Pause between duration probes.
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
}

impl RecordingConfig {
    pub(crate) fn probe_policy(&self) -> ProbePolicy {
        ProbePolicy {
            attempts: self.probe_attempts,
            interval: Duration::from_millis(self.probe_interval_ms),
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            enabled: default_recording_enabled(),
            output_dir: None,
            probe_attempts: default_probe_attempts(),
            probe_interval_ms: default_probe_interval_ms(),
        }
    }
}
