mod notes_config;
mod playback_config;
mod playlist_config;
mod recording_config;
#[allow(clippy::module_inception)]
mod config;

pub(crate) use {
    config::Config, notes_config::NotesConfig, playback_config::PlaybackConfig,
    playlist_config::PlaylistConfig, recording_config::RecordingConfig,
};

pub(crate) const DEFAULT_PLAYLIST_PATH: &str = "playlist.json";
pub(crate) const DEFAULT_AUDIO_DIR: &str = "audios";
pub(crate) const DEFAULT_SEEK_STEP_SECS: f64 = 5.0;
pub(crate) const DEFAULT_NAMESPACE: &str = "vocal_trainer";
pub(crate) const DEFAULT_RECORDING_ENABLED: bool = true;

pub(crate) fn default_playlist_path() -> std::path::PathBuf {
    std::path::PathBuf::from(DEFAULT_PLAYLIST_PATH)
}

pub(crate) fn default_audio_dir() -> std::path::PathBuf {
    std::path::PathBuf::from(DEFAULT_AUDIO_DIR)
}

pub(crate) fn default_rate_min() -> f32 {
    vocal_trainer_core::DEFAULT_MIN_RATE
}

pub(crate) fn default_rate_max() -> f32 {
    vocal_trainer_core::DEFAULT_MAX_RATE
}

pub(crate) fn default_seek_step_secs() -> f64 {
    DEFAULT_SEEK_STEP_SECS
}

pub(crate) fn default_message() -> String {
    vocal_trainer_core::DEFAULT_MESSAGE.to_string()
}

pub(crate) fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

pub(crate) fn default_recording_enabled() -> bool {
    DEFAULT_RECORDING_ENABLED
}

pub(crate) fn default_probe_attempts() -> u32 {
    vocal_trainer_core::DEFAULT_PROBE_ATTEMPTS
}

pub(crate) fn default_probe_interval_ms() -> u64 {
    vocal_trainer_core::DEFAULT_PROBE_INTERVAL.as_millis() as u64
}
