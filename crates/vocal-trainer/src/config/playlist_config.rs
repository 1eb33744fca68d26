use crate::config::{default_audio_dir, default_playlist_path};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where tracks come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistConfig {
    /// Playlist JSON file.
    #[serde(default = "default_playlist_path")]
    pub path: PathBuf,
    /// Directory track files live in, relative to the playlist's directory
    /// unless absolute.
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            path: default_playlist_path(),
            audio_dir: default_audio_dir(),
        }
    }
}
