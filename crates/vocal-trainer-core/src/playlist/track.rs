use std::path::{Path, PathBuf};

/// One playable exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Source identifier, a path relative to the audio directory.
    pub file: String,
    /// Display name shown in the selector.
    pub name: String,
    /// Custom message shown while the track is active.
    pub message: Option<String>,
}

impl Track {
    /// Resolve the track's audio file against `audio_dir`.
    pub fn source_path(&self, audio_dir: &Path) -> PathBuf {
        audio_dir.join(&self.file)
    }

    /// The track message, or `default` when the track has none.
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(default)
    }
}
