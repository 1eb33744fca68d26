use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Trainer errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Playlist file could not be read.
    #[error("Playlist unreadable at {path:?}: {source} {location}")]
    PlaylistUnreadable {
        /// Path of the playlist file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Playlist content is not one of the accepted shapes.
    #[error("Playlist malformed: {reason} {location}")]
    PlaylistMalformed {
        /// Description of what was wrong.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Playlist parsed but holds no tracks.
    #[error("Playlist contains no tracks {location}")]
    PlaylistEmpty {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Requested track index is outside the loaded playlist.
    #[error("Track index {index} out of range (playlist has {len} tracks) {location}")]
    TrackOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of loaded tracks.
        len: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No track is currently selected.
    #[error("No track selected {location}")]
    NoTrackSelected {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio output operation failed.
    #[error("Playback error: {reason} {location}")]
    PlaybackError {
        /// Description of the playback error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Notes storage could not be read or written.
    #[error("Notes storage error: {reason} {location}")]
    StorageError {
        /// Description of the storage error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Microphone capture is not available on this platform.
    #[error("Recording is not supported on this platform {location}")]
    CaptureUnsupported {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recorder operation not valid in the current state.
    #[error("Cannot {action} while {state} {location}")]
    InvalidRecorderTransition {
        /// Attempted operation.
        action: &'static str,
        /// Recorder state at the time.
        state: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio data captured.
    #[error("No audio captured {location}")]
    NoAudioCaptured {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recorded clip could not be encoded or written.
    #[error("Clip error: {reason} {location}")]
    ClipError {
        /// Description of the clip error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
