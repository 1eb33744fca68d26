use crate::{CoreError, CoreResult, playlist::PlaylistDocument, playlist::Track};

use std::{fs, panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Ordered, immutable list of exercises.
///
/// Never empty: loading a playlist without tracks is an error, so every
/// index in `0..len()` is valid for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Load and normalize a playlist file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not an accepted shape,
    /// or contains no tracks.
    #[track_caller]
    #[instrument]
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CoreError::PlaylistUnreadable {
            path: path.to_path_buf(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let playlist = Self::from_json(&contents)?;

        info!(path = ?path, tracks = playlist.len(), "Playlist loaded");

        Ok(playlist)
    }

    /// Parse a playlist from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not an accepted shape or has no tracks.
    #[track_caller]
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let tracks = PlaylistDocument::parse(json)?.into_tracks()?;
        Self::from_tracks(tracks)
    }

    /// Build a playlist from already normalized tracks.
    ///
    /// # Errors
    ///
    /// Returns error if `tracks` is empty.
    #[track_caller]
    pub fn from_tracks(tracks: Vec<Track>) -> CoreResult<Self> {
        if tracks.is_empty() {
            return Err(CoreError::PlaylistEmpty {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(Self { tracks })
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in playback order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Position of the track whose identifier is `file`.
    pub fn find_by_file(&self, file: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.file == file)
    }
}
