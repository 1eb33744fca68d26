use crate::{
    CoreError, CoreResult,
    player::{AudioOutput, PlaybackRate, PlaybackStatus, PlayerState, RateBounds},
    playlist::{Playlist, Track},
};

use std::{
    panic::Location,
    path::PathBuf,
    time::Duration,
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Encouragement shown for tracks without a custom message.
pub const DEFAULT_MESSAGE: &str = "Good practice! Remember to use your diaphragm :)";

/// Outcome of a successful track selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedTrack {
    /// Index of the now-active track.
    pub index: usize,
    /// The active track.
    pub track: Track,
    /// Message to display: the track's own or the default.
    pub message: String,
    /// `false` when the output refused to start (e.g. device busy); the
    /// track stays loaded and paused.
    pub playing: bool,
}

/// Owns the active-track index, playback rate and transport status, and
/// drives an [`AudioOutput`] accordingly.
pub struct PlayerController<O: AudioOutput> {
    playlist: Playlist,
    output: O,
    audio_dir: PathBuf,
    bounds: RateBounds,
    default_message: String,
    state: PlayerState,
}

impl<O: AudioOutput> PlayerController<O> {
    /// Create a controller with nothing loaded.
    pub fn new(playlist: Playlist, output: O, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            playlist,
            output,
            audio_dir: audio_dir.into(),
            bounds: RateBounds::default(),
            default_message: DEFAULT_MESSAGE.to_string(),
            state: PlayerState::default(),
        }
    }

    /// Use `bounds` for every subsequent rate change.
    pub fn with_rate_bounds(mut self, bounds: RateBounds) -> Self {
        self.bounds = bounds;
        self.state.rate = bounds.clamp(self.state.rate.value());
        self
    }

    /// Use `message` for tracks that have no message of their own.
    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = message.into();
        self
    }

    /// Load the track at `index`, apply the current rate and try to play it.
    ///
    /// A refusal to start playing is logged and reported through
    /// [`SelectedTrack::playing`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TrackOutOfRange`] without touching any state if
    /// `index` is outside the playlist, or a playback error if the source
    /// cannot be loaded. A failed load keeps the previous track selected,
    /// paused.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn select_track(&mut self, index: usize) -> CoreResult<SelectedTrack> {
        let track = self
            .playlist
            .get(index)
            .cloned()
            .ok_or_else(|| CoreError::TrackOutOfRange {
                index,
                len: self.playlist.len(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let source = track.source_path(&self.audio_dir);
        if let Err(e) = self.output.load(&source) {
            // The previous source stays loaded but no longer plays.
            self.output.pause();
            self.state.status = match self.state.index {
                Some(_) => PlaybackStatus::Paused,
                None => PlaybackStatus::Stopped,
            };
            warn!(index, file = %track.file, error = ?e, "Failed to load track");
            return Err(e);
        }
        self.state.index = Some(index);
        self.output.set_rate(self.state.rate.value());

        let playing = match self.output.play() {
            Ok(()) => {
                self.state.status = PlaybackStatus::Playing;
                true
            }
            Err(e) => {
                warn!(index, error = ?e, "Could not start playback automatically");
                self.state.status = PlaybackStatus::Paused;
                false
            }
        };

        info!(index, file = %track.file, playing, "Track selected");

        let message = track.message_or(&self.default_message).to_string();

        Ok(SelectedTrack {
            index,
            track,
            message,
            playing,
        })
    }

    /// Select the track whose identifier is `file`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TrackOutOfRange`] if no track has that identifier.
    #[track_caller]
    pub fn select_file(&mut self, file: &str) -> CoreResult<SelectedTrack> {
        match self.playlist.find_by_file(file) {
            Some(index) => self.select_track(index),
            None => Err(CoreError::TrackOutOfRange {
                index: self.playlist.len(),
                len: self.playlist.len(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Resume playback of the loaded track.
    ///
    /// # Errors
    ///
    /// Returns error if nothing is loaded or the output refuses to play.
    #[track_caller]
    pub fn play(&mut self) -> CoreResult<()> {
        if self.state.index.is_none() {
            return Err(CoreError::NoTrackSelected {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.output.play()?;
        self.state.status = PlaybackStatus::Playing;
        Ok(())
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        if self.state.status == PlaybackStatus::Playing {
            self.output.pause();
            self.state.status = PlaybackStatus::Paused;
        }
    }

    /// Pause when playing, otherwise play. Returns whether it is now playing.
    ///
    /// # Errors
    ///
    /// Returns error if nothing is loaded or the output refuses to play.
    #[track_caller]
    pub fn toggle(&mut self) -> CoreResult<bool> {
        if self.state.status == PlaybackStatus::Playing {
            self.pause();
            Ok(false)
        } else {
            self.play()?;
            Ok(true)
        }
    }

    /// Clamp and apply a new rate to the active stream.
    pub fn set_playback_rate(&mut self, rate: f32) -> PlaybackRate {
        let rate = self.bounds.clamp(rate);
        self.state.rate = rate;
        self.output.set_rate(rate.value());
        debug!(rate = rate.value(), "Playback rate changed");
        rate
    }

    /// Back to normal speed.
    pub fn reset_rate(&mut self) -> PlaybackRate {
        self.set_playback_rate(PlaybackRate::NORMAL.value())
    }

    /// Move the position by `delta_seconds`, clamped to `[0, duration]`.
    /// Only the lower bound applies when the duration is unknown.
    ///
    /// # Errors
    ///
    /// Returns error if nothing is loaded or the output cannot seek.
    #[track_caller]
    pub fn seek(&mut self, delta_seconds: f64) -> CoreResult<Duration> {
        if self.state.index.is_none() {
            return Err(CoreError::NoTrackSelected {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let target = clamp_position(
            self.output.position(),
            delta_seconds,
            self.output.duration(),
        );
        self.output.seek_to(target)?;

        debug!(delta_seconds, target = ?target, "Seeked");

        Ok(target)
    }

    /// Advance after the active track ended.
    ///
    /// Returns the newly selected track, or `None` once the last track has
    /// ended; from then on the player stays `Finished`.
    ///
    /// # Errors
    ///
    /// Returns error if the next source cannot be loaded.
    #[instrument(skip(self))]
    pub fn on_track_ended(&mut self) -> CoreResult<Option<SelectedTrack>> {
        let Some(index) = self.state.index else {
            return Ok(None);
        };

        let next = index + 1;
        if next < self.playlist.len() {
            self.select_track(next).map(Some)
        } else {
            self.output.pause();
            self.state.status = PlaybackStatus::Finished;
            info!(index, "Reached end of playlist");
            Ok(None)
        }
    }

    /// Fire [`on_track_ended`](Self::on_track_ended) if the output drained
    /// while playing. Meant to be called on a regular tick.
    ///
    /// # Errors
    ///
    /// Returns error if the next source cannot be loaded.
    pub fn poll_ended(&mut self) -> CoreResult<Option<SelectedTrack>> {
        if self.state.status == PlaybackStatus::Playing && self.output.is_finished() {
            return self.on_track_ended();
        }
        Ok(None)
    }

    /// Current state snapshot.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Active track, if any.
    pub fn current_track(&self) -> Option<&Track> {
        self.state.index.and_then(|i| self.playlist.get(i))
    }

    /// The loaded playlist.
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Current position of the active source.
    pub fn position(&self) -> Duration {
        self.output.position()
    }

    /// Length of the active source, when known.
    pub fn duration(&self) -> Option<Duration> {
        self.output.duration()
    }

    /// Borrow the output, mostly for inspection in tests.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Mutably borrow the output.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}

pub(crate) fn clamp_position(
    current: Duration,
    delta_seconds: f64,
    duration: Option<Duration>,
) -> Duration {
    let delta_seconds = if delta_seconds.is_finite() {
        delta_seconds
    } else {
        0.0
    };
    let mut target = current.as_secs_f64() + delta_seconds;
    if let Some(duration) = duration {
        target = target.min(duration.as_secs_f64());
    }
    if !target.is_finite() || target < 0.0 {
        target = 0.0;
    }
    // Past what Duration can hold (only reachable with an unknown length).
    Duration::try_from_secs_f64(target).unwrap_or(current)
}
