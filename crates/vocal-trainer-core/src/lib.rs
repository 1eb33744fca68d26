//! Vocal Trainer Core Library
//!
//! Practice-track playback, per-exercise notes and microphone takes for a
//! vocal-exercise trainer, using rodio for output and CPAL for capture.
//!
//! # Example
//!
//! ```no_run
//! use vocal_trainer_core::{
//!     CoreResult, MemoryStore, NoteKeying, NotesStore, PlayerController, Playlist,
//!     RodioOutput, Trainer,
//! };
//!
//! use std::path::Path;
//!
//! fn main() -> CoreResult<()> {
//!     let playlist = Playlist::load(Path::new("playlist.json"))?;
//!     let player = PlayerController::new(playlist, RodioOutput::new()?, "audios");
//!     let notes = NotesStore::new(MemoryStore::new());
//!     let mut trainer = Trainer::new(player, notes, "vocal_trainer", NoteKeying::Exercise);
//!
//!     let view = trainer.select_track(0)?;
//!     println!("{}: {}", view.selected.track.name, view.selected.message);
//!     Ok(())
//! }
//! ```

mod error;
mod notes;
mod player;
mod playlist;
mod recorder;
mod trainer;

pub use {
    error::CoreError,
    error::Result as CoreResult,
    notes::{
        EMPTY_NOTES_PLACEHOLDER, JsonFileStore, KeyValueStore, MemoryStore, Note, NoteAppend,
        NoteKeying, NotesStore, NotesView, exercise_key, track_key,
    },
    player::{
        AudioOutput, DEFAULT_MAX_RATE, DEFAULT_MESSAGE, DEFAULT_MIN_RATE, PlaybackRate,
        PlaybackStatus, PlayerController, PlayerState, RateBounds, RodioOutput, SelectedTrack,
    },
    playlist::{Playlist, Track},
    recorder::{
        CLIP_EXTENSION, CLIP_MIME_TYPE, CaptureConstraints, CaptureDevice, CaptureEvent,
        CaptureFormat, CaptureHandle, DEFAULT_PROBE_ATTEMPTS, DEFAULT_PROBE_INTERVAL,
        DurationOutcome, FALLBACK_TRACK_NAME, MicrophoneDevice, PlatformSupport,
        ProbePolicy, RecordedClip, Recorder, RecorderState, RecorderUpdate, StopSignal,
        capture_channel, format_elapsed, recording_filename, sanitize_track_name,
        wait_for_duration,
    },
    trainer::{TrackView, Trainer},
};

#[cfg(test)]
mod tests;
