//! Console rendering. Every function returns lines so the wording can be
//! checked without a terminal.

use crate::AppError;

use std::time::Duration;

use vocal_trainer_core::{
    CoreError, PlatformSupport, PlaybackStatus, PlayerState, Playlist, RecorderState,
    RecorderUpdate, TrackView, format_elapsed,
};

pub(crate) const NO_TRACKS: &str = "No tracks available.";
pub(crate) const EMPTY_NOTE_WARNING: &str = "Remember to write something before saving!";
pub(crate) const NOTES_CLEARED: &str = "Notes deleted.";
pub(crate) const CLEAR_PROMPT: &str = "Delete all notes for this exercise? [y/N]";
pub(crate) const CLEAR_KEPT: &str = "Notes kept.";
pub(crate) const MICROPHONE_DENIED: &str =
    "Could not access the microphone. Make sure permission was granted.";
pub(crate) const NOTHING_RECORDED: &str = "No audio was recorded.";
pub(crate) const NO_CLIP: &str = "No recording yet. Use 'rec start' first.";
pub(crate) const END_OF_PLAYLIST: &str = "End of playlist.";

pub(crate) const HELP: &[&str] = &[
    "list              show the playlist",
    "select <n|file>   play a track",
    "next              play the following track",
    "play / pause      resume or pause",
    "toggle            play or pause",
    "rate <x>          playback speed, e.g. rate 0.8",
    "rate reset        back to 1.0x",
    "fwd / back        skip forward or back",
    "seek <+-secs>     move by a number of seconds",
    "note <text>       save a note on this exercise",
    "notes             show this exercise's notes",
    "clear             delete this exercise's notes",
    "rec start|stop    record yourself",
    "rec cancel        abandon a pending microphone request",
    "rec play|save     listen to or save the last take",
    "status            player and recorder state",
    "quit              exit",
];

/// Warning shown at startup when recording cannot be offered.
pub(crate) fn recording_banner(support: &PlatformSupport) -> Option<String> {
    match support {
        PlatformSupport::Supported => None,
        PlatformSupport::Unsupported { reason } => Some(format!(
            "! {} Playback and notes still work.",
            reason
        )),
    }
}

/// Playlist with the active track marked.
pub(crate) fn playlist_lines(playlist: &Playlist, current: Option<usize>) -> Vec<String> {
    playlist
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if current == Some(i) { '>' } else { ' ' };
            format!("{} {:>2}. {}", marker, i + 1, track.name)
        })
        .collect()
}

/// Panel printed after every track change.
pub(crate) fn track_lines(view: &TrackView, total: usize) -> Vec<String> {
    let selected = &view.selected;
    let transport = if selected.playing { "Playing" } else { "Paused" };

    let mut lines = vec![
        format!(
            "{} [{}/{}] {}",
            transport,
            selected.index + 1,
            total,
            selected.track.name
        ),
        format!("  {}", selected.message),
        "Notes:".to_string(),
    ];
    lines.extend(view.notes.lines().into_iter().map(|l| format!("  {}", l)));
    lines
}

/// One-line transport summary.
pub(crate) fn player_line(
    state: &PlayerState,
    track_name: Option<&str>,
    position: Duration,
    duration: Option<Duration>,
) -> String {
    let Some(name) = track_name else {
        return "No track selected.".to_string();
    };

    let status = match state.status {
        PlaybackStatus::Stopped => "Stopped",
        PlaybackStatus::Playing => "Playing",
        PlaybackStatus::Paused => "Paused",
        PlaybackStatus::Finished => "Finished",
    };

    let total = duration
        .map(|d| format_elapsed(d.as_secs_f64()))
        .unwrap_or_else(|| "?:??".to_string());

    format!(
        "{}: {} {}/{} at {}",
        status,
        name,
        format_elapsed(position.as_secs_f64()),
        total,
        state.rate
    )
}

/// One-line recorder summary.
pub(crate) fn recorder_line(state: &RecorderState, clip: Option<&str>) -> String {
    let base = match state {
        RecorderState::Recording { started_at, .. } => format!(
            "Recorder: recording ({})",
            format_elapsed(started_at.elapsed().as_secs_f64())
        ),
        other => format!("Recorder: {}", other.name()),
    };
    match clip {
        Some(filename) => format!("{}, last take {}", base, filename),
        None => base,
    }
}

/// Message for a recorder update.
pub(crate) fn recorder_update_line(update: &RecorderUpdate) -> String {
    match update {
        RecorderUpdate::Started { .. } => "Recording... ('rec stop' to finish)".to_string(),
        RecorderUpdate::PermissionDenied { reason, .. } => {
            format!("{} ({})", MICROPHONE_DENIED, reason)
        }
        RecorderUpdate::ClipReady { filename, .. } => {
            format!("Take ready: {} ('rec play' or 'rec save')", filename)
        }
        RecorderUpdate::NothingCaptured { .. } => NOTHING_RECORDED.to_string(),
        RecorderUpdate::Failed { reason, .. } => format!("Recording failed: {}", reason),
    }
}

/// Wording for an error the user caused or can act on.
pub(crate) fn error_line(error: &AppError) -> String {
    match error {
        AppError::InvalidCommand { reason, .. } => format!("Unknown command: {}", reason),
        AppError::Core { source, .. } => match source {
            CoreError::TrackOutOfRange { index, len, .. } => {
                format!("There is no track {}; the playlist has {}.", index + 1, len)
            }
            CoreError::NoTrackSelected { .. } => "Select a track first.".to_string(),
            CoreError::CaptureUnsupported { .. } => {
                "Recording is not available here.".to_string()
            }
            CoreError::InvalidRecorderTransition { action, state, .. } => {
                format!("Cannot {} while {}.", action, state)
            }
            other => other.to_string(),
        },
        other => other.to_string(),
    }
}
