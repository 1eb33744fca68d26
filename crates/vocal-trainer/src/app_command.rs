use crate::{AppError, AppResult};

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// How a console command names a track.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackRef {
    /// 1-based position in the playlist.
    Number(usize),
    /// File name as written in the playlist.
    File(String),
}

/// Commands read from the console.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Print the playlist.
    List,
    /// Select (and autoplay) a track.
    Select(TrackRef),
    /// Select the track after the current one.
    Next,
    /// Resume playback.
    Play,
    /// Pause playback.
    Pause,
    /// Pause when playing, otherwise play.
    Toggle,
    /// Change the playback rate.
    Rate(f32),
    /// Return to normal speed.
    ResetRate,
    /// Seek forward by the configured step.
    Forward,
    /// Seek back by the configured step.
    Back,
    /// Seek by a signed number of seconds.
    Seek(f64),
    /// Save a note on the active exercise.
    AddNote(String),
    /// Print the notes of the active exercise.
    ShowNotes,
    /// Delete the notes of the active exercise (asks first).
    ClearNotes,
    /// Request the microphone and start a take.
    StartRecording,
    /// Stop the running take.
    StopRecording,
    /// Abandon a pending microphone request.
    CancelRecording,
    /// Play the latest take.
    PlayRecording,
    /// Save the latest take to the recordings directory.
    SaveRecording,
    /// Print player and recorder state.
    Status,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Shutdown,
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(line: &str) -> AppResult<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word.to_ascii_lowercase().as_str(), rest) {
            ("list" | "ls", "") => AppCommand::List,
            ("select" | "s", target) if !target.is_empty() => {
                AppCommand::Select(parse_track_ref(target)?)
            }
            ("next" | "n", "") => AppCommand::Next,
            ("play" | "p", "") => AppCommand::Play,
            ("pause", "") => AppCommand::Pause,
            ("toggle" | "t", "") => AppCommand::Toggle,
            ("rate", "reset") => AppCommand::ResetRate,
            ("rate", value) if !value.is_empty() => AppCommand::Rate(parse_rate(value)?),
            ("fwd" | "f", "") => AppCommand::Forward,
            ("back" | "b", "") => AppCommand::Back,
            ("seek", value) if !value.is_empty() => AppCommand::Seek(parse_seconds(value)?),
            // Blank note text is passed through; the notes store rejects it
            // with its own message.
            ("note", text) => AppCommand::AddNote(text.to_string()),
            ("notes", "") => AppCommand::ShowNotes,
            ("clear", "") => AppCommand::ClearNotes,
            ("rec", "start") => AppCommand::StartRecording,
            ("rec", "stop") => AppCommand::StopRecording,
            ("rec", "cancel") => AppCommand::CancelRecording,
            ("rec", "play") => AppCommand::PlayRecording,
            ("rec", "save") => AppCommand::SaveRecording,
            ("status", "") => AppCommand::Status,
            ("help" | "?", "") => AppCommand::Help,
            ("quit" | "exit" | "q", "") => AppCommand::Shutdown,
            _ => return Err(invalid(format!("'{}' (type 'help')", line))),
        };

        Ok(command)
    }
}

/// A y/N question that claims the next console line as its answer.
#[derive(Debug, Default)]
pub(crate) struct PendingConfirmation {
    waiting: bool,
}

impl PendingConfirmation {
    /// Open the question; the next line answers it.
    pub(crate) fn ask(&mut self) {
        self.waiting = true;
    }

    /// Consume `line` as the answer if a question is open. `None` means the
    /// line is an ordinary command.
    pub(crate) fn answer(&mut self, line: &str) -> Option<bool> {
        if !self.waiting {
            return None;
        }
        self.waiting = false;
        Some(is_confirmation(line))
    }
}

/// `true` for a yes answer to a y/N prompt; anything else means no.
pub(crate) fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[track_caller]
fn parse_track_ref(target: &str) -> AppResult<TrackRef> {
    match target.parse::<usize>() {
        Ok(0) => Err(invalid("Tracks are numbered from 1".to_string())),
        Ok(number) => Ok(TrackRef::Number(number)),
        Err(_) => Ok(TrackRef::File(target.to_string())),
    }
}

#[track_caller]
fn parse_rate(value: &str) -> AppResult<f32> {
    let digits = value.strip_suffix(['x', 'X']).unwrap_or(value);
    match digits.parse::<f32>() {
        Ok(rate) if rate.is_finite() => Ok(rate),
        _ => Err(invalid(format!("'{}' is not a playback rate", value))),
    }
}

#[track_caller]
fn parse_seconds(value: &str) -> AppResult<f64> {
    let digits = value.strip_suffix('s').unwrap_or(value);
    match digits.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => Ok(seconds),
        _ => Err(invalid(format!("'{}' is not a number of seconds", value))),
    }
}

#[track_caller]
fn invalid(reason: String) -> AppError {
    AppError::InvalidCommand {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}
