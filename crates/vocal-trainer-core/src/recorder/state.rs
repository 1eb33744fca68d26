use std::time::Instant;

use uuid::Uuid;

/// Recorder lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Ready to start.
    Idle,
    /// Waiting for the microphone to be granted.
    Requesting {
        /// Session awaiting the grant.
        session_id: Uuid,
    },
    /// Capturing audio.
    Recording {
        /// Active session.
        session_id: Uuid,
        /// When capture began.
        started_at: Instant,
    },
    /// Capture stopped, waiting for the last chunks before building the clip.
    Finalizing {
        /// Session being finalized.
        session_id: Uuid,
    },
}

impl RecorderState {
    /// Session the state belongs to, if any.
    pub fn session_id(&self) -> Option<Uuid> {
        match *self {
            RecorderState::Idle => None,
            RecorderState::Requesting { session_id }
            | RecorderState::Recording { session_id, .. }
            | RecorderState::Finalizing { session_id } => Some(session_id),
        }
    }

    /// Short lowercase name for messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            RecorderState::Idle => "idle",
            RecorderState::Requesting { .. } => "requesting microphone",
            RecorderState::Recording { .. } => "recording",
            RecorderState::Finalizing { .. } => "finalizing",
        }
    }
}
