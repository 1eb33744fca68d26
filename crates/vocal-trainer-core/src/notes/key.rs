use crate::playlist::Track;

use serde::{Deserialize, Serialize};

/// Storage key for the notes of the exercise at `index` (0-based).
///
/// Exercise-scoped: notes follow the slot, so reordering the playlist
/// changes which notes a track shows.
pub fn exercise_key(namespace: &str, index: usize) -> String {
    format!("{}_exercise{}", namespace, index + 1)
}

/// Storage key for the notes of the track identified by `file`.
pub fn track_key(namespace: &str, file: &str) -> String {
    format!("{}_track_{}", namespace, file)
}

/// How note collections are keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKeying {
    /// By position in the playlist.
    #[default]
    Exercise,
    /// By track identifier; survives reordering.
    Track,
}

impl NoteKeying {
    /// Key for the track at `index`.
    pub fn key_for(self, namespace: &str, index: usize, track: &Track) -> String {
        match self {
            NoteKeying::Exercise => exercise_key(namespace, index),
            NoteKeying::Track => track_key(namespace, &track.file),
        }
    }
}
