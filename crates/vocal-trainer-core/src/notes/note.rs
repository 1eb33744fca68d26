use serde::{Deserialize, Serialize};

/// Placeholder shown when an exercise has no notes.
pub const EMPTY_NOTES_PLACEHOLDER: &str = "No notes saved for this exercise.";

/// A timestamped free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Local time the note was saved, already formatted for display.
    pub date: String,
    /// Note body; never empty.
    pub text: String,
}

/// Result of trying to add a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteAppend {
    /// The note was persisted.
    Saved(Note),
    /// The text was empty after trimming; nothing was written.
    Rejected,
}

/// What the notes panel shows for one exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesView {
    /// No notes stored under the key.
    Empty,
    /// Notes, oldest first.
    Notes(Vec<Note>),
}

impl NotesView {
    /// Wrap a loaded list, mapping an empty list to [`NotesView::Empty`].
    pub fn from_notes(notes: Vec<Note>) -> Self {
        if notes.is_empty() {
            NotesView::Empty
        } else {
            NotesView::Notes(notes)
        }
    }

    /// Notes shown, empty for the placeholder state.
    pub fn notes(&self) -> &[Note] {
        match self {
            NotesView::Empty => &[],
            NotesView::Notes(notes) => notes,
        }
    }

    /// Text lines for display.
    pub fn lines(&self) -> Vec<String> {
        match self {
            NotesView::Empty => vec![EMPTY_NOTES_PLACEHOLDER.to_string()],
            NotesView::Notes(notes) => notes
                .iter()
                .map(|n| format!("{}: {}", n.date, n.text))
                .collect(),
        }
    }
}
