use crate::{
    CoreError, CoreResult,
    notes::{KeyValueStore, Note, NoteAppend, NotesView},
};

use std::panic::Location;

use chrono::Local;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Format of [`Note::date`].
pub(crate) const NOTE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-exercise note collections on top of a [`KeyValueStore`].
///
/// Each key holds the JSON encoding of the whole list, oldest first.
pub struct NotesStore<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> NotesStore<S> {
    /// Wrap `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Notes stored under `key`, oldest first.
    ///
    /// A missing key is an empty list. A value that does not parse is
    /// logged and also treated as empty; it is left in storage untouched.
    ///
    /// # Errors
    ///
    /// Returns error if the storage itself fails.
    #[instrument(skip(self))]
    pub fn load(&self, key: &str) -> CoreResult<Vec<Note>> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => Ok(notes),
            Err(e) => {
                warn!(key, error = %e, "Stored notes are unreadable, showing none");
                Ok(Vec::new())
            }
        }
    }

    /// [`load`](Self::load) wrapped for display.
    ///
    /// # Errors
    ///
    /// Returns error if the storage itself fails.
    pub fn view(&self, key: &str) -> CoreResult<NotesView> {
        self.load(key).map(NotesView::from_notes)
    }

    /// Append a note stamped with the current local time.
    ///
    /// Blank text is rejected without touching storage.
    ///
    /// # Errors
    ///
    /// Returns error if the storage fails.
    #[instrument(skip(self, text))]
    pub fn append(&mut self, key: &str, text: &str) -> CoreResult<NoteAppend> {
        let date = Local::now().format(NOTE_DATE_FORMAT).to_string();
        self.append_dated(key, text, date)
    }

    #[track_caller]
    pub(crate) fn append_dated(
        &mut self,
        key: &str,
        text: &str,
        date: String,
    ) -> CoreResult<NoteAppend> {
        let text = text.trim();
        if text.is_empty() {
            debug!(key, "Rejected empty note");
            return Ok(NoteAppend::Rejected);
        }

        let mut notes = self.load(key)?;
        let note = Note {
            date,
            text: text.to_string(),
        };
        notes.push(note.clone());

        let encoded = serde_json::to_string(&notes).map_err(|e| CoreError::StorageError {
            reason: format!("Failed to encode notes: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        self.storage.set(key, encoded)?;

        info!(key, count = notes.len(), "Note saved");

        Ok(NoteAppend::Saved(note))
    }

    /// Delete every note under `key` if `confirm` returns `true`.
    ///
    /// Returns whether the collection was removed.
    ///
    /// # Errors
    ///
    /// Returns error if the storage fails.
    #[instrument(skip(self, confirm))]
    pub fn clear(&mut self, key: &str, confirm: impl FnOnce() -> bool) -> CoreResult<bool> {
        if !confirm() {
            debug!(key, "Clearing notes not confirmed");
            return Ok(false);
        }

        self.storage.remove(key)?;
        info!(key, "Notes cleared");

        Ok(true)
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
