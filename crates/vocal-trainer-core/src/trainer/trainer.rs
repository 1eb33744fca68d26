use crate::{
    CoreError, CoreResult,
    notes::{KeyValueStore, NoteAppend, NoteKeying, NotesStore, NotesView},
    player::{AudioOutput, PlayerController, SelectedTrack},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::instrument;

/// Everything the track panel shows after a track change.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackView {
    /// The selected track.
    pub selected: SelectedTrack,
    /// Storage key its notes live under.
    pub notes_key: String,
    /// Notes for the track.
    pub notes: NotesView,
}

/// Owned application state: the player plus the notes of the active
/// exercise, kept in step on every track change.
pub struct Trainer<O: AudioOutput, S: KeyValueStore> {
    player: PlayerController<O>,
    notes: NotesStore<S>,
    namespace: String,
    keying: NoteKeying,
}

impl<O: AudioOutput, S: KeyValueStore> Trainer<O, S> {
    /// Combine a player and a notes store.
    pub fn new(
        player: PlayerController<O>,
        notes: NotesStore<S>,
        namespace: impl Into<String>,
        keying: NoteKeying,
    ) -> Self {
        Self {
            player,
            notes,
            namespace: namespace.into(),
            keying,
        }
    }

    /// Select the track at `index` and load its notes.
    ///
    /// # Errors
    ///
    /// Returns error for an out-of-range index (nothing changes), a source
    /// that cannot be loaded, or failing notes storage.
    #[instrument(skip(self))]
    pub fn select_track(&mut self, index: usize) -> CoreResult<TrackView> {
        let selected = self.player.select_track(index)?;
        self.view_for(selected)
    }

    /// Make the first exercise active, as done once the playlist is loaded.
    ///
    /// # Errors
    ///
    /// Returns error if its source or notes cannot be loaded.
    pub fn select_first(&mut self) -> CoreResult<TrackView> {
        self.select_track(0)
    }

    /// Advance after the active track ended; `None` once the playlist is done.
    ///
    /// # Errors
    ///
    /// Returns error if the next source or its notes cannot be loaded.
    pub fn on_track_ended(&mut self) -> CoreResult<Option<TrackView>> {
        match self.player.on_track_ended()? {
            Some(selected) => self.view_for(selected).map(Some),
            None => Ok(None),
        }
    }

    /// Tick hook: advance if the active track drained.
    ///
    /// # Errors
    ///
    /// Returns error if the next source or its notes cannot be loaded.
    pub fn poll_ended(&mut self) -> CoreResult<Option<TrackView>> {
        match self.player.poll_ended()? {
            Some(selected) => self.view_for(selected).map(Some),
            None => Ok(None),
        }
    }

    fn view_for(&self, selected: SelectedTrack) -> CoreResult<TrackView> {
        let notes_key = self
            .keying
            .key_for(&self.namespace, selected.index, &selected.track);
        let notes = self.notes.view(&notes_key)?;
        Ok(TrackView {
            selected,
            notes_key,
            notes,
        })
    }

    /// Storage key of the active exercise.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoTrackSelected`] before the first selection.
    #[track_caller]
    pub fn current_key(&self) -> CoreResult<String> {
        let index = self
            .player
            .state()
            .index
            .ok_or_else(|| CoreError::NoTrackSelected {
                location: ErrorLocation::from(Location::caller()),
            })?;
        let track = self
            .player
            .current_track()
            .ok_or_else(|| CoreError::NoTrackSelected {
                location: ErrorLocation::from(Location::caller()),
            })?;
        Ok(self.keying.key_for(&self.namespace, index, track))
    }

    /// Notes of the active exercise.
    ///
    /// # Errors
    ///
    /// Returns error before the first selection or if storage fails.
    pub fn current_notes(&self) -> CoreResult<NotesView> {
        let key = self.current_key()?;
        self.notes.view(&key)
    }

    /// Add a note to the active exercise.
    ///
    /// # Errors
    ///
    /// Returns error before the first selection or if storage fails.
    pub fn add_note(&mut self, text: &str) -> CoreResult<NoteAppend> {
        let key = self.current_key()?;
        self.notes.append(&key, text)
    }

    /// Delete the notes of the active exercise once `confirm` agrees.
    ///
    /// # Errors
    ///
    /// Returns error before the first selection or if storage fails.
    pub fn clear_notes(&mut self, confirm: impl FnOnce() -> bool) -> CoreResult<bool> {
        let key = self.current_key()?;
        self.notes.clear(&key, confirm)
    }

    /// The player.
    pub fn player(&self) -> &PlayerController<O> {
        &self.player
    }

    /// The player, for transport and rate changes.
    pub fn player_mut(&mut self) -> &mut PlayerController<O> {
        &mut self.player
    }

    /// The notes store.
    pub fn notes(&self) -> &NotesStore<S> {
        &self.notes
    }
}
