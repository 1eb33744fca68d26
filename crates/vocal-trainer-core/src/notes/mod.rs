mod key;
mod note;
mod storage;
mod store;

pub use {
    key::{NoteKeying, exercise_key, track_key},
    note::{EMPTY_NOTES_PLACEHOLDER, Note, NoteAppend, NotesView},
    storage::{JsonFileStore, KeyValueStore, MemoryStore},
    store::NotesStore,
};
