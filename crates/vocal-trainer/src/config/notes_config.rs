use crate::config::default_namespace;

use serde::{Deserialize, Serialize};
use vocal_trainer_core::NoteKeying;

/// Note storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Prefix of every storage key.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// `exercise` keys notes by playlist position, `track` by file.
    #[serde(default)]
    pub keying: NoteKeying,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            keying: NoteKeying::default(),
        }
    }
}
