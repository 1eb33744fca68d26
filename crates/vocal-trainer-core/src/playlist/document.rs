//! On-disk playlist shapes.
//!
//! Two layouts are in circulation: a bare array of track entries, and an
//! object with a `tracks` array plus a `messages` map keyed by file. Entries
//! use either English (`name`/`file`/`message`) or Spanish
//! (`nombre`/`archivo`/`mensaje`) field names. Everything is normalized here
//! so the rest of the crate only sees [`Track`].

use crate::{CoreError, CoreResult, playlist::Track};

use std::{collections::HashMap, panic::Location, path::Path};

use error_location::ErrorLocation;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PlaylistDocument {
    Bare(Vec<TrackEntry>),
    Wrapped {
        tracks: Vec<TrackEntry>,
        #[serde(default)]
        messages: HashMap<String, String>,
    },
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackEntry {
    #[serde(default, alias = "nombre")]
    name: Option<String>,
    #[serde(alias = "archivo")]
    file: String,
    #[serde(default, alias = "mensaje")]
    message: Option<String>,
}

impl PlaylistDocument {
    #[track_caller]
    pub(crate) fn parse(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::PlaylistMalformed {
            reason: format!(
                "expected a track array or {{tracks, messages}} object: {}",
                e
            ),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    pub(crate) fn into_tracks(self) -> CoreResult<Vec<Track>> {
        let (entries, messages) = match self {
            PlaylistDocument::Bare(entries) => (entries, HashMap::new()),
            PlaylistDocument::Wrapped { tracks, messages } => (tracks, messages),
        };

        entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                let file = entry.file.trim().to_string();
                if file.is_empty() {
                    return Err(CoreError::PlaylistMalformed {
                        reason: format!("track {} has an empty file", position + 1),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }

                let name = non_blank(entry.name).unwrap_or_else(|| display_name_for(&file));
                let message =
                    non_blank(entry.message).or_else(|| non_blank(messages.get(&file).cloned()));

                Ok(Track {
                    file,
                    name,
                    message,
                })
            })
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn display_name_for(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string())
}
