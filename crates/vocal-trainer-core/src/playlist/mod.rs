mod document;
#[allow(clippy::module_inception)]
mod playlist;
mod track;

pub(crate) use document::PlaylistDocument;

pub use {playlist::Playlist, track::Track};
