use crate::player::PlaybackRate;

/// Transport status of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Nothing loaded yet.
    Stopped,
    /// The current track is playing.
    Playing,
    /// A track is loaded but not playing.
    Paused,
    /// The last track ended; no further advance happens.
    Finished,
}

/// Mutable player state, owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    /// Index of the active track, always within the playlist.
    pub index: Option<usize>,
    /// Rate applied to every loaded track.
    pub rate: PlaybackRate,
    /// Transport status.
    pub status: PlaybackStatus,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            index: None,
            rate: PlaybackRate::NORMAL,
            status: PlaybackStatus::Stopped,
        }
    }
}
