mod controller;
mod output;
mod rate;
mod rodio_output;
mod state;

pub use {
    controller::{DEFAULT_MESSAGE, PlayerController, SelectedTrack},
    output::AudioOutput,
    rate::{DEFAULT_MAX_RATE, DEFAULT_MIN_RATE, PlaybackRate, RateBounds},
    rodio_output::RodioOutput,
    state::{PlaybackStatus, PlayerState},
};
