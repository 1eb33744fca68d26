#[allow(clippy::module_inception)]
mod trainer;

pub use trainer::{Trainer, TrackView};
