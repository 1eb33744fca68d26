//! rodio-backed audio output.

use crate::{CoreError, CoreResult, player::AudioOutput};

use std::{fs::File, io::BufReader, panic::Location, path::Path, time::Duration};

use error_location::ErrorLocation;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, info, instrument};

/// Plays files through the default output device.
///
/// Not `Send`: the underlying stream must stay on the thread that opened it.
pub struct RodioOutput {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Sink,
    duration: Option<Duration>,
    rate: f32,
    loaded: bool,
}

impl RodioOutput {
    /// Open the default output device.
    ///
    /// # Errors
    ///
    /// Returns error if no output device is available.
    #[track_caller]
    #[instrument]
    pub fn new() -> CoreResult<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| CoreError::DeviceError {
                reason: format!("Failed to open output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let sink = Self::new_sink(&stream_handle)?;

        info!("RodioOutput initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink,
            duration: None,
            rate: 1.0,
            loaded: false,
        })
    }

    #[track_caller]
    fn new_sink(handle: &OutputStreamHandle) -> CoreResult<Sink> {
        Sink::try_new(handle).map_err(|e| CoreError::DeviceError {
            reason: format!("Failed to create sink: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl AudioOutput for RodioOutput {
    #[track_caller]
    #[instrument(skip(self))]
    fn load(&mut self, source: &Path) -> CoreResult<()> {
        let file = File::open(source).map_err(|e| CoreError::PlaybackError {
            reason: format!("Failed to open {:?}: {}", source, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| CoreError::PlaybackError {
            reason: format!("Failed to decode {:?}: {}", source, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let sink = Self::new_sink(&self.stream_handle)?;
        sink.pause();
        sink.set_speed(self.rate);

        self.sink.stop();
        self.sink = sink;
        self.duration = decoder.total_duration();
        self.sink.append(decoder);
        self.loaded = true;

        debug!(source = ?source, duration = ?self.duration, "Source loaded");

        Ok(())
    }

    #[track_caller]
    fn play(&mut self) -> CoreResult<()> {
        if !self.loaded {
            return Err(CoreError::PlaybackError {
                reason: "No source loaded".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
        self.sink.set_speed(rate);
    }

    #[track_caller]
    fn seek_to(&mut self, position: Duration) -> CoreResult<()> {
        self.sink
            .try_seek(position)
            .map_err(|e| CoreError::PlaybackError {
                reason: format!("Failed to seek to {:?}: {}", position, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.loaded && self.sink.empty()
    }
}
