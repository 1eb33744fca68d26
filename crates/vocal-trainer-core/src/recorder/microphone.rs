use crate::{
    CoreError, CoreResult,
    recorder::{
        CaptureConstraints, CaptureDevice, CaptureEvent, CaptureFormat, CaptureHandle, StopSignal,
        capture_channel,
    },
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use cpal::{
    Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Grace period after dropping the stream before declaring the session done,
/// so a callback already in flight lands before `Finished`.
const STREAM_DRAIN_DELAY: Duration = Duration::from_millis(5);

/// Default input device via cpal.
///
/// Each session runs on its own thread because the cpal stream is not
/// `Send`; the thread owns the stream from open to drop and talks to the
/// recorder only through the event channel and the stop signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct MicrophoneDevice;

impl MicrophoneDevice {
    /// Create the device. No hardware is touched until a session is requested.
    pub fn new() -> Self {
        Self
    }

    /// Whether the default host exposes an input device.
    pub fn is_available() -> bool {
        cpal::default_host().default_input_device().is_some()
    }
}

impl CaptureDevice for MicrophoneDevice {
    #[instrument(skip(self, events))]
    fn request(
        &self,
        session_id: Uuid,
        constraints: CaptureConstraints,
        events: UnboundedSender<CaptureEvent>,
    ) -> CaptureHandle {
        let (handle, stop) = capture_channel();
        let thread_events = events.clone();

        let spawned = std::thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || run_session(session_id, constraints, thread_events, stop));

        if let Err(e) = spawned {
            error!(session_id = %session_id, error = ?e, "Failed to spawn capture thread");
            let _ = events.send(CaptureEvent::Denied {
                session_id,
                reason: format!("Failed to start capture: {}", e),
            });
        }

        handle
    }
}

fn run_session(
    session_id: Uuid,
    constraints: CaptureConstraints,
    events: UnboundedSender<CaptureEvent>,
    stop: StopSignal,
) {
    if constraints.echo_cancellation
        || constraints.noise_suppression
        || constraints.auto_gain_control
    {
        warn!(?constraints, "Input processing is not available, capturing raw input");
    }

    let shutdown = Arc::new(AtomicBool::new(false));

    let (stream, format) = match open_stream(session_id, &events, Arc::clone(&shutdown)) {
        Ok(opened) => opened,
        Err(e) => {
            error!(session_id = %session_id, error = ?e, "Microphone unavailable");
            let _ = events.send(CaptureEvent::Denied {
                session_id,
                reason: e.to_string(),
            });
            return;
        }
    };

    if events
        .send(CaptureEvent::Granted { session_id, format })
        .is_err()
    {
        return;
    }

    info!(session_id = %session_id, "Audio capture started");

    stop.wait();

    // Stop writing before the stream goes away, then give any in-flight
    // callback time to observe the flag.
    shutdown.store(true, Ordering::Release);
    drop(stream);
    std::thread::sleep(STREAM_DRAIN_DELAY);

    info!(session_id = %session_id, "Audio capture stopped");

    let _ = events.send(CaptureEvent::Finished { session_id });
}

#[track_caller]
fn open_stream(
    session_id: Uuid,
    events: &UnboundedSender<CaptureEvent>,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<(Stream, CaptureFormat)> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or(CoreError::DeviceError {
            reason: "No microphone found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let supported = device
        .default_input_config()
        .map_err(|e| CoreError::DeviceError {
            reason: format!("Failed to get config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let format = CaptureFormat {
        sample_rate: supported.sample_rate().0,
        channels: supported.channels(),
    };
    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.into();

    debug!(
        device = ?device.name().ok(),
        sample_rate = format.sample_rate,
        channels = format.channels,
        ?sample_format,
        "Opening input stream"
    );

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, session_id, events, shutdown),
        SampleFormat::I16 => build_stream::<i16>(&device, &config, session_id, events, shutdown),
        SampleFormat::U16 => build_stream::<u16>(&device, &config, session_id, events, shutdown),
        SampleFormat::I32 => build_stream::<i32>(&device, &config, session_id, events, shutdown),
        other => Err(CoreError::DeviceError {
            reason: format!("Unsupported sample format: {:?}", other),
            location: ErrorLocation::from(Location::caller()),
        }),
    }?;

    stream.play().map_err(|e| CoreError::DeviceError {
        reason: format!("Failed to start stream: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok((stream, format))
}

#[track_caller]
fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    session_id: Uuid,
    events: &UnboundedSender<CaptureEvent>,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let events = events.clone();

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if shutdown.load(Ordering::Acquire) {
                    return;
                }
                let samples: Vec<f32> = data.iter().map(|s| s.to_sample::<f32>()).collect();
                // Receiver gone means the recorder was dropped; nothing to deliver to.
                let _ = events.send(CaptureEvent::Chunk {
                    session_id,
                    samples,
                });
            },
            |err| {
                error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| CoreError::DeviceError {
            reason: format!("Failed to build stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}
