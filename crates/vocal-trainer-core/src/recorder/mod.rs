mod capture;
mod clip;
mod duration;
mod filename;
mod microphone;
mod platform;
#[allow(clippy::module_inception)]
mod recorder;
mod state;

pub use {
    capture::{
        CaptureConstraints, CaptureDevice, CaptureEvent, CaptureFormat, CaptureHandle,
        StopSignal, capture_channel,
    },
    clip::{CLIP_EXTENSION, CLIP_MIME_TYPE, RecordedClip},
    duration::{
        DEFAULT_PROBE_ATTEMPTS, DEFAULT_PROBE_INTERVAL, DurationOutcome, ProbePolicy,
        format_elapsed, wait_for_duration,
    },
    filename::{FALLBACK_TRACK_NAME, recording_filename, sanitize_track_name},
    microphone::MicrophoneDevice,
    platform::PlatformSupport,
    recorder::{Recorder, RecorderUpdate},
    state::RecorderState,
};
