//! Capture device seam.
//!
//! A device is asked for the microphone and answers asynchronously through
//! an event channel: a grant or denial, then chunks in arrival order, then a
//! final `Finished` once the stream is torn down. Every event carries the
//! session id so the recorder can discard events from abandoned sessions.

use std::{
    cell::Cell,
    sync::mpsc::{self, TryRecvError},
};

use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Processing requested from the capture path.
///
/// All three are off by default so the recorded voice is heard as sung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureConstraints {
    /// Echo cancellation.
    pub echo_cancellation: bool,
    /// Noise suppression.
    pub noise_suppression: bool,
    /// Automatic gain control.
    pub auto_gain_control: bool,
}

/// Sample layout of captured chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    /// Frames per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

/// Messages from a capture device to the recorder.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// Microphone granted; chunks follow.
    Granted {
        /// Requesting session.
        session_id: Uuid,
        /// Layout of the chunks that follow.
        format: CaptureFormat,
    },
    /// Microphone could not be acquired.
    Denied {
        /// Requesting session.
        session_id: Uuid,
        /// Human-readable cause.
        reason: String,
    },
    /// Interleaved samples in `[-1.0, 1.0]`.
    Chunk {
        /// Capturing session.
        session_id: Uuid,
        /// Sample data.
        samples: Vec<f32>,
    },
    /// Capture stopped; no more chunks follow for this session.
    Finished {
        /// Session that stopped.
        session_id: Uuid,
    },
}

impl CaptureEvent {
    /// Session the event belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            CaptureEvent::Granted { session_id, .. }
            | CaptureEvent::Denied { session_id, .. }
            | CaptureEvent::Chunk { session_id, .. }
            | CaptureEvent::Finished { session_id } => *session_id,
        }
    }
}

/// Something that can hand out microphone sessions.
pub trait CaptureDevice {
    /// Begin acquiring the microphone for `session_id`.
    ///
    /// Returns immediately; the outcome arrives on `events`. Stopping or
    /// dropping the returned handle ends the session, whether or not it was
    /// granted yet.
    fn request(
        &self,
        session_id: Uuid,
        constraints: CaptureConstraints,
        events: UnboundedSender<CaptureEvent>,
    ) -> CaptureHandle;
}

/// Recorder-side end of a capture session.
#[derive(Debug)]
pub struct CaptureHandle {
    stop_tx: mpsc::Sender<()>,
}

impl CaptureHandle {
    /// Ask the device to stop capturing.
    pub fn stop(&self) {
        // The device may already be gone; nothing to do then.
        let _ = self.stop_tx.send(());
    }
}

/// Device-side end of a capture session.
#[derive(Debug)]
pub struct StopSignal {
    stop_rx: mpsc::Receiver<()>,
    raised: Cell<bool>,
}

impl StopSignal {
    /// Block until stop is requested or the handle is dropped.
    pub fn wait(&self) {
        if !self.raised.get() {
            let _ = self.stop_rx.recv();
            self.raised.set(true);
        }
    }

    /// Non-blocking check for a stop request or a dropped handle.
    pub fn is_raised(&self) -> bool {
        if !self.raised.get() && !matches!(self.stop_rx.try_recv(), Err(TryRecvError::Empty)) {
            self.raised.set(true);
        }
        self.raised.get()
    }
}

/// Create a connected handle/signal pair.
pub fn capture_channel() -> (CaptureHandle, StopSignal) {
    let (stop_tx, stop_rx) = mpsc::channel();
    (
        CaptureHandle { stop_tx },
        StopSignal {
            stop_rx,
            raised: Cell::new(false),
        },
    )
}
