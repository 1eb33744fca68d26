use crate::{
    CoreError, CoreResult,
    recorder::{
        CaptureConstraints, CaptureDevice, CaptureEvent, CaptureFormat, CaptureHandle,
        PlatformSupport, RecordedClip, RecorderState, recording_filename,
    },
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::Local;
use error_location::ErrorLocation;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Something the UI should react to, produced by [`Recorder::handle_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderUpdate {
    /// The microphone was granted and capture is running.
    Started {
        /// Session now recording.
        session_id: Uuid,
    },
    /// The microphone could not be acquired; the recorder is idle again.
    PermissionDenied {
        /// Session that was refused.
        session_id: Uuid,
        /// Cause reported by the device.
        reason: String,
    },
    /// A clip is ready; see [`Recorder::clip`].
    ClipReady {
        /// Session that produced the clip.
        session_id: Uuid,
        /// Derived download filename.
        filename: String,
        /// Scratch file holding the take.
        path: PathBuf,
    },
    /// Capture ended without a single sample.
    NothingCaptured {
        /// Session that stopped.
        session_id: Uuid,
    },
    /// The take could not be turned into a clip.
    Failed {
        /// Session that stopped.
        session_id: Uuid,
        /// Description of the failure.
        reason: String,
    },
}

/// Microphone recording state machine.
///
/// `Idle -> Requesting -> Recording -> Finalizing -> Idle`. Device events
/// arrive on the receiver returned by [`Recorder::new`] and are fed back
/// through [`handle_event`](Self::handle_event); events from any session
/// other than the current one are discarded.
pub struct Recorder {
    device: Box<dyn CaptureDevice>,
    support: PlatformSupport,
    constraints: CaptureConstraints,
    scratch_dir: PathBuf,
    events_tx: UnboundedSender<CaptureEvent>,
    state: RecorderState,
    handle: Option<CaptureHandle>,
    format: Option<CaptureFormat>,
    chunks: Vec<Vec<f32>>,
    clip: Option<RecordedClip>,
    track_name: Option<String>,
}

impl Recorder {
    /// Create an idle recorder and the receiver its device events arrive on.
    pub fn new(
        device: Box<dyn CaptureDevice>,
        support: PlatformSupport,
        scratch_dir: impl Into<PathBuf>,
    ) -> (Self, UnboundedReceiver<CaptureEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let recorder = Self {
            device,
            support,
            constraints: CaptureConstraints::default(),
            scratch_dir: scratch_dir.into(),
            events_tx,
            state: RecorderState::Idle,
            handle: None,
            format: None,
            chunks: Vec::new(),
            clip: None,
            track_name: None,
        };

        (recorder, events_rx)
    }

    /// Request the microphone for a new session.
    ///
    /// Releases the previous clip and abandons any request still pending.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CaptureUnsupported`] on unsupported platforms
    /// (the device is never touched), or an invalid transition while a
    /// session is recording or finalizing.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<Uuid> {
        if !self.support.is_supported() {
            return Err(CoreError::CaptureUnsupported {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        match self.state {
            RecorderState::Idle => {}
            RecorderState::Requesting { session_id } => {
                info!(session_id = %session_id, "Abandoning pending microphone request");
                self.abandon_session();
            }
            RecorderState::Recording { .. } | RecorderState::Finalizing { .. } => {
                return Err(self.invalid("start recording"));
            }
        }

        if let Some(mut clip) = self.clip.take() {
            clip.release();
        }
        self.chunks.clear();
        self.format = None;
        self.track_name = None;

        let session_id = Uuid::new_v4();
        self.handle = Some(
            self.device
                .request(session_id, self.constraints, self.events_tx.clone()),
        );
        self.state = RecorderState::Requesting { session_id };

        info!(session_id = %session_id, "Microphone requested");

        Ok(session_id)
    }

    /// Stop capturing. The clip is built once the device confirms with
    /// `Finished`; `track_name` feeds the derived filename.
    ///
    /// # Errors
    ///
    /// Returns an invalid transition unless currently recording.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self, track_name: Option<&str>) -> CoreResult<()> {
        let RecorderState::Recording {
            session_id,
            started_at,
        } = self.state
        else {
            return Err(self.invalid("stop recording"));
        };

        if let Some(handle) = &self.handle {
            handle.stop();
        }
        self.track_name = track_name.map(str::to_string);
        self.state = RecorderState::Finalizing { session_id };

        info!(
            session_id = %session_id,
            duration_ms = started_at.elapsed().as_millis(),
            "Recording stopping"
        );

        Ok(())
    }

    /// Abandon a pending microphone request. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            RecorderState::Requesting { session_id } => {
                info!(session_id = %session_id, "Microphone request cancelled");
                self.abandon_session();
                true
            }
            _ => false,
        }
    }

    /// Apply a device event.
    #[instrument(skip(self, event), fields(session_id = %event.session_id()))]
    pub fn handle_event(&mut self, event: CaptureEvent) -> Option<RecorderUpdate> {
        if self.state.session_id() != Some(event.session_id()) {
            debug!(state = self.state.name(), "Ignoring event from stale session");
            return None;
        }

        match (self.state, event) {
            (RecorderState::Requesting { session_id }, CaptureEvent::Granted { format, .. }) => {
                self.format = Some(format);
                self.state = RecorderState::Recording {
                    session_id,
                    started_at: Instant::now(),
                };
                info!(
                    sample_rate = format.sample_rate,
                    channels = format.channels,
                    "Recording started"
                );
                Some(RecorderUpdate::Started { session_id })
            }
            (RecorderState::Requesting { session_id }, CaptureEvent::Denied { reason, .. }) => {
                warn!(reason = %reason, "Microphone denied");
                self.handle = None;
                self.state = RecorderState::Idle;
                Some(RecorderUpdate::PermissionDenied { session_id, reason })
            }
            (
                RecorderState::Recording { .. } | RecorderState::Finalizing { .. },
                CaptureEvent::Chunk { samples, .. },
            ) => {
                self.chunks.push(samples);
                None
            }
            (
                RecorderState::Recording { session_id, .. }
                | RecorderState::Finalizing { session_id },
                CaptureEvent::Finished { .. },
            ) => Some(self.finalize(session_id)),
            (state, event) => {
                debug!(state = state.name(), ?event, "Event not expected in this state");
                None
            }
        }
    }

    fn finalize(&mut self, session_id: Uuid) -> RecorderUpdate {
        self.handle = None;
        self.state = RecorderState::Idle;

        let samples: Vec<f32> = self.chunks.drain(..).flatten().collect();
        if samples.is_empty() {
            info!(session_id = %session_id, "Recording finished without audio");
            return RecorderUpdate::NothingCaptured { session_id };
        }

        let Some(format) = self.format else {
            return RecorderUpdate::Failed {
                session_id,
                reason: "Capture format unknown".to_string(),
            };
        };

        let filename = recording_filename(self.track_name.as_deref(), Local::now().naive_local());

        match RecordedClip::encode(session_id, &samples, format, filename, &self.scratch_dir) {
            Ok(clip) => {
                let update = RecorderUpdate::ClipReady {
                    session_id,
                    filename: clip.filename().to_string(),
                    path: clip.playable_path().map(Path::to_path_buf).unwrap_or_default(),
                };
                self.clip = Some(clip);
                update
            }
            Err(e) => {
                error!(session_id = %session_id, error = ?e, "Failed to build clip");
                RecorderUpdate::Failed {
                    session_id,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn abandon_session(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
        self.state = RecorderState::Idle;
    }

    #[track_caller]
    fn invalid(&self, action: &'static str) -> CoreError {
        CoreError::InvalidRecorderTransition {
            action,
            state: self.state.name(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Current state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Platform support decided at construction.
    pub fn support(&self) -> &PlatformSupport {
        &self.support
    }

    /// Latest finished clip, until the next session starts.
    pub fn clip(&self) -> Option<&RecordedClip> {
        self.clip.as_ref()
    }
}
