use crate::{
    CaptureConstraints, CaptureEvent, CaptureFormat, CoreError, PlatformSupport, Recorder,
    RecorderState, RecorderUpdate, tests::fakes::FakeDevice,
};

use std::path::Path;

use tokio::sync::mpsc::UnboundedReceiver;

const FORMAT: CaptureFormat = CaptureFormat {
    sample_rate: 8_000,
    channels: 1,
};

fn supported_recorder(
    scratch: &Path,
) -> (Recorder, UnboundedReceiver<CaptureEvent>, FakeDevice) {
    let device = FakeDevice::default();
    let (recorder, events) = Recorder::new(
        Box::new(device.clone()),
        PlatformSupport::Supported,
        scratch,
    );
    (recorder, events, device)
}

/// Forward everything the device has sent so far into the recorder.
fn pump(
    recorder: &mut Recorder,
    events: &mut UnboundedReceiver<CaptureEvent>,
) -> Vec<RecorderUpdate> {
    let mut updates = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let Some(update) = recorder.handle_event(event) {
            updates.push(update);
        }
    }
    updates
}

fn send(device: &FakeDevice, index: usize, event: CaptureEvent) {
    device.with_request(index, |r| {
        let _ = r.events.send(event);
    });
}

/// WHAT: Unsupported platforms never touch the device
/// WHY: Capture is disabled up front, not attempted and failed
#[test]
#[allow(clippy::unwrap_used)]
fn given_unsupported_platform_when_starting_then_error_and_no_request() {
    // Given: A recorder flagged unsupported
    let dir = tempfile::TempDir::new().unwrap();
    let device = FakeDevice::default();
    let (mut recorder, _events) = Recorder::new(
        Box::new(device.clone()),
        PlatformSupport::Unsupported {
            reason: "test".to_string(),
        },
        dir.path(),
    );

    // When: Starting
    let result = recorder.start();

    // Then: CaptureUnsupported, no request made, still idle
    assert!(matches!(result, Err(CoreError::CaptureUnsupported { .. })));
    assert_eq!(device.request_count(), 0);
    assert_eq!(recorder.state(), RecorderState::Idle);
}

/// WHAT: The microphone is requested with all input processing off
/// WHY: Singers need to hear their unprocessed voice
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_recorder_when_starting_then_requests_raw_input() {
    // Given: An idle recorder
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, _events, device) = supported_recorder(dir.path());

    // When: Starting
    let session_id = recorder.start().unwrap();

    // Then: Requesting, with processing disabled
    assert_eq!(recorder.state(), RecorderState::Requesting { session_id });
    device.with_request(0, |r| {
        assert_eq!(r.session_id, session_id);
        assert_eq!(r.constraints, CaptureConstraints::default());
        assert!(!r.constraints.echo_cancellation);
        assert!(!r.constraints.noise_suppression);
        assert!(!r.constraints.auto_gain_control);
    });
}

/// WHAT: Denial returns the recorder to Idle with a visible reason
/// WHY: Permission problems are recoverable
#[test]
#[allow(clippy::unwrap_used)]
fn given_pending_request_when_denied_then_idle_with_reason() {
    // Given: A pending request
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, mut events, device) = supported_recorder(dir.path());
    let session_id = recorder.start().unwrap();

    // When: The device denies it
    send(
        &device,
        0,
        CaptureEvent::Denied {
            session_id,
            reason: "permission denied".to_string(),
        },
    );
    let updates = pump(&mut recorder, &mut events);

    // Then: PermissionDenied surfaced, Idle, can start again
    assert_eq!(
        updates,
        vec![RecorderUpdate::PermissionDenied {
            session_id,
            reason: "permission denied".to_string(),
        }]
    );
    assert_eq!(recorder.state(), RecorderState::Idle);
    assert!(recorder.start().is_ok());
}

/// WHAT: Grant, chunks and stop produce a clip holding every chunk in order
/// WHY: No chunk may be dropped or reordered
#[test]
#[allow(clippy::unwrap_used)]
fn given_granted_session_when_chunks_then_stop_then_clip_in_arrival_order() {
    // Given: A granted session
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, mut events, device) = supported_recorder(dir.path());
    let session_id = recorder.start().unwrap();
    send(&device, 0, CaptureEvent::Granted { session_id, format: FORMAT });
    let started = pump(&mut recorder, &mut events);
    assert_eq!(started, vec![RecorderUpdate::Started { session_id }]);
    assert!(matches!(recorder.state(), RecorderState::Recording { .. }));

    // When: Three chunks arrive, then stop, then the device finishes
    for value in [0.1f32, 0.2, 0.3] {
        send(
            &device,
            0,
            CaptureEvent::Chunk {
                session_id,
                samples: vec![value; 4],
            },
        );
    }
    pump(&mut recorder, &mut events);
    recorder.stop(Some("Lip Trill")).unwrap();
    assert_eq!(recorder.state(), RecorderState::Finalizing { session_id });
    assert!(device.with_request(0, |r| r.stop.is_raised()));
    send(&device, 0, CaptureEvent::Finished { session_id });
    let updates = pump(&mut recorder, &mut events);

    // Then: A clip named after the track, samples in arrival order
    assert_eq!(recorder.state(), RecorderState::Idle);
    let clip = recorder.clip().unwrap();
    assert!(matches!(
        &updates[..],
        [RecorderUpdate::ClipReady { filename, .. }] if filename == clip.filename()
    ));
    assert!(clip.filename().starts_with("Lip_Trill_"));
    assert!(clip.filename().ends_with(".wav"));
    assert_eq!(clip.sample_count(), 12);

    let mut reader = hound::WavReader::open(clip.playable_path().unwrap()).unwrap();
    let written: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert!(written[0] < written[4]);
    assert!(written[4] < written[8]);
}

/// WHAT: Chunks that arrive between stop and Finished are kept
/// WHY: The tail of a take must not be cut off
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopping_session_when_late_chunk_arrives_then_included() {
    // Given: A granted session with one chunk, then stopped
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, mut events, device) = supported_recorder(dir.path());
    let session_id = recorder.start().unwrap();
    send(&device, 0, CaptureEvent::Granted { session_id, format: FORMAT });
    send(
        &device,
        0,
        CaptureEvent::Chunk {
            session_id,
            samples: vec![0.1; 2],
        },
    );
    pump(&mut recorder, &mut events);
    recorder.stop(None).unwrap();

    // When: A last chunk lands before Finished
    send(
        &device,
        0,
        CaptureEvent::Chunk {
            session_id,
            samples: vec![0.2; 3],
        },
    );
    send(&device, 0, CaptureEvent::Finished { session_id });
    pump(&mut recorder, &mut events);

    // Then: Both chunks are in the clip
    assert_eq!(recorder.clip().unwrap().sample_count(), 5);
}

/// WHAT: A session that captured nothing reports it instead of a clip
/// WHY: "No audio was recorded" is shown rather than an empty download
#[test]
#[allow(clippy::unwrap_used)]
fn given_granted_session_without_chunks_when_finished_then_nothing_captured() {
    // Given: A granted session
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, mut events, device) = supported_recorder(dir.path());
    let session_id = recorder.start().unwrap();
    send(&device, 0, CaptureEvent::Granted { session_id, format: FORMAT });
    pump(&mut recorder, &mut events);

    // When: Stopping immediately
    recorder.stop(None).unwrap();
    send(&device, 0, CaptureEvent::Finished { session_id });
    let updates = pump(&mut recorder, &mut events);

    // Then: NothingCaptured, no clip, Idle
    assert_eq!(updates, vec![RecorderUpdate::NothingCaptured { session_id }]);
    assert!(recorder.clip().is_none());
    assert_eq!(recorder.state(), RecorderState::Idle);
}

/// WHAT: Stop is only valid while recording
/// WHY: The state machine rejects out-of-order transitions
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_or_requesting_when_stopping_then_invalid_transition() {
    // Given: An idle recorder
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, _events, _device) = supported_recorder(dir.path());

    // When/Then: Stopping while idle fails
    assert!(matches!(
        recorder.stop(None),
        Err(CoreError::InvalidRecorderTransition { state: "idle", .. })
    ));

    // When/Then: Stopping while requesting fails too
    recorder.start().unwrap();
    assert!(matches!(
        recorder.stop(None),
        Err(CoreError::InvalidRecorderTransition { .. })
    ));
}

/// WHAT: Starting while recording is rejected
/// WHY: One session owns the chunk buffer at a time
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_starting_again_then_invalid_transition() {
    // Given: A recording session
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, mut events, device) = supported_recorder(dir.path());
    let session_id = recorder.start().unwrap();
    send(&device, 0, CaptureEvent::Granted { session_id, format: FORMAT });
    pump(&mut recorder, &mut events);

    // When: Starting again
    let result = recorder.start();

    // Then: Rejected, still recording the same session, no new request
    assert!(matches!(
        result,
        Err(CoreError::InvalidRecorderTransition { .. })
    ));
    assert_eq!(recorder.state().session_id(), Some(session_id));
    assert_eq!(device.request_count(), 1);
}

/// WHAT: Retriggering start cancels the pending request
/// WHY: A stale grant must not hijack the new session
#[test]
#[allow(clippy::unwrap_used)]
fn given_pending_request_when_started_again_then_old_session_abandoned() {
    // Given: A pending request
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, mut events, device) = supported_recorder(dir.path());
    let first = recorder.start().unwrap();

    // When: Starting again, then the first request is granted late
    let second = recorder.start().unwrap();
    send(
        &device,
        0,
        CaptureEvent::Granted {
            session_id: first,
            format: FORMAT,
        },
    );
    let updates = pump(&mut recorder, &mut events);

    // Then: The first request was told to stop and its grant ignored
    assert_ne!(first, second);
    assert!(device.with_request(0, |r| r.stop.is_raised()));
    assert!(updates.is_empty());
    assert_eq!(recorder.state(), RecorderState::Requesting { session_id: second });
}

/// WHAT: Cancelling a pending request returns to Idle
/// WHY: Navigating away must not leave a dangling microphone request
#[test]
#[allow(clippy::unwrap_used)]
fn given_pending_request_when_cancelled_then_idle_and_device_stopped() {
    // Given: A pending request
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, _events, device) = supported_recorder(dir.path());
    recorder.start().unwrap();

    // When: Cancelling
    let cancelled = recorder.cancel();

    // Then: Idle, device signalled, cancelling again is a no-op
    assert!(cancelled);
    assert_eq!(recorder.state(), RecorderState::Idle);
    assert!(device.with_request(0, |r| r.stop.is_raised()));
    assert!(!recorder.cancel());
}

/// WHAT: Starting a new session releases the previous clip
/// WHY: Old scratch files must not leak
#[test]
#[allow(clippy::unwrap_used)]
fn given_finished_clip_when_starting_new_session_then_previous_clip_released() {
    // Given: A finished clip
    let dir = tempfile::TempDir::new().unwrap();
    let (mut recorder, mut events, device) = supported_recorder(dir.path());
    let session_id = recorder.start().unwrap();
    send(&device, 0, CaptureEvent::Granted { session_id, format: FORMAT });
    send(
        &device,
        0,
        CaptureEvent::Chunk {
            session_id,
            samples: vec![0.3; 8],
        },
    );
    pump(&mut recorder, &mut events);
    recorder.stop(None).unwrap();
    send(&device, 0, CaptureEvent::Finished { session_id });
    pump(&mut recorder, &mut events);
    let old_path = recorder
        .clip()
        .and_then(|c| c.playable_path())
        .unwrap()
        .to_path_buf();
    assert!(old_path.exists());

    // When: Starting a new session
    recorder.start().unwrap();

    // Then: The old scratch file is gone and no clip is exposed
    assert!(!old_path.exists());
    assert!(recorder.clip().is_none());
}
