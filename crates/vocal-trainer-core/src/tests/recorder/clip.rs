use crate::{CaptureFormat, CoreError, RecordedClip};

use uuid::Uuid;

const MONO_8K: CaptureFormat = CaptureFormat {
    sample_rate: 8_000,
    channels: 1,
};

/// WHAT: Encoded clips report their length through the WAV header
/// WHY: The duration display reads it back from the finished file
#[test]
#[allow(clippy::unwrap_used)]
fn given_two_seconds_of_samples_when_encoding_then_probe_reports_two_seconds() {
    // Given: Two seconds of mono audio at 8 kHz
    let dir = tempfile::TempDir::new().unwrap();
    let samples = vec![0.25f32; 16_000];

    // When: Encoding and probing
    let clip = RecordedClip::encode(
        Uuid::new_v4(),
        &samples,
        MONO_8K,
        "take.wav".to_string(),
        dir.path(),
    )
    .unwrap();
    let secs = RecordedClip::probe_duration(clip.playable_path().unwrap()).unwrap();

    // Then: 2.0 s and the sample count is kept
    assert!((secs - 2.0).abs() < 1e-9);
    assert_eq!(clip.sample_count(), 16_000);
}

/// WHAT: An empty take is refused
/// WHY: There is nothing to play or download
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_samples_when_encoding_then_no_audio_captured_error() {
    // Given: An empty sample buffer
    let dir = tempfile::TempDir::new().unwrap();

    // When: Encoding
    let result = RecordedClip::encode(
        Uuid::new_v4(),
        &[],
        MONO_8K,
        "take.wav".to_string(),
        dir.path(),
    );

    // Then: NoAudioCaptured
    assert!(matches!(result, Err(CoreError::NoAudioCaptured { .. })));
}

/// WHAT: Saving copies the take under its derived filename
/// WHY: This is the download action
#[test]
#[allow(clippy::unwrap_used)]
fn given_clip_when_saving_then_copy_named_after_filename() {
    // Given: An encoded clip
    let scratch = tempfile::TempDir::new().unwrap();
    let downloads = tempfile::TempDir::new().unwrap();
    let clip = RecordedClip::encode(
        Uuid::new_v4(),
        &[0.1, -0.1, 0.2, -0.2],
        MONO_8K,
        "Sirens_2026-10-19_14-05.wav".to_string(),
        scratch.path(),
    )
    .unwrap();

    // When: Saving into the downloads directory
    let saved = clip.save_to(downloads.path()).unwrap();

    // Then: The file exists under the derived name and is a readable WAV
    assert_eq!(saved, downloads.path().join("Sirens_2026-10-19_14-05.wav"));
    assert!(RecordedClip::probe_duration(&saved).is_some());
}

/// WHAT: Releasing deletes the scratch file and revokes the playable path
/// WHY: Old takes must not accumulate between sessions
#[test]
#[allow(clippy::unwrap_used)]
fn given_clip_when_released_then_scratch_file_removed() {
    // Given: An encoded clip
    let dir = tempfile::TempDir::new().unwrap();
    let mut clip = RecordedClip::encode(
        Uuid::new_v4(),
        &[0.5; 8],
        MONO_8K,
        "take.wav".to_string(),
        dir.path(),
    )
    .unwrap();
    let path = clip.playable_path().unwrap().to_path_buf();
    assert!(path.exists());

    // When: Releasing twice
    clip.release();
    clip.release();

    // Then: File gone, no playable path, saving fails
    assert!(!path.exists());
    assert!(clip.playable_path().is_none());
    assert!(matches!(
        clip.save_to(dir.path()),
        Err(CoreError::ClipError { .. })
    ));
}

/// WHAT: Probing a missing file yields no duration
/// WHY: The bounded wait keeps retrying instead of failing
#[test]
fn given_missing_file_when_probing_then_none() {
    assert!(RecordedClip::probe_duration(std::path::Path::new("/nonexistent/take.wav")).is_none());
}
