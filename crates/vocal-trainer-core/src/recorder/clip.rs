use crate::{CoreError, CoreResult, recorder::CaptureFormat};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Container of finished takes.
pub const CLIP_MIME_TYPE: &str = "audio/wav";
/// Extension of finished takes.
pub const CLIP_EXTENSION: &str = "wav";

const BITS_PER_SAMPLE: u16 = 16;

/// A finished take.
///
/// Lives in a scratch file until released; [`save_to`](Self::save_to)
/// copies it out under its derived filename. Dropping the clip releases it.
#[derive(Debug)]
pub struct RecordedClip {
    session_id: Uuid,
    filename: String,
    format: CaptureFormat,
    sample_count: usize,
    scratch_path: Option<PathBuf>,
}

impl RecordedClip {
    /// Encode `samples` as 16-bit PCM WAV into `scratch_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoAudioCaptured`] for an empty take, or a clip
    /// error if the file cannot be written.
    #[track_caller]
    #[instrument(skip(samples))]
    pub fn encode(
        session_id: Uuid,
        samples: &[f32],
        format: CaptureFormat,
        filename: String,
        scratch_dir: &Path,
    ) -> CoreResult<Self> {
        if samples.is_empty() {
            return Err(CoreError::NoAudioCaptured {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let clip_error = |what: &str, e: &dyn std::fmt::Display| CoreError::ClipError {
            reason: format!("{}: {}", what, e),
            location: ErrorLocation::from(Location::caller()),
        };

        fs::create_dir_all(scratch_dir)
            .map_err(|e| clip_error("Failed to create scratch directory", &e))?;

        let scratch_path = scratch_dir.join(format!("{}.{}", session_id, CLIP_EXTENSION));

        let spec = WavSpec {
            channels: format.channels.max(1),
            sample_rate: format.sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(&scratch_path, spec)
            .map_err(|e| clip_error("Failed to create clip", &e))?;

        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer
                .write_sample((clamped * f32::from(i16::MAX)) as i16)
                .map_err(|e| clip_error("Failed to write clip", &e))?;
        }

        writer
            .finalize()
            .map_err(|e| clip_error("Failed to finalize clip", &e))?;

        info!(
            session_id = %session_id,
            samples = samples.len(),
            path = ?scratch_path,
            "Clip encoded"
        );

        Ok(Self {
            session_id,
            filename,
            format,
            sample_count: samples.len(),
            scratch_path: Some(scratch_path),
        })
    }

    /// Session that produced the clip.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Derived download filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Sample layout.
    pub fn format(&self) -> CaptureFormat {
        self.format
    }

    /// Interleaved sample count.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Scratch file for in-app playback; `None` once released.
    pub fn playable_path(&self) -> Option<&Path> {
        self.scratch_path.as_deref()
    }

    /// Copy the take into `dir` under its derived filename.
    ///
    /// # Errors
    ///
    /// Returns error if the clip was released or the copy fails.
    #[track_caller]
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn save_to(&self, dir: &Path) -> CoreResult<PathBuf> {
        let source = self.scratch_path.as_ref().ok_or(CoreError::ClipError {
            reason: "Clip was already released".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::create_dir_all(dir).map_err(|e| CoreError::ClipError {
            reason: format!("Failed to create {:?}: {}", dir, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let target = dir.join(&self.filename);
        fs::copy(source, &target).map_err(|e| CoreError::ClipError {
            reason: format!("Failed to save clip to {:?}: {}", target, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(path = ?target, "Clip saved");

        Ok(target)
    }

    /// Delete the scratch file. Idempotent.
    pub fn release(&mut self) {
        if let Some(path) = self.scratch_path.take() {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = ?path, "Clip released"),
                Err(e) => warn!(path = ?path, error = %e, "Failed to remove clip scratch file"),
            }
        }
    }

    /// Read the length of a WAV file from its header, in seconds.
    ///
    /// `None` when the file is missing, unreadable or has no sample rate.
    pub fn probe_duration(path: &Path) -> Option<f64> {
        let reader = WavReader::open(path).ok()?;
        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return None;
        }
        Some(f64::from(reader.duration()) / f64::from(spec.sample_rate))
    }
}

impl Drop for RecordedClip {
    fn drop(&mut self) {
        self.release();
    }
}
