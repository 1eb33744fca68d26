//! Configuration management for vocal-trainer.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{NotesConfig, PlaybackConfig, PlaylistConfig, RecordingConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const NOTES_FILE: &str = "notes.json";
const RECORDINGS_DIR: &str = "recordings";
const SCRATCH_DIR: &str = "vocal-trainer";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Playlist location.
    #[serde(default)]
    pub playlist: PlaylistConfig,
    /// Transport settings.
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Note storage settings.
    #[serde(default)]
    pub notes: NotesConfig,
    /// Microphone recording settings.
    #[serde(default)]
    pub recording: RecordingConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit file. Missing sections and keys
    /// take their defaults.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config {:?}: {}", config_path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Reject values the trainer cannot run with.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |reason: String| AppError::ConfigError {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        if !self.playback.rate_min.is_finite() || !self.playback.rate_max.is_finite() {
            return Err(invalid("Playback rates must be finite".to_string()));
        }
        if self.playback.rate_min <= 0.0 || self.playback.rate_min > self.playback.rate_max {
            return Err(invalid(format!(
                "Invalid rate range {}..{}",
                self.playback.rate_min, self.playback.rate_max
            )));
        }
        if !self.playback.seek_step_secs.is_finite() || self.playback.seek_step_secs <= 0.0 {
            return Err(invalid(format!(
                "seek_step_secs must be positive, got {}",
                self.playback.seek_step_secs
            )));
        }
        if self.notes.namespace.trim().is_empty() {
            return Err(invalid("Notes namespace must not be empty".to_string()));
        }
        if self.recording.probe_attempts == 0 {
            return Err(invalid("probe_attempts must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Save configuration to `config_path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Directory track files are resolved against. Relative audio
    /// directories hang off the playlist's own directory.
    pub fn audio_dir(&self) -> PathBuf {
        if self.playlist.audio_dir.is_absolute() {
            return self.playlist.audio_dir.clone();
        }
        match self.playlist.path.parent() {
            Some(parent) => parent.join(&self.playlist.audio_dir),
            None => self.playlist.audio_dir.clone(),
        }
    }

    /// Where saved takes go.
    #[track_caller]
    pub fn recordings_dir(&self) -> AppResult<PathBuf> {
        match &self.recording.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join(RECORDINGS_DIR)),
        }
    }

    /// JSON file holding every exercise's notes.
    #[track_caller]
    pub fn notes_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join(NOTES_FILE))
    }

    /// Directory unsaved takes are encoded into.
    pub fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(SCRATCH_DIR)
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "vocal-trainer", "Vocal-Trainer").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
