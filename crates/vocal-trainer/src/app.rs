use crate::{
    AppCommand, AppResult, TrackRef,
    app_command::PendingConfirmation,
    config::Config,
    view::{
        self, CLEAR_KEPT, CLEAR_PROMPT, EMPTY_NOTE_WARNING, END_OF_PLAYLIST, HELP, NO_CLIP,
        NO_TRACKS, NOTES_CLEARED,
    },
};

use std::{path::PathBuf, time::Duration};

use tokio::sync::{
    mpsc::{self, UnboundedReceiver},
    watch,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use vocal_trainer_core::{
    AudioOutput, CaptureEvent, DurationOutcome, JsonFileStore, MicrophoneDevice, NoteAppend,
    NotesStore, PlatformSupport, PlaybackStatus, PlayerController, Playlist, RecordedClip,
    Recorder, RecorderUpdate, RodioOutput, TrackView, Trainer, format_elapsed, wait_for_duration,
};

/// How often the player is checked for a drained track.
const PLAYBACK_TICK: Duration = Duration::from_millis(250);

type AppTrainer = Trainer<RodioOutput, JsonFileStore>;

/// Main application state.
///
/// Owns the trainer and the recorder and runs everything on one task:
/// console lines, capture events, duration probes and the playback tick all
/// arrive through `select!`.
pub struct App {
    pub(crate) config: Config,
    pub(crate) trainer: Option<AppTrainer>,
    pub(crate) recorder: Recorder,
    pub(crate) capture_rx: UnboundedReceiver<CaptureEvent>,
    pub(crate) preview: Option<RodioOutput>,
    pub(crate) line_rx: mpsc::Receiver<String>,
    pub(crate) probe_tx: mpsc::Sender<(Uuid, DurationOutcome)>,
    pub(crate) probe_rx: mpsc::Receiver<(Uuid, DurationOutcome)>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) clear_confirmation: PendingConfirmation,
}

impl App {
    /// Build the trainer and recorder from `config`.
    ///
    /// A playlist or output device that cannot be opened leaves the app
    /// running without tracks; notes storage that cannot be opened is fatal.
    #[instrument(skip_all)]
    pub(crate) fn new(
        config: Config,
        line_rx: mpsc::Receiver<String>,
        shutdown_tx: watch::Sender<bool>,
    ) -> AppResult<Self> {
        let notes = NotesStore::new(JsonFileStore::open(&Config::notes_path()?)?);
        let trainer = Self::build_trainer(&config, notes);

        let support = if config.recording.enabled {
            PlatformSupport::current()
        } else {
            PlatformSupport::Unsupported {
                reason: "Recording is turned off in the configuration.".to_string(),
            }
        };
        let (recorder, capture_rx) =
            Recorder::new(Box::new(MicrophoneDevice::new()), support, Config::scratch_dir());

        let (probe_tx, probe_rx) = mpsc::channel(8);

        Ok(Self {
            config,
            trainer,
            recorder,
            capture_rx,
            preview: None,
            line_rx,
            probe_tx,
            probe_rx,
            shutdown_tx,
            clear_confirmation: PendingConfirmation::default(),
        })
    }

    fn build_trainer(config: &Config, notes: NotesStore<JsonFileStore>) -> Option<AppTrainer> {
        let playlist = match Playlist::load(&config.playlist.path) {
            Ok(playlist) => playlist,
            Err(e) => {
                warn!(path = ?config.playlist.path, error = ?e, "Playlist unavailable");
                return None;
            }
        };

        let output = match RodioOutput::new() {
            Ok(output) => output,
            Err(e) => {
                warn!(error = ?e, "Audio output unavailable");
                return None;
            }
        };

        let player = PlayerController::new(playlist, output, config.audio_dir())
            .with_rate_bounds(config.playback.rate_bounds())
            .with_default_message(config.playback.default_message.clone());

        Some(Trainer::new(
            player,
            notes,
            config.notes.namespace.clone(),
            config.notes.keying,
        ))
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Vocal Trainer starting");

        if let Some(banner) = view::recording_banner(self.recorder.support()) {
            say(&banner);
        }
        self.show_playlist();
        self.select_first_track();
        say("Type 'help' for commands.");

        let mut ticker = tokio::time::interval(PLAYBACK_TICK);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                line = self.line_rx.recv() => match line {
                    Some(line) => {
                        if !self.handle_line(&line) {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                    None => {
                        info!("Console closed, shutting down");
                        break;
                    }
                },

                Some(event) = self.capture_rx.recv() => {
                    if let Some(update) = self.recorder.handle_event(event) {
                        self.on_recorder_update(update);
                    }
                }

                Some((session_id, outcome)) = self.probe_rx.recv() => {
                    self.on_duration(session_id, outcome);
                }

                _ = ticker.tick() => self.poll_playback(),
            }
        }

        self.recorder.cancel();
        let _ = self.shutdown_tx.send(true);
        info!("Vocal Trainer shut down successfully");

        Ok(())
    }

    /// Handle one console line. Returns `false` when the user asked to quit.
    pub(crate) fn handle_line(&mut self, line: &str) -> bool {
        if let Some(confirmed) = self.clear_confirmation.answer(line) {
            self.finish_clear(confirmed);
            return true;
        }

        if line.trim().is_empty() {
            return true;
        }

        let result = line
            .parse::<AppCommand>()
            .and_then(|command| self.execute(command));

        match result {
            Ok(keep_running) => keep_running,
            Err(e) => {
                warn!(error = ?e, line, "Command failed");
                say(&view::error_line(&e));
                true
            }
        }
    }

    #[instrument(skip(self))]
    fn execute(&mut self, command: AppCommand) -> AppResult<bool> {
        match command {
            AppCommand::List => self.show_playlist(),
            AppCommand::Select(target) => self.select(target)?,
            AppCommand::Next => self.next()?,
            AppCommand::Play => {
                if let Some(trainer) = self.trainer_or_notice() {
                    trainer.player_mut().play()?;
                }
            }
            AppCommand::Pause => {
                if let Some(trainer) = self.trainer_or_notice() {
                    trainer.player_mut().pause();
                }
            }
            AppCommand::Toggle => {
                if let Some(trainer) = self.trainer_or_notice() {
                    let playing = trainer.player_mut().toggle()?;
                    say(if playing { "Playing." } else { "Paused." });
                }
            }
            AppCommand::Rate(rate) => {
                if let Some(trainer) = self.trainer_or_notice() {
                    let applied = trainer.player_mut().set_playback_rate(rate);
                    say(&format!("Speed: {}", applied));
                }
            }
            AppCommand::ResetRate => {
                if let Some(trainer) = self.trainer_or_notice() {
                    let applied = trainer.player_mut().reset_rate();
                    say(&format!("Speed: {}", applied));
                }
            }
            AppCommand::Forward => self.seek(self.config.playback.seek_step_secs)?,
            AppCommand::Back => self.seek(-self.config.playback.seek_step_secs)?,
            AppCommand::Seek(delta) => self.seek(delta)?,
            AppCommand::AddNote(text) => self.add_note(&text)?,
            AppCommand::ShowNotes => {
                if let Some(trainer) = self.trainer_or_notice() {
                    say_lines(&trainer.current_notes()?.lines());
                }
            }
            AppCommand::ClearNotes => {
                if let Some(trainer) = self.trainer_or_notice() {
                    trainer.current_key()?;
                    self.clear_confirmation.ask();
                    say(CLEAR_PROMPT);
                }
            }
            AppCommand::StartRecording => {
                // The preview may still hold the clip that is about to be released.
                self.preview = None;
                self.recorder.start()?;
                say("Requesting microphone...");
            }
            AppCommand::StopRecording => {
                let track_name = self
                    .trainer
                    .as_ref()
                    .and_then(|t| t.player().current_track())
                    .map(|t| t.name.clone());
                self.recorder.stop(track_name.as_deref())?;
                say("Finishing take...");
            }
            AppCommand::CancelRecording => {
                if self.recorder.cancel() {
                    say("Microphone request cancelled.");
                } else {
                    say("No microphone request is pending.");
                }
            }
            AppCommand::PlayRecording => self.play_recording()?,
            AppCommand::SaveRecording => self.save_recording()?,
            AppCommand::Status => self.show_status(),
            AppCommand::Help => say_lines(HELP),
            AppCommand::Shutdown => return Ok(false),
        }

        Ok(true)
    }

    fn select_first_track(&mut self) {
        let Some(trainer) = self.trainer.as_mut() else {
            return;
        };

        match trainer.select_first() {
            Ok(view) => show_track(&view, trainer.player().playlist().len()),
            Err(e) => {
                warn!(error = ?e, "Failed to load the first track");
                say(&view::error_line(&e.into()));
            }
        }
    }

    fn trainer_or_notice(&mut self) -> Option<&mut AppTrainer> {
        if self.trainer.is_none() {
            say(NO_TRACKS);
        }
        self.trainer.as_mut()
    }

    fn select(&mut self, target: TrackRef) -> AppResult<()> {
        let Some(trainer) = self.trainer_or_notice() else {
            return Ok(());
        };

        let index = match target {
            TrackRef::Number(number) => number.saturating_sub(1),
            TrackRef::File(file) => match trainer.player().playlist().find_by_file(&file) {
                Some(index) => index,
                None => {
                    say(&format!("No track plays {}.", file));
                    return Ok(());
                }
            },
        };

        let view = trainer.select_track(index)?;
        let total = trainer.player().playlist().len();
        show_track(&view, total);
        Ok(())
    }

    fn next(&mut self) -> AppResult<()> {
        let Some(trainer) = self.trainer_or_notice() else {
            return Ok(());
        };

        let index = trainer.player().state().index.map_or(0, |i| i + 1);
        let total = trainer.player().playlist().len();
        if index >= total {
            say(END_OF_PLAYLIST);
            return Ok(());
        }

        let view = trainer.select_track(index)?;
        show_track(&view, total);
        Ok(())
    }

    fn seek(&mut self, delta: f64) -> AppResult<()> {
        if let Some(trainer) = self.trainer_or_notice() {
            let position = trainer.player_mut().seek(delta)?;
            say(&format!(
                "At {}",
                format_elapsed(position.as_secs_f64())
            ));
        }
        Ok(())
    }

    fn add_note(&mut self, text: &str) -> AppResult<()> {
        let Some(trainer) = self.trainer_or_notice() else {
            return Ok(());
        };

        match trainer.add_note(text)? {
            NoteAppend::Saved(_) => say_lines(&trainer.current_notes()?.lines()),
            NoteAppend::Rejected => say(EMPTY_NOTE_WARNING),
        }
        Ok(())
    }

    fn finish_clear(&mut self, confirmed: bool) {
        let Some(trainer) = self.trainer.as_mut() else {
            return;
        };

        match trainer.clear_notes(|| confirmed) {
            Ok(true) => say(NOTES_CLEARED),
            Ok(false) => say(CLEAR_KEPT),
            Err(e) => {
                error!(error = ?e, "Failed to clear notes");
                say(&view::error_line(&e.into()));
            }
        }
    }

    fn play_recording(&mut self) -> AppResult<()> {
        let Some(path) = self.recorder.clip().and_then(RecordedClip::playable_path) else {
            say(NO_CLIP);
            return Ok(());
        };
        let path = path.to_path_buf();

        if self.preview.is_none() {
            self.preview = Some(RodioOutput::new()?);
        }
        if let Some(preview) = self.preview.as_mut() {
            preview.load(&path)?;
            preview.play()?;
        }

        // Let the take be heard on its own.
        if let Some(trainer) = self.trainer.as_mut() {
            trainer.player_mut().pause();
        }

        say("Playing last take.");
        Ok(())
    }

    fn save_recording(&mut self) -> AppResult<()> {
        let Some(clip) = self.recorder.clip() else {
            say(NO_CLIP);
            return Ok(());
        };

        let saved = clip.save_to(&self.config.recordings_dir()?)?;
        say(&format!("Saved {}", saved.display()));
        Ok(())
    }

    fn show_playlist(&self) {
        match &self.trainer {
            Some(trainer) => say_lines(&view::playlist_lines(
                trainer.player().playlist(),
                trainer.player().state().index,
            )),
            None => say(NO_TRACKS),
        }
    }

    fn show_status(&self) {
        match &self.trainer {
            Some(trainer) => {
                let player = trainer.player();
                say(&view::player_line(
                    &player.state(),
                    player.current_track().map(|t| t.name.as_str()),
                    player.position(),
                    player.duration(),
                ));
            }
            None => say(NO_TRACKS),
        }
        say(&view::recorder_line(
            &self.recorder.state(),
            self.recorder.clip().map(RecordedClip::filename),
        ));
    }

    fn on_recorder_update(&mut self, update: RecorderUpdate) {
        say(&view::recorder_update_line(&update));

        if let RecorderUpdate::ClipReady {
            session_id, path, ..
        } = update
        {
            self.spawn_duration_probe(session_id, path);
        }
    }

    fn spawn_duration_probe(&self, session_id: Uuid, path: PathBuf) {
        let policy = self.config.recording.probe_policy();
        let probe_tx = self.probe_tx.clone();

        tokio::spawn(async move {
            let outcome = wait_for_duration(|| RecordedClip::probe_duration(&path), policy).await;
            // Receiver gone means the app is shutting down.
            let _ = probe_tx.send((session_id, outcome)).await;
        });
    }

    fn on_duration(&mut self, session_id: Uuid, outcome: DurationOutcome) {
        let current = self.recorder.clip().map(RecordedClip::session_id);
        if current != Some(session_id) {
            info!(session_id = %session_id, "Ignoring duration of a replaced take");
            return;
        }
        say(&outcome.display());
    }

    fn poll_playback(&mut self) {
        let Some(trainer) = self.trainer.as_mut() else {
            return;
        };

        let was_playing = trainer.player().state().status == PlaybackStatus::Playing;

        match trainer.poll_ended() {
            Ok(Some(view)) => show_track(&view, trainer.player().playlist().len()),
            Ok(None) => {
                if was_playing && trainer.player().state().status == PlaybackStatus::Finished {
                    say(END_OF_PLAYLIST);
                }
            }
            Err(e) => {
                error!(error = ?e, "Failed to advance to the next track");
                say(&view::error_line(&e.into()));
            }
        }
    }
}

fn show_track(view: &TrackView, total: usize) {
    say_lines(&view::track_lines(view, total));
}

fn say(line: &str) {
    println!("{}", line);
}

fn say_lines<S: AsRef<str>>(lines: &[S]) {
    for line in lines {
        say(line.as_ref());
    }
}
