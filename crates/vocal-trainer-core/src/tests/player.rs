use crate::{
    CoreError, DEFAULT_MESSAGE, PlaybackStatus, PlayerController, Playlist, RateBounds,
    tests::fakes::FakeOutput,
};

use std::{path::PathBuf, time::Duration};

const AUDIO_DIR: &str = "audios";

#[allow(clippy::unwrap_used)]
fn two_track_player() -> PlayerController<FakeOutput> {
    let playlist = Playlist::from_json(
        r#"[{"name": "A", "file": "a.mp3"}, {"name": "B", "file": "b.mp3", "message": "Go!"}]"#,
    )
    .unwrap();
    PlayerController::new(playlist, FakeOutput::with_duration(30), AUDIO_DIR)
}

/// WHAT: Selecting a valid index loads that track's source and plays it
/// WHY: The active source must always match the active index
#[test]
#[allow(clippy::unwrap_used)]
fn given_valid_index_when_selecting_then_source_set_and_playing() {
    // Given: A two-track player
    let mut player = two_track_player();

    // When: Selecting track 0
    let selected = player.select_track(0).unwrap();

    // Then: Source, index, status and default message are set
    assert_eq!(
        player.output().source,
        Some(PathBuf::from(AUDIO_DIR).join("a.mp3"))
    );
    assert_eq!(player.state().index, Some(0));
    assert_eq!(player.state().status, PlaybackStatus::Playing);
    assert!(selected.playing);
    assert_eq!(selected.message, DEFAULT_MESSAGE);
}

/// WHAT: A track's own message replaces the default encouragement
/// WHY: Custom messages are shown while their track is active
#[test]
#[allow(clippy::unwrap_used)]
fn given_track_with_message_when_selecting_then_custom_message_shown() {
    // Given: A two-track player whose second track has a message
    let mut player = two_track_player().with_default_message("Keep going");

    // When: Selecting both tracks
    let first = player.select_track(0).unwrap();
    let second = player.select_track(1).unwrap();

    // Then: The configured default and the custom message are used
    assert_eq!(first.message, "Keep going");
    assert_eq!(second.message, "Go!");
}

/// WHAT: Out-of-range indices are rejected without side effects
/// WHY: The index must never leave the loaded list
#[test]
#[allow(clippy::unwrap_used)]
fn given_out_of_range_index_when_selecting_then_rejected_and_state_unchanged() {
    // Given: A player on track 1
    let mut player = two_track_player();
    player.select_track(1).unwrap();

    // When: Selecting index 2 (one past the end)
    let result = player.select_track(2);

    // Then: TrackOutOfRange, and the source and index are untouched
    assert!(matches!(
        result,
        Err(CoreError::TrackOutOfRange { index: 2, len: 2, .. })
    ));
    assert_eq!(player.state().index, Some(1));
    assert_eq!(player.output().loads.len(), 1);
}

/// WHAT: Nothing is loaded when the very first selection is out of range
/// WHY: An undefined source must never be set
#[test]
fn given_fresh_player_when_selecting_past_end_then_no_source_loaded() {
    // Given: A fresh player
    let mut player = two_track_player();

    // When: Selecting a huge index
    let result = player.select_track(usize::MAX);

    // Then: Rejected and nothing loaded
    assert!(result.is_err());
    assert_eq!(player.output().source, None);
    assert_eq!(player.state().index, None);
}

/// WHAT: Ended events walk the playlist and stop after the last track
/// WHY: Auto-advance must never run past the end
#[test]
#[allow(clippy::unwrap_used)]
fn given_first_track_when_ended_twice_then_advances_once_and_stops() {
    // Given: Track 0 selected
    let mut player = two_track_player();
    player.select_track(0).unwrap();

    // When: The first track ends
    let next = player.on_track_ended().unwrap();

    // Then: Track 1 (b.mp3) is active
    assert_eq!(next.map(|s| s.index), Some(1));
    assert_eq!(
        player.output().source,
        Some(PathBuf::from(AUDIO_DIR).join("b.mp3"))
    );

    // When: The last track ends
    let after_last = player.on_track_ended().unwrap();

    // Then: Index stays 1, playback does not resume
    assert!(after_last.is_none());
    assert_eq!(player.state().index, Some(1));
    assert_eq!(player.state().status, PlaybackStatus::Finished);
    assert!(!player.output().playing);
}

/// WHAT: After n ended events from index 0 the index is min(n, len - 1)
/// WHY: Advancing is bounded by the playlist length
#[test]
#[allow(clippy::unwrap_used)]
fn given_many_ended_events_when_advancing_then_index_saturates_at_last() {
    for n in 0..5usize {
        // Given: A fresh player on track 0
        let mut player = two_track_player();
        player.select_track(0).unwrap();

        // When: n ended events fire
        for _ in 0..n {
            player.on_track_ended().unwrap();
        }

        // Then: The index is min(n, len - 1)
        assert_eq!(player.state().index, Some(n.min(1)), "after {} ends", n);
    }
}

/// WHAT: poll_ended only advances when the output drained while playing
/// WHY: The app polls on a tick; paused tracks must not skip ahead
#[test]
#[allow(clippy::unwrap_used)]
fn given_drained_output_when_polling_then_advances_only_while_playing() {
    // Given: Track 0 playing, then paused with a drained output
    let mut player = two_track_player();
    player.select_track(0).unwrap();
    player.pause();
    player.output_mut().finished = true;

    // When: Polling while paused
    let paused_poll = player.poll_ended().unwrap();

    // Then: Nothing happens
    assert!(paused_poll.is_none());
    assert_eq!(player.state().index, Some(0));

    // When: Resuming and polling again
    player.play().unwrap();
    player.output_mut().finished = true;
    let playing_poll = player.poll_ended().unwrap();

    // Then: Track 1 is selected
    assert_eq!(playing_poll.map(|s| s.index), Some(1));
}

/// WHAT: A refused autoplay leaves the track loaded and paused
/// WHY: Playback-start failures are recoverable, not fatal
#[test]
#[allow(clippy::unwrap_used)]
fn given_output_refusing_play_when_selecting_then_loaded_and_paused() {
    // Given: An output that refuses to start
    let mut player = two_track_player();
    player.output_mut().refuse_play = true;

    // When: Selecting a track
    let selected = player.select_track(0).unwrap();

    // Then: The selection succeeds, paused
    assert!(!selected.playing);
    assert_eq!(player.state().status, PlaybackStatus::Paused);
    assert!(player.output().source.is_some());

    // When: The user retries once playback is allowed
    player.output_mut().refuse_play = false;
    player.play().unwrap();

    // Then: Playing
    assert_eq!(player.state().status, PlaybackStatus::Playing);
}

/// WHAT: Setting then resetting the rate returns to 1.0x
/// WHY: The reset button must restore normal speed and its label
#[test]
#[allow(clippy::unwrap_used)]
fn given_rate_two_when_resetting_then_rate_one_and_label_one() {
    // Given: A playing track at 2.0x
    let mut player = two_track_player();
    player.select_track(0).unwrap();
    let fast = player.set_playback_rate(2.0);
    assert_eq!(fast.label(), "2.0x");
    assert!((player.output().rate - 2.0).abs() < f32::EPSILON);

    // When: Resetting the rate
    let rate = player.reset_rate();

    // Then: 1.0, labelled "1.0x", applied to the output
    assert!((rate.value() - 1.0).abs() < f32::EPSILON);
    assert_eq!(rate.label(), "1.0x");
    assert!((player.output().rate - 1.0).abs() < f32::EPSILON);
}

/// WHAT: Rates outside the bounds are clamped
/// WHY: The slider range bounds every rate
#[test]
fn given_bounds_when_setting_extreme_rates_then_clamped() {
    // Given: Bounds 0.5..=1.5
    let mut player = two_track_player().with_rate_bounds(RateBounds::new(0.5, 1.5));

    // When: Setting rates beyond both ends and NaN
    let high = player.set_playback_rate(4.0);
    let low = player.set_playback_rate(0.1);
    let nan = player.set_playback_rate(f32::NAN);

    // Then: Clamped to the bounds, NaN to normal speed
    assert_eq!(high.label(), "1.5x");
    assert_eq!(low.label(), "0.5x");
    assert_eq!(nan.label(), "1.0x");
}

/// WHAT: The selected rate carries over to the next track
/// WHY: Rate is a player setting, not a per-track one
#[test]
#[allow(clippy::unwrap_used)]
fn given_custom_rate_when_track_changes_then_rate_reapplied() {
    // Given: Rate 0.8 set before selecting
    let mut player = two_track_player();
    player.set_playback_rate(0.8);
    player.output_mut().rate = 1.0;

    // When: Selecting a track
    player.select_track(1).unwrap();

    // Then: The output runs at 0.8
    assert!((player.output().rate - 0.8).abs() < 1e-6);
}

/// WHAT: Seeking backwards past zero clamps to zero
/// WHY: Position must never be negative
#[test]
#[allow(clippy::unwrap_used)]
fn given_position_three_seconds_when_seeking_back_100_then_position_zero() {
    // Given: Position at 3 s
    let mut player = two_track_player();
    player.select_track(0).unwrap();
    player.output_mut().position = Duration::from_secs(3);

    // When: Seeking -100 s
    let target = player.seek(-100.0).unwrap();

    // Then: Clamped to 0
    assert_eq!(target, Duration::ZERO);
    assert_eq!(player.output().position, Duration::ZERO);
}

/// WHAT: Seeking forward past the end clamps to the duration
/// WHY: Position must stay within the track
#[test]
#[allow(clippy::unwrap_used)]
fn given_position_near_end_when_seeking_forward_then_clamped_to_duration() {
    // Given: A 30 s track at 28 s
    let mut player = two_track_player();
    player.select_track(0).unwrap();
    player.output_mut().position = Duration::from_secs(28);

    // When: Seeking +5 s
    let target = player.seek(5.0).unwrap();

    // Then: Clamped to 30 s
    assert_eq!(target, Duration::from_secs(30));
}

/// WHAT: Seeking with an unknown duration only clamps at zero
/// WHY: Streams without a known length still seek forward
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_duration_when_seeking_forward_then_moves_freely() {
    // Given: A track of unknown length at 10 s
    let mut player = two_track_player();
    player.select_track(0).unwrap();
    player.output_mut().duration = None;
    player.output_mut().position = Duration::from_secs(10);

    // When: Seeking +5 s
    let target = player.seek(5.0).unwrap();

    // Then: 15 s
    assert_eq!(target, Duration::from_secs(15));
}

/// WHAT: Seeking before any selection is rejected
/// WHY: There is no position without a loaded track
#[test]
fn given_no_track_when_seeking_then_no_track_selected_error() {
    // Given: A fresh player
    let mut player = two_track_player();

    // When: Seeking
    let result = player.seek(5.0);

    // Then: NoTrackSelected
    assert!(matches!(result, Err(CoreError::NoTrackSelected { .. })));
}

/// WHAT: Toggle alternates pause and play on the selected track
/// WHY: A single key drives transport in the console
#[test]
#[allow(clippy::unwrap_used)]
fn given_playing_track_when_toggling_twice_then_paused_then_playing() {
    // Given
    let mut player = two_track_player();
    player.select_track(0).unwrap();

    // When
    let first = player.toggle().unwrap();
    let paused_status = player.state().status;
    let second = player.toggle().unwrap();

    // Then
    assert!(!first);
    assert_eq!(paused_status, PlaybackStatus::Paused);
    assert!(second);
    assert_eq!(player.state().status, PlaybackStatus::Playing);
    assert!(player.output().playing);
}

/// WHAT: A huge seek on a track of unknown length stays put instead of panicking
/// WHY: Header-less files report no duration, so only the lower bound clamps
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_duration_when_seeking_huge_delta_then_no_panic() {
    // Given: A playing track whose length is unknown, three seconds in
    let mut player = two_track_player();
    player.select_track(0).unwrap();
    player.output_mut().duration = None;
    player.output_mut().position = Duration::from_secs(3);

    // When: Seeking further than a Duration can hold
    let target = player.seek(1e30).unwrap();

    // Then: The position is unchanged
    assert_eq!(target, Duration::from_secs(3));

    // And: Ordinary forward seeks still move freely
    assert_eq!(player.seek(100.0).unwrap(), Duration::from_secs(103));
}

/// WHAT: A track that fails to load leaves the previous one selected and paused
/// WHY: Status must not claim a track is playing when its source never loaded
#[test]
#[allow(clippy::unwrap_used)]
fn given_playing_track_when_next_source_fails_to_load_then_previous_kept_paused() {
    // Given: Track 1 playing and a missing file for track 2
    let mut player = two_track_player();
    player.select_track(0).unwrap();
    player.output_mut().refuse_load = true;

    // When: Selecting track 2
    let result = player.select_track(1);

    // Then: The error surfaces and state still describes track 1, paused
    assert!(matches!(result, Err(CoreError::PlaybackError { .. })));
    assert_eq!(player.state().index, Some(0));
    assert_eq!(player.state().status, PlaybackStatus::Paused);
    assert!(!player.output().playing);
    assert_eq!(player.output().loads.len(), 1);

    // And: Toggling resumes track 1
    assert!(player.toggle().unwrap());
    assert_eq!(player.state().status, PlaybackStatus::Playing);
}

/// WHAT: Auto-advance into a missing file pauses instead of reporting playback
/// WHY: The tick-driven advance takes the same load path as manual selection
#[test]
#[allow(clippy::unwrap_used)]
fn given_track_ended_when_next_source_fails_to_load_then_error_and_paused() {
    // Given
    let mut player = two_track_player();
    player.select_track(0).unwrap();
    player.output_mut().refuse_load = true;
    player.output_mut().finished = true;

    // When
    let result = player.poll_ended();

    // Then
    assert!(result.is_err());
    assert_eq!(player.state().status, PlaybackStatus::Paused);
    assert_eq!(player.state().index, Some(0));
}

/// WHAT: A first selection that fails to load leaves the player stopped
/// WHY: Nothing was ever loaded, so play must keep reporting no selection
#[test]
#[allow(clippy::unwrap_used)]
fn given_fresh_player_when_first_load_fails_then_stopped_without_selection() {
    // Given
    let mut player = two_track_player();
    player.output_mut().refuse_load = true;

    // When
    let result = player.select_track(0);

    // Then
    assert!(result.is_err());
    assert_eq!(player.state().index, None);
    assert_eq!(player.state().status, PlaybackStatus::Stopped);
    assert!(matches!(
        player.play(),
        Err(CoreError::NoTrackSelected { .. })
    ));
}
