// Host-side tests for the playback session controller.

mod common;

use common::*;
use deck_core::*;
use glam::DVec2;
use std::time::Duration;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn new_session_is_idle_with_default_duration() {
    let s = session_with(DEFAULT_DURATION_MINUTES);
    assert_eq!(s.play_state(), PlayState::Idle);
    assert_eq!(s.configured_minutes(), 30.0);
    assert_eq!(s.remaining_minutes(), 30.0);
    assert_eq!(s.level(), 0.0);
    assert!(approx(s.dial_state().angle_degrees, 90.0));
}

#[test]
fn initial_duration_is_clamped_to_the_dial_range() {
    assert_eq!(session_with(500.0).configured_minutes(), 90.0);
    assert_eq!(session_with(-3.0).configured_minutes(), 0.0);
    assert_eq!(session_with(f64::NAN).configured_minutes(), 30.0);
}

#[test]
fn play_starts_audio_countdown_and_sampler() {
    let mut s = session_with(30.0);
    s.play().unwrap();
    assert_eq!(s.play_state(), PlayState::Playing);
    assert_eq!(s.audio().plays, 1);
    assert!(s.is_counting_down());
    assert!(s.is_sampling());
    assert_eq!(s.scheduler().pending_intervals(), 1);
    assert_eq!(s.scheduler().pending_frames(), 1);
    assert_eq!(s.audio().taps_created, 1);
}

#[test]
fn play_while_playing_is_a_no_op() {
    let mut s = session_with(30.0);
    s.play().unwrap();
    s.play().unwrap();
    assert_eq!(s.audio().plays, 1);
    assert_eq!(s.scheduler().pending_intervals(), 1);
    assert_eq!(s.scheduler().pending_frames(), 1);
}

#[test]
fn play_with_no_time_left_is_ignored() {
    let mut s = session_with(0.0);
    s.play().unwrap();
    assert_eq!(s.play_state(), PlayState::Idle);
    assert_eq!(s.audio().plays, 0);
    assert_eq!(s.scheduler().pending_intervals(), 0);
    assert_eq!(s.audio().taps_created, 0);
}

// Scenario A
#[test]
fn thirty_minutes_expire_after_exactly_1800_ticks() {
    let mut s = session_with(30.0);
    s.play().unwrap();

    assert_eq!(run_ticks(&mut s, 1799), 1799);
    assert_eq!(s.play_state(), PlayState::Playing);
    assert_eq!(s.remaining(), Duration::from_secs(1));

    assert_eq!(run_ticks(&mut s, 1), 1);
    assert_eq!(s.remaining_minutes(), 0.0);
    assert_eq!(s.play_state(), PlayState::Idle);
    assert_eq!(s.scheduler().pending_intervals(), 0);
    assert_eq!(s.scheduler().pending_frames(), 0);
    assert_eq!(run_ticks(&mut s, 10), 0, "clock ticked after expiry");

    // Audio rewound, configured duration kept for the next round
    assert_eq!(s.audio().pauses, 1);
    assert_eq!(s.audio().current_time, 0.0);
    assert_eq!(s.configured_minutes(), 30.0);
}

#[test]
fn stale_tick_after_expiry_does_not_change_state() {
    let mut s = session_with(5.0 / 60.0);
    s.play().unwrap();
    run_ticks(&mut s, 5);
    assert_eq!(s.play_state(), PlayState::Idle);
    s.on_countdown_tick();
    assert_eq!(s.remaining_minutes(), 0.0);
    assert_eq!(s.play_state(), PlayState::Idle);
}

#[test]
fn play_after_expiry_is_ignored_until_duration_is_reset() {
    let mut s = session_with(1.0 / 60.0);
    s.play().unwrap();
    run_ticks(&mut s, 1);
    assert_eq!(s.play_state(), PlayState::Idle);
    s.play().unwrap();
    assert_eq!(s.play_state(), PlayState::Idle);
    assert_eq!(s.audio().plays, 1);

    s.stop();
    assert!(approx(s.remaining_minutes(), 1.0 / 60.0));
    s.play().unwrap();
    assert_eq!(s.play_state(), PlayState::Playing);
}

// Scenario B
#[test]
fn manual_stop_resets_to_configured_duration() {
    let mut s = session_with(10.0);
    s.play().unwrap();
    run_ticks(&mut s, 5);
    assert!(approx(s.remaining_minutes(), 10.0 - 5.0 / 60.0));

    s.stop();
    assert_eq!(s.play_state(), PlayState::Idle);
    assert_eq!(s.remaining_minutes(), 10.0);
    assert_eq!(s.audio().current_time, 0.0);
    assert_eq!(s.scheduler().pending_intervals(), 0);
    assert_eq!(s.scheduler().pending_frames(), 0);
    assert_eq!(s.level(), 0.0);
}

#[test]
fn tick_queued_before_stop_is_ignored() {
    let mut s = session_with(10.0);
    s.play().unwrap();
    run_ticks(&mut s, 3);
    s.stop();
    s.on_countdown_tick();
    s.on_frame();
    assert_eq!(s.remaining_minutes(), 10.0);
    assert_eq!(s.scheduler().pending_frames(), 0);
}

#[test]
fn stop_is_idempotent() {
    let mut s = session_with(20.0);
    s.stop();
    let first = s.snapshot();
    assert_eq!(first.remaining_minutes, 20.0);
    s.stop();
    assert_eq!(s.snapshot(), first);

    s.play().unwrap();
    run_ticks(&mut s, 7);
    s.stop();
    let after_play = s.snapshot();
    s.stop();
    assert_eq!(s.snapshot(), after_play);
}

// Scenario C
#[test]
fn duration_change_is_rejected_while_playing() {
    let mut s = session_with(30.0);
    s.play().unwrap();
    run_ticks(&mut s, 2);
    let before = s.snapshot();
    assert!(!s.set_configured_duration(45.0));
    assert_eq!(s.snapshot(), before);
}

#[test]
fn duration_change_while_idle_previews_remaining_time() {
    let mut s = session_with(30.0);
    assert!(s.set_configured_duration(45.0));
    assert_eq!(s.configured_minutes(), 45.0);
    assert_eq!(s.remaining_minutes(), 45.0);
}

#[test]
fn out_of_range_duration_requests_are_ignored() {
    let mut s = session_with(30.0);
    for bad in [-5.0, 95.0, f64::NAN, f64::INFINITY] {
        assert!(!s.set_configured_duration(bad), "{bad} accepted");
    }
    assert_eq!(s.configured_minutes(), 30.0);
    assert!(s.set_configured_duration(0.0));
    assert!(s.set_configured_duration(90.0));
}

// Scenario D
#[test]
fn meter_level_follows_the_spectrum() {
    let mut s = PlaybackSession::new(
        FakeTransport::with_spectrum(vec![0; 128]),
        ManualScheduler::default(),
        &SessionConfig::default(),
    );
    let probe = s.audio().probe.clone();
    s.play().unwrap();
    assert_eq!(s.level(), 0.0);

    *probe.spectrum.borrow_mut() = vec![255; 128];
    assert!(fire_frame(&mut s));
    assert_eq!(s.level(), 1.0);
    assert_eq!(s.snapshot().level, 1.0);

    // Meter activity never feeds back into session state
    assert_eq!(s.remaining_minutes(), 30.0);
    assert_eq!(s.play_state(), PlayState::Playing);
}

#[test]
fn analyser_connects_once_across_sessions_of_play() {
    let mut s = session_with(30.0);
    let probe = s.audio().probe.clone();
    for _ in 0..3 {
        s.play().unwrap();
        fire_frame(&mut s);
        s.stop();
    }
    assert_eq!(probe.connects.get(), 1);
    assert_eq!(s.audio().taps_created, 1);
}

// Scenario E
#[test]
fn dragging_dial_to_135_degrees_sets_45_minutes() {
    let mut s = session_with(30.0);
    let center = DVec2::new(100.0, 100.0);
    assert!(s.dial_pointer_down(DVec2::new(100.0, 60.0), center));
    assert_eq!(s.configured_minutes(), 0.0);
    assert!(s.dial_state().is_dragging);

    let r = 135f64.to_radians();
    let p = center + DVec2::new(r.sin() * 40.0, -r.cos() * 40.0);
    assert!(s.dial_pointer_move(p, center));
    s.dial_pointer_up();

    assert_eq!(s.configured_minutes(), 45.0);
    assert_eq!(s.remaining_minutes(), 45.0);
    assert!(!s.dial_state().is_dragging);
    assert!(approx(s.dial_state().angle_degrees, 135.0));
}

#[test]
fn dial_is_inert_while_playing() {
    let mut s = session_with(30.0);
    let center = DVec2::new(0.0, 0.0);
    s.play().unwrap();
    assert!(!s.dial_pointer_down(DVec2::new(40.0, 0.0), center));
    assert!(!s.dial_state().is_dragging);
    assert!(!s.dial_pointer_move(DVec2::new(0.0, 40.0), center));
    assert_eq!(s.configured_minutes(), 30.0);
}

#[test]
fn dial_tracks_remaining_time_while_playing() {
    let mut s = session_with(90.0);
    s.play().unwrap();
    run_ticks(&mut s, 45 * 60);
    assert!(approx(s.dial_state().angle_degrees, 135.0));
}

#[test]
fn audio_end_goes_idle_but_keeps_remaining_time() {
    let mut s = session_with(30.0);
    s.play().unwrap();
    run_ticks(&mut s, 90);
    s.on_audio_ended();

    assert_eq!(s.play_state(), PlayState::Idle);
    assert!(approx(s.remaining_minutes(), 28.5));
    assert_eq!(s.configured_minutes(), 30.0);
    assert_eq!(s.scheduler().pending_intervals(), 0);
    assert_eq!(s.scheduler().pending_frames(), 0);
    assert_eq!(s.audio().pauses, 0);

    // Playing again resumes the countdown from where it stopped
    s.play().unwrap();
    run_ticks(&mut s, 1);
    assert!(approx(s.remaining_minutes(), 28.5 - 1.0 / 60.0));
}

#[test]
fn audio_end_while_idle_is_ignored() {
    let mut s = session_with(30.0);
    s.on_audio_ended();
    assert_eq!(s.play_state(), PlayState::Idle);
    assert_eq!(s.remaining_minutes(), 30.0);
}

#[test]
fn rejected_play_propagates_without_state_change() {
    let audio = FakeTransport {
        reject_play: true,
        ..FakeTransport::default()
    };
    let mut s = PlaybackSession::new(audio, ManualScheduler::default(), &SessionConfig::default());
    assert!(matches!(s.play(), Err(DeckError::Transport(_))));
    assert_eq!(s.play_state(), PlayState::Idle);
    assert_eq!(s.scheduler().pending_intervals(), 0);
}

#[test]
fn analyser_failure_rolls_back_to_idle() {
    let audio = FakeTransport {
        reject_tap: true,
        ..FakeTransport::default()
    };
    let mut s = PlaybackSession::new(audio, ManualScheduler::default(), &SessionConfig::default());
    assert!(matches!(s.play(), Err(DeckError::Analyser(_))));
    assert_eq!(s.play_state(), PlayState::Idle);
    assert_eq!(s.remaining_minutes(), 30.0);
    assert_eq!(s.scheduler().pending_intervals(), 0);
    assert_eq!(s.audio().current_time, 0.0);
    assert_eq!(s.audio().pauses, 1);
}

#[test]
fn countdown_interval_is_configurable_but_quantum_is_one_second() {
    let config = SessionConfig {
        initial_minutes: 1.0,
        countdown_interval: Duration::from_millis(10),
        ..SessionConfig::default()
    };
    let mut s = PlaybackSession::new(
        FakeTransport::with_spectrum(vec![1; 8]),
        ManualScheduler::default(),
        &config,
    );
    s.play().unwrap();
    assert_eq!(
        s.scheduler().interval_period(),
        Some(Duration::from_millis(10))
    );
    assert_eq!(run_ticks(&mut s, 100), 60);
    assert_eq!(s.play_state(), PlayState::Idle);
}

#[test]
fn teardown_cancels_everything_and_releases_the_tap() {
    let mut s = session_with(30.0);
    s.play().unwrap();
    s.teardown();
    assert_eq!(s.play_state(), PlayState::Idle);
    assert_eq!(s.scheduler().pending_intervals(), 0);
    assert_eq!(s.scheduler().pending_frames(), 0);
    assert_eq!(s.audio().current_time, 0.0);
    s.on_countdown_tick();
    s.on_frame();
    assert_eq!(s.scheduler().pending_frames(), 0);
}

#[test]
fn remaining_never_negative_under_any_tick_sequence() {
    let mut s = session_with(5.0);
    for round in 0..4 {
        s.play().unwrap();
        for _ in 0..(400 + round * 17) {
            s.on_countdown_tick();
            assert!(s.remaining() <= Duration::from_secs(300));
        }
        assert!(s.remaining_minutes() >= 0.0);
        s.stop();
    }
}

#[test]
fn dial_press_on_the_centre_selects_zero_minutes() {
    let mut s = session_with(30.0);
    let c = DVec2::new(120.0, 80.0);
    assert!(s.dial_pointer_down(c, c));
    assert_eq!(s.configured_minutes(), 0.0);
    assert_eq!(s.remaining_minutes(), 0.0);
    s.dial_pointer_up();
}
