//! Playback session controller.
//!
//! Owns the play/stop state and reconciles the three independently clocked
//! activities: the audio transport, the one-second countdown and the
//! per-frame level sampler. Every tie between them is an explicit call made
//! from here; nothing reacts to state changes on its own.

use crate::constants::{COUNTDOWN_PERIOD, DEFAULT_DURATION_MINUTES, MAX_TIME_MINUTES};
use crate::countdown::{Countdown, Tick};
use crate::dial::{DialState, RotaryDial};
use crate::error::Result;
use crate::level::LevelSampler;
use crate::platform::{AnalyserConfig, AudioTransport, Scheduler};
use glam::DVec2;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Idle,
    Playing,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub initial_minutes: f64,
    /// Real-time spacing of countdown ticks. Each tick still removes one
    /// second regardless of this value.
    pub countdown_interval: Duration,
    pub analyser: AnalyserConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_minutes: DEFAULT_DURATION_MINUTES,
            countdown_interval: COUNTDOWN_PERIOD,
            analyser: AnalyserConfig::default(),
        }
    }
}

/// Everything a renderer needs, copied out of the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeckSnapshot {
    pub play_state: PlayState,
    pub configured_minutes: f64,
    pub remaining_minutes: f64,
    pub level: f32,
    pub dial: DialState,
}

pub struct PlaybackSession<A: AudioTransport, S: Scheduler> {
    audio: A,
    scheduler: S,
    countdown: Countdown,
    sampler: LevelSampler<A::Tap>,
    dial: RotaryDial,
    play_state: PlayState,
    configured: Duration,
    remaining: Duration,
}

#[inline]
fn minutes_to_duration(minutes: f64) -> Duration {
    Duration::from_secs_f64(minutes * 60.0)
}

#[inline]
fn duration_to_minutes(d: Duration) -> f64 {
    d.as_secs_f64() / 60.0
}

#[inline]
fn is_valid_minutes(minutes: f64) -> bool {
    minutes.is_finite() && (0.0..=MAX_TIME_MINUTES).contains(&minutes)
}

impl<A: AudioTransport, S: Scheduler> PlaybackSession<A, S> {
    pub fn new(audio: A, scheduler: S, config: &SessionConfig) -> Self {
        let initial = if config.initial_minutes.is_finite() {
            config.initial_minutes.clamp(0.0, MAX_TIME_MINUTES)
        } else {
            DEFAULT_DURATION_MINUTES
        };
        let configured = minutes_to_duration(initial);
        Self {
            audio,
            scheduler,
            countdown: Countdown::new(config.countdown_interval),
            sampler: LevelSampler::new(config.analyser),
            dial: RotaryDial::default(),
            play_state: PlayState::Idle,
            configured,
            remaining: configured,
        }
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn is_playing(&self) -> bool {
        self.play_state == PlayState::Playing
    }

    pub fn configured_minutes(&self) -> f64 {
        duration_to_minutes(self.configured)
    }

    pub fn remaining_minutes(&self) -> f64 {
        duration_to_minutes(self.remaining)
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn level(&self) -> f32 {
        self.sampler.level()
    }

    pub fn dial_state(&self) -> DialState {
        DialState::from_remaining(self.remaining_minutes(), self.dial.is_dragging())
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            play_state: self.play_state,
            configured_minutes: self.configured_minutes(),
            remaining_minutes: self.remaining_minutes(),
            level: self.level(),
            dial: self.dial_state(),
        }
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_running()
    }

    /// Start playback. A no-op while already playing or with no time left.
    ///
    /// Platform failures (autoplay rejection, analyser construction) are
    /// returned to the caller after rolling back to Idle.
    pub fn play(&mut self) -> Result<()> {
        if self.is_playing() || self.remaining.is_zero() {
            log::debug!(
                "[session] play ignored state={:?} remaining={:?}",
                self.play_state,
                self.remaining
            );
            return Ok(());
        }
        self.audio.play()?;
        self.play_state = PlayState::Playing;
        log::info!("[session] play remaining={:.2}min", self.remaining_minutes());
        if let Err(e) = self.start_activities() {
            log::error!("[session] start failed, back to idle: {}", e);
            self.halt_activities();
            self.rewind();
            self.play_state = PlayState::Idle;
            return Err(e);
        }
        Ok(())
    }

    /// Manual stop: rewind the audio and reset to the configured duration.
    pub fn stop(&mut self) {
        self.rewind();
        self.play_state = PlayState::Idle;
        self.remaining = self.configured;
        self.halt_activities();
        log::info!("[session] stop remaining={:.2}min", self.remaining_minutes());
    }

    /// Deliver a fired countdown interval.
    pub fn on_countdown_tick(&mut self) {
        match self.countdown.tick(&mut self.scheduler) {
            Tick::Idle => {}
            Tick::Remaining(left) => {
                self.remaining = left;
                log::debug!("[session] tick remaining={:?}", left);
            }
            Tick::Expired => self.on_expire(),
        }
    }

    /// Deliver a fired display frame.
    pub fn on_frame(&mut self) {
        self.sampler.on_frame(&mut self.scheduler);
    }

    /// Time's up: rewind and go idle, leaving zero on the display.
    fn on_expire(&mut self) {
        self.rewind();
        self.play_state = PlayState::Idle;
        self.remaining = Duration::ZERO;
        self.halt_activities();
        log::info!("[session] expired");
    }

    /// The audio reached its natural end. Goes idle but keeps the remaining
    /// time where the countdown left it, unlike `stop`.
    pub fn on_audio_ended(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.play_state = PlayState::Idle;
        self.halt_activities();
        log::info!(
            "[session] audio ended remaining={:.2}min",
            self.remaining_minutes()
        );
    }

    /// Change the duration while idle; also previews it as remaining time.
    /// Returns whether the request was accepted.
    pub fn set_configured_duration(&mut self, minutes: f64) -> bool {
        if self.is_playing() || !is_valid_minutes(minutes) {
            log::debug!(
                "[session] duration request {} ignored state={:?}",
                minutes,
                self.play_state
            );
            return false;
        }
        let d = minutes_to_duration(minutes);
        self.configured = d;
        self.remaining = d;
        true
    }

    pub fn dial_pointer_down(&mut self, pointer: DVec2, center: DVec2) -> bool {
        let locked = self.is_playing();
        match self.dial.pointer_down(locked, pointer, center) {
            Some(minutes) => {
                log::debug!("[dial] begin drag minutes={}", minutes);
                self.set_configured_duration(minutes)
            }
            None => false,
        }
    }

    pub fn dial_pointer_move(&mut self, pointer: DVec2, center: DVec2) -> bool {
        let locked = self.is_playing();
        match self.dial.pointer_move(locked, pointer, center) {
            Some(minutes) => self.set_configured_duration(minutes),
            None => false,
        }
    }

    pub fn dial_pointer_up(&mut self) {
        self.dial.pointer_up();
    }

    /// Cancel everything pending and release the analysis tap. The transport
    /// itself is released when the session is dropped.
    pub fn teardown(&mut self) {
        if self.is_playing() {
            self.rewind();
        }
        self.play_state = PlayState::Idle;
        self.countdown.stop(&mut self.scheduler);
        self.sampler.teardown(&mut self.scheduler);
        self.dial.pointer_up();
        log::info!("[session] teardown");
    }

    fn start_activities(&mut self) -> Result<()> {
        self.countdown.start(&mut self.scheduler, self.remaining)?;
        self.sampler.start(&mut self.audio, &mut self.scheduler)
    }

    fn halt_activities(&mut self) {
        self.countdown.stop(&mut self.scheduler);
        self.sampler.stop(&mut self.scheduler);
    }

    fn rewind(&mut self) {
        if let Err(e) = self.audio.pause() {
            log::warn!("[session] pause failed: {}", e);
        }
        self.audio.set_current_time(0.0);
    }
}
