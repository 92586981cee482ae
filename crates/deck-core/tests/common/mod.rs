// Host-side fakes for the platform seams.

#![allow(dead_code)]

use deck_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// State shared between a `FakeTransport` and the taps it creates.
#[derive(Default)]
pub struct TapProbe {
    pub spectrum: RefCell<Vec<u8>>,
    pub connects: Cell<u32>,
    pub resumes: Cell<u32>,
    pub suspended: Cell<bool>,
}

pub struct FakeTap {
    probe: Rc<TapProbe>,
}

impl AnalyserTap for FakeTap {
    fn connect(&mut self) -> Result<()> {
        self.probe.connects.set(self.probe.connects.get() + 1);
        Ok(())
    }

    fn is_suspended(&self) -> bool {
        self.probe.suspended.get()
    }

    fn resume(&mut self) -> Result<()> {
        self.probe.resumes.set(self.probe.resumes.get() + 1);
        self.probe.suspended.set(false);
        Ok(())
    }

    fn frequency_bin_count(&self) -> usize {
        self.probe.spectrum.borrow().len()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        let spectrum = self.probe.spectrum.borrow();
        let n = out.len().min(spectrum.len());
        out[..n].copy_from_slice(&spectrum[..n]);
    }
}

#[derive(Default)]
pub struct FakeTransport {
    pub probe: Rc<TapProbe>,
    pub plays: u32,
    pub pauses: u32,
    pub current_time: f64,
    pub taps_created: u32,
    pub last_config: Option<AnalyserConfig>,
    pub reject_play: bool,
    pub reject_tap: bool,
}

impl FakeTransport {
    pub fn with_spectrum(bins: Vec<u8>) -> Self {
        let t = Self::default();
        *t.probe.spectrum.borrow_mut() = bins;
        t
    }
}

impl AudioTransport for FakeTransport {
    type Tap = FakeTap;

    fn play(&mut self) -> Result<()> {
        if self.reject_play {
            return Err(DeckError::Transport("autoplay rejected".into()));
        }
        self.plays += 1;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.pauses += 1;
        Ok(())
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn create_tap(&mut self, config: &AnalyserConfig) -> Result<FakeTap> {
        if self.reject_tap {
            return Err(DeckError::Analyser("no audio context".into()));
        }
        self.taps_created += 1;
        self.last_config = Some(*config);
        Ok(FakeTap {
            probe: self.probe.clone(),
        })
    }
}

/// Scheduled work recorded by a `ManualScheduler`.
#[derive(Default)]
pub struct Timers {
    next_id: u32,
    pub intervals: Vec<(TimerId, Duration)>,
    pub frames: Vec<TimerId>,
    pub cancelled_intervals: Vec<TimerId>,
    pub cancelled_frames: Vec<TimerId>,
    pub fail_frames: bool,
    pub fail_intervals: bool,
}

impl Timers {
    fn next(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }
}

/// Records scheduled work; tests fire callbacks by hand.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    pub timers: Rc<RefCell<Timers>>,
}

impl ManualScheduler {
    pub fn pending_intervals(&self) -> usize {
        self.timers.borrow().intervals.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.timers.borrow().frames.len()
    }

    pub fn interval_period(&self) -> Option<Duration> {
        self.timers.borrow().intervals.first().map(|(_, p)| *p)
    }

    /// Consume the oldest pending frame, as the host does before calling back.
    pub fn take_frame(&self) -> Option<TimerId> {
        let mut t = self.timers.borrow_mut();
        if t.frames.is_empty() {
            None
        } else {
            Some(t.frames.remove(0))
        }
    }

    pub fn set_fail_frames(&self, fail: bool) {
        self.timers.borrow_mut().fail_frames = fail;
    }

    pub fn set_fail_intervals(&self, fail: bool) {
        self.timers.borrow_mut().fail_intervals = fail;
    }
}

impl Scheduler for ManualScheduler {
    fn start_interval(&mut self, period: Duration) -> Result<TimerId> {
        let mut t = self.timers.borrow_mut();
        if t.fail_intervals {
            return Err(DeckError::Scheduler("setInterval failed".into()));
        }
        let id = t.next();
        t.intervals.push((id, period));
        Ok(id)
    }

    fn cancel_interval(&mut self, id: TimerId) {
        let mut t = self.timers.borrow_mut();
        t.intervals.retain(|(i, _)| *i != id);
        t.cancelled_intervals.push(id);
    }

    fn request_frame(&mut self) -> Result<TimerId> {
        let mut t = self.timers.borrow_mut();
        if t.fail_frames {
            return Err(DeckError::Scheduler("requestAnimationFrame failed".into()));
        }
        let id = t.next();
        t.frames.push(id);
        Ok(id)
    }

    fn cancel_frame(&mut self, id: TimerId) {
        let mut t = self.timers.borrow_mut();
        t.frames.retain(|i| *i != id);
        t.cancelled_frames.push(id);
    }
}

pub type TestSession = PlaybackSession<FakeTransport, ManualScheduler>;

pub fn session_with(minutes: f64) -> TestSession {
    let config = SessionConfig {
        initial_minutes: minutes,
        ..SessionConfig::default()
    };
    PlaybackSession::new(
        FakeTransport::with_spectrum(vec![128; 128]),
        ManualScheduler::default(),
        &config,
    )
}

/// Deliver `n` countdown ticks the way a host would: only while an
/// interval is actually pending.
pub fn run_ticks(session: &mut TestSession, n: usize) -> usize {
    let mut delivered = 0;
    for _ in 0..n {
        if session.scheduler().pending_intervals() == 0 {
            break;
        }
        session.on_countdown_tick();
        delivered += 1;
    }
    delivered
}

/// Deliver a frame only if one is pending, consuming it first as the host would.
pub fn fire_frame(session: &mut TestSession) -> bool {
    if session.scheduler().take_frame().is_none() {
        return false;
    }
    session.on_frame();
    true
}
