use deck_core::{AnalyserConfig, AnalyserTap, AudioTransport};
use instant::Instant;
use rand::prelude::*;
use std::cell::Cell;
use std::time::Duration;

/// Stand-in for the audio element: tracks a playback position against an
/// optional track length so a natural end can be reported.
pub struct SyntheticTransport {
    track: Option<Duration>,
    seed: u64,
    position: Cell<Duration>,
    playing_since: Cell<Option<Instant>>,
}

impl SyntheticTransport {
    pub fn new(track: Option<Duration>, seed: u64) -> Self {
        Self {
            track,
            seed,
            position: Cell::new(Duration::ZERO),
            playing_since: Cell::new(None),
        }
    }

    fn position_at(&self, now: Instant) -> Duration {
        let base = self.position.get();
        match self.playing_since.get() {
            Some(since) => base + now.saturating_duration_since(since),
            None => base,
        }
    }

    /// True once per natural end of the track; the element is left stopped
    /// at the beginning, ready to play again.
    pub fn take_ended(&self, now: Instant) -> bool {
        let Some(track) = self.track else {
            return false;
        };
        if self.playing_since.get().is_none() || self.position_at(now) < track {
            return false;
        }
        self.playing_since.set(None);
        self.position.set(Duration::ZERO);
        true
    }
}

impl AudioTransport for SyntheticTransport {
    type Tap = SyntheticTap;

    fn play(&mut self) -> deck_core::Result<()> {
        if self.playing_since.get().is_none() {
            self.playing_since.set(Some(Instant::now()));
        }
        log::debug!("[audio] play at {:?}", self.position.get());
        Ok(())
    }

    fn pause(&mut self) -> deck_core::Result<()> {
        let now = Instant::now();
        self.position.set(self.position_at(now));
        self.playing_since.set(None);
        Ok(())
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position
            .set(Duration::from_secs_f64(seconds.max(0.0)));
        if self.playing_since.get().is_some() {
            self.playing_since.set(Some(Instant::now()));
        }
    }

    fn create_tap(&mut self, config: &AnalyserConfig) -> deck_core::Result<SyntheticTap> {
        Ok(SyntheticTap::new(config, self.seed))
    }
}

/// Pseudo-random spectrum with a slowly wandering loudness and a
/// high-frequency roll-off.
pub struct SyntheticTap {
    bins: usize,
    rng: StdRng,
    loudness: f32,
    suspended: bool,
    connected: bool,
}

impl SyntheticTap {
    fn new(config: &AnalyserConfig, seed: u64) -> Self {
        Self {
            bins: (config.fft_size / 2) as usize,
            rng: StdRng::seed_from_u64(seed),
            loudness: 0.5,
            // A fresh context starts suspended until resumed
            suspended: true,
            connected: false,
        }
    }
}

impl AnalyserTap for SyntheticTap {
    fn connect(&mut self) -> deck_core::Result<()> {
        self.connected = true;
        log::info!("[audio] synthetic analyser connected bins={}", self.bins);
        Ok(())
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> deck_core::Result<()> {
        self.suspended = false;
        Ok(())
    }

    fn frequency_bin_count(&self) -> usize {
        self.bins
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        if !self.connected || self.suspended {
            out.fill(0);
            return;
        }
        self.loudness = (self.loudness + self.rng.gen_range(-0.04..0.04)).clamp(0.15, 0.95);
        let n = out.len().max(1) as f32;
        for (i, b) in out.iter_mut().enumerate() {
            let tilt = 1.0 - i as f32 / n;
            let jitter = self.rng.gen_range(0.6..1.0);
            *b = (self.loudness * tilt * jitter * 255.0).clamp(0.0, 255.0) as u8;
        }
    }
}
