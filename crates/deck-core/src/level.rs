//! Meter level sampling.
//!
//! While running, the sampler reads one byte frequency snapshot per display
//! frame and publishes its normalized mean as the meter level. The analysis
//! tap is created lazily on the first start and each tap is connected exactly
//! once.

use crate::constants::BYTE_LEVEL_MAX;
use crate::error::Result;
use crate::platform::{AnalyserConfig, AnalyserTap, AudioTransport, Scheduler, TimerId};

/// Arithmetic mean of the bins scaled to `[0, 1]`.
#[inline]
pub fn mean_level(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u64 = bins.iter().map(|&b| b as u64).sum();
    (sum as f64 / bins.len() as f64) as f32 / BYTE_LEVEL_MAX
}

pub struct LevelSampler<T: AnalyserTap> {
    config: AnalyserConfig,
    tap: Option<T>,
    connected: bool,
    frame: Option<TimerId>,
    bins: Vec<u8>,
    level: f32,
}

impl<T: AnalyserTap> LevelSampler<T> {
    pub fn new(config: AnalyserConfig) -> Self {
        Self {
            config,
            tap: None,
            connected: false,
            frame: None,
            bins: Vec::new(),
            level: 0.0,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn has_tap(&self) -> bool {
        self.tap.is_some()
    }

    pub fn start<A, S>(&mut self, audio: &mut A, scheduler: &mut S) -> Result<()>
    where
        A: AudioTransport<Tap = T>,
        S: Scheduler,
    {
        if self.is_running() {
            return Ok(());
        }
        let tap = match self.tap.take() {
            Some(tap) => tap,
            None => {
                log::info!(
                    "[level] creating analyser fft={} smoothing={}",
                    self.config.fft_size,
                    self.config.smoothing
                );
                audio.create_tap(&self.config)?
            }
        };
        let tap = self.tap.insert(tap);
        if !self.connected {
            tap.connect()?;
            self.connected = true;
        }
        if tap.is_suspended() {
            tap.resume()?;
        }
        self.sample();
        self.frame = Some(scheduler.request_frame()?);
        Ok(())
    }

    /// Deliver a fired frame callback. Stale frames after `stop` are ignored.
    pub fn on_frame<S: Scheduler>(&mut self, scheduler: &mut S) {
        if self.frame.take().is_none() {
            return;
        }
        self.sample();
        match scheduler.request_frame() {
            Ok(id) => self.frame = Some(id),
            Err(e) => {
                log::error!("[level] frame request failed, sampler stopped: {}", e);
                self.level = 0.0;
            }
        }
    }

    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(id) = self.frame.take() {
            scheduler.cancel_frame(id);
        }
        self.level = 0.0;
    }

    /// Stop sampling and release the analysis tap.
    pub fn teardown<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.stop(scheduler);
        self.tap = None;
        self.connected = false;
    }

    fn sample(&mut self) {
        let Some(tap) = &mut self.tap else {
            return;
        };
        let bins = tap.frequency_bin_count();
        if self.bins.len() != bins {
            self.bins.resize(bins, 0);
        }
        tap.byte_frequency_data(&mut self.bins);
        self.level = mean_level(&self.bins);
    }
}
