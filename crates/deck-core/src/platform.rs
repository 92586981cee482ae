//! Seams between the deck core and the host platform.
//!
//! The core never reaches for a clock, an audio element or a frame callback
//! on its own. Hosts implement these traits (WebAudio + `setInterval` +
//! `requestAnimationFrame` in the browser, a cooperative loop natively) and
//! deliver fired callbacks back through `PlaybackSession::on_countdown_tick`
//! and `PlaybackSession::on_frame`.

use crate::constants::{ANALYSER_FFT_SIZE, ANALYSER_SMOOTHING};
use crate::error::Result;
use std::time::Duration;

/// Handle for a scheduled interval or frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// Host scheduling primitives.
///
/// A cancelled id must never be delivered afterwards.
pub trait Scheduler {
    fn start_interval(&mut self, period: Duration) -> Result<TimerId>;
    fn cancel_interval(&mut self, id: TimerId);
    /// One-shot callback aligned to the next display frame.
    fn request_frame(&mut self) -> Result<TimerId>;
    fn cancel_frame(&mut self, id: TimerId);
}

/// Analysis node settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyserConfig {
    pub fft_size: u32,
    pub smoothing: f64,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: ANALYSER_FFT_SIZE,
            smoothing: ANALYSER_SMOOTHING,
        }
    }
}

/// Amplitude analysis tap attached to the audio source.
pub trait AnalyserTap {
    /// Route source -> analyser -> output. Called at most once per tap.
    fn connect(&mut self) -> Result<()>;
    fn is_suspended(&self) -> bool;
    fn resume(&mut self) -> Result<()>;
    fn frequency_bin_count(&self) -> usize;
    /// Fill `out` with the current byte-valued frequency snapshot.
    fn byte_frequency_data(&mut self, out: &mut [u8]);
}

/// The single audio source of a session.
pub trait AudioTransport {
    type Tap: AnalyserTap;

    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn set_current_time(&mut self, seconds: f64);
    /// Build the analysis tap for this source. Requires that playback was
    /// started by a user gesture, so it is only called from Play.
    fn create_tap(&mut self, config: &AnalyserConfig) -> Result<Self::Tap>;
}
