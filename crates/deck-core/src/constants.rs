use std::time::Duration;

// Shared timing/dial tuning constants used by both web and native frontends.

// Dial geometry
pub const MAX_TIME_MINUTES: f64 = 90.0; // full-sweep duration
pub const DIAL_SWEEP_DEGREES: f64 = 270.0; // 0 min at 12 o'clock, 90 min at 9 o'clock
pub const DIAL_STEP_MINUTES: f64 = 5.0; // dial snaps to this grid
pub const DIAL_MAJOR_STEP_MINUTES: f64 = 15.0; // printed numbers on the dial face

// Session defaults
pub const DEFAULT_DURATION_MINUTES: f64 = 30.0;

// Countdown: one tick removes exactly one second
pub const COUNTDOWN_QUANTUM: Duration = Duration::from_secs(1);
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

// Analyser tap
pub const ANALYSER_FFT_SIZE: u32 = 256;
pub const ANALYSER_SMOOTHING: f64 = 0.8;
pub const BYTE_LEVEL_MAX: f32 = 255.0; // byte frequency bins range 0..=255

// Meter
pub const METER_SEGMENTS: usize = 12;
