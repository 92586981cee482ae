//! Formatting helpers shared by the frontends.

use crate::constants::{DIAL_MAJOR_STEP_MINUTES, DIAL_STEP_MINUTES, MAX_TIME_MINUTES};

/// `MM:SS` for a remaining time in minutes, rounded to whole seconds.
pub fn format_clock(minutes: f64) -> String {
    let secs = if minutes.is_finite() && minutes > 0.0 {
        (minutes * 60.0).round() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Number of lit bars for a meter of `count` segments.
#[inline]
pub fn meter_segments(level: f32, count: usize) -> usize {
    if !level.is_finite() {
        return 0;
    }
    (level.clamp(0.0, 1.0) * count as f32).round() as usize
}

/// Printed numbers on the dial face: 0, 15, ... 90.
pub fn dial_marks() -> Vec<u32> {
    let steps = (MAX_TIME_MINUTES / DIAL_MAJOR_STEP_MINUTES) as u32;
    (0..=steps)
        .map(|i| i * DIAL_MAJOR_STEP_MINUTES as u32)
        .collect()
}

/// Unlabelled 5-minute ticks between the printed numbers.
pub fn minor_marks() -> Vec<u32> {
    let steps = (MAX_TIME_MINUTES / DIAL_STEP_MINUTES) as u32;
    (0..=steps)
        .map(|i| i * DIAL_STEP_MINUTES as u32)
        .filter(|m| m % DIAL_MAJOR_STEP_MINUTES as u32 != 0)
        .collect()
}
