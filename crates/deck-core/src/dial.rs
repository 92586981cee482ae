//! Rotary duration dial: pointer geometry and drag handling.
//!
//! Angles are measured clockwise from 12 o'clock in degrees. The usable
//! sweep is `0..=270`, mapped linearly onto `0..=MAX_TIME_MINUTES`.

use crate::constants::{DIAL_STEP_MINUTES, DIAL_SWEEP_DEGREES, MAX_TIME_MINUTES};
use glam::DVec2;

/// Clock-face angle of `pointer` around `center`, in `[0, 360)`.
///
/// Screen coordinates are y-down, so "up" is `center.y - pointer.y`.
#[inline]
pub fn angle_from_pointer(pointer: DVec2, center: DVec2) -> f64 {
    // Subtract rather than negate so a press on the centre yields +0, not -0
    let right = pointer.x - center.x;
    let up = center.y - pointer.y;
    let deg = right.atan2(up).to_degrees();
    let deg = deg.rem_euclid(360.0);
    // rem_euclid may round a tiny negative up to exactly 360
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

/// Minutes for a dial angle; angles past the sweep clamp to its ends.
#[inline]
pub fn value_from_angle(degrees: f64) -> f64 {
    let clamped = degrees.clamp(0.0, DIAL_SWEEP_DEGREES);
    clamped / DIAL_SWEEP_DEGREES * MAX_TIME_MINUTES
}

/// Dial angle showing `minutes`; the inverse of [`value_from_angle`].
#[inline]
pub fn angle_from_value(minutes: f64) -> f64 {
    (minutes / MAX_TIME_MINUTES * DIAL_SWEEP_DEGREES).clamp(0.0, DIAL_SWEEP_DEGREES)
}

/// Snap to the nearest 5-minute step, halves rounding up.
#[inline]
pub fn quantize_minutes(minutes: f64) -> f64 {
    (minutes / DIAL_STEP_MINUTES).round() * DIAL_STEP_MINUTES
}

/// Quantized duration request for a pointer position.
#[inline]
pub fn minutes_from_pointer(pointer: DVec2, center: DVec2) -> f64 {
    quantize_minutes(value_from_angle(angle_from_pointer(pointer, center)))
}

/// Read-only dial view handed to renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DialState {
    pub angle_degrees: f64,
    pub is_dragging: bool,
}

impl DialState {
    pub fn from_remaining(remaining_minutes: f64, is_dragging: bool) -> Self {
        Self {
            angle_degrees: angle_from_value(remaining_minutes),
            is_dragging,
        }
    }
}

/// Drag state machine for the dial.
///
/// Once a drag starts every move is routed here until pointer-up or cancel,
/// wherever the pointer goes. While `locked` (session playing) all pointer
/// input is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct RotaryDial {
    dragging: bool,
}

impl RotaryDial {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Begin a drag. Returns the requested duration in minutes.
    pub fn pointer_down(&mut self, locked: bool, pointer: DVec2, center: DVec2) -> Option<f64> {
        if locked {
            return None;
        }
        self.dragging = true;
        Some(minutes_from_pointer(pointer, center))
    }

    pub fn pointer_move(&mut self, locked: bool, pointer: DVec2, center: DVec2) -> Option<f64> {
        if !self.dragging || locked {
            return None;
        }
        Some(minutes_from_pointer(pointer, center))
    }

    /// Pointer up or cancel.
    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }
}
