use crate::constants::DIAL_TRANSITION;
use deck_core::{format_clock, meter_segments, DeckSnapshot, PlayState, METER_SEGMENTS};

/// Style and text values written to the DOM for one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Markup {
    pub clock_text: String,
    pub dial_transform: String,
    pub dial_transition: &'static str,
    pub meter_height: String,
    pub meter_lit: usize,
    pub playing: bool,
}

#[inline]
pub fn dial_transform(angle_degrees: f64) -> String {
    format!("rotate({:.2}deg)", angle_degrees)
}

/// The knob follows the pointer directly while dragged and eases otherwise.
#[inline]
pub fn dial_transition(dragging: bool) -> &'static str {
    if dragging {
        "none"
    } else {
        DIAL_TRANSITION
    }
}

#[inline]
pub fn meter_height(level: f32) -> String {
    let pct = if level.is_finite() {
        level.clamp(0.0, 1.0) * 100.0
    } else {
        0.0
    };
    format!("{:.1}%", pct)
}

pub fn markup_for(snapshot: &DeckSnapshot) -> Markup {
    Markup {
        clock_text: format_clock(snapshot.remaining_minutes),
        dial_transform: dial_transform(snapshot.dial.angle_degrees),
        dial_transition: dial_transition(snapshot.dial.is_dragging),
        meter_height: meter_height(snapshot.level),
        meter_lit: meter_segments(snapshot.level, METER_SEGMENTS),
        playing: snapshot.play_state == PlayState::Playing,
    }
}
