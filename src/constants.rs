// DOM hooks and media settings used by the web frontend.

// Media
pub const AUDIO_SRC: &str = "./audio.m4a";
pub const AUDIO_CROSS_ORIGIN: &str = "anonymous"; // analyser needs CORS-clean samples

// Element ids (see index.html)
pub const DECK_ID: &str = "deck";
pub const PLAY_BUTTON_ID: &str = "play-button";
pub const STOP_BUTTON_ID: &str = "stop-button";
pub const DIAL_KNOB_ID: &str = "time-dial-knob";
pub const REMAINING_ID: &str = "remaining-time";
pub const METER_ID: &str = "vu-level";

// Styling hooks
pub const PLAYING_CLASS: &str = "playing";
pub const DIAL_TRANSITION: &str = "transform 0.15s ease-out";
