pub mod constants;
pub mod countdown;
pub mod dial;
pub mod display;
pub mod error;
pub mod level;
pub mod platform;
pub mod session;

pub use constants::*;
pub use countdown::{Countdown, Tick};
pub use dial::*;
pub use display::*;
pub use error::{DeckError, Result};
pub use level::{mean_level, LevelSampler};
pub use platform::*;
pub use session::*;
