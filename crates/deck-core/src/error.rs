use thiserror::Error;

/// Platform failures surfaced by the deck core.
///
/// Rejected user intents (a dial change while playing, Play with no time
/// left) are not errors; they are silently ignored by the session.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("audio transport error: {0}")]
    Transport(String),
    #[error("analyser error: {0}")]
    Analyser(String),
    #[error("scheduler error: {0}")]
    Scheduler(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
