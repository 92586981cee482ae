/// What leaving the page means for the live session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageExit {
    /// Kept in the back/forward cache; the session must survive a restore.
    Frozen,
    Unloaded,
}

#[inline]
pub fn page_exit(persisted: bool) -> PageExit {
    if persisted {
        PageExit::Frozen
    } else {
        PageExit::Unloaded
    }
}

/// Whether a rejected `play()` promise means the audio never started.
///
/// `AbortError` only reports a play request interrupted by our own pause or
/// source change, which the session has already handled.
#[inline]
pub fn rejection_stops_playback(error_name: &str) -> bool {
    error_name != "AbortError"
}
