//! Unified error handling for pairpad.
//!
//! Failures here are local by design: a malformed frame is dropped, a
//! lost connection triggers its own cleanup, and nothing escalates to a
//! service-level failure.

use thiserror::Error;

/// Errors from room operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// The room actor is draining after its last member left and no
    /// longer accepts joins. Callers retry the registry lookup, which
    /// spawns a fresh room.
    #[error("room is closed")]
    RoomClosed,

    /// The room actor went away entirely and retries were exhausted.
    #[error("room is unavailable")]
    Unavailable,
}

impl RoomError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RoomClosed => "room_closed",
            Self::Unavailable => "unavailable",
        }
    }
}
