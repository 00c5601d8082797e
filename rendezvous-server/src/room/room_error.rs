use thiserror::Error;

/// Outcome of a registry operation that did not go through.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoomError {
    /// The id never existed, or the room was already delivered, expired or removed.
    #[error("no room found")]
    NotFound,

    #[error("room has already been claimed")]
    AlreadyClaimed,

    #[error("room already has a publisher connection")]
    AlreadyAttached,

    #[error("room id space exhausted")]
    IdSpaceExhausted,
}
