//! Error types for the room layer.

use quizrace_protocol::RoomId;

/// Errors that can occur during room operations.
///
/// Deliberately small: a chat event for an unknown room or from a
/// non-member is not an error — it is silently dropped as a stale client
/// event, so no variant exists for it.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A join was attempted without a room id or username.
    /// Surfaced to the offending connection as a `room:error` event.
    #[error("roomId and username are required")]
    MissingJoinFields,

    /// A room cannot be built from an empty question list — the
    /// rotation is cyclic and must never exhaust.
    #[error("question rotation must not be empty")]
    EmptyRotation,

    /// The room's command channel is closed or full.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
