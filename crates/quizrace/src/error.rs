//! Unified error type for the Quizrace server.

use quizrace_protocol::ProtocolError;
use quizrace_room::RoomError;
use quizrace_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The binary and the gateway deal with this single error type instead
/// of importing errors from each sub-crate. The `#[from]` attribute on
/// each variant auto-generates `From` impls, so the `?` operator
/// converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum QuizraceError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (bad join, dead actor, empty deck).
    #[error(transparent)]
    Room(#[from] RoomError),
}
