//! Snapshot projection: the client-safe view of a room.

use quizrace_protocol::{QuestionView, RoomSnapshot};

use crate::Room;

/// Derives an immutable, client-safe [`RoomSnapshot`] from a room.
///
/// Pure: no side effects, callable any number of times. The result
/// reflects the room at call time only. The question is narrowed to
/// `{id, text}` — the answer never leaves the room — and the player map
/// is flattened to a sequence (order unspecified).
pub fn project(room: &Room) -> RoomSnapshot {
    RoomSnapshot {
        room_id: room.room_id().clone(),
        state: room.state(),
        question: room.question().map(QuestionView::from),
        players: room.players().values().cloned().collect(),
        messages: room.messages().to_vec(),
        winner_user_id: room.winner_user_id().cloned(),
        next_round_at: room.next_round_at(),
    }
}
