//! Core wire types for quizrace.
//!
//! Everything a client ever sees is defined here: the events that travel
//! over the socket and the room snapshot they carry. The one type that
//! must NOT travel is also here — [`Question`] keeps the answer server-side
//! by not implementing `Serialize` at all.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A caller-chosen room identifier.
///
/// Newtype over `String` so a room id can't be confused with a user id
/// in a signature. `#[serde(transparent)]` keeps the wire shape a plain
/// JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Returns the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the id is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An opaque, connection-derived player identifier, unique within a room.
///
/// The server derives this from the connection id; there is no account
/// system behind it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// The synthetic author of server-generated messages.
    pub fn system() -> Self {
        Self("system".to_string())
    }

    /// Returns the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Room state
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// `Waiting` is reserved for a future pre-round lobby — current transition
/// logic never enters it. Rooms are created directly in `Active`, flip to
/// `Finished` on the first correct answer, and return to `Active` when the
/// scheduled next round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    Waiting,
    Active,
    Finished,
}

impl RoomState {
    /// Returns `true` if the current question is open for answers.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` if a winner has been determined and a next-round
    /// timer is pending.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Active => write!(f, "active"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain records
// ---------------------------------------------------------------------------

/// A trivia question. Immutable once defined.
///
/// Deliberately does NOT derive `Serialize`: the answer lives only on the
/// server, and the compiler enforces it. Clients see a [`QuestionView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub answer: String,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            answer: answer.into(),
        }
    }
}

/// The client-safe projection of a [`Question`]: id and text, no answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            text: q.text.clone(),
        }
    }
}

/// A player in a room. Points only ever increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub user_id: UserId,
    pub username: String,
    pub points: u32,
}

/// One entry in a room's append-only message log.
///
/// `is_correct` is present only on a chat message whose content matched
/// the active question's answer; it is omitted from the wire otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub user_id: UserId,
    pub username: String,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// A point-in-time, client-safe projection of a room.
///
/// Immediately stale: it reflects room state at projection time, not a
/// live view. The full message history rides along, unpaginated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub state: RoomState,
    pub question: Option<QuestionView>,
    pub players: Vec<Player>,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_user_id: Option<UserId>,
    /// Advisory deadline (epoch ms) for the automatic next-round start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_round_at: Option<u64>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
///
/// Internally tagged on `"type"`, with namespaced event names:
/// `{"type":"room:join","roomId":"r1","username":"Alice"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Join a room, creating it if it does not exist yet.
    #[serde(rename = "room:join", rename_all = "camelCase")]
    Join { room_id: RoomId, username: String },

    /// Send a chat message to a room. Every chat message is also an
    /// answer attempt against the room's current question.
    #[serde(rename = "chat:send", rename_all = "camelCase")]
    Chat { room_id: RoomId, content: String },
}

/// Events the server sends to clients.
///
/// `Snapshot` and `Message` are room-scoped broadcasts; `Error` goes to
/// the offending sender only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "room:snapshot")]
    Snapshot(RoomSnapshot),

    #[serde(rename = "chat:message")]
    Message(Message),

    #[serde(rename = "room:error")]
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
