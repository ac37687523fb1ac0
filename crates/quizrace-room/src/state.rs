//! The room state machine.
//!
//! [`Room`] owns one room's entire mutable state and mutates it through
//! plain synchronous methods — no locks, no I/O. Concurrency safety comes
//! from the actor that owns the `Room` (see `room.rs`): every mutation
//! runs to completion before the next command is processed, which is what
//! makes "exactly one winner per round" a guarantee instead of a race.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use quizrace_protocol::{Message, Player, Question, RoomId, RoomState, UserId};

use crate::{MessageIds, RoomConfig, RoomError, Rotation};

/// Milliseconds since the Unix epoch.
pub(crate) fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Trim surrounding whitespace, then lowercase. Applied to both the
/// submitted content and the stored answer before comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// The result of an answer submission.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    /// Whether the content matched the active question's answer.
    pub is_correct: bool,
    /// The chat message appended for this submission. Always present,
    /// correct or not.
    pub message: Message,
    /// System messages appended by this submission (the winner
    /// announcement and the next-round notice), in append order. Empty
    /// unless the round was won.
    pub system_messages: Vec<Message>,
    /// `true` exactly when this submission won the round — the caller
    /// must arm the next-round timer.
    pub round_won: bool,
}

/// One room's state: roster, message log, current question, winner, and
/// the advisory next-round deadline.
pub struct Room {
    room_id: RoomId,
    state: RoomState,
    question: Option<Question>,
    players: HashMap<UserId, Player>,
    messages: Vec<Message>,
    winner_user_id: Option<UserId>,
    next_round_at: Option<u64>,
    rotation: Rotation,
    config: RoomConfig,
    ids: Box<dyn MessageIds>,
}

impl Room {
    /// Creates a room in the `Active` state with the first question
    /// assigned and two system messages announcing the round.
    pub fn new(
        room_id: RoomId,
        rotation: Rotation,
        config: RoomConfig,
        ids: Box<dyn MessageIds>,
    ) -> Self {
        let mut room = Self {
            room_id,
            state: RoomState::Active,
            question: None,
            players: HashMap::new(),
            messages: Vec::new(),
            winner_user_id: None,
            next_round_at: None,
            rotation,
            config,
            ids,
        };
        room.question = Some(room.rotation.current().clone());
        room.push_system("Round started".to_string());
        let text = room
            .question
            .as_ref()
            .map(|q| q.text.clone())
            .unwrap_or_default();
        room.push_system(format!("Question: {text}"));
        room
    }

    /// Inserts (or overwrites) the player entry for `user_id`.
    ///
    /// Rejoining with the same id resets points to zero; clients that
    /// depend on score continuity must keep their connection alive.
    pub fn join(
        &mut self,
        user_id: &UserId,
        username: &str,
    ) -> Result<(), RoomError> {
        if user_id.as_str().is_empty() || username.is_empty() {
            return Err(RoomError::MissingJoinFields);
        }
        self.players.insert(
            user_id.clone(),
            Player {
                user_id: user_id.clone(),
                username: username.to_string(),
                points: 0,
            },
        );
        Ok(())
    }

    /// Processes a chat message as an answer attempt.
    ///
    /// Returns `None` — no state change, no message — when `user_id` is
    /// not a member of this room (a stale or racing client event, not an
    /// error). Otherwise the submission always appends a chat message;
    /// the first correct answer of an active round additionally crowns
    /// the winner, awards points, appends two system messages, and sets
    /// the advisory next-round deadline.
    pub fn submit_answer(
        &mut self,
        user_id: &UserId,
        content: &str,
    ) -> Option<AnswerOutcome> {
        let username = self.players.get(user_id)?.username.clone();

        let is_correct = self.state.is_active()
            && self
                .question
                .as_ref()
                .is_some_and(|q| normalize(content) == normalize(&q.answer));

        let mut system_messages = Vec::new();
        let mut round_won = false;

        // First-correct-wins: the check and the commit happen inside one
        // uninterruptible mutation, so no other answer can slip between.
        if is_correct && self.winner_user_id.is_none() {
            self.winner_user_id = Some(user_id.clone());
            self.state = RoomState::Finished;
            if let Some(player) = self.players.get_mut(user_id) {
                player.points += self.config.answer_points;
            }
            system_messages
                .push(self.push_system(format!("{username} got it first!")));
            system_messages.push(self.push_system(format!(
                "Next round in {} seconds...",
                self.config.round_delay.as_secs()
            )));
            self.next_round_at =
                Some(epoch_ms() + self.config.round_delay.as_millis() as u64);
            round_won = true;
        }

        let message = Message {
            id: self.ids.next_id(),
            user_id: user_id.clone(),
            username,
            content: content.to_string(),
            timestamp: epoch_ms(),
            is_correct: is_correct.then_some(true),
        };
        self.messages.push(message.clone());

        Some(AnswerOutcome {
            is_correct,
            message,
            system_messages,
            round_won,
        })
    }

    /// Starts the next round: back to `Active`, winner and deadline
    /// cleared, rotation advanced, two system messages appended.
    ///
    /// Returns the appended messages so the caller can broadcast them.
    /// Invoked only when the round timer fires.
    pub fn start_next_round(&mut self) -> Vec<Message> {
        self.state = RoomState::Active;
        self.winner_user_id = None;
        self.next_round_at = None;

        self.rotation.advance();
        self.question = Some(self.rotation.current().clone());

        let mut out = Vec::with_capacity(2);
        out.push(self.push_system("Next round started".to_string()));
        let text = self
            .question
            .as_ref()
            .map(|q| q.text.clone())
            .unwrap_or_default();
        out.push(self.push_system(format!("Question: {text}")));
        out
    }

    /// Removes the player if present; returns whether a removal occurred.
    ///
    /// A room with zero players keeps existing and keeps any pending
    /// round timer — disconnection never cancels a round.
    pub fn leave(&mut self, user_id: &UserId) -> bool {
        self.players.remove(user_id).is_some()
    }

    /// Appends a system message and returns a copy for broadcasting.
    fn push_system(&mut self, content: String) -> Message {
        let message = Message {
            id: self.ids.next_id(),
            user_id: UserId::system(),
            username: "System".to_string(),
            content,
            timestamp: epoch_ms(),
            is_correct: None,
        };
        self.messages.push(message.clone());
        message
    }

    // -- Accessors ---------------------------------------------------------

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn players(&self) -> &HashMap<UserId, Player> {
        &self.players
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn winner_user_id(&self) -> Option<&UserId> {
        self.winner_user_id.as_ref()
    }

    pub fn next_round_at(&self) -> Option<u64> {
        self.next_round_at
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }
}
