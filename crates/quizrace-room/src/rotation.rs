//! Cyclic question rotation.

use quizrace_protocol::Question;

use crate::RoomError;

/// A room's private, ordered copy of the question list with a cursor.
///
/// The cursor always stays in `[0, len)` and wraps modulo the length, so
/// the rotation never exhausts. Non-empty by construction.
#[derive(Debug, Clone)]
pub struct Rotation {
    questions: Vec<Question>,
    index: usize,
}

impl Rotation {
    /// Builds a rotation with the cursor at 0.
    pub fn new(questions: Vec<Question>) -> Result<Self, RoomError> {
        if questions.is_empty() {
            return Err(RoomError::EmptyRotation);
        }
        Ok(Self { questions, index: 0 })
    }

    /// The question under the cursor. Pure, no side effect.
    pub fn current(&self) -> &Question {
        &self.questions[self.index % self.questions.len()]
    }

    /// Advances the cursor one step, wrapping around.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.questions.len();
    }

    /// The current cursor position.
    pub fn index(&self) -> usize {
        self.index
    }
}
