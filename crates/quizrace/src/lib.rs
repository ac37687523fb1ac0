//! # Quizrace
//!
//! Real-time multiplayer trivia over WebSockets.
//!
//! Players join rooms by id, chat, and race to answer the room's
//! current question; the first correct answer wins the round and the
//! next one starts automatically five seconds later. Every mutation is
//! followed by a full room snapshot broadcast, so clients render state
//! instead of replaying deltas.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quizrace::prelude::*;
//!
//! # async fn run() -> Result<(), QuizraceError> {
//! let deck = vec![Question::new("q1", "What is 12 + 30?", "42")];
//! let server = QuizraceServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .questions(deck)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod gateway;
mod server;

pub use error::QuizraceError;
pub use server::{QuizraceServer, QuizraceServerBuilder};

/// One-stop imports for building and running a server.
pub mod prelude {
    pub use crate::{QuizraceError, QuizraceServer, QuizraceServerBuilder};
    pub use quizrace_protocol::{
        ClientEvent, Message, Player, Question, RoomId, RoomSnapshot,
        RoomState, ServerEvent, UserId,
    };
    pub use quizrace_room::RoomConfig;
}
