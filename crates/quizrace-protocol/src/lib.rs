//! Wire protocol for quizrace.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`RoomSnapshot`], …) —
//!   the structures that travel on the wire, plus the server-only
//!   [`Question`] whose answer never does.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those events are
//!   converted to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing that.
//!
//! The protocol layer knows nothing about connections, rooms, or timers —
//! it only describes messages.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientEvent, Message, Player, Question, QuestionView, RoomId,
    RoomSnapshot, RoomState, ServerEvent, UserId,
};
