//! Room state machine and round engine for quizrace.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its
//! roster, message log, question rotation, and round timer. Commands
//! arrive over an mpsc channel and execute sequentially, which is the
//! whole concurrency story: exactly one winner per round because no two
//! answers are ever evaluated at the same time.
//!
//! # Key types
//!
//! - [`Room`] — the pure state machine (no I/O, no locks)
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomRegistry`] — lazily creates rooms, never destroys them
//! - [`Rotation`] — cyclic question cursor
//! - [`snapshot::project`] — the client-safe view
//! - [`RoomConfig`] — round delay and points award

mod config;
mod error;
mod ids;
mod registry;
mod room;
mod rotation;
pub mod snapshot;
mod state;

pub use config::RoomConfig;
pub use error::RoomError;
pub use ids::{MessageIds, RandomIds, SequentialIds};
pub use registry::RoomRegistry;
pub use room::{RoomHandle, SubscriberSender};
pub use rotation::Rotation;
pub use state::{normalize, AnswerOutcome, Room};
