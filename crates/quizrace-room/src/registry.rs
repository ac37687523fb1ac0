//! Room registry: lazily creates rooms and hands out their handles.

use std::collections::HashMap;

use quizrace_protocol::{Question, RoomId};

use crate::room::spawn_room;
use crate::{RoomConfig, RoomError, RoomHandle};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Process-wide mapping from room id to room handle.
///
/// Rooms come into existence on the first join to their id and are never
/// torn down — entries live until the process exits, even with zero
/// players. That leak is an accepted tradeoff, not an oversight.
///
/// The registry itself has no interior locking; the server keeps it
/// behind a `tokio::sync::Mutex`, which makes `get_or_create` atomic per
/// id — two racing joins to a never-seen room id observe one room.
pub struct RoomRegistry {
    rooms: HashMap<RoomId, RoomHandle>,
    /// Master question list; each room gets its own rotation copy.
    questions: Vec<Question>,
    config: RoomConfig,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new(questions: Vec<Question>, config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            questions,
            config,
        }
    }

    /// Returns the handle for `room_id`, spawning the room actor first
    /// if this id has never been seen.
    pub fn get_or_create(
        &mut self,
        room_id: &RoomId,
    ) -> Result<RoomHandle, RoomError> {
        if let Some(handle) = self.rooms.get(room_id) {
            return Ok(handle.clone());
        }

        let handle = spawn_room(
            room_id.clone(),
            self.questions.clone(),
            self.config.clone(),
            DEFAULT_CHANNEL_SIZE,
        )?;
        self.rooms.insert(room_id.clone(), handle.clone());
        Ok(handle)
    }

    /// Returns the handle for an existing room, or `None` — the caller
    /// treats a chat event for an unknown room as stale and drops it.
    pub fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms.get(room_id).cloned()
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
