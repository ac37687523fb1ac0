//! Room actor: an isolated Tokio task that owns one room.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. All mutations — joins, answers, round
//! advances, leaves — execute sequentially inside this single task, so
//! the first correct answer of a round wins without any locking. The
//! task also owns the room's [`RoundTimer`], keeping the at-most-one
//! pending round per room invariant structural.

use std::collections::HashMap;

use quizrace_protocol::{
    Question, RoomId, RoomSnapshot, ServerEvent, UserId,
};
use quizrace_timer::RoundTimer;
use tokio::sync::{mpsc, oneshot};

use crate::{snapshot, RandomIds, Room, RoomConfig, RoomError, Rotation};

/// Channel sender for delivering room broadcasts to one subscribed
/// connection.
pub type SubscriberSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
///
/// Variants carrying a `oneshot::Sender` are request/response: the
/// caller sends the command and waits for the reply.
pub(crate) enum RoomCommand {
    /// Add a player and register their outbound channel.
    Join {
        user_id: UserId,
        username: String,
        sender: SubscriberSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Deliver a chat message / answer attempt (fire-and-forget).
    Chat { user_id: UserId, content: String },

    /// Remove a player. Replies whether a removal occurred.
    Leave {
        user_id: UserId,
        reply: oneshot::Sender<bool>,
    },

    /// Project the current room state.
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
}

/// Handle to a running room actor. Cheap to clone — it's an
/// `mpsc::Sender` wrapper. The registry holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's identifier.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Joins a player to the room, registering `sender` for broadcasts.
    pub async fn join(
        &self,
        user_id: UserId,
        username: String,
        sender: SubscriberSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                user_id,
                username,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?
    }

    /// Sends a chat message / answer attempt (fire-and-forget).
    pub async fn chat(
        &self,
        user_id: UserId,
        content: String,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Chat { user_id, content })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Removes a player. Returns whether a removal occurred.
    pub async fn leave(&self, user_id: UserId) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                user_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Projects the room's current client-safe snapshot.
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    timer: RoundTimer,
    /// Per-connection outbound channels, keyed by the member's user id.
    subscribers: HashMap<UserId, SubscriberSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until every handle is dropped.
    ///
    /// Rooms are never explicitly destroyed — the registry keeps its
    /// handle for the process lifetime, so in practice this loop runs
    /// until shutdown.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room.room_id(), "room created");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = self.timer.fired() => self.handle_round_timer(),
            }
        }

        tracing::info!(room_id = %self.room.room_id(), "room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                user_id,
                username,
                sender,
                reply,
            } => {
                let result = self.handle_join(user_id, username, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Chat { user_id, content } => {
                self.handle_chat(user_id, content);
            }
            RoomCommand::Leave { user_id, reply } => {
                let _ = reply.send(self.handle_leave(user_id));
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(snapshot::project(&self.room));
            }
        }
    }

    fn handle_join(
        &mut self,
        user_id: UserId,
        username: String,
        sender: SubscriberSender,
    ) -> Result<(), RoomError> {
        self.room.join(&user_id, &username)?;
        self.subscribers.insert(user_id.clone(), sender.clone());

        tracing::info!(
            room_id = %self.room.room_id(),
            %user_id,
            username = %username,
            players = self.room.players().len(),
            "player joined"
        );

        // The joining connection gets the snapshot directly, then the
        // room-wide broadcast goes out (the joiner included). Clients
        // rely on the double delivery; keep it.
        let snap = snapshot::project(&self.room);
        let _ = sender.send(ServerEvent::Snapshot(snap.clone()));
        self.broadcast(ServerEvent::Snapshot(snap));
        Ok(())
    }

    fn handle_chat(&mut self, user_id: UserId, content: String) {
        let Some(outcome) = self.room.submit_answer(&user_id, &content)
        else {
            tracing::debug!(
                room_id = %self.room.room_id(),
                %user_id,
                "chat from non-member, ignoring"
            );
            return;
        };

        if outcome.round_won {
            tracing::info!(
                room_id = %self.room.room_id(),
                winner = %user_id,
                "round won"
            );
            self.timer.arm(self.room.config().round_delay);
        }

        // Clients expect this order: system messages first, then the
        // player's chat message, then the snapshot.
        for msg in outcome.system_messages {
            self.broadcast(ServerEvent::Message(msg));
        }
        self.broadcast(ServerEvent::Message(outcome.message));
        self.broadcast(ServerEvent::Snapshot(snapshot::project(&self.room)));
    }

    fn handle_leave(&mut self, user_id: UserId) -> bool {
        let removed = self.room.leave(&user_id);
        if removed {
            self.subscribers.remove(&user_id);
            tracing::info!(
                room_id = %self.room.room_id(),
                %user_id,
                players = self.room.players().len(),
                "player left"
            );
            // The pending round timer, if any, keeps running: an empty
            // room still advances rounds.
            self.broadcast(ServerEvent::Snapshot(snapshot::project(
                &self.room,
            )));
        }
        removed
    }

    fn handle_round_timer(&mut self) {
        let messages = self.room.start_next_round();
        tracing::info!(
            room_id = %self.room.room_id(),
            question = %self.room.question().map(|q| q.id.as_str()).unwrap_or(""),
            "next round started"
        );
        for msg in messages {
            self.broadcast(ServerEvent::Message(msg));
        }
        self.broadcast(ServerEvent::Snapshot(snapshot::project(&self.room)));
    }

    /// Sends an event to every subscribed connection. Sends to gone
    /// receivers (mid-disconnect) are silently dropped.
    fn broadcast(&self, event: ServerEvent) {
        for sender in self.subscribers.values() {
            let _ = sender.send(event.clone());
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
///
/// The room is created eagerly: first question assigned, the two
/// round-start system messages already in the log.
pub(crate) fn spawn_room(
    room_id: RoomId,
    questions: Vec<Question>,
    config: RoomConfig,
    channel_size: usize,
) -> Result<RoomHandle, RoomError> {
    let rotation = Rotation::new(questions)?;
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room: Room::new(
            room_id.clone(),
            rotation,
            config,
            Box::new(RandomIds),
        ),
        timer: RoundTimer::new(),
        subscribers: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    Ok(RoomHandle {
        room_id,
        sender: tx,
    })
}
