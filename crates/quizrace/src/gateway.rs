//! Per-connection gateway: decode client events, route them to rooms,
//! and pump room broadcasts back out over the socket.
//!
//! Each accepted connection gets its own Tokio task running this
//! gateway. The connection owns one outbound event channel; joining a
//! room hands the room actor a clone of its sender, so everything the
//! connection sees (snapshots, chat, errors) flows through a single
//! ordered queue.

use std::collections::HashSet;
use std::sync::Arc;

use quizrace_protocol::{
    ClientEvent, Codec, RoomId, ServerEvent, UserId,
};
use quizrace_room::RoomError;
use quizrace_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::QuizraceError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), QuizraceError> {
    let conn_id = conn.id();
    let user_id = UserId::from(conn_id.to_string().as_str());
    tracing::debug!(%conn_id, "handling new connection");

    let (events_tx, mut events_rx) =
        mpsc::unbounded_channel::<ServerEvent>();
    let mut joined: HashSet<RoomId> = HashSet::new();

    loop {
        tokio::select! {
            outbound = events_rx.recv() => {
                // Never None: events_tx lives until this task ends.
                let Some(event) = outbound else { break };
                let bytes = state.codec.encode(&event)?;
                if conn.send(&bytes).await.is_err() {
                    break;
                }
            }

            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::debug!(
                            %user_id, "connection closed cleanly"
                        );
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%user_id, error = %e, "recv error");
                        break;
                    }
                };

                let event: ClientEvent = match state.codec.decode(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(
                            %user_id, error = %e,
                            "failed to decode client event"
                        );
                        continue;
                    }
                };

                handle_client_event(
                    &state, &user_id, event, &events_tx, &mut joined,
                )
                .await;
            }
        }
    }

    // The connection is gone: take the player out of every room they
    // joined. The rooms themselves live on.
    for room_id in joined {
        let handle = state.rooms.lock().await.get(&room_id);
        if let Some(handle) = handle {
            if let Err(e) = handle.leave(user_id.clone()).await {
                tracing::debug!(
                    %user_id, %room_id, error = %e, "leave failed"
                );
            }
        }
    }

    tracing::debug!(%conn_id, "connection handler finished");
    Ok(())
}

/// Routes one decoded client event.
async fn handle_client_event(
    state: &Arc<ServerState>,
    user_id: &UserId,
    event: ClientEvent,
    events_tx: &mpsc::UnboundedSender<ServerEvent>,
    joined: &mut HashSet<RoomId>,
) {
    match event {
        ClientEvent::Join { room_id, username } => {
            // Validate before touching the registry so a bad join
            // never creates a room.
            if room_id.is_empty() || username.is_empty() {
                send_error(events_tx, &RoomError::MissingJoinFields);
                return;
            }

            let handle = {
                let mut rooms = state.rooms.lock().await;
                rooms.get_or_create(&room_id)
            };
            let handle = match handle {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::warn!(
                        %room_id, error = %e, "room creation failed"
                    );
                    send_error(events_tx, &e);
                    return;
                }
            };

            match handle
                .join(user_id.clone(), username, events_tx.clone())
                .await
            {
                Ok(()) => {
                    tracing::info!(%user_id, %room_id, "joined room");
                    joined.insert(room_id);
                }
                Err(e) => send_error(events_tx, &e),
            }
        }

        ClientEvent::Chat { room_id, content } => {
            // Chat to a room that was never created is dropped, same
            // as chat from a non-member inside the room.
            let handle = state.rooms.lock().await.get(&room_id);
            let Some(handle) = handle else {
                tracing::debug!(
                    %user_id, %room_id, "chat to unknown room, ignoring"
                );
                return;
            };
            if let Err(e) = handle.chat(user_id.clone(), content).await {
                tracing::debug!(
                    %user_id, %room_id, error = %e, "chat failed"
                );
            }
        }
    }
}

/// Queues a `room:error` event on the connection's outbound channel.
fn send_error(
    events_tx: &mpsc::UnboundedSender<ServerEvent>,
    error: &RoomError,
) {
    let _ = events_tx.send(ServerEvent::Error {
        message: error.to_string(),
    });
}
