//! `QuizraceServer` builder and accept loop.
//!
//! This is the entry point for running a trivia server. It ties the
//! layers together: transport → protocol → rooms.

use std::sync::Arc;

use quizrace_protocol::{JsonCodec, Question};
use quizrace_room::{RoomConfig, RoomRegistry};
use quizrace_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::gateway::handle_connection;
use crate::QuizraceError;

/// Shared server state passed to each connection gateway task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry sits behind a `Mutex`, which makes room creation atomic:
/// two connections joining a fresh room id at once still end up in the
/// same room actor.
pub(crate) struct ServerState {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Quizrace server.
///
/// # Example
///
/// ```rust,ignore
/// let server = QuizraceServer::builder()
///     .bind("0.0.0.0:3000")
///     .questions(deck)
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct QuizraceServerBuilder {
    bind_addr: String,
    questions: Vec<Question>,
    room_config: RoomConfig,
}

impl QuizraceServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            questions: Vec::new(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the question deck every room rotates through.
    ///
    /// An empty deck is accepted here but makes every join fail when
    /// its room is first created.
    pub fn questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    /// Sets the room configuration (round delay, points).
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`, matching the wire
    /// contract browser clients speak.
    pub async fn build(self) -> Result<QuizraceServer, QuizraceError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::new(
                self.questions,
                self.room_config,
            )),
            codec: JsonCodec,
        });

        Ok(QuizraceServer { transport, state })
    }
}

impl Default for QuizraceServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Quizrace server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct QuizraceServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl QuizraceServer {
    /// Creates a new builder.
    pub fn builder() -> QuizraceServerBuilder {
        QuizraceServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, QuizraceError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a gateway task for each
    /// one. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), QuizraceError> {
        tracing::info!("Quizrace server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
