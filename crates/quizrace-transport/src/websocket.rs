//! WebSocket transport implementation using `tokio-tungstenite`.
//!
//! The socket is split into sink and stream halves behind separate
//! locks, so a task blocked in [`Connection::recv`] never starves a
//! concurrent [`Connection::send`] on a clone of the same connection.
//!
//! The listener also doubles as a health endpoint: a plain HTTP
//! `GET /health` on the same port is answered with `200 {"ok":true}`
//! and never reaches the WebSocket handshake. The route is decided by
//! peeking the request line on the raw TCP stream — the handshake
//! itself rejects non-upgrade requests outright, so the probe has to
//! be peeled off first.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, ConnectionId, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Request-line prefix that marks a health probe. The trailing space
/// keeps `/healthz` or other prefixed paths from matching.
const HEALTH_PREFIX: &[u8] = b"GET /health ";
const HEALTH_BODY: &str = "{\"ok\":true}";

/// Upper bound on how much request head a probe may send.
const MAX_PROBE_HEAD: usize = 8 * 1024;

/// A WebSocket-based [`Transport`] that listens for incoming connections.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Binds a new WebSocket transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket transport listening");
        Ok(Self { listener })
    }

    /// Returns the address the listener is bound to.
    ///
    /// Useful after binding to port 0 to learn the assigned port.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.listener
            .local_addr()
            .map_err(TransportError::AcceptFailed)
    }
}

/// Checks whether the pending request is a plain `GET /health` without
/// consuming any bytes. `peek` waits until the client has sent
/// something; the request line fits in the first segment, so a single
/// peek is enough to route on.
async fn is_health_probe(stream: &TcpStream) -> bool {
    let mut buf = [0u8; HEALTH_PREFIX.len()];
    match stream.peek(&mut buf).await {
        Ok(n) => n == HEALTH_PREFIX.len() && &buf[..] == HEALTH_PREFIX,
        Err(_) => false,
    }
}

/// Answers a health probe: drains the request head, writes the canned
/// response, and closes the connection.
async fn serve_health(mut stream: TcpStream) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 512];
    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n")
            || head.len() > MAX_PROBE_HEAD
        {
            break;
        }
    }

    let response = format!(
        "HTTP/1.1 200 OK\r\n\
         content-type: application/json\r\n\
         content-length: {}\r\n\
         connection: close\r\n\
         \r\n\
         {HEALTH_BODY}",
        HEALTH_BODY.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        loop {
            let (stream, addr) = self
                .listener
                .accept()
                .await
                .map_err(TransportError::AcceptFailed)?;

            if is_health_probe(&stream).await {
                if let Err(e) = serve_health(stream).await {
                    tracing::debug!(%addr, error = %e, "health probe failed");
                } else {
                    tracing::debug!(%addr, "served health probe");
                }
                continue;
            }

            let ws = tokio_tungstenite::accept_async(stream)
                .await
                .map_err(|e| {
                    TransportError::AcceptFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        e,
                    ))
                })?;

            let id = ConnectionId::new(
                NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            );
            tracing::debug!(%id, %addr, "accepted WebSocket connection");

            let (sink, source) = ws.split();
            return Ok(WebSocketConnection {
                id,
                sink: Arc::new(Mutex::new(sink)),
                source: Arc::new(Mutex::new(source)),
            });
        }
    }
}

/// A single WebSocket connection.
///
/// Clones share the underlying socket.
#[derive(Clone)]
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Arc<Mutex<WsSink>>,
    source: Arc<Mutex<WsSource>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let msg = Message::Text(
            String::from_utf8_lossy(data).into_owned().into(),
        );
        self.sink.lock().await.send(msg).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        loop {
            let msg = self.source.lock().await.next().await;
            match msg {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink.lock().await.close().await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
