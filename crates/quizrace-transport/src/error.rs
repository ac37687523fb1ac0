/// Errors that can occur in the transport layer.
///
/// Protocol errors from the WebSocket layer are wrapped in
/// `std::io::Error` so the enum stays independent of the `websocket`
/// feature.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listener or accepting a connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// Sending a frame to the peer failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving a frame from the peer failed.
    ///
    /// A clean close is not an error; `recv` reports it as `Ok(None)`.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
