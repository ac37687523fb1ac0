//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on a random port and drive it with a
//! tokio-tungstenite client (plus a raw TCP client for the health
//! probe) to verify that frames actually flow over the network.

#[cfg(feature = "websocket")]
mod websocket {
    use quizrace_transport::{Connection, Transport, WebSocketTransport};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds on a random port and returns the transport plus the
    /// address clients should dial.
    async fn bind() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport
            .local_addr()
            .expect("should have local addr")
            .to_string();
        (transport, addr)
    }

    async fn connect_client(addr: &str) -> ClientWs {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    #[tokio::test]
    async fn test_accept_and_send_receive() {
        let (mut transport, addr) = bind().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");
        assert!(server_conn.id().into_inner() > 0);

        // Server to client: JSON goes out as a text frame.
        server_conn
            .send(b"{\"type\":\"room:error\"}")
            .await
            .expect("send should succeed");

        use futures_util::StreamExt;
        let msg = client_ws.next().await.unwrap().unwrap();
        assert!(msg.is_text());
        assert_eq!(msg.into_data().as_ref(), b"{\"type\":\"room:error\"}");

        // Client to server, as text and as binary.
        use futures_util::SinkExt;
        use tokio_tungstenite::tungstenite::Message;
        client_ws
            .send(Message::Text("hello as text".into()))
            .await
            .unwrap();
        client_ws
            .send(Message::Binary(b"hello as bytes".to_vec().into()))
            .await
            .unwrap();

        let first = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(first, b"hello as text");
        let second = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(second, b"hello as bytes");

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (mut transport, addr) = bind().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        use futures_util::SinkExt;
        use tokio_tungstenite::tungstenite::Message;
        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_send_while_recv_is_pending() {
        let (mut transport, addr) = bind().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        // Park one clone in recv (nothing inbound yet), then send from
        // another clone. With a single connection lock this deadlocks.
        let receiver = server_conn.clone();
        let recv_task =
            tokio::spawn(async move { receiver.recv().await });

        server_conn.send(b"outbound while waiting").await.unwrap();

        use futures_util::{SinkExt, StreamExt};
        use tokio_tungstenite::tungstenite::Message;
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"outbound while waiting");

        client_ws
            .send(Message::Text("reply".into()))
            .await
            .unwrap();
        let received = recv_task.await.unwrap().unwrap().unwrap();
        assert_eq!(received, b"reply");
    }

    /// Sends one plain HTTP health probe and returns the full response.
    async fn probe_health(addr: &str) -> String {
        let mut raw = tokio::net::TcpStream::connect(addr)
            .await
            .expect("tcp connect");
        raw.write_all(
            format!(
                "GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
            )
            .as_bytes(),
        )
        .await
        .expect("write request");

        let mut response = Vec::new();
        raw.read_to_end(&mut response).await.expect("read response");
        String::from_utf8_lossy(&response).into_owned()
    }

    #[tokio::test]
    async fn test_health_probe_is_answered_and_skipped() {
        let (mut transport, addr) = bind().await;

        // The accept loop should swallow every probe and resolve with
        // the real WebSocket connection that follows them.
        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        for _ in 0..2 {
            let response = probe_health(&addr).await;
            assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
            assert!(
                response.contains("content-type: application/json"),
                "got: {response}"
            );
            assert!(response.contains("{\"ok\":true}"), "got: {response}");
        }

        // A real client still gets through on the same listener.
        let _client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();
        assert!(server_conn.id().into_inner() > 0);
    }
}
