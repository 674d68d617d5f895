// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the reconnecting socket client.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;

/// Error type for socket transport operations.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    /// Dial failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The peer closed the connection with a non-normal close code.
    #[error("connection closed abnormally: code {0}")]
    AbnormalClosure(u16),

    /// Read failed on a live connection.
    #[error("read failed: {0}")]
    ReadFailed(String),
}

/// Result type for socket transport operations.
pub type SocketResult<T> = Result<T, SocketError>;

/// Transport trait for a message-framed socket.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait SocketTransport: Send {
    /// Connect to the target URL, closing any existing connection first.
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = SocketResult<()>> + Send + '_>>;

    /// Receive the next frame.
    ///
    /// Returns `None` when the connection ended with a normal closure.
    fn recv(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = SocketResult<Option<Vec<u8>>>> + Send + '_>>;

    /// Close the connection. Idempotent.
    fn close(&mut self) -> Pin<Box<dyn Future<Output = SocketResult<()>> + Send + '_>>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// WebSocket transport implementation using tokio-tungstenite.
#[derive(Default)]
pub struct WebSocketTransport {
    /// The WebSocket connection, if connected.
    ws: Option<WsStream>,
}

impl WebSocketTransport {
    /// Create a new, unconnected WebSocket transport.
    pub fn new() -> Self {
        WebSocketTransport { ws: None }
    }
}

impl SocketTransport for WebSocketTransport {
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = SocketResult<()>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            // Idempotently drop a live connection before dialing again.
            if let Some(mut ws) = self.ws.take() {
                let _ = ws.close(None).await;
            }

            let (ws, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| SocketError::ConnectionFailed(e.to_string()))?;

            self.ws = Some(ws);
            Ok(())
        })
    }

    fn recv(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = SocketResult<Option<Vec<u8>>>> + Send + '_>> {
        Box::pin(async move {
            use futures_util::StreamExt;
            use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
            use tokio_tungstenite::tungstenite::Message;

            let ws = match self.ws.as_mut() {
                Some(ws) => ws,
                None => return Ok(None),
            };

            loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Ok(Some(text.as_bytes().to_vec()));
                    }
                    Some(Ok(Message::Binary(data))) => {
                        return Ok(Some(data.to_vec()));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let code = frame.map(|f| f.code);
                        self.ws = None;

                        return match code {
                            None | Some(CloseCode::Normal) => Ok(None),
                            Some(code) => Err(SocketError::AbnormalClosure(code.into())),
                        };
                    }
                    Some(Ok(_)) => {
                        // Ping/pong and raw frames carry no events.
                        continue;
                    }
                    Some(Err(e)) => {
                        self.ws = None;
                        return Err(SocketError::ReadFailed(e.to_string()));
                    }
                    None => {
                        self.ws = None;
                        return Ok(None);
                    }
                }
            }
        })
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = SocketResult<()>> + Send + '_>> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                let _ = ws.close(None).await;
            }
            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}
