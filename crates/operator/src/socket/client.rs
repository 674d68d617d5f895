// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnecting socket client.
//!
//! One client owns one socket to one target URL. The [`SocketClient::read`]
//! loop runs as an independent task until its cancellation token fires,
//! redialing with backoff whenever the connection is lost.

use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::backoff::Backoff;

use super::transport::{SocketError, SocketResult, SocketTransport, WebSocketTransport};

/// Resilient socket client over one target URL.
///
/// Transport state lives behind an async mutex, so connect, close, and the
/// read loop are mutually exclusive.
pub struct SocketClient<T: SocketTransport = WebSocketTransport> {
    url: String,
    transport: Mutex<T>,
}

impl SocketClient<WebSocketTransport> {
    /// Creates a client with the default WebSocket transport.
    pub fn new(url: impl Into<String>) -> Self {
        SocketClient {
            url: url.into(),
            transport: Mutex::new(WebSocketTransport::new()),
        }
    }
}

impl<T: SocketTransport> SocketClient<T> {
    /// Creates a client with a custom transport (for testing).
    pub fn with_transport(url: impl Into<String>, transport: T) -> Self {
        SocketClient {
            url: url.into(),
            transport: Mutex::new(transport),
        }
    }

    /// Dials the target, closing any existing connection first.
    pub async fn connect(&self) -> SocketResult<()> {
        self.transport.lock().await.connect(&self.url).await
    }

    /// Closes the connection. Safe to call when already closed.
    pub async fn close(&self) {
        let _ = self.transport.lock().await.close().await;
    }

    /// Whether a connection is currently established.
    pub async fn is_connected(&self) -> bool {
        self.transport.lock().await.is_connected()
    }

    /// Reads frames from the socket until `token` is cancelled.
    ///
    /// Dial failures surface on `err_ch` and back off exponentially; a drop
    /// of a live connection surfaces on `err_ch` and redials immediately,
    /// without the dial-failure sleep. A normal closure from the peer ends
    /// the loop cleanly. Frames go to `data_ch`, whose bounded capacity
    /// provides per-target backpressure.
    pub async fn read(
        &self,
        token: CancellationToken,
        data_ch: mpsc::Sender<Vec<u8>>,
        err_ch: mpsc::Sender<SocketError>,
    ) {
        let mut backoff = Backoff::new();

        loop {
            if token.is_cancelled() {
                break;
            }

            let mut transport = self.transport.lock().await;

            if !transport.is_connected() {
                match transport.connect(&self.url).await {
                    Ok(()) => {
                        debug!(url = %self.url, "socket connected");
                        backoff.reset();
                    }
                    Err(err) => {
                        drop(transport);

                        if err_ch.send(err).await.is_err() {
                            break;
                        }

                        let delay = backoff.step();
                        tokio::select! {
                            _ = token.cancelled() => break,
                            _ = tokio::time::sleep(delay) => {}
                        }
                        continue;
                    }
                }
            }

            let frame = tokio::select! {
                _ = token.cancelled() => None,
                frame = transport.recv() => Some(frame),
            };

            let Some(frame) = frame else {
                // Cancelled mid-read; close before leaving the loop.
                let _ = transport.close().await;
                break;
            };
            drop(transport);

            match frame {
                Ok(Some(frame)) => {
                    if data_ch.send(frame).await.is_err() {
                        break;
                    }
                }
                // Normal closure ends the loop cleanly.
                Ok(None) => break,
                Err(err) => {
                    if err_ch.send(err).await.is_err() {
                        break;
                    }
                    // The transport dropped its connection; the next pass
                    // redials immediately, sleeping only if the dial fails.
                }
            }
        }
    }
}
