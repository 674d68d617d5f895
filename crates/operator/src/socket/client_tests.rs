// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the reconnecting socket client.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::client::SocketClient;
use super::transport::{SocketError, SocketResult, SocketTransport};

/// One scripted outcome of a `recv` call.
enum ReadAction {
    Frame(Vec<u8>),
    /// Normal closure.
    Eof,
    Fail,
}

/// Mock transport with scripted connect and read outcomes.
///
/// Once the read script runs dry, `recv` blocks forever, imitating an idle
/// connection waiting for the peer.
struct MockTransport {
    connected: bool,
    /// Outcomes of successive connect attempts; empty means success.
    connect_failures: Arc<Mutex<VecDeque<bool>>>,
    reads: Arc<Mutex<VecDeque<ReadAction>>>,
    connect_attempts: Arc<Mutex<u32>>,
}

impl MockTransport {
    fn new() -> Self {
        MockTransport {
            connected: false,
            connect_failures: Arc::new(Mutex::new(VecDeque::new())),
            reads: Arc::new(Mutex::new(VecDeque::new())),
            connect_attempts: Arc::new(Mutex::new(0)),
        }
    }

    fn script_connect_failures(&self, failures: &[bool]) {
        self.connect_failures
            .lock()
            .unwrap()
            .extend(failures.iter().copied());
    }

    fn script_reads(&self, actions: Vec<ReadAction>) {
        self.reads.lock().unwrap().extend(actions);
    }

    fn attempts_handle(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.connect_attempts)
    }
}

impl SocketTransport for MockTransport {
    fn connect(
        &mut self,
        _url: &str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = SocketResult<()>> + Send + '_>> {
        Box::pin(async move {
            *self.connect_attempts.lock().unwrap() += 1;

            let fail = self
                .connect_failures
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(false);

            if fail {
                self.connected = false;
                Err(SocketError::ConnectionFailed("mock dial failure".into()))
            } else {
                self.connected = true;
                Ok(())
            }
        })
    }

    fn recv(
        &mut self,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = SocketResult<Option<Vec<u8>>>> + Send + '_>,
    > {
        Box::pin(async move {
            let action = self.reads.lock().unwrap().pop_front();

            match action {
                Some(ReadAction::Frame(frame)) => Ok(Some(frame)),
                Some(ReadAction::Eof) => {
                    self.connected = false;
                    Ok(None)
                }
                Some(ReadAction::Fail) => {
                    self.connected = false;
                    Err(SocketError::ReadFailed("mock read failure".into()))
                }
                // Idle connection: block until cancelled.
                None => futures_util::future::pending().await,
            }
        })
    }

    fn close(
        &mut self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = SocketResult<()>> + Send + '_>> {
        Box::pin(async move {
            self.connected = false;
            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[tokio::test]
async fn read_delivers_frames_until_normal_closure() {
    let transport = MockTransport::new();
    transport.script_reads(vec![
        ReadAction::Frame(b"one".to_vec()),
        ReadAction::Frame(b"two".to_vec()),
        ReadAction::Eof,
    ]);

    let client = SocketClient::with_transport("ws://mock", transport);
    let (data_tx, mut data_rx) = mpsc::channel(8);
    let (err_tx, mut err_rx) = mpsc::channel(8);

    client.read(CancellationToken::new(), data_tx, err_tx).await;

    assert_eq!(data_rx.recv().await.unwrap(), b"one");
    assert_eq!(data_rx.recv().await.unwrap(), b"two");
    assert!(data_rx.recv().await.is_none());
    assert!(err_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn read_reports_dial_failures_and_retries() {
    let transport = MockTransport::new();
    transport.script_connect_failures(&[true, true]);
    transport.script_reads(vec![ReadAction::Frame(b"late".to_vec()), ReadAction::Eof]);
    let attempts = transport.attempts_handle();

    let client = SocketClient::with_transport("ws://mock", transport);
    let (data_tx, mut data_rx) = mpsc::channel(8);
    let (err_tx, mut err_rx) = mpsc::channel(8);

    client.read(CancellationToken::new(), data_tx, err_tx).await;

    // Two failures, then the third dial succeeded and delivered the frame.
    assert_eq!(*attempts.lock().unwrap(), 3);
    assert!(matches!(
        err_rx.recv().await.unwrap(),
        SocketError::ConnectionFailed(_)
    ));
    assert!(matches!(
        err_rx.recv().await.unwrap(),
        SocketError::ConnectionFailed(_)
    ));
    assert_eq!(data_rx.recv().await.unwrap(), b"late");
}

#[tokio::test]
async fn read_error_reconnects_without_sleeping() {
    let transport = MockTransport::new();
    transport.script_reads(vec![
        ReadAction::Fail,
        ReadAction::Frame(b"after-reconnect".to_vec()),
        ReadAction::Eof,
    ]);
    let attempts = transport.attempts_handle();

    let client = SocketClient::with_transport("ws://mock", transport);
    let (data_tx, mut data_rx) = mpsc::channel(8);
    let (err_tx, mut err_rx) = mpsc::channel(8);

    // No paused clock here: a live-connection drop must not sleep at all.
    client.read(CancellationToken::new(), data_tx, err_tx).await;

    assert!(matches!(
        err_rx.recv().await.unwrap(),
        SocketError::ReadFailed(_)
    ));
    assert_eq!(data_rx.recv().await.unwrap(), b"after-reconnect");
    assert_eq!(*attempts.lock().unwrap(), 2);
}

#[tokio::test]
async fn read_stops_on_cancellation() {
    let transport = MockTransport::new();
    // Empty read script: the connection stays idle forever.
    let client = Arc::new(SocketClient::with_transport("ws://mock", transport));

    let token = CancellationToken::new();
    let (data_tx, _data_rx) = mpsc::channel(1);
    let (err_tx, _err_rx) = mpsc::channel(1);

    let reader = {
        let client = Arc::clone(&client);
        let token = token.clone();
        tokio::spawn(async move {
            client.read(token, data_tx, err_tx).await;
        })
    };

    token.cancel();
    reader.await.unwrap();

    assert!(!client.is_connected().await);
}

#[tokio::test]
async fn close_is_idempotent() {
    let transport = MockTransport::new();
    let client = SocketClient::with_transport("ws://mock", transport);

    client.close().await;
    client.close().await;

    assert!(!client.is_connected().await);
}

#[tokio::test]
async fn connect_then_close_round_trip() {
    let transport = MockTransport::new();
    let client = SocketClient::with_transport("ws://mock", transport);

    client.connect().await.unwrap();
    assert!(client.is_connected().await);

    client.close().await;
    assert!(!client.is_connected().await);
}
