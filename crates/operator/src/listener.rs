// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-target event listener.
//!
//! Owns one reconnecting [`SocketClient`] per monitored gateway instance
//! and fans their frames into a single channel of decoded user lifecycle
//! events. Each target gets its own read task and capacity-1 channels; the
//! dispatch loop polls every target without ever blocking on one of them,
//! so a slow or dead gateway cannot stall the others.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use gs_core::{user_event, UserEvent};

use crate::socket::{SocketClient, SocketError};

/// Delay between dispatch sweeps when no target had anything ready.
const IDLE_SWEEP: std::time::Duration = std::time::Duration::from_millis(10);

/// Error type for listener operations, tagged with the owning target.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Socket-level failure of one target; informational, the socket
    /// retries on its own.
    #[error("{name} in {namespace}: {source}")]
    Socket {
        namespace: String,
        name: String,
        #[source]
        source: SocketError,
    },

    /// A frame from one target could not be decoded.
    #[error("{name} in {namespace}: {source}")]
    Decode {
        namespace: String,
        name: String,
        #[source]
        source: gs_core::Error,
    },
}

/// Identity of a monitored gateway instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TargetId {
    namespace: String,
    name: String,
}

/// A monitored gateway instance and its channels.
struct Target {
    socket: Arc<SocketClient>,
    /// Receivers are polled only by the dispatch loop; the mutex exists to
    /// keep `Target` shareable behind the registry lock.
    data_rx: Mutex<mpsc::Receiver<Vec<u8>>>,
    err_rx: Mutex<mpsc::Receiver<SocketError>>,
    cancel: CancellationToken,
}

/// Event listener over a set of monitored gateway instances.
#[derive(Default)]
pub struct Listener {
    /// Registration and removal are rare and take the write lock; the
    /// dispatch loop takes the read lock per target, never across a whole
    /// sweep.
    targets: RwLock<HashMap<TargetId, Target>>,
}

impl Listener {
    pub fn new() -> Self {
        Listener {
            targets: RwLock::new(HashMap::new()),
        }
    }

    /// Starts monitoring a gateway instance. No-op if already tracked.
    pub async fn add(&self, namespace: &str, name: &str, url: &str) {
        let id = TargetId {
            namespace: namespace.to_string(),
            name: name.to_string(),
        };

        let mut targets = self.targets.write().await;
        if targets.contains_key(&id) {
            return;
        }

        let cancel = CancellationToken::new();
        let (data_tx, data_rx) = mpsc::channel(1);
        let (err_tx, err_rx) = mpsc::channel(1);
        let socket = Arc::new(SocketClient::new(url));

        let read_socket = Arc::clone(&socket);
        let read_cancel = cancel.clone();
        tokio::spawn(async move {
            read_socket.read(read_cancel, data_tx, err_tx).await;
        });

        info!(namespace, name, url, "target added");
        targets.insert(
            id,
            Target {
                socket,
                data_rx: Mutex::new(data_rx),
                err_rx: Mutex::new(err_rx),
                cancel,
            },
        );
    }

    /// Stops monitoring a gateway instance and closes its socket. No-op if
    /// untracked.
    pub async fn remove(&self, namespace: &str, name: &str) {
        let id = TargetId {
            namespace: namespace.to_string(),
            name: name.to_string(),
        };

        let mut targets = self.targets.write().await;
        let Some(target) = targets.remove(&id) else {
            return;
        };

        target.cancel.cancel();
        target.socket.close().await;
        info!(namespace, name, "target removed");
    }

    /// Number of currently tracked targets.
    pub async fn tracked(&self) -> usize {
        self.targets.read().await.len()
    }

    /// Dispatches events from all tracked targets until `token` fires.
    ///
    /// Recognized user lifecycle events go to `event_ch`; socket and decode
    /// failures go to `err_ch` tagged with the owning target. Unrecognized
    /// event types are dropped silently. On cancellation every tracked
    /// client is cancelled and closed, then `done_ch` is signalled exactly
    /// once.
    pub async fn listen(
        &self,
        token: CancellationToken,
        event_ch: mpsc::Sender<UserEvent>,
        err_ch: mpsc::Sender<ListenerError>,
        done_ch: oneshot::Sender<()>,
    ) {
        while !token.is_cancelled() {
            let ids: Vec<TargetId> = self.targets.read().await.keys().cloned().collect();
            let mut idle = true;

            for id in ids {
                let targets = self.targets.read().await;
                let Some(target) = targets.get(&id) else {
                    // Removed between the snapshot and this iteration.
                    continue;
                };

                if let Some(frame) = {
                    let mut data_rx = target.data_rx.lock().await;
                    data_rx.try_recv().ok()
                } {
                    idle = false;

                    match user_event(&frame) {
                        Ok(Some(username)) => {
                            let event = UserEvent {
                                namespace: id.namespace.clone(),
                                name: id.name.clone(),
                                username,
                            };
                            debug!(namespace = %id.namespace, name = %id.name, "user event");
                            let _ = event_ch.send(event).await;
                        }
                        // Not a user lifecycle event; drop without error.
                        Ok(None) => {}
                        Err(source) => {
                            let _ = err_ch
                                .send(ListenerError::Decode {
                                    namespace: id.namespace.clone(),
                                    name: id.name.clone(),
                                    source,
                                })
                                .await;
                        }
                    }
                }

                if let Some(source) = {
                    let mut err_rx = target.err_rx.lock().await;
                    err_rx.try_recv().ok()
                } {
                    idle = false;

                    let _ = err_ch
                        .send(ListenerError::Socket {
                            namespace: id.namespace.clone(),
                            name: id.name.clone(),
                            source,
                        })
                        .await;
                }
            }

            if idle {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(IDLE_SWEEP) => {}
                }
            }
        }

        // Tear every read task down before signalling completion.
        let targets = self.targets.read().await;
        for target in targets.values() {
            target.cancel.cancel();
            target.socket.close().await;
        }
        drop(targets);

        let _ = done_ch.send(());
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
