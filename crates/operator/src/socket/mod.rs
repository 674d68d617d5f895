// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resilient WebSocket client module.
//!
//! Provides a single-socket client that reconnects with bounded backoff.
//!
//! # Features
//!
//! - One socket per client, dialed and torn down repeatedly over the
//!   client's lifetime
//! - Exponential, jittered backoff on dial failures; immediate redial on a
//!   live-connection drop
//! - Cooperative cancellation of the blocking read
//! - Injectable transport trait for testing

mod client;
mod transport;

pub use client::SocketClient;
pub use transport::{SocketError, SocketResult, SocketTransport, WebSocketTransport};

#[cfg(test)]
mod client_tests;
