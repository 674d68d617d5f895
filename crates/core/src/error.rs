// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for gs-core operations.

use thiserror::Error;

/// All possible errors that can occur in gs-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid protocol: '{0}'\n  hint: valid protocols are: rdp, vnc, ssh, telnet, kubernetes")]
    InvalidProtocol(String),

    #[error("malformed event envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("malformed event payload for '{kind}': {source}")]
    MalformedPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A specialized Result type for gs-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
