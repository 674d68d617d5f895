// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire event envelope produced by the gateway's event extension.
//!
//! Events arrive as a JSON envelope with a `type` string and a `data`
//! object. Only successful user lifecycle events are of interest; everything
//! else is dropped without error.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Recognized user lifecycle event types.
const USER_EVENT_TYPES: [&str; 3] = [
    "io.gatesync.user.success.create",
    "io.gatesync.user.success.update",
    "io.gatesync.user.success.delete",
];

/// Wire envelope wrapping every gateway event.
#[derive(Debug, Deserialize)]
struct Envelope {
    /// Reverse-DNS event type.
    #[serde(rename = "type")]
    kind: String,

    /// Type-specific payload.
    #[serde(default)]
    data: serde_json::Value,
}

/// Payload of a user lifecycle event.
#[derive(Debug, Deserialize)]
struct UserData {
    /// Username the event refers to.
    username: String,
}

/// A decoded user lifecycle event, tagged with the gateway instance that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEvent {
    /// Namespace of the gateway instance.
    pub namespace: String,
    /// Name of the gateway instance.
    pub name: String,
    /// Username the event refers to.
    pub username: String,
}

/// Extracts the username from a raw frame if it is a recognized user
/// lifecycle event.
///
/// Returns `Ok(None)` for well-formed envelopes of any other type. A
/// malformed envelope or payload is an error.
pub fn user_event(frame: &[u8]) -> Result<Option<String>> {
    let envelope: Envelope =
        serde_json::from_slice(frame).map_err(Error::MalformedEnvelope)?;

    if !USER_EVENT_TYPES.contains(&envelope.kind.as_str()) {
        return Ok(None);
    }

    let user: UserData =
        serde_json::from_value(envelope.data).map_err(|source| Error::MalformedPayload {
            kind: envelope.kind,
            source,
        })?;

    Ok(Some(user.username))
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
