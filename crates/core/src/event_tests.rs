// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    create = { "io.gatesync.user.success.create" },
    update = { "io.gatesync.user.success.update" },
    delete = { "io.gatesync.user.success.delete" },
)]
fn user_event_recognized_types(kind: &str) {
    let frame = format!(r#"{{"type": "{kind}", "data": {{"username": "alice"}}}}"#);
    let user = user_event(frame.as_bytes()).unwrap();
    assert_eq!(user.as_deref(), Some("alice"));
}

#[parameterized(
    failure = { "io.gatesync.user.failure.create" },
    connection = { "io.gatesync.connection.success.create" },
    unrelated = { "com.example.heartbeat" },
)]
fn user_event_ignores_other_types(kind: &str) {
    let frame = format!(r#"{{"type": "{kind}", "data": {{"username": "alice"}}}}"#);
    assert!(user_event(frame.as_bytes()).unwrap().is_none());
}

#[test]
fn user_event_malformed_envelope_is_error() {
    let err = user_event(b"not json").unwrap_err();
    assert!(matches!(err, crate::error::Error::MalformedEnvelope(_)));
}

#[test]
fn user_event_malformed_payload_is_error() {
    let frame = br#"{"type": "io.gatesync.user.success.create", "data": {"user": 42}}"#;
    let err = user_event(frame).unwrap_err();
    assert!(matches!(err, crate::error::Error::MalformedPayload { .. }));
}

#[test]
fn user_event_missing_data_is_error() {
    // A recognized type without a payload cannot yield a username.
    let frame = br#"{"type": "io.gatesync.user.success.delete"}"#;
    assert!(user_event(frame).is_err());
}
