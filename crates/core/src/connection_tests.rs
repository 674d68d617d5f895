// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    rdp_lower = { "rdp", Protocol::Rdp },
    vnc_lower = { "vnc", Protocol::Vnc },
    ssh_lower = { "ssh", Protocol::Ssh },
    telnet_lower = { "telnet", Protocol::Telnet },
    kubernetes_lower = { "kubernetes", Protocol::Kubernetes },
    rdp_upper = { "RDP", Protocol::Rdp },
    ssh_mixed = { "Ssh", Protocol::Ssh },
)]
fn protocol_from_str_valid(input: &str, expected: Protocol) {
    assert_eq!(input.parse::<Protocol>().unwrap(), expected);
}

#[parameterized(
    invalid = { "spice" },
    empty = { "" },
)]
fn protocol_from_str_invalid(input: &str) {
    assert!(input.parse::<Protocol>().is_err());
}

#[parameterized(
    rdp = { Protocol::Rdp, "rdp" },
    vnc = { Protocol::Vnc, "vnc" },
    ssh = { Protocol::Ssh, "ssh" },
    telnet = { Protocol::Telnet, "telnet" },
    kubernetes = { Protocol::Kubernetes, "kubernetes" },
)]
fn protocol_as_str(protocol: Protocol, expected: &str) {
    assert_eq!(protocol.as_str(), expected);
    assert_eq!(protocol.to_string(), expected);
}

#[test]
fn protocol_serializes_lowercase() {
    let json = serde_json::to_string(&Protocol::Kubernetes).unwrap();
    assert_eq!(json, "\"kubernetes\"");
}

#[test]
fn desired_connection_defaults() {
    let desired: DesiredConnection =
        serde_json::from_str(r#"{"name": "jump-host", "protocol": "ssh"}"#).unwrap();

    assert_eq!(desired.parent, "/");
    assert!(desired.parameters.is_none());
    assert!(desired.permissions.users.is_empty());
    assert!(desired.permissions.groups.is_empty());
}

#[test]
fn observed_connection_starts_empty() {
    let observed = ObservedConnection::default();
    assert!(observed.identifier.is_none());
    assert!(observed.parent.is_none());
}

#[test]
fn permissions_sets_deduplicate() {
    let permissions: Permissions =
        serde_json::from_str(r#"{"users": ["alice", "alice", "bob"]}"#).unwrap();
    assert_eq!(permissions.users.len(), 2);
}
