// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core connection types for the gatesync operator.
//!
//! This module contains the desired and observed state of a connection
//! resource as seen by the sync engine. The desired state is owned by the
//! external control loop; the observed state is mutated only after a
//! successful remote call and cleared by the caller after a delete.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Remote desktop protocol of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Remote Desktop Protocol.
    Rdp,
    /// Virtual Network Computing.
    Vnc,
    /// Secure Shell.
    Ssh,
    Telnet,
    /// Attachment to a Kubernetes pod terminal.
    Kubernetes,
}

impl Protocol {
    /// Returns the string representation used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Rdp => "rdp",
            Protocol::Vnc => "vnc",
            Protocol::Ssh => "ssh",
            Protocol::Telnet => "telnet",
            Protocol::Kubernetes => "kubernetes",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rdp" => Ok(Protocol::Rdp),
            "vnc" => Ok(Protocol::Vnc),
            "ssh" => Ok(Protocol::Ssh),
            "telnet" => Ok(Protocol::Telnet),
            "kubernetes" => Ok(Protocol::Kubernetes),
            _ => Err(Error::InvalidProtocol(s.to_string())),
        }
    }
}

/// Principals that should hold READ permission on a connection.
///
/// Both sets contain backend principal identifiers, unordered and without
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// User principal identifiers.
    #[serde(default)]
    pub users: BTreeSet<String>,

    /// User-group principal identifiers.
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

/// Desired state of a connection resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesiredConnection {
    /// Connection name, unique within its parent group.
    pub name: String,

    /// Protocol spoken by the remote endpoint.
    pub protocol: Protocol,

    /// Slash-delimited group path under which the connection lives.
    ///
    /// Defaults to the hierarchy root.
    #[serde(default = "default_parent")]
    pub parent: String,

    /// Opaque protocol parameters, passed through to the backend unvalidated.
    ///
    /// Validation is the backend's responsibility, not this engine's.
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,

    /// Principals to grant READ permission on the connection.
    #[serde(default)]
    pub permissions: Permissions,
}

fn default_parent() -> String {
    "/".to_string()
}

/// Observed state of a connection resource.
///
/// `identifier` absent means no remote object exists under this operator's
/// control; present, it must correspond to a real backend object unless a
/// prior delete already succeeded, in which case the caller clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedConnection {
    /// Backend-assigned connection identifier.
    pub identifier: Option<String>,

    /// Identifier of the group the connection was last synced under.
    pub parent: Option<String>,
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
