// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capability surface of the gateway REST API.
//!
//! The trait abstracts over the actual HTTP client, allowing the sync engine
//! and its helpers to be tested against mock implementations. Status-bearing
//! operations return an [`ApiStatus`] so the caller owns the decision of
//! which statuses are acceptable.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use gs_core::Protocol;

/// Error type for gateway API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level HTTP failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint refused to create or validate a session token.
    #[error("could not create or validate session token")]
    Token,

    /// A payload-bearing response arrived without its payload.
    #[error("{operation}: response missing expected payload")]
    MissingPayload { operation: &'static str },

    /// An unexpected HTTP status for an operation that requires a payload.
    #[error("{operation}: unexpected status {status}")]
    Status { operation: &'static str, status: u16 },
}

/// Result type for gateway API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Boxed future returned by [`Api`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send + 'a>>;

/// Outcome of a status-only gateway call.
///
/// Whether a given status is an error depends on the operation: a delete
/// treats `NotFound` as already-deleted success, an update does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    /// 204, the expected success status for mutations.
    NoContent,
    /// 404, the object does not exist.
    NotFound,
    /// Any other status code.
    Other(u16),
}

/// The two principal kinds of the gateway permission model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    /// An individual user account.
    User,
    /// A user group.
    Group,
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalKind::User => write!(f, "user"),
            PrincipalKind::Group => write!(f, "group"),
        }
    }
}

/// Group type discriminator on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupKind {
    /// Purely structural group with no balancing behavior.
    Organizational,
}

/// Request body for creating a connection group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    pub name: String,
    pub parent_identifier: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
}

impl GroupRequest {
    /// Builds a request for an organizational group under the given parent.
    pub fn organizational(name: &str, parent: &str) -> Self {
        GroupRequest {
            name: name.to_string(),
            parent_identifier: parent.to_string(),
            kind: GroupKind::Organizational,
        }
    }
}

/// Request body for creating or updating a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub name: String,
    pub protocol: Protocol,
    pub parent_identifier: String,
    /// Opaque protocol parameters, passed through unvalidated.
    pub parameters: serde_json::Value,
    /// Connection attributes; unused by the operator but required on update.
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// A connection entry inside a group tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildConnection {
    pub identifier: String,
    pub name: String,
}

/// Subtree of the connection group hierarchy.
///
/// Children are addressed by name; sibling names are not guaranteed unique,
/// in which case the first match is authoritative. The tree carries no back
/// references and is fetched fresh per resolution, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTree {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_connection_groups: Option<Vec<GroupTree>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_connections: Option<Vec<ChildConnection>>,
}

/// Permission level assigned and revoked by the operator.
const READ: &str = "READ";

/// Patch verb of a permission modification entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchVerb {
    Add,
    Remove,
}

/// One entry of a permission patch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOp {
    pub op: PatchVerb,
    pub path: String,
    pub value: String,
}

impl PatchOp {
    /// Adds READ permission on a connection.
    pub fn add_connection(id: &str) -> Self {
        PatchOp {
            op: PatchVerb::Add,
            path: format!("/connectionPermissions/{id}"),
            value: READ.to_string(),
        }
    }

    /// Removes READ permission from a connection.
    pub fn remove_connection(id: &str) -> Self {
        PatchOp {
            op: PatchVerb::Remove,
            path: format!("/connectionPermissions/{id}"),
            value: READ.to_string(),
        }
    }

    /// Adds READ permission on a connection group.
    pub fn add_group(id: &str) -> Self {
        PatchOp {
            op: PatchVerb::Add,
            path: format!("/connectionGroupPermissions/{id}"),
            value: READ.to_string(),
        }
    }
}

/// Capability surface of the gateway REST API consumed by the operator.
pub trait Api: Send + Sync {
    /// Fetches the full group subtree rooted at the given group.
    fn group_tree<'a>(&'a self, group_id: &'a str) -> ApiFuture<'a, GroupTree>;

    /// Creates a connection group, returning its backend identifier.
    fn create_group<'a>(&'a self, request: &'a GroupRequest) -> ApiFuture<'a, String>;

    /// Creates a connection, returning its backend identifier.
    fn create_connection<'a>(&'a self, request: &'a ConnectionRequest) -> ApiFuture<'a, String>;

    /// Updates a connection in place.
    fn update_connection<'a>(
        &'a self,
        id: &'a str,
        request: &'a ConnectionRequest,
    ) -> ApiFuture<'a, ApiStatus>;

    /// Deletes a connection.
    fn delete_connection<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ApiStatus>;

    /// Lists all principal identifiers of a kind.
    fn list_principals(&self, kind: PrincipalKind) -> ApiFuture<'_, Vec<String>>;

    /// Returns the connection identifiers a principal holds permissions on.
    fn principal_permissions<'a>(
        &'a self,
        kind: PrincipalKind,
        id: &'a str,
    ) -> ApiFuture<'a, BTreeSet<String>>;

    /// Applies a permission patch to a principal as a single atomic call.
    fn modify_principal_permissions<'a>(
        &'a self,
        kind: PrincipalKind,
        id: &'a str,
        patch: Vec<PatchOp>,
    ) -> ApiFuture<'a, ApiStatus>;
}
