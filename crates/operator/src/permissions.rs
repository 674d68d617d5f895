// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Permission reconciliation for a connection.
//!
//! The requested principal set is compared with the current one using plain
//! set difference; grants and revocations then go out one principal at a
//! time, one patch call each. Grants cover the connection and every
//! ancestor group, because the gateway does not propagate permissions up
//! the tree. Ancestor grants are never revoked (see [`PermissionSync::revoke`]).

use std::collections::BTreeSet;

use tracing::debug;

use crate::client::{Api, ApiError, ApiStatus, PatchOp, PrincipalKind};

/// Error type for permission operations.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    /// Gateway API failure.
    #[error("gateway api error: {0}")]
    Api(#[from] ApiError),

    /// The grant patch was rejected.
    #[error("could not add permissions of {kind} '{principal}' on connection '{connection}'")]
    Grant {
        kind: PrincipalKind,
        principal: String,
        connection: String,
    },

    /// The revoke patch was rejected.
    #[error("could not remove permissions of {kind} '{principal}' on connection '{connection}'")]
    Revoke {
        kind: PrincipalKind,
        principal: String,
        connection: String,
    },
}

/// Result type for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;

/// Computes the additions and removals turning `current` into `requested`.
///
/// Both results are empty when the sets are equal. Ordering within each
/// result is immaterial; the sets are disjoint by construction.
pub fn diff(requested: &BTreeSet<String>, current: &BTreeSet<String>) -> (Vec<String>, Vec<String>) {
    let to_add = requested.difference(current).cloned().collect();
    let to_remove = current.difference(requested).cloned().collect();
    (to_add, to_remove)
}

/// Reconciles the permission set of one connection against the gateway.
pub struct PermissionSync<'a, A: Api + ?Sized> {
    api: &'a A,
    /// The synchronizing account; excluded from user discovery so the
    /// operator never revokes its own access.
    username: &'a str,
}

impl<'a, A: Api + ?Sized> PermissionSync<'a, A> {
    pub fn new(api: &'a A, username: &'a str) -> Self {
        PermissionSync { api, username }
    }

    /// Brings the principals of `kind` holding READ on `connection` in line
    /// with `requested`.
    pub async fn apply(
        &self,
        kind: PrincipalKind,
        connection: &str,
        requested: &BTreeSet<String>,
        ancestors: &[String],
    ) -> PermissionResult<()> {
        let current = self.current(kind, connection).await?;
        let (to_add, to_remove) = diff(requested, &current);

        debug!(
            %kind,
            connection,
            additions = to_add.len(),
            removals = to_remove.len(),
            "reconciling permissions"
        );

        for principal in &to_add {
            self.grant(kind, principal, connection, ancestors).await?;
        }

        for principal in &to_remove {
            self.revoke(kind, principal, connection).await?;
        }

        Ok(())
    }

    /// Discovers the principals currently holding permissions on the
    /// connection.
    ///
    /// The API cannot answer "who can read this connection" directly, so
    /// every principal of the kind is probed individually.
    ///
    /// TODO: Optimize the discovery once the gateway grows a reverse
    /// permission lookup.
    async fn current(&self, kind: PrincipalKind, connection: &str) -> PermissionResult<BTreeSet<String>> {
        let mut current = BTreeSet::new();

        for principal in self.api.list_principals(kind).await? {
            if kind == PrincipalKind::User && principal == self.username {
                continue;
            }

            let permissions = self.api.principal_permissions(kind, &principal).await?;
            if permissions.contains(connection) {
                current.insert(principal);
            }
        }

        Ok(current)
    }

    /// Grants READ on the connection and all its ancestor groups in a
    /// single patch call.
    async fn grant(
        &self,
        kind: PrincipalKind,
        principal: &str,
        connection: &str,
        ancestors: &[String],
    ) -> PermissionResult<()> {
        let mut patch = vec![PatchOp::add_connection(connection)];

        // The gateway does not propagate permissions up the tree; without
        // the ancestor grants the principal could not reach the connection.
        for group in ancestors {
            patch.push(PatchOp::add_group(group));
        }

        let status = self
            .api
            .modify_principal_permissions(kind, principal, patch)
            .await?;

        if status != ApiStatus::NoContent {
            return Err(PermissionError::Grant {
                kind,
                principal: principal.to_string(),
                connection: connection.to_string(),
            });
        }

        Ok(())
    }

    /// Revokes READ on the connection only.
    ///
    /// Ancestor group grants are left in place: a sibling connection under
    /// the same group may still depend on them.
    ///
    /// TODO: Revoke ancestor grants once per-group grant usage is tracked
    /// across connections.
    async fn revoke(
        &self,
        kind: PrincipalKind,
        principal: &str,
        connection: &str,
    ) -> PermissionResult<()> {
        let patch = vec![PatchOp::remove_connection(connection)];

        let status = self
            .api
            .modify_principal_permissions(kind, principal, patch)
            .await?;

        if status != ApiStatus::NoContent {
            return Err(PermissionError::Revoke {
                kind,
                principal: principal.to_string(),
                connection: connection.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
