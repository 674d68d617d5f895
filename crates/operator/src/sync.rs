// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection synchronization engine.
//!
//! One `sync` call is a synchronous sequence of gateway calls: resolve the
//! parent group path, find or create the connection, then reconcile its
//! permissions. The call is idempotent; re-invoking it with an unchanged
//! desired state creates nothing new and converges to the same observed
//! state. A crash mid-sync leaves partial state behind and recovery relies
//! on the next idempotent re-invocation, not on compensation logic.

use tracing::{debug, info};

use gs_core::{DesiredConnection, ObservedConnection};

use crate::client::{Api, ApiError, ApiStatus, ConnectionRequest, PrincipalKind};
use crate::permissions::{PermissionError, PermissionSync};
use crate::resolver;

/// Error type for sync engine operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Gateway API failure.
    #[error("gateway api error: {0}")]
    Api(#[from] ApiError),

    /// Permission reconciliation failure.
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// The gateway rejected the connection update.
    #[error("could not update connection '{0}'")]
    UpdateFailed(String),

    /// The gateway rejected the connection delete.
    #[error("could not delete connection '{0}'")]
    DeleteFailed(String),
}

/// Result type for sync engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Synchronizes connection resources against the gateway.
pub struct SyncEngine<A: Api> {
    api: A,
    /// The synchronizing account, excluded from permission discovery.
    username: String,
}

impl<A: Api> SyncEngine<A> {
    /// Creates an engine over the given API client.
    pub fn new(api: A, username: impl Into<String>) -> Self {
        SyncEngine {
            api,
            username: username.into(),
        }
    }

    /// Synchronizes one connection resource.
    ///
    /// `observed` is updated after every successful remote mutation, so an
    /// error part-way through leaves it describing what actually exists.
    pub async fn sync(
        &self,
        desired: &DesiredConnection,
        observed: &mut ObservedConnection,
    ) -> SyncResult<()> {
        // The parameter document is an unvalidated passthrough; absent means
        // empty.
        let parameters = desired
            .parameters
            .clone()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let (parent, ancestors) = resolver::resolve(&self.api, &desired.parent).await?;

        let mut existing = self.connection_in_group(&parent, &desired.name).await?;

        // A changed parent means the connection may still live under the old
        // group. An old-parent match is the authoritative identity so the
        // object is moved instead of duplicated.
        if let Some(old_parent) = observed.parent.as_deref() {
            if old_parent != parent {
                if let Some(identifier) =
                    self.connection_in_group(old_parent, &desired.name).await?
                {
                    existing = Some(identifier);
                }
            }
        }

        let request = ConnectionRequest {
            name: desired.name.clone(),
            protocol: desired.protocol,
            parent_identifier: parent.clone(),
            parameters,
            attributes: serde_json::Map::new(),
        };

        let identifier = match existing {
            Some(identifier) => {
                // The update can fail when the connection changed its parent
                // and the new group already holds one with the same name.
                // That twin may be managed elsewhere, so fail instead of
                // deleting or modifying it here.
                let status = self.api.update_connection(&identifier, &request).await?;
                if status != ApiStatus::NoContent {
                    return Err(SyncError::UpdateFailed(desired.name.clone()));
                }

                debug!(name = %desired.name, %identifier, "connection updated");
                identifier
            }
            None => {
                let identifier = self.api.create_connection(&request).await?;
                info!(name = %desired.name, %identifier, parent = %parent, "connection created");
                identifier
            }
        };

        observed.identifier = Some(identifier.clone());
        observed.parent = Some(parent);

        let permissions = PermissionSync::new(&self.api, &self.username);
        permissions
            .apply(
                PrincipalKind::User,
                &identifier,
                &desired.permissions.users,
                &ancestors,
            )
            .await?;
        permissions
            .apply(
                PrincipalKind::Group,
                &identifier,
                &desired.permissions.groups,
                &ancestors,
            )
            .await?;

        Ok(())
    }

    /// Deletes the connection a resource points at.
    ///
    /// Without a recorded identifier there is nothing to do. A not-found
    /// response means the object is already gone and counts as success; the
    /// caller clears the observed state afterwards.
    pub async fn delete(&self, observed: &ObservedConnection) -> SyncResult<()> {
        let Some(identifier) = observed.identifier.as_deref() else {
            return Ok(());
        };

        match self.api.delete_connection(identifier).await? {
            ApiStatus::NoContent => {
                info!(%identifier, "connection deleted");
                Ok(())
            }
            ApiStatus::NotFound => Ok(()),
            ApiStatus::Other(_) => Err(SyncError::DeleteFailed(identifier.to_string())),
        }
    }

    /// Looks a connection up by name among a group's children.
    async fn connection_in_group(
        &self,
        parent: &str,
        name: &str,
    ) -> SyncResult<Option<String>> {
        let tree = self.api.group_tree(parent).await?;

        let identifier = tree
            .child_connections
            .unwrap_or_default()
            .into_iter()
            .find(|connection| connection.name == name)
            .map(|connection| connection.identifier);

        Ok(identifier)
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
