// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the resolver, sync, and permission tests.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use gs_core::path::ROOT;

use crate::client::{
    Api, ApiError, ApiFuture, ApiStatus, ChildConnection, ConnectionRequest, GroupRequest,
    GroupTree, PatchOp, PatchVerb, PrincipalKind,
};

/// Recorded calls and scripted behavior of the mock gateway.
pub struct MockState {
    /// The full group tree rooted at `ROOT`; creations mutate it so
    /// repeated calls observe a populated hierarchy.
    pub tree: GroupTree,
    pub users: Vec<String>,
    pub groups: Vec<String>,
    /// Permission sets per principal, mutated by applied patches.
    pub permissions: HashMap<(PrincipalKind, String), BTreeSet<String>>,

    pub update_status: ApiStatus,
    pub delete_status: ApiStatus,
    pub patch_status: ApiStatus,

    pub tree_requests: Vec<String>,
    pub created_groups: Vec<GroupRequest>,
    pub created_connections: Vec<ConnectionRequest>,
    pub updates: Vec<(String, ConnectionRequest)>,
    pub deletes: Vec<String>,
    pub patches: Vec<(PrincipalKind, String, Vec<PatchOp>)>,

    next_id: u32,
}

/// Mock gateway API with scripted state and recorded calls.
#[derive(Clone)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        MockApi {
            state: Arc::new(Mutex::new(MockState {
                tree: GroupTree {
                    identifier: ROOT.to_string(),
                    name: ROOT.to_string(),
                    ..GroupTree::default()
                },
                users: Vec::new(),
                groups: Vec::new(),
                permissions: HashMap::new(),
                update_status: ApiStatus::NoContent,
                delete_status: ApiStatus::NoContent,
                patch_status: ApiStatus::NoContent,
                tree_requests: Vec::new(),
                created_groups: Vec::new(),
                created_connections: Vec::new(),
                updates: Vec::new(),
                deletes: Vec::new(),
                patches: Vec::new(),
                next_id: 0,
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Seeds a group node under an existing parent.
    pub fn seed_group(&self, parent: &str, identifier: &str, name: &str) {
        let mut state = self.state();
        let node = find_mut(&mut state.tree, parent).unwrap();
        node.child_connection_groups
            .get_or_insert_with(Vec::new)
            .push(GroupTree {
                identifier: identifier.to_string(),
                name: name.to_string(),
                ..GroupTree::default()
            });
    }

    /// Seeds a connection under an existing group.
    pub fn seed_connection(&self, parent: &str, identifier: &str, name: &str) {
        let mut state = self.state();
        let node = find_mut(&mut state.tree, parent).unwrap();
        node.child_connections
            .get_or_insert_with(Vec::new)
            .push(ChildConnection {
                identifier: identifier.to_string(),
                name: name.to_string(),
            });
    }

    /// Seeds an existing permission of a principal on a connection.
    pub fn seed_permission(&self, kind: PrincipalKind, principal: &str, connection: &str) {
        self.state()
            .permissions
            .entry((kind, principal.to_string()))
            .or_default()
            .insert(connection.to_string());
    }
}

fn find_mut<'t>(node: &'t mut GroupTree, id: &str) -> Option<&'t mut GroupTree> {
    if node.identifier == id {
        return Some(node);
    }

    for child in node.child_connection_groups.as_mut()?.iter_mut() {
        if let Some(found) = find_mut(child, id) {
            return Some(found);
        }
    }

    None
}

fn find<'t>(node: &'t GroupTree, id: &str) -> Option<&'t GroupTree> {
    if node.identifier == id {
        return Some(node);
    }

    for child in node.child_connection_groups.as_ref()?.iter() {
        if let Some(found) = find(child, id) {
            return Some(found);
        }
    }

    None
}

/// Detaches a connection from whichever group currently holds it.
fn detach_connection(node: &mut GroupTree, id: &str) {
    if let Some(connections) = node.child_connections.as_mut() {
        connections.retain(|connection| connection.identifier != id);
    }

    if let Some(groups) = node.child_connection_groups.as_mut() {
        for child in groups.iter_mut() {
            detach_connection(child, id);
        }
    }
}

/// Applies the connection-level entries of a permission patch.
fn apply_patch(set: &mut BTreeSet<String>, patch: &[PatchOp]) {
    for op in patch {
        let Some(connection) = op.path.strip_prefix("/connectionPermissions/") else {
            continue;
        };

        match op.op {
            PatchVerb::Add => {
                set.insert(connection.to_string());
            }
            PatchVerb::Remove => {
                set.remove(connection);
            }
        }
    }
}

impl Api for MockApi {
    fn group_tree<'a>(&'a self, group_id: &'a str) -> ApiFuture<'a, GroupTree> {
        Box::pin(async move {
            let mut state = self.state();
            state.tree_requests.push(group_id.to_string());

            find(&state.tree, group_id)
                .cloned()
                .ok_or(ApiError::MissingPayload {
                    operation: "group tree",
                })
        })
    }

    fn create_group<'a>(&'a self, request: &'a GroupRequest) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let mut state = self.state();
            state.next_id += 1;
            let identifier = format!("G{}", state.next_id);

            state.created_groups.push(request.clone());
            let parent = find_mut(&mut state.tree, &request.parent_identifier).ok_or(
                ApiError::MissingPayload {
                    operation: "create group",
                },
            )?;
            parent
                .child_connection_groups
                .get_or_insert_with(Vec::new)
                .push(GroupTree {
                    identifier: identifier.clone(),
                    name: request.name.clone(),
                    ..GroupTree::default()
                });

            Ok(identifier)
        })
    }

    fn create_connection<'a>(&'a self, request: &'a ConnectionRequest) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let mut state = self.state();
            state.next_id += 1;
            let identifier = format!("C{}", state.next_id);

            state.created_connections.push(request.clone());
            let parent = find_mut(&mut state.tree, &request.parent_identifier).ok_or(
                ApiError::MissingPayload {
                    operation: "create connection",
                },
            )?;
            parent
                .child_connections
                .get_or_insert_with(Vec::new)
                .push(ChildConnection {
                    identifier: identifier.clone(),
                    name: request.name.clone(),
                });

            Ok(identifier)
        })
    }

    fn update_connection<'a>(
        &'a self,
        id: &'a str,
        request: &'a ConnectionRequest,
    ) -> ApiFuture<'a, ApiStatus> {
        Box::pin(async move {
            let mut state = self.state();
            state.updates.push((id.to_string(), request.clone()));

            let status = state.update_status;
            if status == ApiStatus::NoContent {
                // Reflect a move in the tree like the backend would.
                detach_connection(&mut state.tree, id);
                if let Some(parent) = find_mut(&mut state.tree, &request.parent_identifier) {
                    parent
                        .child_connections
                        .get_or_insert_with(Vec::new)
                        .push(ChildConnection {
                            identifier: id.to_string(),
                            name: request.name.clone(),
                        });
                }
            }

            Ok(status)
        })
    }

    fn delete_connection<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ApiStatus> {
        Box::pin(async move {
            let mut state = self.state();
            state.deletes.push(id.to_string());
            Ok(state.delete_status)
        })
    }

    fn list_principals(&self, kind: PrincipalKind) -> ApiFuture<'_, Vec<String>> {
        Box::pin(async move {
            let state = self.state();
            Ok(match kind {
                PrincipalKind::User => state.users.clone(),
                PrincipalKind::Group => state.groups.clone(),
            })
        })
    }

    fn principal_permissions<'a>(
        &'a self,
        kind: PrincipalKind,
        id: &'a str,
    ) -> ApiFuture<'a, BTreeSet<String>> {
        Box::pin(async move {
            let state = self.state();
            Ok(state
                .permissions
                .get(&(kind, id.to_string()))
                .cloned()
                .unwrap_or_default())
        })
    }

    fn modify_principal_permissions<'a>(
        &'a self,
        kind: PrincipalKind,
        id: &'a str,
        patch: Vec<PatchOp>,
    ) -> ApiFuture<'a, ApiStatus> {
        Box::pin(async move {
            let mut state = self.state();

            let status = state.patch_status;
            if status == ApiStatus::NoContent {
                let set = state
                    .permissions
                    .entry((kind, id.to_string()))
                    .or_default();
                apply_patch(set, &patch);
            }

            state.patches.push((kind, id.to_string(), patch));
            Ok(status)
        })
    }
}
