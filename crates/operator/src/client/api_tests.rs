// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the wire types of the gateway API.

#![allow(clippy::unwrap_used)]

use super::api::*;
use gs_core::Protocol;

#[test]
fn group_request_serializes_camel_case() {
    let request = GroupRequest::organizational("lab", "ROOT");
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "name": "lab",
            "parentIdentifier": "ROOT",
            "type": "ORGANIZATIONAL",
        })
    );
}

#[test]
fn connection_request_serializes_camel_case() {
    let request = ConnectionRequest {
        name: "db".to_string(),
        protocol: Protocol::Ssh,
        parent_identifier: "G1".to_string(),
        parameters: serde_json::json!({"hostname": "db0"}),
        attributes: serde_json::Map::new(),
    };
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["protocol"], "ssh");
    assert_eq!(json["parentIdentifier"], "G1");
    assert_eq!(json["parameters"]["hostname"], "db0");
    assert_eq!(json["attributes"], serde_json::json!({}));
}

#[test]
fn group_tree_deserializes_optional_children() {
    let tree: GroupTree = serde_json::from_str(
        r#"{
            "identifier": "ROOT",
            "name": "ROOT",
            "childConnectionGroups": [
                {"identifier": "1", "name": "lab", "childConnections": [
                    {"identifier": "10", "name": "db"}
                ]}
            ]
        }"#,
    )
    .unwrap();

    let groups = tree.child_connection_groups.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "lab");
    assert!(groups[0].child_connection_groups.is_none());

    let connections = groups[0].child_connections.as_ref().unwrap();
    assert_eq!(connections[0].identifier, "10");
}

#[test]
fn patch_ops_target_the_permission_documents() {
    let add = PatchOp::add_connection("C1");
    let json = serde_json::to_value(&add).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"op": "add", "path": "/connectionPermissions/C1", "value": "READ"})
    );

    let remove = PatchOp::remove_connection("C1");
    assert_eq!(remove.op, PatchVerb::Remove);
    assert_eq!(remove.path, "/connectionPermissions/C1");

    let group = PatchOp::add_group("G1");
    assert_eq!(group.path, "/connectionGroupPermissions/G1");
}

#[test]
fn api_status_distinguishes_not_found() {
    assert_ne!(ApiStatus::NotFound, ApiStatus::NoContent);
    assert_ne!(ApiStatus::Other(500), ApiStatus::NoContent);
    assert_eq!(ApiStatus::Other(418), ApiStatus::Other(418));
}

#[test]
fn principal_kind_display_is_lowercase() {
    assert_eq!(PrincipalKind::User.to_string(), "user");
    assert_eq!(PrincipalKind::Group.to_string(), "group");
}
