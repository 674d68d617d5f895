// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Group path resolution.
//!
//! Maps a slash-delimited group path to the backend identifier chain,
//! creating missing organizational groups along the way. The tree is
//! fetched once per resolution and never cached across calls.

use tracing::debug;

use gs_core::path::{segments, ROOT};

use crate::client::{Api, ApiResult, GroupRequest, GroupTree};

/// Resolves a group path to `(parent_id, ancestor_ids)`.
///
/// `parent_id` is the identifier of the final group on the path;
/// `ancestor_ids` is the identifier chain from the first path segment down
/// to and including the final group, root excluded. The root path resolves
/// to `(ROOT, [])` without any remote call.
///
/// Sibling group names are not guaranteed unique; the first match at each
/// level wins. Any remote failure aborts the resolution; there is no
/// partial retry.
pub async fn resolve<A: Api + ?Sized>(api: &A, path: &str) -> ApiResult<(String, Vec<String>)> {
    let segments = segments(path);

    if segments.is_empty() {
        return Ok((ROOT.to_string(), Vec::new()));
    }

    let tree = api.group_tree(ROOT).await?;

    let mut parent = ROOT.to_string();
    let mut ancestors = Vec::with_capacity(segments.len());
    let mut level: Option<Vec<GroupTree>> = tree.child_connection_groups;

    for segment in &segments {
        let existing = match level.take() {
            Some(mut groups) => groups
                .iter()
                .position(|group| group.name == *segment)
                .map(|index| groups.swap_remove(index)),
            None => None,
        };

        match existing {
            Some(group) => {
                parent = group.identifier;
                ancestors.push(parent.clone());
                level = group.child_connection_groups;
            }
            None => {
                let request = GroupRequest::organizational(segment, &parent);
                parent = api.create_group(&request).await?;
                ancestors.push(parent.clone());
                debug!(name = %segment, identifier = %parent, "created connection group");
                // A freshly created group has no children; every remaining
                // segment is created as well.
            }
        }
    }

    Ok((parent, ancestors))
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
