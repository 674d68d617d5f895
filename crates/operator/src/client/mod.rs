// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway REST client module.
//!
//! Provides the [`Api`] capability trait consumed by the resolver, the sync
//! engine, and the permission sync, plus the reqwest-backed [`HttpApi`]
//! implementation with its internal token lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  SyncEngine  │────►│     Api     │────►│   Gateway   │
//! │  (resolver,  │◄────│   (trait)   │◄────│   REST API  │
//! │  permissions)│     └─────────────┘     └─────────────┘
//! └──────────────┘            ▲
//!                             │
//!                       ┌─────┴─────┐
//!                       │  HttpApi  │  (reqwest + token renewal)
//!                       └───────────┘
//! ```

mod api;
mod http;

pub use api::{
    Api, ApiError, ApiFuture, ApiResult, ApiStatus, ChildConnection, ConnectionRequest,
    GroupKind, GroupRequest, GroupTree, PatchOp, PatchVerb, PrincipalKind,
};
pub use http::HttpApi;

#[cfg(test)]
mod api_tests;
