// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! gs-core: Shared library for the gatesync operator
//!
//! This crate provides the data model shared between the sync engine and the
//! event listener: connection desired/observed state, group path handling,
//! and the wire event envelope produced by the gateway's event extension.

pub mod connection;
pub mod error;
pub mod event;
pub mod path;

pub use connection::{DesiredConnection, ObservedConnection, Permissions, Protocol};
pub use error::{Error, Result};
pub use event::{user_event, UserEvent};
pub use path::{segments, ROOT};
