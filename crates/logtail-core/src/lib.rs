// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

//! Core engine for continuously tailing remote log groups.
//!
//! The engine is organized around three actors: a [`stream::Stream`] owns one
//! remote log stream's polling cursor and checkpoint, a [`group::Group`]
//! discovers streams under one log group and reclaims finished ones, and the
//! [`supervisor::Supervisor`] owns the group fleet, the durable
//! [`registry::Registry`] and the downstream [`publisher::Publisher`] handle.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod group;
pub mod publisher;
pub mod registry;
pub mod stream;
pub mod supervisor;

#[cfg(test)]
pub(crate) mod testutil;

/// Milliseconds since the Unix epoch, the time unit of the remote API.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
