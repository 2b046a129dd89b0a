// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

//! Interface to the remote log-retrieval API.
//!
//! The concrete transport lives outside the core; implementations only have
//! to honor the paging contract: records come back in chronological order
//! within a page, and the returned token resumes where the page ended.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::Deserialize;

/// One raw log record as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogRecord {
    /// Event time assigned by the remote service, in epoch milliseconds.
    pub timestamp: i64,
    pub message: String,
    /// When the remote service ingested the record, if reported.
    pub ingestion_time: Option<i64>,
}

/// One page of records plus the token for the next page, if any.
#[derive(Debug, Clone, Default)]
pub struct EventsPage {
    pub records: Vec<LogRecord>,
    pub next_token: Option<String>,
}

/// Parameters for a single page fetch.
#[derive(Debug, Clone)]
pub struct EventsRequest {
    pub group: String,
    pub stream: String,
    /// Inclusive lower bound, epoch milliseconds.
    pub start_time: i64,
    /// Exclusive upper bound, epoch milliseconds.
    pub end_time: i64,
    pub next_token: Option<String>,
}

/// The remote log API, as far as the engine cares about it.
#[async_trait]
pub trait LogsApi: Send + Sync {
    /// Names of the streams currently present under `group`.
    async fn list_streams(&self, group: &str) -> Result<Vec<String>, ApiError>;

    /// Fetch one page of events for a stream within the request window.
    async fn get_events(&self, request: &EventsRequest) -> Result<EventsPage, ApiError>;
}
