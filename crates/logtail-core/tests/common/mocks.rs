// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

//! Mock implementations of the engine's external collaborators for testing

use async_trait::async_trait;
use logtail_core::client::{EventsPage, EventsRequest, LogRecord, LogsApi};
use logtail_core::error::ApiError;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Remote API scripted per stream: each stream name has its own queue of
/// pages, served in order, then empty pages forever.
#[derive(Default)]
pub struct ScriptedLogsApi {
    streams: Mutex<Vec<String>>,
    pages: Mutex<HashMap<String, VecDeque<EventsPage>>>,
}

impl ScriptedLogsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stream(&self, name: &str, pages: Vec<EventsPage>) {
        self.streams.lock().unwrap().push(name.to_string());
        self.pages
            .lock()
            .unwrap()
            .insert(name.to_string(), pages.into());
    }
}

#[async_trait]
impl LogsApi for ScriptedLogsApi {
    async fn list_streams(&self, _group: &str) -> Result<Vec<String>, ApiError> {
        Ok(self.streams.lock().unwrap().clone())
    }

    async fn get_events(&self, request: &EventsRequest) -> Result<EventsPage, ApiError> {
        let mut pages = self.pages.lock().unwrap();
        match pages.get_mut(&request.stream).and_then(VecDeque::pop_front) {
            Some(page) => Ok(page),
            None => Ok(EventsPage::default()),
        }
    }
}

pub fn record(message: &str, timestamp: i64) -> LogRecord {
    LogRecord {
        timestamp,
        message: message.to_string(),
        ingestion_time: None,
    }
}
