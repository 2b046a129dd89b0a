// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test doubles for the engine's seams.

use crate::client::{EventsPage, EventsRequest, LogsApi};
use crate::error::{ApiError, RegistryError};
use crate::event::Event;
use crate::publisher::Publisher;
use crate::registry::{Checkpoint, Registry};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted remote API: pages are served in push order, then empty pages.
pub struct MockLogsApi {
    streams: Mutex<Vec<String>>,
    pages: Mutex<VecDeque<Result<EventsPage, ApiError>>>,
    fail_next_list: AtomicBool,
    list_calls: AtomicUsize,
    get_events_calls: AtomicUsize,
}

impl MockLogsApi {
    pub fn new<I, S>(streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            streams: Mutex::new(streams.into_iter().map(Into::into).collect()),
            pages: Mutex::new(VecDeque::new()),
            fail_next_list: AtomicBool::new(false),
            list_calls: AtomicUsize::new(0),
            get_events_calls: AtomicUsize::new(0),
        }
    }

    /// Make the next `list_streams` call fail with a remote error.
    pub fn fail_next_list(&self) {
        self.fail_next_list.store(true, Ordering::SeqCst);
    }

    pub fn push_page(&self, page: Result<EventsPage, ApiError>) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub fn set_streams<I, S>(&self, streams: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.streams.lock().unwrap() = streams.into_iter().map(Into::into).collect();
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_events_calls(&self) -> usize {
        self.get_events_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogsApi for MockLogsApi {
    async fn list_streams(&self, _group: &str) -> Result<Vec<String>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_list.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Remote {
                code: "ThrottlingException".to_string(),
                message: "rate exceeded".to_string(),
            });
        }
        Ok(self.streams.lock().unwrap().clone())
    }

    async fn get_events(&self, _request: &EventsRequest) -> Result<EventsPage, ApiError> {
        self.get_events_calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.lock().unwrap().pop_front() {
            Some(page) => page,
            None => Ok(EventsPage::default()),
        }
    }
}

/// Publisher that collects events for assertions.
#[derive(Default)]
pub struct CapturePublisher {
    events: Mutex<Vec<Event>>,
}

impl CapturePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl Publisher for CapturePublisher {
    fn publish(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Registry whose every operation fails, for fallback-path tests.
pub struct FailingRegistry;

#[async_trait]
impl Registry for FailingRegistry {
    async fn read(&self, _group: &str, _stream: &str) -> Result<Option<Checkpoint>, RegistryError> {
        Err(RegistryError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "registry unavailable",
        )))
    }

    async fn write(
        &self,
        _group: &str,
        _stream: &str,
        _checkpoint: &Checkpoint,
    ) -> Result<(), RegistryError> {
        Err(RegistryError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "registry unavailable",
        )))
    }
}
