// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-stream polling and checkpointing engine.
//!
//! A [`Stream`] owns one remote log stream's cursor: it decides the fetch
//! window, forwards every fetched record to the publisher in order, persists
//! the resume position after each page (forward-then-checkpoint, never the
//! reverse), and reports exactly one terminal [`StreamExit`] to its owning
//! group when it is done.

use crate::client::{EventsRequest, LogsApi};
use crate::config::ProspectorConfig;
use crate::event::Event;
use crate::now_millis;
use crate::publisher::Publisher;
use crate::registry::{Checkpoint, Registry};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Why a stream's monitor loop terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The remote API failed a poll; the group may rediscover the stream.
    Error,
    /// No new events for longer than the expiration horizon.
    Expired,
    /// Cooperative shutdown was requested.
    Shutdown,
}

/// Terminal notification from a stream to its owning group.
#[derive(Debug, Clone)]
pub struct StreamExit {
    pub group: String,
    pub stream: String,
    pub reason: ExitReason,
}

/// One-shot completion signal handed to a stream at spawn time.
///
/// `complete` consumes the signal, so the type system enforces the
/// exactly-once contract: a stream cannot report twice, and the monitor loop
/// cannot return without reporting.
pub struct CompletionSignal {
    tx: mpsc::UnboundedSender<StreamExit>,
}

impl CompletionSignal {
    pub fn new(tx: mpsc::UnboundedSender<StreamExit>) -> Self {
        Self { tx }
    }

    fn complete(self, group: &str, stream: &str, reason: ExitReason) {
        let exit = StreamExit {
            group: group.to_string(),
            stream: stream.to_string(),
            reason,
        };
        if self.tx.send(exit).is_err() {
            // Group already gone; only possible during process teardown.
            debug!(stream, "completion receiver dropped");
        }
    }
}

/// Poll cursor: where the next fetch starts and how it pages.
#[derive(Debug, Clone)]
pub struct StreamParams {
    /// Inclusive lower bound of the fetch window, epoch milliseconds.
    /// Monotonically non-decreasing across polls.
    pub start_time: i64,
    /// Optional fixed upper bound; when unset each poll is bounded by now.
    pub end_time: Option<i64>,
    /// Page token returned by the previous fetch.
    pub next_token: Option<String>,
}

pub struct Stream {
    name: String,
    group: String,
    prospector: ProspectorConfig,
    client: Arc<dyn LogsApi>,
    registry: Arc<dyn Registry>,
    publisher: Arc<dyn Publisher>,
    params: StreamParams,
    last_event_seen: Instant,
}

impl Stream {
    /// Construct a stream, resolving its start position.
    ///
    /// A persisted checkpoint wins, clamped so the stream never resumes from
    /// earlier than `now - last_event_horizon` even if the checkpoint has
    /// gone stale. With no checkpoint (or a failed registry read, which is
    /// treated the same), the stream starts at the horizon so its first poll
    /// does not fetch the remote stream's entire history.
    pub async fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        prospector: ProspectorConfig,
        client: Arc<dyn LogsApi>,
        registry: Arc<dyn Registry>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        let name = name.into();
        let group = group.into();

        let checkpoint = match registry.read(&group, &name).await {
            Ok(checkpoint) => checkpoint,
            Err(e) => {
                warn!(
                    group = %group,
                    stream = %name,
                    "registry read failed, treating as no checkpoint: {e}"
                );
                None
            }
        };

        let horizon_floor = now_millis() - prospector.last_event_horizon.as_millis() as i64;
        let params = match checkpoint {
            Some(checkpoint) => StreamParams {
                start_time: checkpoint.last_event_time.max(horizon_floor),
                end_time: None,
                next_token: checkpoint.next_token,
            },
            None => StreamParams {
                start_time: horizon_floor,
                end_time: None,
                next_token: None,
            },
        };

        Self {
            name,
            group,
            prospector,
            client,
            registry,
            publisher,
            params,
            last_event_seen: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &StreamParams {
        &self.params
    }

    /// Fetch one page and forward it downstream.
    ///
    /// Events are published in the exact order the remote API returned them,
    /// and the checkpoint is written only after the whole page has been
    /// forwarded, so a crash can re-deliver but never skip. A registry write
    /// failure is logged and left for the next successful poll to overwrite.
    /// A remote failure propagates untouched; there is no local retry.
    pub async fn next(&mut self) -> Result<usize, crate::error::ApiError> {
        let request = EventsRequest {
            group: self.group.clone(),
            stream: self.name.clone(),
            start_time: self.params.start_time,
            end_time: self.params.end_time.unwrap_or_else(now_millis),
            next_token: self.params.next_token.clone(),
        };

        let page = self.client.get_events(&request).await?;
        let count = page.records.len();

        let mut last_timestamp = None;
        for record in page.records {
            let timestamp = record.timestamp;
            self.publisher
                .publish(Event::from_record(record, &self.group, &self.name));
            last_timestamp = Some(timestamp);
        }

        self.params.next_token = page.next_token;
        if let Some(timestamp) = last_timestamp {
            // Keeps start_time monotonic even if the remote clock wobbles.
            self.params.start_time = self.params.start_time.max(timestamp);
            self.last_event_seen = Instant::now();
        }

        let checkpoint = Checkpoint {
            next_token: self.params.next_token.clone(),
            last_event_time: self.params.start_time,
        };
        if let Err(e) = self.registry.write(&self.group, &self.name, &checkpoint).await {
            warn!(
                group = %self.group,
                stream = %self.name,
                "checkpoint write failed, will rewrite after next poll: {e}"
            );
        }

        Ok(count)
    }

    fn expired(&self) -> bool {
        self.last_event_seen.elapsed() > self.prospector.expiration_horizon
    }

    /// Long-running poll loop.
    ///
    /// Polls on the prospector's interval until the first terminal
    /// condition: a remote error, expiration, or a shutdown request observed
    /// at an interval boundary. Each path emits the completion signal once
    /// and returns; `Finished` is terminal.
    pub async fn monitor(mut self, completion: CompletionSignal, shutdown: CancellationToken) {
        let mut poll = interval(self.prospector.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        poll.tick().await; // discard first tick, which is instantaneous

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!(group = %self.group, stream = %self.name, "stream shutting down");
                    completion.complete(&self.group, &self.name, ExitReason::Shutdown);
                    return;
                }
                _ = poll.tick() => {
                    match self.next().await {
                        Ok(count) => {
                            if count > 0 {
                                debug!(
                                    group = %self.group,
                                    stream = %self.name,
                                    count,
                                    "forwarded events"
                                );
                            }
                            if self.expired() {
                                info!(group = %self.group, stream = %self.name, "stream expired");
                                completion.complete(&self.group, &self.name, ExitReason::Expired);
                                return;
                            }
                        }
                        Err(e) => {
                            error!(group = %self.group, stream = %self.name, "poll failed: {e}");
                            completion.complete(&self.group, &self.name, ExitReason::Error);
                            return;
                        }
                    }
                }
            }
        }
    }
}
