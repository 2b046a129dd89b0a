// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-log-group fleet management.
//!
//! A [`Group`] periodically lists the remote streams under its log group,
//! starts a [`Stream`] monitor task for every name it is not already
//! tracking (up to the configured cap) and reclaims streams when their
//! completion signal arrives. Reclamation flows strictly through that
//! signal; the group never reaches into a running stream.

use crate::client::LogsApi;
use crate::config::{GroupConfig, ProspectorConfig};
use crate::error::ApiError;
use crate::publisher::Publisher;
use crate::registry::Registry;
use crate::stream::{CompletionSignal, ExitReason, Stream, StreamExit};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub struct Group {
    name: String,
    prospector: ProspectorConfig,
    client: Arc<dyn LogsApi>,
    registry: Arc<dyn Registry>,
    publisher: Arc<dyn Publisher>,
    /// Active streams keyed by remote name. The per-stream token exists so a
    /// single stream could be cancelled without touching its siblings.
    streams: HashMap<String, CancellationToken>,
    exit_tx: mpsc::UnboundedSender<StreamExit>,
    exit_rx: mpsc::UnboundedReceiver<StreamExit>,
}

impl Group {
    pub fn new(
        config: GroupConfig,
        client: Arc<dyn LogsApi>,
        registry: Arc<dyn Registry>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        let (exit_tx, exit_rx) = mpsc::unbounded_channel();
        Self {
            name: config.name,
            prospector: config.prospector,
            client,
            registry,
            publisher,
            streams: HashMap::new(),
            exit_tx,
            exit_rx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Discovery-and-reclamation loop, one task per group.
    ///
    /// Runs until `shutdown` is cancelled, then waits for every tracked
    /// stream to report its own (shutdown-flavored) completion before
    /// returning, so no monitor task outlives its group.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut discovery = interval(self.prospector.discovery_interval);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(group = %self.name, "group shutting down");
                    break;
                }
                Some(exit) = self.exit_rx.recv() => {
                    self.reclaim(exit);
                }
                _ = discovery.tick() => {
                    if let Err(e) = self.discover(&shutdown).await {
                        // Not fatal; retried on the next discovery cycle.
                        error!(group = %self.name, "stream discovery failed: {e}");
                    }
                }
            }
        }

        // Children hold child tokens of `shutdown`, so they are already
        // cancelled; collect their completion signals.
        while !self.streams.is_empty() {
            match self.exit_rx.recv().await {
                Some(exit) => self.reclaim(exit),
                None => break,
            }
        }
    }

    /// List the remote streams and start monitors for untracked names.
    ///
    /// At most one stream instance is ever active per remote name: an entry
    /// stays in the tracked set from spawn until its completion signal is
    /// reclaimed, so rapid re-discovery cannot double-start a stream.
    /// Names beyond the concurrency cap are deferred to the next cycle.
    async fn discover(&mut self, shutdown: &CancellationToken) -> Result<(), ApiError> {
        let names = self.client.list_streams(&self.name).await?;

        for stream_name in names {
            if self.streams.contains_key(&stream_name) {
                continue;
            }
            if self.streams.len() >= self.prospector.max_streams {
                debug!(
                    group = %self.name,
                    cap = self.prospector.max_streams,
                    "stream cap reached, deferring discovery"
                );
                break;
            }

            let stream = Stream::new(
                stream_name.clone(),
                self.name.clone(),
                self.prospector.clone(),
                Arc::clone(&self.client),
                Arc::clone(&self.registry),
                Arc::clone(&self.publisher),
            )
            .await;

            let token = shutdown.child_token();
            let completion = CompletionSignal::new(self.exit_tx.clone());
            self.streams.insert(stream_name.clone(), token.clone());
            tokio::spawn(stream.monitor(completion, token));
            info!(group = %self.name, stream = %stream_name, "tracking new stream");
        }

        Ok(())
    }

    /// Drop a finished stream from the tracked set, freeing its name for
    /// rediscovery on a later cycle.
    fn reclaim(&mut self, exit: StreamExit) {
        self.streams.remove(&exit.stream);
        match exit.reason {
            ExitReason::Error => {
                info!(
                    group = %self.name,
                    stream = %exit.stream,
                    "reclaimed errored stream, will rediscover if still listed"
                );
            }
            ExitReason::Expired => {
                info!(group = %self.name, stream = %exit.stream, "reclaimed expired stream");
            }
            ExitReason::Shutdown => {
                debug!(group = %self.name, stream = %exit.stream, "stream stopped");
            }
        }
    }
}
