// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

//! Process-wide orchestration.
//!
//! The [`Supervisor`] is the only process-wide state: it owns the configured
//! group set, the registry handle and the publisher handle, constructs
//! everything once at startup, and hands each group explicit clones of the
//! shared handles. Shutdown fans out through a cancellation token and joins
//! every group task.

use crate::client::LogsApi;
use crate::config::GroupConfig;
use crate::error::ConfigError;
use crate::group::Group;
use crate::publisher::Publisher;
use crate::registry::Registry;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct Supervisor {
    groups: Vec<GroupConfig>,
    client: Arc<dyn LogsApi>,
    registry: Arc<dyn Registry>,
    publisher: Arc<dyn Publisher>,
}

/// Handle to a running supervisor; cooperative stop plus join.
pub struct SupervisorHandle {
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl SupervisorHandle {
    /// Request shutdown without waiting for it to complete.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Request shutdown and wait for every group (and its streams) to drain.
    pub async fn stop(self) {
        self.shutdown.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!("group task ended abnormally: {e}");
            }
        }
    }
}

impl Supervisor {
    pub fn new(
        groups: Vec<GroupConfig>,
        client: Arc<dyn LogsApi>,
        registry: Arc<dyn Registry>,
        publisher: Arc<dyn Publisher>,
    ) -> Result<Self, ConfigError> {
        if groups.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one log group must be configured".to_string(),
            ));
        }
        for group in &groups {
            group.validate()?;
        }
        Ok(Self {
            groups,
            client,
            registry,
            publisher,
        })
    }

    /// Spawn one task per configured group and return the control handle.
    pub fn start(self) -> SupervisorHandle {
        let shutdown = CancellationToken::new();
        let mut tasks = Vec::with_capacity(self.groups.len());

        for config in self.groups {
            info!(group = %config.name, "starting log group");
            let group = Group::new(
                config,
                Arc::clone(&self.client),
                Arc::clone(&self.registry),
                Arc::clone(&self.publisher),
            );
            tasks.push(tokio::spawn(group.run(shutdown.child_token())));
        }

        SupervisorHandle { shutdown, tasks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProspectorConfig;
    use crate::registry::MemoryRegistry;
    use crate::testutil::{CapturePublisher, MockLogsApi};

    #[tokio::test]
    async fn test_supervisor_rejects_empty_group_set() {
        let result = Supervisor::new(
            Vec::new(),
            Arc::new(MockLogsApi::new(Vec::<String>::new())),
            Arc::new(MemoryRegistry::new()),
            Arc::new(CapturePublisher::new()),
        );
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_supervisor_start_and_stop() {
        let supervisor = Supervisor::new(
            vec![
                GroupConfig::new("one", ProspectorConfig::default()),
                GroupConfig::new("two", ProspectorConfig::default()),
            ],
            Arc::new(MockLogsApi::new(Vec::<String>::new())),
            Arc::new(MemoryRegistry::new()),
            Arc::new(CapturePublisher::new()),
        )
        .unwrap();

        let handle = supervisor.start();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        handle.stop().await;
    }
}
