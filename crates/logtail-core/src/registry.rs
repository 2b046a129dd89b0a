// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

//! Durable checkpoint store.
//!
//! The registry maps `(group, stream)` to the stream's resume position. A
//! write fully supersedes the prior value; a read of an unseen key returns
//! `None`, never an error. Keys are disjoint per stream, so implementations
//! only need last-write-wins semantics under same-key races.

use crate::error::RegistryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Persisted resume position for one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Page token to resume the remote fetch from.
    pub next_token: Option<String>,
    /// Timestamp of the most recent forwarded event, epoch milliseconds.
    pub last_event_time: i64,
}

#[async_trait]
pub trait Registry: Send + Sync {
    async fn read(&self, group: &str, stream: &str) -> Result<Option<Checkpoint>, RegistryError>;

    async fn write(
        &self,
        group: &str,
        stream: &str,
        checkpoint: &Checkpoint,
    ) -> Result<(), RegistryError>;
}

fn key(group: &str, stream: &str) -> String {
    format!("{group}/{stream}")
}

/// In-process registry for tests and ephemeral runs; state is lost on exit.
#[derive(Default)]
pub struct MemoryRegistry {
    entries: std::sync::Mutex<HashMap<String, Checkpoint>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn read(&self, group: &str, stream: &str) -> Result<Option<Checkpoint>, RegistryError> {
        #[allow(clippy::expect_used)]
        let entries = self.entries.lock().expect("lock poisoned");
        Ok(entries.get(&key(group, stream)).cloned())
    }

    async fn write(
        &self,
        group: &str,
        stream: &str,
        checkpoint: &Checkpoint,
    ) -> Result<(), RegistryError> {
        #[allow(clippy::expect_used)]
        let mut entries = self.entries.lock().expect("lock poisoned");
        entries.insert(key(group, stream), checkpoint.clone());
        Ok(())
    }
}

/// File-backed registry: one JSON document holding every checkpoint.
///
/// The whole map is rewritten on each write, to a temp file first and then
/// renamed over the live file so a crash mid-write leaves the previous state
/// intact.
pub struct FileRegistry {
    path: PathBuf,
    entries: Mutex<HashMap<String, Checkpoint>>,
}

impl FileRegistry {
    /// Open the registry at `path`, loading any previously persisted state.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, Checkpoint>) -> Result<(), RegistryError> {
        let encoded = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, encoded)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl Registry for FileRegistry {
    async fn read(&self, group: &str, stream: &str) -> Result<Option<Checkpoint>, RegistryError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(&key(group, stream)).cloned())
    }

    async fn write(
        &self,
        group: &str,
        stream: &str,
        checkpoint: &Checkpoint,
    ) -> Result<(), RegistryError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key(group, stream), checkpoint.clone());
        self.persist(&entries)
    }
}
