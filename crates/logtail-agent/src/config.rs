// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

use logtail_core::config::{GroupConfig, ProspectorConfig};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Invalid agent configuration.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Agent configuration, read from `LOGTAIL_*` environment variables.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Log groups to tail.
    pub groups: Vec<String>,
    /// Base URL of the remote log API.
    pub endpoint: String,
    /// Path of the on-disk checkpoint registry.
    pub registry_path: PathBuf,
    /// Per-stream poll interval, in seconds.
    pub poll_interval_secs: u64,
    /// Per-group stream discovery interval, in seconds.
    pub discovery_interval_secs: u64,
    /// Idle time after which a stream is expired, in seconds.
    pub expiration_horizon_secs: u64,
    /// Maximum look-back window for new/stale streams, in seconds.
    pub last_event_horizon_secs: u64,
    /// Cap on simultaneously active streams per group.
    pub max_streams: usize,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            endpoint: String::new(),
            registry_path: PathBuf::from("logtail-registry.json"),
            poll_interval_secs: 10,
            discovery_interval_secs: 60,
            expiration_horizon_secs: 3600,
            last_event_horizon_secs: 3600,
            max_streams: 50,
            log_level: "info".to_string(),
        }
    }
}

pub(crate) fn parse_group_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

impl AgentConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, AgentError> {
        let defaults = Self::default();

        let groups = env::var("LOGTAIL_GROUPS")
            .map(|val| parse_group_list(&val))
            .unwrap_or_default();
        let endpoint = env::var("LOGTAIL_ENDPOINT").unwrap_or_default();
        let registry_path = env::var("LOGTAIL_REGISTRY_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.registry_path);
        let max_streams = env::var("LOGTAIL_MAX_STREAMS")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(defaults.max_streams);
        let log_level = env::var("LOGTAIL_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or(defaults.log_level.clone());

        let config = Self {
            groups,
            endpoint,
            registry_path,
            poll_interval_secs: env_u64("LOGTAIL_POLL_INTERVAL_SECS", defaults.poll_interval_secs),
            discovery_interval_secs: env_u64(
                "LOGTAIL_DISCOVERY_INTERVAL_SECS",
                defaults.discovery_interval_secs,
            ),
            expiration_horizon_secs: env_u64(
                "LOGTAIL_EXPIRATION_HORIZON_SECS",
                defaults.expiration_horizon_secs,
            ),
            last_event_horizon_secs: env_u64(
                "LOGTAIL_LAST_EVENT_HORIZON_SECS",
                defaults.last_event_horizon_secs,
            ),
            max_streams,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.groups.is_empty() {
            return Err(AgentError::InvalidConfig(
                "LOGTAIL_GROUPS must name at least one log group".to_string(),
            ));
        }

        if self.endpoint.trim().is_empty() {
            return Err(AgentError::InvalidConfig(
                "LOGTAIL_ENDPOINT cannot be empty".to_string(),
            ));
        }

        if self.poll_interval_secs == 0
            || self.discovery_interval_secs == 0
            || self.expiration_horizon_secs == 0
            || self.last_event_horizon_secs == 0
        {
            return Err(AgentError::InvalidConfig(
                "intervals and horizons must be greater than zero".to_string(),
            ));
        }

        if self.max_streams == 0 {
            return Err(AgentError::InvalidConfig(
                "LOGTAIL_MAX_STREAMS must be greater than zero".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(AgentError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    fn prospector(&self) -> ProspectorConfig {
        ProspectorConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            discovery_interval: Duration::from_secs(self.discovery_interval_secs),
            expiration_horizon: Duration::from_secs(self.expiration_horizon_secs),
            last_event_horizon: Duration::from_secs(self.last_event_horizon_secs),
            max_streams: self.max_streams,
        }
    }

    /// One group config per configured log group, sharing the prospector
    /// settings.
    pub fn group_configs(&self) -> Vec<GroupConfig> {
        self.groups
            .iter()
            .map(|name| GroupConfig::new(name.clone(), self.prospector()))
            .collect()
    }
}
