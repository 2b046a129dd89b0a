// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConfigError;
use std::time::Duration;

/// Per-group polling and discovery settings, shared by every stream the
/// group starts.
#[derive(Debug, Clone)]
pub struct ProspectorConfig {
    /// How often each stream polls the remote API for new events.
    pub poll_interval: Duration,
    /// How often the group lists the remote streams under its log group.
    pub discovery_interval: Duration,
    /// A stream that has produced no new events for longer than this is
    /// expired and its resources reclaimed.
    pub expiration_horizon: Duration,
    /// Maximum look-back window: a stream with no usable checkpoint starts
    /// at `now - last_event_horizon`, never earlier.
    pub last_event_horizon: Duration,
    /// Cap on simultaneously active streams per group; discovery defers the
    /// rest to the next cycle.
    pub max_streams: usize,
}

impl Default for ProspectorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            discovery_interval: Duration::from_secs(60),
            expiration_horizon: Duration::from_secs(3600),
            last_event_horizon: Duration::from_secs(3600),
            max_streams: 50,
        }
    }
}

impl ProspectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.discovery_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "discovery interval must be greater than zero".to_string(),
            ));
        }
        if self.expiration_horizon.is_zero() {
            return Err(ConfigError::Invalid(
                "expiration horizon must be greater than zero".to_string(),
            ));
        }
        if self.last_event_horizon.is_zero() {
            return Err(ConfigError::Invalid(
                "last-event horizon must be greater than zero".to_string(),
            ));
        }
        if self.max_streams == 0 {
            return Err(ConfigError::Invalid(
                "max streams must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// One log group to tail, with its prospector settings.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub name: String,
    pub prospector: ProspectorConfig,
}

impl GroupConfig {
    pub fn new(name: impl Into<String>, prospector: ProspectorConfig) -> Self {
        Self {
            name: name.into(),
            prospector,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "group name cannot be empty".to_string(),
            ));
        }
        self.prospector.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProspectorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_poll_interval() {
        let config = ProspectorConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_max_streams() {
        let config = ProspectorConfig {
            max_streams: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_group_name() {
        let config = GroupConfig::new("   ", ProspectorConfig::default());
        assert!(config.validate().is_err());
    }
}
