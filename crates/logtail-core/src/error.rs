// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

/// Failures returned by the remote log-retrieval API.
///
/// The polling engine treats every variant as fatal for the current poll; a
/// stream that hits one terminates and is left for its group to rediscover.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The remote service rejected the request (throttling, invalid
    /// operation, unknown group or stream, ...).
    #[error("remote API rejected the request: {code}: {message}")]
    Remote { code: String, message: String },

    /// The request never produced a well-formed response.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Failures from the durable checkpoint registry.
///
/// Never fatal to a stream: reads that fail are treated as "no checkpoint",
/// writes that fail are retried implicitly on the next successful poll.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Invalid prospector or supervisor configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ApiError::Remote {
            code: "ThrottlingException".to_string(),
            message: "rate exceeded".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "remote API rejected the request: ThrottlingException: rate exceeded"
        );
    }

    #[test]
    fn test_registry_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = RegistryError::from(io);
        assert!(error.to_string().contains("denied"));
    }
}
