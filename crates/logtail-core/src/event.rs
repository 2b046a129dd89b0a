// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

use crate::client::LogRecord;
use serde::Serialize;

/// A normalized log event: one remote record plus its source identity.
///
/// Timestamp and message are copied verbatim from the remote record; the
/// remote clock is authoritative and the byte content visible to the sink is
/// never altered. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub message: String,
    /// Remote-assigned event time, epoch milliseconds.
    pub timestamp: i64,
    pub group: String,
    pub stream: String,
    /// Remote ingestion time, epoch milliseconds, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingestion_time: Option<i64>,
}

impl Event {
    /// Normalize one raw record under its owning (group, stream) identity.
    pub fn from_record(record: LogRecord, group: &str, stream: &str) -> Self {
        Self {
            message: record.message,
            timestamp: record.timestamp,
            group: group.to_string(),
            stream: stream.to_string(),
            ingestion_time: record.ingestion_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_copies_fields_verbatim() {
        let record = LogRecord {
            timestamp: 1_700_000_000_123,
            message: "  spaces and trailing newline preserved \n".to_string(),
            ingestion_time: Some(1_700_000_000_456),
        };
        let event = Event::from_record(record.clone(), "group", "stream");

        assert_eq!(event.message, record.message);
        assert_eq!(event.timestamp, record.timestamp);
        assert_eq!(event.ingestion_time, record.ingestion_time);
        assert_eq!(event.group, "group");
        assert_eq!(event.stream, "stream");
    }

    #[test]
    fn test_equality_is_structural() {
        let record = LogRecord {
            timestamp: 1,
            message: "m".to_string(),
            ingestion_time: None,
        };
        let a = Event::from_record(record.clone(), "g", "s");
        let b = Event::from_record(record, "g", "s");
        assert_eq!(a, b);
    }
}
