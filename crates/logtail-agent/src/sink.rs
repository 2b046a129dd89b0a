// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

use logtail_core::event::Event;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

/// Drain published events to stdout as NDJSON, one event per line.
///
/// Runs until the sending side (every stream's publisher handle) is gone.
pub async fn stdout_sink(mut rx: UnboundedReceiver<Event>) {
    use std::io::Write;

    let stdout = std::io::stdout();
    while let Some(event) = rx.recv().await {
        match serde_json::to_string(&event) {
            Ok(line) => {
                let mut out = stdout.lock();
                if writeln!(out, "{line}").is_err() {
                    error!("stdout closed, stopping event sink");
                    return;
                }
            }
            Err(e) => error!("failed to encode event: {e}"),
        }
    }
    info!("event sink drained");
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtail_core::client::LogRecord;
    use logtail_core::publisher::{ChannelPublisher, Publisher};

    #[tokio::test]
    async fn test_sink_exits_when_publishers_are_dropped() {
        let (publisher, rx) = ChannelPublisher::new();
        publisher.publish(Event::from_record(
            LogRecord {
                timestamp: 1,
                message: "line\n".to_string(),
                ingestion_time: None,
            },
            "g",
            "s",
        ));
        drop(publisher);

        // Completes once the channel is closed and drained.
        stdout_sink(rx).await;
    }
}
