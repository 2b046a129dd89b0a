// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

use crate::event::Event;
use tokio::sync::mpsc;
use tracing::debug;

/// Downstream sink for normalized events.
///
/// Fire-and-forget: the engine never consumes a return value, and many
/// streams publish concurrently through one shared handle.
pub trait Publisher: Send + Sync {
    fn publish(&self, event: Event);
}

/// Publisher that hands events to an in-process channel.
///
/// The receiving half is drained by whatever owns the downstream pipeline
/// (the agent writes NDJSON to stdout; tests collect the events).
#[derive(Clone)]
pub struct ChannelPublisher {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Publisher for ChannelPublisher {
    fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            // Receiver dropped during shutdown; nothing left to deliver to.
            debug!("event receiver dropped, discarding event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LogRecord;

    fn event(message: &str) -> Event {
        Event::from_record(
            LogRecord {
                timestamp: 1,
                message: message.to_string(),
                ingestion_time: None,
            },
            "g",
            "s",
        )
    }

    #[tokio::test]
    async fn test_channel_publisher_preserves_order() {
        let (publisher, mut rx) = ChannelPublisher::new();
        publisher.publish(event("first"));
        publisher.publish(event("second"));

        assert_eq!(rx.recv().await.unwrap().message, "first");
        assert_eq!(rx.recv().await.unwrap().message, "second");
    }

    #[tokio::test]
    async fn test_publish_after_receiver_dropped_does_not_panic() {
        let (publisher, rx) = ChannelPublisher::new();
        drop(rx);
        publisher.publish(event("lost"));
    }
}
