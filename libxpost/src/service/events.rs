//! Event system for compose state changes
//!
//! This module provides an in-process event bus that lets a rendering layer
//! follow what the compose engine did (mode switches, mirrored writes,
//! recounts, attachment changes) without polling.
//!
//! # Architecture
//!
//! The event bus uses `tokio::sync::broadcast` for multi-subscriber support.
//! Emitting never blocks: with no subscribers the event is dropped, and a
//! lagging subscriber misses the oldest events rather than stalling the
//! engine.
//!
//! # Example
//!
//! ```no_run
//! use libxpost::service::events::{ComposeEvent, EventBus};
//!
//! # async fn example() {
//! let event_bus = EventBus::new(100);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(ComposeEvent::ModeDeactivated {
//!     mode: "11ty".to_string(),
//! });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::compose::{CharCount, InputLocks};
use crate::types::Platform;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<ComposeEvent>;

/// Event bus for distributing compose events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ComposeEvent>,
}

impl EventBus {
    /// Create a new event bus with the specified capacity
    ///
    /// The capacity determines how many events can be buffered per subscriber
    /// before older events are dropped.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: ComposeEvent) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Events emitted by [`ComposeService`](super::ComposeService)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComposeEvent {
    ModeActivated {
        mode: String,
        /// Mode that was active before, when switching directly
        previous: Option<String>,
    },

    ModeDeactivated {
        mode: String,
    },

    /// An edit was mirrored from `source` into `targets`
    BuffersSynced {
        source: Platform,
        targets: Vec<Platform>,
    },

    /// Counters were recomputed
    CountsUpdated {
        counts: Vec<CharCount>,
    },

    AttachmentsChanged {
        total: usize,
        locks: InputLocks,
    },

    LinkChanged {
        url: String,
        locks: InputLocks,
    },

    /// The session was reset
    Cleared,

    SubmissionBlocked {
        /// User-facing reason
        message: String,
    },

    SubmissionReady {
        session_id: String,
        platforms: Vec<Platform>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_emission_and_subscription() {
        let event_bus = EventBus::new(10);
        let mut receiver = event_bus.subscribe();

        event_bus.emit(ComposeEvent::ModeActivated {
            mode: "11ty".to_string(),
            previous: None,
        });

        match receiver.recv().await.unwrap() {
            ComposeEvent::ModeActivated { mode, previous } => {
                assert_eq!(mode, "11ty");
                assert!(previous.is_none());
            }
            _ => panic!("Wrong event type received"),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let event_bus = EventBus::new(10);
        let mut receiver1 = event_bus.subscribe();
        let mut receiver2 = event_bus.subscribe();

        let event = ComposeEvent::BuffersSynced {
            source: Platform::from("mastodon"),
            targets: vec![Platform::from("bluesky")],
        };
        event_bus.emit(event.clone());

        assert_eq!(receiver1.recv().await.unwrap(), event);
        assert_eq!(receiver2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_no_subscribers() {
        let event_bus = EventBus::new(10);

        // Must neither panic nor block
        event_bus.emit(ComposeEvent::Cleared);
        assert_eq!(event_bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_misses_oldest() {
        let event_bus = EventBus::new(2);
        let mut receiver = event_bus.subscribe();

        for i in 0..4 {
            event_bus.emit(ComposeEvent::ModeDeactivated {
                mode: i.to_string(),
            });
        }

        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(2))
        ));
        assert_eq!(
            receiver.recv().await.unwrap(),
            ComposeEvent::ModeDeactivated {
                mode: "2".to_string()
            }
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = ComposeEvent::SubmissionBlocked {
            message: "Please enter some text.".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"submission_blocked""#));

        let deserialized: ComposeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[test]
    fn test_unit_variant_serialization() {
        let json = serde_json::to_value(ComposeEvent::Cleared).unwrap();
        assert_eq!(json, serde_json::json!({"type": "cleared"}));
    }
}
