//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`GameEvent`]s. Share it
//! via `Arc<EventBus>` between the tick engine and its subscribers.

use chrono::{DateTime, Utc};
use galaxy_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// GameEvent
// ---------------------------------------------------------------------------

/// Something a player should hear about.
///
/// Every in-game message written during a tick has a matching event, built
/// with [`GameEvent::new`] and optionally enriched via
/// [`with_source`](GameEvent::with_source) and
/// [`with_payload`](GameEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    /// Dot-separated event name, e.g. `"fleet.returned"`.
    pub event_type: String,

    /// The player the event is addressed to.
    pub user_id: DbId,

    pub title: String,
    pub body: String,

    /// Optional source entity kind (e.g. `"fleet"`, `"planet"`).
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl GameEvent {
    pub fn new(
        event_type: impl Into<String>,
        user_id: DbId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            user_id,
            title: title.into(),
            body: body.into(),
            source_entity_type: None,
            source_entity_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use galaxy_events::bus::{EventBus, GameEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(GameEvent::new("fleet.returned", 1, "Fleet returned", ""));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<GameEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: GameEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
