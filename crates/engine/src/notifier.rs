//! In-game messages with deferred event publication.
//!
//! A [`Notifier`] lives for one unit of work. Each [`notify`](Notifier::notify)
//! writes the `messages` row through that unit's connection and buffers the
//! matching [`GameEvent`]. The sweep publishes the buffer only after the
//! unit has committed, so a rolled-back fleet never pushes a notification
//! for something that did not happen.

use std::collections::BTreeSet;

use galaxy_core::types::DbId;
use galaxy_db::models::message::MessageCategory;
use galaxy_db::repositories::MessageRepo;
use galaxy_events::{EventBus, GameEvent};
use sqlx::PgConnection;

pub struct Notifier {
    source_type: &'static str,
    source_id: DbId,
    pending: Vec<GameEvent>,
}

impl Notifier {
    /// A notifier whose events point back at `source_type` / `source_id`.
    pub fn for_source(source_type: &'static str, source_id: DbId) -> Self {
        Self {
            source_type,
            source_id,
            pending: Vec::new(),
        }
    }

    pub async fn notify(
        &mut self,
        conn: &mut PgConnection,
        user_id: DbId,
        category: MessageCategory,
        title: &str,
        body: &str,
    ) -> Result<(), sqlx::Error> {
        let message = MessageRepo::create(conn, user_id, category, title, body).await?;
        self.pending.push(
            GameEvent::new(
                format!("message.{}", category.as_str()),
                user_id,
                title,
                body,
            )
            .with_source(self.source_type, self.source_id)
            .with_payload(serde_json::json!({ "message_id": message.id })),
        );
        Ok(())
    }

    /// Users that received at least one message.
    pub fn recipients(&self) -> BTreeSet<DbId> {
        self.pending.iter().map(|event| event.user_id).collect()
    }

    pub fn into_events(self) -> Vec<GameEvent> {
        self.pending
    }
}

/// Publish committed events, if a bus is attached.
pub fn publish_all(bus: Option<&EventBus>, events: Vec<GameEvent>) {
    let Some(bus) = bus else {
        return;
    };
    for event in events {
        bus.publish(event);
    }
}
