//! Repository for the `messages` table.

use galaxy_core::types::DbId;
use sqlx::PgConnection;

use crate::models::message::{Message, MessageCategory};

/// Column list for `messages` queries.
const COLUMNS: &str = "id, user_id, category, title, body, is_read, created_at";

/// Provides append and read operations for in-game messages.
pub struct MessageRepo;

impl MessageRepo {
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        category: MessageCategory,
        title: &str,
        body: &str,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (user_id, category, title, body) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(user_id)
            .bind(category.as_str())
            .bind(title)
            .bind(body)
            .fetch_one(&mut *conn)
            .await
    }

    /// Newest first.
    pub async fn list_for_user(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await
    }
}
