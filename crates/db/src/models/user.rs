//! User entity model.

use galaxy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub points: i64,
    pub research_in_progress: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
