//! Production bonus models.

use galaxy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const SOURCE_COMMANDER: &str = "commander";
pub const SOURCE_BOOSTER: &str = "booster";

/// A row from the `user_bonuses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserBonus {
    pub id: DbId,
    pub user_id: DbId,
    pub source: String,
    pub kind: String,
    pub percent: f64,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
