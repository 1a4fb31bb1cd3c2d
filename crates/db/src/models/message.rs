//! In-game message models.

use galaxy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub user_id: DbId,
    pub category: String,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// Message categories, stored as their `as_str` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    Fleet,
    Combat,
    Expedition,
    Colonization,
    Construction,
    Research,
    Shipyard,
}

impl MessageCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageCategory::Fleet => "fleet",
            MessageCategory::Combat => "combat",
            MessageCategory::Expedition => "expedition",
            MessageCategory::Colonization => "colonization",
            MessageCategory::Construction => "construction",
            MessageCategory::Research => "research",
            MessageCategory::Shipyard => "shipyard",
        }
    }
}
