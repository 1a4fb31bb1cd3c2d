//! Construction, research and shipyard queue models.
//!
//! The three queue tables share one shape and differ only in the name of
//! the "what" and "how much" columns. [`QueueKind`] carries that mapping so
//! a single [`QueueItem`] row type serves all three.

use galaxy_core::resources::Resources;
use galaxy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Building,
    Research,
    Shipyard,
}

impl QueueKind {
    pub const ALL: [QueueKind; 3] = [QueueKind::Building, QueueKind::Research, QueueKind::Shipyard];

    pub fn table(self) -> &'static str {
        match self {
            QueueKind::Building => "building_queue",
            QueueKind::Research => "research_queue",
            QueueKind::Shipyard => "shipyard_queue",
        }
    }

    /// Column naming the building, research or unit kind.
    pub fn target_column(self) -> &'static str {
        match self {
            QueueKind::Building => "building",
            QueueKind::Research => "research",
            QueueKind::Shipyard => "unit",
        }
    }

    /// Column holding the target level or unit amount.
    pub fn quantity_column(self) -> &'static str {
        match self {
            QueueKind::Building | QueueKind::Research => "target_level",
            QueueKind::Shipyard => "amount",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueueKind::Building => "building",
            QueueKind::Research => "research",
            QueueKind::Shipyard => "shipyard",
        }
    }
}

/// A queue row, selected with the kind-specific columns aliased to
/// `target` and `quantity`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueItem {
    pub id: DbId,
    pub planet_id: DbId,
    pub user_id: DbId,
    pub target: String,
    pub quantity: i64,
    pub started_at: Timestamp,
    pub completes_at: Timestamp,
    pub cost_metal: f64,
    pub cost_crystal: f64,
    pub cost_gas: f64,
    pub created_at: Timestamp,
}

impl QueueItem {
    /// The cost paid when the order was placed.
    pub fn reserved(&self) -> Resources {
        Resources::new(self.cost_metal, self.cost_crystal, self.cost_gas)
    }
}

/// DTO for placing an order. The command boundary validates and charges
/// before inserting.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQueueItem {
    pub planet_id: DbId,
    pub user_id: DbId,
    pub target: String,
    pub quantity: i64,
    pub started_at: Timestamp,
    pub completes_at: Timestamp,
    pub cost: Resources,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipyard_queue_uses_unit_and_amount() {
        assert_eq!(QueueKind::Shipyard.table(), "shipyard_queue");
        assert_eq!(QueueKind::Shipyard.target_column(), "unit");
        assert_eq!(QueueKind::Shipyard.quantity_column(), "amount");
    }

    #[test]
    fn level_queues_use_target_level() {
        assert_eq!(QueueKind::Building.quantity_column(), "target_level");
        assert_eq!(QueueKind::Research.quantity_column(), "target_level");
        assert_eq!(QueueKind::Research.target_column(), "research");
    }
}
