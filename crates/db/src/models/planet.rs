//! Planet and resource ledger models.

use galaxy_core::resources::Resources;
use galaxy_core::types::{Coordinate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `planets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Planet {
    pub id: DbId,
    pub owner_id: Option<DbId>,
    pub name: String,
    pub galaxy: i32,
    pub system: i32,
    pub slot: i32,
    pub fields_used: i32,
    pub fields_max: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Planet {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.galaxy, self.system, self.slot)
    }
}

/// DTO for inserting a planet together with its ledger and inventory rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatePlanet {
    pub owner_id: Option<DbId>,
    pub name: String,
    pub coordinate: Coordinate,
    pub fields_max: i32,
    /// Opening ledger balance.
    pub resources: Resources,
}

/// A row from the `planet_resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ledger {
    pub planet_id: DbId,
    pub metal: f64,
    pub crystal: f64,
    pub gas: f64,
    pub energy: f64,
    pub last_update: Timestamp,
}

impl Ledger {
    pub fn resources(&self) -> Resources {
        Resources::new(self.metal, self.crystal, self.gas)
    }
}
