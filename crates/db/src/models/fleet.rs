//! Fleet entity models.
//!
//! [`FleetRow`] is the raw row; the ship manifest stays as JSON there so a
//! single malformed fleet cannot fail a bulk select. [`FleetRow::decode`]
//! turns it into a typed [`Fleet`] inside the per-fleet unit of work.

use galaxy_core::resources::{Manifest, Resources};
use galaxy_core::types::{Coordinate, DbId, Timestamp};
use galaxy_core::units::ShipKind;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::{FleetStatus, Mission, StatusId};

/// A row from the `fleets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FleetRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub origin_planet_id: DbId,
    pub target_galaxy: i32,
    pub target_system: i32,
    pub target_slot: i32,
    pub mission_id: StatusId,
    pub status_id: StatusId,
    pub ships: serde_json::Value,
    pub metal: f64,
    pub crystal: f64,
    pub gas: f64,
    pub departure_at: Timestamp,
    pub arrival_at: Timestamp,
    pub return_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Reasons a fleet row cannot be turned into a [`Fleet`].
#[derive(Debug, thiserror::Error)]
pub enum FleetDecodeError {
    #[error("Fleet {fleet_id} has unknown status id {status_id}")]
    UnknownStatus { fleet_id: DbId, status_id: StatusId },

    #[error("Fleet {fleet_id} has a malformed ship manifest: {source}")]
    Manifest {
        fleet_id: DbId,
        #[source]
        source: serde_json::Error,
    },
}

/// A decoded fleet.
#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    pub id: DbId,
    pub owner_id: DbId,
    pub origin_planet_id: DbId,
    pub target: Coordinate,
    /// `None` when `mission_id` has no matching [`Mission`].
    pub mission: Option<Mission>,
    pub mission_id: StatusId,
    pub status: FleetStatus,
    pub ships: Manifest<ShipKind>,
    pub cargo: Resources,
    pub departure_at: Timestamp,
    pub arrival_at: Timestamp,
    pub return_at: Option<Timestamp>,
}

impl FleetRow {
    pub fn decode(self) -> Result<Fleet, FleetDecodeError> {
        let status = FleetStatus::from_id(self.status_id).ok_or(FleetDecodeError::UnknownStatus {
            fleet_id: self.id,
            status_id: self.status_id,
        })?;
        let ships: Manifest<ShipKind> =
            serde_json::from_value(self.ships).map_err(|source| FleetDecodeError::Manifest {
                fleet_id: self.id,
                source,
            })?;

        Ok(Fleet {
            id: self.id,
            owner_id: self.owner_id,
            origin_planet_id: self.origin_planet_id,
            target: Coordinate::new(self.target_galaxy, self.target_system, self.target_slot),
            mission: Mission::from_id(self.mission_id),
            mission_id: self.mission_id,
            status,
            ships,
            cargo: Resources::new(self.metal, self.crystal, self.gas),
            departure_at: self.departure_at,
            arrival_at: self.arrival_at,
            return_at: self.return_at,
        })
    }
}

/// DTO for dispatching a fleet. Validation happens at the command boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFleet {
    pub owner_id: DbId,
    pub origin_planet_id: DbId,
    pub target: Coordinate,
    pub mission_id: StatusId,
    pub ships: Manifest<ShipKind>,
    pub cargo: Resources,
    pub departure_at: Timestamp,
    pub arrival_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn row(status_id: StatusId, mission_id: StatusId, ships: serde_json::Value) -> FleetRow {
        let now = Utc::now();
        FleetRow {
            id: 7,
            owner_id: 1,
            origin_planet_id: 2,
            target_galaxy: 1,
            target_system: 10,
            target_slot: 4,
            mission_id,
            status_id,
            ships,
            metal: 100.0,
            crystal: 0.0,
            gas: 0.0,
            departure_at: now,
            arrival_at: now,
            return_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn decodes_a_well_formed_row() {
        let fleet = row(1, 1, serde_json::json!({"small_cargo": 3}))
            .decode()
            .unwrap();
        assert_eq!(fleet.status, FleetStatus::Active);
        assert_eq!(fleet.mission, Some(Mission::Transport));
        assert_eq!(fleet.ships.get(ShipKind::SmallCargo), 3);
        assert_eq!(fleet.cargo.metal, 100.0);
        assert_eq!(fleet.target, Coordinate::new(1, 10, 4));
    }

    #[test]
    fn unknown_mission_decodes_as_none() {
        let fleet = row(1, 42, serde_json::json!({})).decode().unwrap();
        assert_eq!(fleet.mission, None);
        assert_eq!(fleet.mission_id, 42);
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let err = row(1, 1, serde_json::json!({"warbird": 1}))
            .decode()
            .unwrap_err();
        assert!(matches!(err, FleetDecodeError::Manifest { fleet_id: 7, .. }));
    }

    #[test]
    fn unknown_status_is_an_error() {
        let err = row(9, 1, serde_json::json!({})).decode().unwrap_err();
        assert!(matches!(
            err,
            FleetDecodeError::UnknownStatus {
                fleet_id: 7,
                status_id: 9
            }
        ));
    }
}
