//! Colonize: settle an empty slot with the arriving fleet.

use galaxy_core::types::Timestamp;
use galaxy_db::models::fleet::Fleet;
use galaxy_db::models::message::MessageCategory;
use galaxy_db::models::planet::{CreatePlanet, Planet};
use galaxy_db::repositories::{InventoryRepo, PlanetRepo};
use sqlx::PgConnection;

use super::{MissionEnv, Resolution};
use crate::error::EngineError;
use crate::notifier::Notifier;

/// Name given to every new colony.
pub const COLONY_NAME: &str = "Colony";

#[derive(Debug, Clone, PartialEq)]
pub enum ColonizePlan {
    Settle(CreatePlanet),
    SlotOccupied,
}

/// The new planet takes the fleet's cargo as its opening ledger.
pub fn plan(fleet: &Fleet, occupant: Option<&Planet>, fields_max: i32) -> ColonizePlan {
    if occupant.is_some() {
        return ColonizePlan::SlotOccupied;
    }
    ColonizePlan::Settle(CreatePlanet {
        owner_id: Some(fleet.owner_id),
        name: COLONY_NAME.to_string(),
        coordinate: fleet.target,
        fields_max,
        resources: fleet.cargo,
    })
}

pub async fn resolve(
    env: &MissionEnv<'_>,
    conn: &mut PgConnection,
    fleet: &Fleet,
    notifier: &mut Notifier,
    _now: Timestamp,
) -> Result<Resolution, EngineError> {
    let occupant = PlanetRepo::find_by_coordinate(conn, &fleet.target).await?;

    match plan(fleet, occupant.as_ref(), env.config.colony_fields_max) {
        ColonizePlan::Settle(input) => {
            let planet = PlanetRepo::create(conn, &input).await?;
            InventoryRepo::add_ships(conn, planet.id, &fleet.ships).await?;

            tracing::info!(
                fleet_id = fleet.id,
                user_id = fleet.owner_id,
                planet_id = planet.id,
                coordinate = %fleet.target,
                "Colony founded"
            );
            notifier
                .notify(
                    conn,
                    fleet.owner_id,
                    MessageCategory::Colonization,
                    "Colony founded",
                    &format!("Your fleet founded a new colony at {}.", fleet.target),
                )
                .await?;
            Ok(Resolution::complete(fleet))
        }
        ColonizePlan::SlotOccupied => {
            notifier
                .notify(
                    conn,
                    fleet.owner_id,
                    MessageCategory::Colonization,
                    "Colonization failed",
                    &format!(
                        "The slot at {} is already occupied. Your fleet is returning.",
                        fleet.target
                    ),
                )
                .await?;
            Ok(Resolution::unchanged(fleet))
        }
    }
}
