//! Deploy: station the fleet at another planet of the same owner.

use galaxy_core::types::{DbId, Timestamp};
use galaxy_db::models::fleet::Fleet;
use galaxy_db::models::message::MessageCategory;
use galaxy_db::models::planet::Planet;
use galaxy_db::repositories::{InventoryRepo, PlanetRepo, ResourceRepo};
use sqlx::PgConnection;

use super::{MissionEnv, Resolution};
use crate::error::EngineError;
use crate::notifier::Notifier;
use crate::production::accumulate;

/// The planet to merge into, if the target is the fleet owner's.
pub fn destination(fleet: &Fleet, target: Option<&Planet>) -> Option<DbId> {
    target
        .filter(|planet| planet.owner_id == Some(fleet.owner_id))
        .map(|planet| planet.id)
}

pub async fn resolve(
    env: &MissionEnv<'_>,
    conn: &mut PgConnection,
    fleet: &Fleet,
    notifier: &mut Notifier,
    now: Timestamp,
) -> Result<Resolution, EngineError> {
    let target = PlanetRepo::find_by_coordinate(conn, &fleet.target).await?;

    let Some(planet_id) = destination(fleet, target.as_ref()) else {
        notifier
            .notify(
                conn,
                fleet.owner_id,
                MessageCategory::Fleet,
                "Deployment failed",
                &format!(
                    "You have no planet at {}. Your fleet is returning.",
                    fleet.target
                ),
            )
            .await?;
        return Ok(Resolution::unchanged(fleet));
    };

    accumulate(conn, env.bonuses, planet_id, now).await?;
    InventoryRepo::add_ships(conn, planet_id, &fleet.ships).await?;
    ResourceRepo::credit(conn, planet_id, &fleet.cargo)
        .await?
        .ok_or_else(|| EngineError::not_found("planet", planet_id))?;

    notifier
        .notify(
            conn,
            fleet.owner_id,
            MessageCategory::Fleet,
            "Fleet deployed",
            &format!("Your fleet is now stationed at {}.", fleet.target),
        )
        .await?;
    Ok(Resolution::complete(fleet))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use galaxy_core::resources::Resources;
    use galaxy_core::units::ShipKind;
    use galaxy_db::models::status::Mission;

    use super::*;
    use crate::missions::test_support::fleet;

    fn planet(owner_id: Option<DbId>) -> Planet {
        let now = Utc::now();
        Planet {
            id: 77,
            owner_id,
            name: "Outpost".to_string(),
            galaxy: 1,
            system: 2,
            slot: 3,
            fields_used: 0,
            fields_max: 163,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn deploys_only_to_own_planets() {
        let fleet = fleet(Mission::Deploy, &[(ShipKind::Cruiser, 4)], Resources::ZERO);
        assert_eq!(destination(&fleet, Some(&planet(Some(fleet.owner_id)))), Some(77));
        assert_eq!(destination(&fleet, Some(&planet(Some(fleet.owner_id + 1)))), None);
        assert_eq!(destination(&fleet, Some(&planet(None))), None);
        assert_eq!(destination(&fleet, None), None);
    }
}
