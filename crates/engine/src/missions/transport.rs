//! Transport: unload cargo at the target planet and fly home.

use galaxy_core::resources::Resources;
use galaxy_core::types::{DbId, Timestamp};
use galaxy_db::models::fleet::Fleet;
use galaxy_db::models::message::MessageCategory;
use galaxy_db::models::planet::Planet;
use galaxy_db::repositories::{PlanetRepo, ResourceRepo};
use sqlx::PgConnection;

use super::{describe_resources, MissionEnv, Resolution};
use crate::error::EngineError;
use crate::notifier::Notifier;
use crate::production::accumulate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportPlan {
    /// Unload at `planet_id`. `recipient` is the planet owner when it is
    /// someone other than the sender.
    Deliver {
        planet_id: DbId,
        recipient: Option<DbId>,
    },
    TargetMissing,
}

pub fn plan(fleet: &Fleet, target: Option<&Planet>) -> TransportPlan {
    match target {
        Some(planet) => TransportPlan::Deliver {
            planet_id: planet.id,
            recipient: planet.owner_id.filter(|&owner| owner != fleet.owner_id),
        },
        None => TransportPlan::TargetMissing,
    }
}

pub async fn resolve(
    env: &MissionEnv<'_>,
    conn: &mut PgConnection,
    fleet: &Fleet,
    notifier: &mut Notifier,
    now: Timestamp,
) -> Result<Resolution, EngineError> {
    let target = PlanetRepo::find_by_coordinate(conn, &fleet.target).await?;

    match plan(fleet, target.as_ref()) {
        TransportPlan::Deliver {
            planet_id,
            recipient,
        } => {
            accumulate(conn, env.bonuses, planet_id, now).await?;
            ResourceRepo::credit(conn, planet_id, &fleet.cargo)
                .await?
                .ok_or_else(|| EngineError::not_found("planet", planet_id))?;

            let delivered = describe_resources(&fleet.cargo);
            notifier
                .notify(
                    conn,
                    fleet.owner_id,
                    MessageCategory::Fleet,
                    "Transport arrived",
                    &format!("Your fleet delivered {delivered} to {}.", fleet.target),
                )
                .await?;
            if let Some(recipient) = recipient {
                notifier
                    .notify(
                        conn,
                        recipient,
                        MessageCategory::Fleet,
                        "Incoming transport",
                        &format!("A fleet delivered {delivered} to your planet at {}.", fleet.target),
                    )
                    .await?;
            }

            Ok(Resolution::returning(fleet.ships.clone(), Resources::ZERO))
        }
        TransportPlan::TargetMissing => {
            notifier
                .notify(
                    conn,
                    fleet.owner_id,
                    MessageCategory::Fleet,
                    "Transport failed",
                    &format!("There is no planet at {}. Your fleet is returning.", fleet.target),
                )
                .await?;
            Ok(Resolution::unchanged(fleet))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use galaxy_core::units::ShipKind;
    use galaxy_db::models::status::Mission;

    use super::*;
    use crate::missions::test_support::fleet;

    fn planet(owner_id: Option<DbId>) -> Planet {
        let now = Utc::now();
        Planet {
            id: 55,
            owner_id,
            name: "Target".to_string(),
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
    fn delivers_to_foreign_planet_and_notifies_owner() {
        let fleet = fleet(Mission::Transport, &[(ShipKind::SmallCargo, 1)], Resources::new(100.0, 0.0, 0.0));
        assert_eq!(
            plan(&fleet, Some(&planet(Some(20)))),
            TransportPlan::Deliver {
                planet_id: 55,
                recipient: Some(20)
            }
        );
    }

    #[test]
    fn own_or_unowned_planet_has_no_second_recipient() {
        let fleet = fleet(Mission::Transport, &[(ShipKind::SmallCargo, 1)], Resources::ZERO);
        assert_eq!(
            plan(&fleet, Some(&planet(Some(fleet.owner_id)))),
            TransportPlan::Deliver {
                planet_id: 55,
                recipient: None
            }
        );
        assert_eq!(
            plan(&fleet, Some(&planet(None))),
            TransportPlan::Deliver {
                planet_id: 55,
                recipient: None
            }
        );
    }

    #[test]
    fn missing_target_is_reported() {
        let fleet = fleet(Mission::Transport, &[(ShipKind::SmallCargo, 1)], Resources::ZERO);
        assert_eq!(plan(&fleet, None), TransportPlan::TargetMissing);
    }
}
