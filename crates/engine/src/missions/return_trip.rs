//! The inbound leg: scheduling it, and merging a fleet back home.

use chrono::Duration;
use galaxy_core::types::Timestamp;
use galaxy_db::models::fleet::Fleet;
use galaxy_db::models::message::MessageCategory;
use galaxy_db::models::status::FleetStatus;
use galaxy_db::repositories::{FleetRepo, InventoryRepo, PlanetRepo, ResourceRepo};
use sqlx::PgConnection;

use super::{describe_resources, describe_ships, MissionEnv};
use crate::error::EngineError;
use crate::notifier::Notifier;
use crate::production::accumulate;

/// Departure and arrival of the way home, leaving at `now`.
///
/// The trip takes as long as the outbound leg did, or `min_return` when
/// that leg was not positive.
pub fn return_leg(fleet: &Fleet, now: Timestamp, min_return: Duration) -> (Timestamp, Timestamp) {
    let outbound = fleet.arrival_at - fleet.departure_at;
    let duration = if outbound > Duration::zero() {
        outbound
    } else {
        min_return
    };
    (now, now + duration)
}

/// Merge a returned fleet into its origin planet and complete it.
pub async fn arrive_home(
    env: &MissionEnv<'_>,
    conn: &mut PgConnection,
    fleet: &Fleet,
    notifier: &mut Notifier,
    now: Timestamp,
) -> Result<(), EngineError> {
    let origin = fleet.origin_planet_id;
    let home = PlanetRepo::find_by_id(conn, origin)
        .await?
        .ok_or_else(|| EngineError::not_found("planet", origin))?;

    accumulate(conn, env.bonuses, origin, now).await?;
    InventoryRepo::add_ships(conn, origin, &fleet.ships).await?;
    ResourceRepo::credit(conn, origin, &fleet.cargo).await?;

    if !FleetRepo::mark_completed(conn, fleet.id, FleetStatus::Returning).await? {
        return Err(EngineError::InvalidState(format!(
            "fleet {} is no longer returning",
            fleet.id
        )));
    }

    let mut body = format!(
        "Your fleet returned to {} {} from {} with {}",
        home.name,
        home.coordinate(),
        fleet.target,
        describe_ships(&fleet.ships)
    );
    if !fleet.cargo.is_zero() {
        body.push_str(&format!(" carrying {}", describe_resources(&fleet.cargo)));
    }
    body.push('.');
    notifier
        .notify(conn, fleet.owner_id, MessageCategory::Fleet, "Fleet returned", &body)
        .await?;
    Ok(())
}
