//! Expedition: venture into deep space and hope for the best.
//!
//! The outcome is drawn by the fleet processor from its injected RNG and
//! handed in, so this module stays deterministic.

use galaxy_core::expedition::ExpeditionOutcome;
use galaxy_core::types::Timestamp;
use galaxy_db::models::fleet::Fleet;
use galaxy_db::models::message::MessageCategory;
use sqlx::PgConnection;

use super::{describe_resources, describe_ships, Resolution};
use crate::error::EngineError;
use crate::notifier::Notifier;

/// Fold a drawn outcome into the fleet's payload.
pub fn apply_outcome(fleet: &Fleet, outcome: &ExpeditionOutcome) -> Resolution {
    match outcome {
        ExpeditionOutcome::FleetLost => Resolution::destroyed(),
        ExpeditionOutcome::Resources(found) => {
            Resolution::returning(fleet.ships.clone(), fleet.cargo + *found)
        }
        ExpeditionOutcome::Ships(found) => {
            let mut ships = fleet.ships.clone();
            ships.merge(found);
            Resolution::returning(ships, fleet.cargo)
        }
        ExpeditionOutcome::Nothing => Resolution::unchanged(fleet),
    }
}

fn report(outcome: &ExpeditionOutcome) -> (&'static str, String) {
    match outcome {
        ExpeditionOutcome::FleetLost => (
            "Expedition lost",
            "Contact with your expedition fleet was lost. Nothing came back.".to_string(),
        ),
        ExpeditionOutcome::Resources(found) => (
            "Expedition found resources",
            format!(
                "Your expedition found {} and is returning.",
                describe_resources(found)
            ),
        ),
        ExpeditionOutcome::Ships(found) => (
            "Expedition found ships",
            format!(
                "Your expedition found abandoned ships ({}) and is returning.",
                describe_ships(found)
            ),
        ),
        ExpeditionOutcome::Nothing => (
            "Expedition result",
            "Your expedition found nothing and is returning.".to_string(),
        ),
    }
}

pub async fn resolve(
    conn: &mut PgConnection,
    fleet: &Fleet,
    outcome: &ExpeditionOutcome,
    notifier: &mut Notifier,
    _now: Timestamp,
) -> Result<Resolution, EngineError> {
    let (title, body) = report(outcome);
    tracing::info!(fleet_id = fleet.id, user_id = fleet.owner_id, result = title, "Expedition resolved");
    notifier
        .notify(conn, fleet.owner_id, MessageCategory::Expedition, title, &body)
        .await?;
    Ok(apply_outcome(fleet, outcome))
}
