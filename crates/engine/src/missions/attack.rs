//! Attack: fight the target's ships and defenses, plunder on victory.

use galaxy_core::combat::{resolve_checked, CombatInput, CombatOutcome, Winner};
use galaxy_core::resources::{Manifest, Resources};
use galaxy_core::types::{DbId, Timestamp};
use galaxy_core::units::ShipKind;
use galaxy_db::models::fleet::Fleet;
use galaxy_db::models::message::MessageCategory;
use galaxy_db::repositories::{InventoryRepo, PlanetRepo, ResourceRepo};
use sqlx::PgConnection;

use super::{describe_resources, describe_ships, MissionEnv, Resolution};
use crate::error::EngineError;
use crate::notifier::Notifier;
use crate::production::accumulate;

/// Share of the defender's stock taken by a victorious attacker.
pub const LOOT_SHARE: f64 = 0.5;

/// How a fight ends for the attacking fleet.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackSettlement {
    pub survivors: Manifest<ShipKind>,
    /// Every attacking ship was lost.
    pub destroyed: bool,
    /// Resources taken from the target.
    pub loot: Resources,
}

/// Apply combat losses to the attacker and work out the plunder.
///
/// `defender_stock` is the target ledger after accumulation.
pub fn settle(
    attacker_ships: &Manifest<ShipKind>,
    outcome: &CombatOutcome,
    defender_stock: Resources,
) -> AttackSettlement {
    let survivors = attacker_ships.subtract_floored(&outcome.attacker_losses);
    let destroyed = survivors.is_empty();
    let loot = if outcome.winner == Winner::Attacker && !destroyed {
        defender_stock.clamp_non_negative().scale(LOOT_SHARE)
    } else {
        Resources::ZERO
    };
    AttackSettlement {
        survivors,
        destroyed,
        loot,
    }
}

fn combat_report(fleet: &Fleet, outcome: &CombatOutcome, settlement: &AttackSettlement) -> String {
    let winner = match outcome.winner {
        Winner::Attacker => "the attacker",
        Winner::Defender => "the defender",
        Winner::Draw => "nobody",
    };
    let mut defender_losses = describe_ships(&outcome.defender_ship_losses);
    if !outcome.defender_defense_losses.is_empty() {
        let defenses = outcome
            .defender_defense_losses
            .iter()
            .map(|(kind, count)| format!("{count} {kind}"))
            .collect::<Vec<_>>()
            .join(", ");
        defender_losses = format!("{defender_losses}; defenses: {defenses}");
    }
    format!(
        "Battle at {} won by {winner} after {} round(s). \
         Attacker lost {}. Defender lost {defender_losses}. Loot: {}.",
        fleet.target,
        outcome.rounds,
        describe_ships(&outcome.attacker_losses),
        describe_resources(&settlement.loot),
    )
}

async fn abort(
    conn: &mut PgConnection,
    fleet: &Fleet,
    notifier: &mut Notifier,
    reason: &str,
) -> Result<Resolution, EngineError> {
    notifier
        .notify(
            conn,
            fleet.owner_id,
            MessageCategory::Combat,
            "Attack aborted",
            &format!("{reason} Your fleet is returning."),
        )
        .await?;
    Ok(Resolution::unchanged(fleet))
}

pub async fn resolve(
    env: &MissionEnv<'_>,
    conn: &mut PgConnection,
    fleet: &Fleet,
    notifier: &mut Notifier,
    now: Timestamp,
) -> Result<Resolution, EngineError> {
    let target = PlanetRepo::find_by_coordinate(conn, &fleet.target).await?;
    let (planet_id, defender_id): (DbId, DbId) = match target {
        Some(planet) => match planet.owner_id {
            Some(owner) if owner != fleet.owner_id => (planet.id, owner),
            Some(_) => {
                let reason = format!("The planet at {} is your own.", fleet.target);
                return abort(conn, fleet, notifier, &reason).await;
            }
            None => {
                let reason = format!("The planet at {} is uninhabited.", fleet.target);
                return abort(conn, fleet, notifier, &reason).await;
            }
        },
        None => {
            let reason = format!("There is no planet at {}.", fleet.target);
            return abort(conn, fleet, notifier, &reason).await;
        }
    };

    let ledger = accumulate(conn, env.bonuses, planet_id, now).await?;
    let input = CombatInput {
        attacker_ships: fleet.ships.clone(),
        defender_ships: InventoryRepo::ships(conn, planet_id).await?,
        defender_defenses: InventoryRepo::defenses(conn, planet_id).await?,
    };
    let outcome = resolve_checked(env.combat, &input);
    let settlement = settle(&fleet.ships, &outcome, ledger.resources());

    InventoryRepo::remove_ships_floored(conn, planet_id, &outcome.defender_ship_losses).await?;
    InventoryRepo::remove_defenses_floored(conn, planet_id, &outcome.defender_defense_losses)
        .await?;
    if !settlement.loot.is_zero() {
        ResourceRepo::debit_floored(conn, planet_id, &settlement.loot).await?;
    }

    tracing::info!(
        fleet_id = fleet.id,
        user_id = fleet.owner_id,
        defender_id,
        winner = ?outcome.winner,
        rounds = outcome.rounds,
        destroyed = settlement.destroyed,
        "Combat resolved"
    );

    let report = combat_report(fleet, &outcome, &settlement);
    notifier
        .notify(conn, fleet.owner_id, MessageCategory::Combat, "Combat report", &report)
        .await?;
    notifier
        .notify(conn, defender_id, MessageCategory::Combat, "Your planet was attacked", &report)
        .await?;

    if settlement.destroyed {
        return Ok(Resolution::destroyed());
    }
    Ok(Resolution::returning(
        settlement.survivors,
        fleet.cargo + settlement.loot,
    ))
}

#[cfg(test)]
mod tests {
    use galaxy_core::combat::AttritionResolver;
    use galaxy_core::units::DefenseKind;

    use super::*;

    fn outcome(winner: Winner, attacker_losses: &[(ShipKind, i64)]) -> CombatOutcome {
        CombatOutcome {
            winner,
            attacker_losses: attacker_losses.iter().copied().collect(),
            defender_ship_losses: Manifest::new(),
            defender_defense_losses: Manifest::new(),
            rounds: 1,
        }
    }

    #[test]
    fn victorious_attacker_takes_half_the_stock() {
        let ships: Manifest<ShipKind> = [(ShipKind::Destroyer, 5)].into_iter().collect();
        let settlement = settle(
            &ships,
            &outcome(Winner::Attacker, &[(ShipKind::Destroyer, 1)]),
            Resources::new(1000.0, 400.0, 10.0),
        );
        assert!(!settlement.destroyed);
        assert_eq!(settlement.survivors.get(ShipKind::Destroyer), 4);
        assert_eq!(settlement.loot, Resources::new(500.0, 200.0, 5.0));
    }

    #[test]
    fn wiped_out_attacker_is_destroyed_without_loot() {
        let ships: Manifest<ShipKind> = [(ShipKind::LightFighter, 3)].into_iter().collect();
        // Losses above the fleet size still floor at zero.
        let settlement = settle(
            &ships,
            &outcome(Winner::Attacker, &[(ShipKind::LightFighter, 10)]),
            Resources::new(1000.0, 0.0, 0.0),
        );
        assert!(settlement.destroyed);
        assert!(settlement.loot.is_zero());
    }

    #[test]
    fn defeat_or_draw_takes_no_loot() {
        let ships: Manifest<ShipKind> = [(ShipKind::Cruiser, 2)].into_iter().collect();
        for winner in [Winner::Defender, Winner::Draw] {
            let settlement = settle(&ships, &outcome(winner, &[]), Resources::new(9.0, 9.0, 9.0));
            assert!(!settlement.destroyed);
            assert!(settlement.loot.is_zero());
        }
    }

    #[test]
    fn destroyers_overrun_rocket_launchers() {
        let input = CombatInput {
            attacker_ships: [(ShipKind::Destroyer, 5)].into_iter().collect(),
            defender_ships: Manifest::new(),
            defender_defenses: [(DefenseKind::RocketLauncher, 50)].into_iter().collect(),
        };
        let outcome = resolve_checked(&AttritionResolver, &input);
        assert_eq!(outcome.winner, Winner::Attacker);
        assert_eq!(outcome.defender_defense_losses.get(DefenseKind::RocketLauncher), 50);

        let settlement = settle(&input.attacker_ships, &outcome, Resources::ZERO);
        assert!(!settlement.destroyed);
    }
}
