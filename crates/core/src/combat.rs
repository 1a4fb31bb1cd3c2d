//! Combat resolution contract and the default resolver.
//!
//! The tick engine only depends on [`CombatResolver`]. Any implementation
//! is run through [`resolve_checked`], which enforces the output contract:
//! losses never exceed the forces that entered the fight and at least one
//! round is reported.

use serde::Serialize;

use crate::costs::{defense_cost, ship_cost};
use crate::resources::Manifest;
use crate::units::{DefenseKind, ShipKind};

/// Upper bound on reported rounds for the default resolver.
pub const MAX_ROUNDS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Attacker,
    Defender,
    Draw,
}

/// Forces entering a fight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatInput {
    pub attacker_ships: Manifest<ShipKind>,
    pub defender_ships: Manifest<ShipKind>,
    pub defender_defenses: Manifest<DefenseKind>,
}

/// Result of a fight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatOutcome {
    pub winner: Winner,
    pub attacker_losses: Manifest<ShipKind>,
    pub defender_ship_losses: Manifest<ShipKind>,
    pub defender_defense_losses: Manifest<DefenseKind>,
    pub rounds: u32,
}

/// A pluggable combat algorithm.
pub trait CombatResolver: Send + Sync {
    fn resolve(&self, input: &CombatInput) -> CombatOutcome;
}

/// Run `resolver` and clamp its output to the contract.
pub fn resolve_checked<R: CombatResolver + ?Sized>(
    resolver: &R,
    input: &CombatInput,
) -> CombatOutcome {
    let raw = resolver.resolve(input);
    CombatOutcome {
        winner: raw.winner,
        attacker_losses: raw.attacker_losses.capped_by(&input.attacker_ships),
        defender_ship_losses: raw.defender_ship_losses.capped_by(&input.defender_ships),
        defender_defense_losses: raw
            .defender_defense_losses
            .capped_by(&input.defender_defenses),
        rounds: raw.rounds.max(1),
    }
}

// ---------------------------------------------------------------------------
// Default resolver
// ---------------------------------------------------------------------------

/// Single-exchange attrition over structural strength.
///
/// Each unit's strength is its metal + crystal cost. The stronger side wins;
/// each side loses the fraction `enemy strength / own strength` (capped at
/// 1) of every unit kind, rounded up. No rapid fire, shields or targeting.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttritionResolver;

fn ship_strength(kind: ShipKind) -> f64 {
    let cost = ship_cost(kind);
    cost.metal + cost.crystal
}

fn defense_strength(kind: DefenseKind) -> f64 {
    let cost = defense_cost(kind);
    cost.metal + cost.crystal
}

fn fleet_strength(ships: &Manifest<ShipKind>) -> f64 {
    ships
        .iter()
        .map(|(kind, count)| ship_strength(kind) * count as f64)
        .sum()
}

fn defense_total(defenses: &Manifest<DefenseKind>) -> f64 {
    defenses
        .iter()
        .map(|(kind, count)| defense_strength(kind) * count as f64)
        .sum()
}

fn loss_fraction(own: f64, enemy: f64) -> f64 {
    if own <= 0.0 {
        return 0.0;
    }
    (enemy / own).min(1.0)
}

fn apply_fraction<K: Ord + Copy>(units: &Manifest<K>, fraction: f64) -> Manifest<K> {
    units
        .iter()
        .map(|(kind, count)| {
            let lost = (count as f64 * fraction).ceil() as i64;
            (kind, lost.min(count))
        })
        .collect()
}

impl CombatResolver for AttritionResolver {
    fn resolve(&self, input: &CombatInput) -> CombatOutcome {
        let attack = fleet_strength(&input.attacker_ships);
        let defense =
            fleet_strength(&input.defender_ships) + defense_total(&input.defender_defenses);

        let winner = if attack > defense {
            Winner::Attacker
        } else if defense > attack {
            Winner::Defender
        } else {
            Winner::Draw
        };

        let attacker_fraction = loss_fraction(attack, defense);
        let defender_fraction = loss_fraction(defense, attack);

        let wiped_out = attacker_fraction >= 1.0 || defender_fraction >= 1.0;

        CombatOutcome {
            winner,
            attacker_losses: apply_fraction(&input.attacker_ships, attacker_fraction),
            defender_ship_losses: apply_fraction(&input.defender_ships, defender_fraction),
            defender_defense_losses: apply_fraction(&input.defender_defenses, defender_fraction),
            rounds: if wiped_out { 1 } else { MAX_ROUNDS },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
