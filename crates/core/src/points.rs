//! Score derived from everything a player has built or flies.

use crate::costs::{building_cost, defense_cost, research_cost, ship_cost};
use crate::resources::{Manifest, Resources};
use crate::units::{BuildingKind, DefenseKind, ResearchKind, ShipKind};

/// Resource units per score point.
pub const RESOURCES_PER_POINT: f64 = 1000.0;

/// Current holdings of one player, as read from storage.
#[derive(Debug, Clone, Default)]
pub struct ScoreSnapshot {
    /// Building levels, one manifest per owned planet.
    pub buildings: Vec<Manifest<BuildingKind>>,
    /// Standing ships per planet plus the manifests of fleets in flight.
    pub ships: Vec<Manifest<ShipKind>>,
    pub defenses: Vec<Manifest<DefenseKind>>,
    pub research: Manifest<ResearchKind>,
}

/// Total resources invested, valued at construction cost.
pub fn invested(snapshot: &ScoreSnapshot) -> Resources {
    let mut total = Resources::ZERO;

    for levels in &snapshot.buildings {
        for (kind, level) in levels.iter() {
            total += building_cost(kind).cumulative(level);
        }
    }
    for (kind, level) in snapshot.research.iter() {
        total += research_cost(kind).cumulative(level);
    }
    for ships in &snapshot.ships {
        for (kind, count) in ships.iter() {
            total += ship_cost(kind).scale(count as f64);
        }
    }
    for defenses in &snapshot.defenses {
        for (kind, count) in defenses.iter() {
            total += defense_cost(kind).scale(count as f64);
        }
    }

    total
}

pub fn score(snapshot: &ScoreSnapshot) -> i64 {
    (invested(snapshot).total() / RESOURCES_PER_POINT).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_account_scores_zero() {
        assert_eq!(score(&ScoreSnapshot::default()), 0);
    }

    #[test]
    fn ships_in_flight_count_like_standing_ships() {
        let standing = ScoreSnapshot {
            ships: vec![[(ShipKind::LargeCargo, 10)].into_iter().collect()],
            ..Default::default()
        };
        let split = ScoreSnapshot {
            ships: vec![
                [(ShipKind::LargeCargo, 4)].into_iter().collect(),
                [(ShipKind::LargeCargo, 6)].into_iter().collect(),
            ],
            ..Default::default()
        };
        assert_eq!(score(&standing), 120);
        assert_eq!(score(&standing), score(&split));
    }

    #[test]
    fn building_levels_use_cumulative_cost() {
        let snapshot = ScoreSnapshot {
            buildings: vec![[(BuildingKind::Shipyard, 3)].into_iter().collect()],
            ..Default::default()
        };
        // (400 + 200 + 100) * (1 + 2 + 4) = 4900
        assert_eq!(score(&snapshot), 4);
    }

    #[test]
    fn score_is_stable_for_identical_input() {
        let snapshot = ScoreSnapshot {
            buildings: vec![[(BuildingKind::MetalMine, 12)].into_iter().collect()],
            defenses: vec![[(DefenseKind::GaussCannon, 3)].into_iter().collect()],
            research: [(ResearchKind::Astrophysics, 4)].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(score(&snapshot), score(&snapshot.clone()));
    }
}
