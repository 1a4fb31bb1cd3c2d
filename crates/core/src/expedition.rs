//! Expedition outcome draws.
//!
//! One roll in `0..100` picks the category: 10% total loss, 30% resource
//! find, 30% ship find, 30% nothing. Finds are bounded random bundles.

use rand::Rng;

use crate::resources::{Manifest, Resources};
use crate::units::ShipKind;

pub const LOSS_PERCENT: u32 = 10;
pub const RESOURCE_FIND_PERCENT: u32 = 30;
pub const SHIP_FIND_PERCENT: u32 = 30;

/// Metal found on a resource find; crystal is half, gas a quarter.
pub const MIN_METAL_FIND: i64 = 5_000;
pub const MAX_METAL_FIND: i64 = 50_000;

pub const MIN_SHIP_FIND: i64 = 1;
pub const MAX_SHIP_FIND: i64 = 10;

/// Ship kinds an expedition can come back with.
pub const FINDABLE_SHIPS: [ShipKind; 5] = [
    ShipKind::SmallCargo,
    ShipKind::LargeCargo,
    ShipKind::LightFighter,
    ShipKind::HeavyFighter,
    ShipKind::EspionageProbe,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpeditionCategory {
    FleetLost,
    ResourceFind,
    ShipFind,
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpeditionOutcome {
    FleetLost,
    Resources(Resources),
    Ships(Manifest<ShipKind>),
    Nothing,
}

/// Map a roll in `0..100` to its category.
pub fn categorize(roll: u32) -> ExpeditionCategory {
    if roll < LOSS_PERCENT {
        ExpeditionCategory::FleetLost
    } else if roll < LOSS_PERCENT + RESOURCE_FIND_PERCENT {
        ExpeditionCategory::ResourceFind
    } else if roll < LOSS_PERCENT + RESOURCE_FIND_PERCENT + SHIP_FIND_PERCENT {
        ExpeditionCategory::ShipFind
    } else {
        ExpeditionCategory::Nothing
    }
}

pub fn draw_resources<R: Rng + ?Sized>(rng: &mut R) -> Resources {
    let metal = rng.random_range(MIN_METAL_FIND..=MAX_METAL_FIND) as f64;
    Resources::new(metal, (metal / 2.0).floor(), (metal / 4.0).floor())
}

pub fn draw_ships<R: Rng + ?Sized>(rng: &mut R) -> Manifest<ShipKind> {
    let kind = FINDABLE_SHIPS[rng.random_range(0..FINDABLE_SHIPS.len())];
    let count = rng.random_range(MIN_SHIP_FIND..=MAX_SHIP_FIND);
    [(kind, count)].into_iter().collect()
}

/// Draw a full expedition outcome.
pub fn draw_outcome<R: Rng + ?Sized>(rng: &mut R) -> ExpeditionOutcome {
    match categorize(rng.random_range(0..100)) {
        ExpeditionCategory::FleetLost => ExpeditionOutcome::FleetLost,
        ExpeditionCategory::ResourceFind => ExpeditionOutcome::Resources(draw_resources(rng)),
        ExpeditionCategory::ShipFind => ExpeditionOutcome::Ships(draw_ships(rng)),
        ExpeditionCategory::Nothing => ExpeditionOutcome::Nothing,
    }
}
