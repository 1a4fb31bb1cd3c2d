//! Resource production math.
//!
//! Mines produce `base × level × growth^level` per hour. Energy buildings
//! produce energy on the same curve and mines consume it. When consumption
//! exceeds production every mine is throttled by `produced / consumed`.
//! Natural production is never throttled.

use serde::Serialize;

use crate::resources::{Manifest, Resources};
use crate::units::BuildingKind;

// ---------------------------------------------------------------------------
// Curve constants (per hour)
// ---------------------------------------------------------------------------

pub const SECS_PER_HOUR: f64 = 3600.0;

/// Growth base shared by mines, solar plants and consumption.
pub const MINE_GROWTH: f64 = 1.1;
/// Growth base for fusion reactor output.
pub const FUSION_GROWTH: f64 = 1.05;

pub const METAL_MINE_BASE: f64 = 30.0;
pub const CRYSTAL_MINE_BASE: f64 = 20.0;
pub const GAS_EXTRACTOR_BASE: f64 = 10.0;

/// Flat production every planet has regardless of buildings.
pub const NATURAL_PRODUCTION: Resources = Resources {
    metal: 30.0,
    crystal: 15.0,
    gas: 0.0,
};

pub const SOLAR_PLANT_BASE: f64 = 20.0;
pub const FUSION_REACTOR_BASE: f64 = 30.0;

pub const METAL_MINE_ENERGY: f64 = 10.0;
pub const CRYSTAL_MINE_ENERGY: f64 = 10.0;
pub const GAS_EXTRACTOR_ENERGY: f64 = 20.0;

// ---------------------------------------------------------------------------
// Bonuses
// ---------------------------------------------------------------------------

/// What a production bonus applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Metal,
    Crystal,
    Gas,
    Energy,
}

impl BonusKind {
    pub const ALL: [BonusKind; 4] = [
        BonusKind::Metal,
        BonusKind::Crystal,
        BonusKind::Gas,
        BonusKind::Energy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BonusKind::Metal => "metal",
            BonusKind::Crystal => "crystal",
            BonusKind::Gas => "gas",
            BonusKind::Energy => "energy",
        }
    }
}

/// Percent bonuses, summed across commander and booster sources.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductionBonuses {
    pub metal: f64,
    pub crystal: f64,
    pub gas: f64,
    pub energy: f64,
}

impl ProductionBonuses {
    pub fn add(&mut self, kind: BonusKind, percent: f64) {
        match kind {
            BonusKind::Metal => self.metal += percent,
            BonusKind::Crystal => self.crystal += percent,
            BonusKind::Gas => self.gas += percent,
            BonusKind::Energy => self.energy += percent,
        }
    }

    fn multiplier(percent: f64) -> f64 {
        (1.0 + percent / 100.0).max(0.0)
    }
}

// ---------------------------------------------------------------------------
// Production report
// ---------------------------------------------------------------------------

/// Derived production figures for one planet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductionReport {
    /// Per-second mine rates after bonuses, before the energy factor.
    pub rates: Resources,
    /// Per-second natural production, independent of energy.
    pub natural: Resources,
    pub energy_produced: f64,
    pub energy_consumed: f64,
    /// Multiplier in `[0, 1]`; below 1 only when energy is short.
    pub factor: f64,
}

impl ProductionReport {
    /// Instantaneous energy balance stored on the ledger.
    pub fn energy_balance(&self) -> f64 {
        self.energy_produced - self.energy_consumed
    }
}

fn curve(base: f64, level: i64, growth: f64) -> f64 {
    if level <= 0 {
        return 0.0;
    }
    base * level as f64 * growth.powi(level as i32)
}

/// Throttle for a planet whose consumption exceeds production.
///
/// Falls linearly from 1 to 0 as the deficit grows instead of snapping to a
/// fixed penalty.
pub fn energy_factor(produced: f64, consumed: f64) -> f64 {
    if consumed <= 0.0 || produced >= consumed {
        return 1.0;
    }
    (produced / consumed).clamp(0.0, 1.0)
}

/// Compute rates and energy figures from building levels and bonuses.
pub fn production_report(
    buildings: &Manifest<BuildingKind>,
    bonuses: &ProductionBonuses,
) -> ProductionReport {
    let metal_level = buildings.get(BuildingKind::MetalMine);
    let crystal_level = buildings.get(BuildingKind::CrystalMine);
    let gas_level = buildings.get(BuildingKind::GasExtractor);

    let hourly = Resources::new(
        curve(METAL_MINE_BASE, metal_level, MINE_GROWTH)
            * ProductionBonuses::multiplier(bonuses.metal),
        curve(CRYSTAL_MINE_BASE, crystal_level, MINE_GROWTH)
            * ProductionBonuses::multiplier(bonuses.crystal),
        curve(GAS_EXTRACTOR_BASE, gas_level, MINE_GROWTH)
            * ProductionBonuses::multiplier(bonuses.gas),
    );

    let energy_produced = (curve(
        SOLAR_PLANT_BASE,
        buildings.get(BuildingKind::SolarPlant),
        MINE_GROWTH,
    ) + curve(
        FUSION_REACTOR_BASE,
        buildings.get(BuildingKind::FusionReactor),
        FUSION_GROWTH,
    )) * ProductionBonuses::multiplier(bonuses.energy);

    let energy_consumed = curve(METAL_MINE_ENERGY, metal_level, MINE_GROWTH)
        + curve(CRYSTAL_MINE_ENERGY, crystal_level, MINE_GROWTH)
        + curve(GAS_EXTRACTOR_ENERGY, gas_level, MINE_GROWTH);

    ProductionReport {
        rates: hourly.scale(1.0 / SECS_PER_HOUR),
        natural: NATURAL_PRODUCTION.scale(1.0 / SECS_PER_HOUR),
        energy_produced,
        energy_consumed,
        factor: energy_factor(energy_produced, energy_consumed),
    }
}

/// New ledger totals after `seconds` of production.
///
/// `old + rate × seconds × factor + natural × seconds`, floored at zero.
pub fn accrue(ledger: Resources, report: &ProductionReport, seconds: f64) -> Resources {
    if seconds <= 0.0 {
        return ledger;
    }
    let mined = report.rates.scale(seconds * report.factor);
    (ledger + mined + report.natural.scale(seconds)).clamp_non_negative()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
