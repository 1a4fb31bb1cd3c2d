//! Construction cost tables.
//!
//! Buildings and research have a level-1 base cost that grows geometrically
//! by a per-kind factor. Ships and defenses have a flat unit cost.

use crate::resources::Resources;
use crate::units::{BuildingKind, DefenseKind, ResearchKind, ShipKind};

/// Base cost of the first level and the per-level growth factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelCost {
    pub base: Resources,
    pub factor: f64,
}

impl LevelCost {
    const fn new(metal: f64, crystal: f64, gas: f64, factor: f64) -> Self {
        Self {
            base: Resources {
                metal,
                crystal,
                gas,
            },
            factor,
        }
    }

    /// Cost of upgrading from `level - 1` to `level`.
    pub fn for_level(&self, level: i64) -> Resources {
        if level <= 0 {
            return Resources::ZERO;
        }
        self.base.scale(self.factor.powi((level - 1) as i32))
    }

    /// Total paid to reach `level` from zero: the sum of every step cost.
    pub fn cumulative(&self, level: i64) -> Resources {
        if level <= 0 {
            return Resources::ZERO;
        }
        let multiplier = if (self.factor - 1.0).abs() < f64::EPSILON {
            level as f64
        } else {
            (self.factor.powi(level as i32) - 1.0) / (self.factor - 1.0)
        };
        self.base.scale(multiplier)
    }
}

const fn unit(metal: f64, crystal: f64, gas: f64) -> Resources {
    Resources {
        metal,
        crystal,
        gas,
    }
}

pub fn building_cost(kind: BuildingKind) -> LevelCost {
    match kind {
        BuildingKind::MetalMine => LevelCost::new(60.0, 15.0, 0.0, 1.5),
        BuildingKind::CrystalMine => LevelCost::new(48.0, 24.0, 0.0, 1.6),
        BuildingKind::GasExtractor => LevelCost::new(225.0, 75.0, 0.0, 1.5),
        BuildingKind::SolarPlant => LevelCost::new(75.0, 30.0, 0.0, 1.5),
        BuildingKind::FusionReactor => LevelCost::new(900.0, 360.0, 180.0, 1.8),
        BuildingKind::RoboticsFactory => LevelCost::new(400.0, 120.0, 200.0, 2.0),
        BuildingKind::NaniteFactory => LevelCost::new(1_000_000.0, 500_000.0, 100_000.0, 2.0),
        BuildingKind::Shipyard => LevelCost::new(400.0, 200.0, 100.0, 2.0),
        BuildingKind::MetalStorage => LevelCost::new(1_000.0, 0.0, 0.0, 2.0),
        BuildingKind::CrystalStorage => LevelCost::new(1_000.0, 500.0, 0.0, 2.0),
        BuildingKind::GasTank => LevelCost::new(1_000.0, 1_000.0, 0.0, 2.0),
        BuildingKind::ResearchLab => LevelCost::new(200.0, 400.0, 200.0, 2.0),
        BuildingKind::MissileSilo => LevelCost::new(20_000.0, 20_000.0, 1_000.0, 2.0),
    }
}

pub fn research_cost(kind: ResearchKind) -> LevelCost {
    match kind {
        ResearchKind::EnergyTechnology => LevelCost::new(0.0, 800.0, 400.0, 2.0),
        ResearchKind::LaserTechnology => LevelCost::new(200.0, 100.0, 0.0, 2.0),
        ResearchKind::IonTechnology => LevelCost::new(1_000.0, 300.0, 100.0, 2.0),
        ResearchKind::HyperspaceTechnology => LevelCost::new(0.0, 4_000.0, 2_000.0, 2.0),
        ResearchKind::PlasmaTechnology => LevelCost::new(2_000.0, 4_000.0, 1_000.0, 2.0),
        ResearchKind::CombustionDrive => LevelCost::new(400.0, 0.0, 600.0, 2.0),
        ResearchKind::ImpulseDrive => LevelCost::new(2_000.0, 4_000.0, 600.0, 2.0),
        ResearchKind::HyperspaceDrive => LevelCost::new(10_000.0, 20_000.0, 6_000.0, 2.0),
        ResearchKind::EspionageTechnology => LevelCost::new(200.0, 1_000.0, 200.0, 2.0),
        ResearchKind::ComputerTechnology => LevelCost::new(0.0, 400.0, 600.0, 2.0),
        ResearchKind::Astrophysics => LevelCost::new(4_000.0, 8_000.0, 4_000.0, 1.75),
        ResearchKind::WeaponsTechnology => LevelCost::new(800.0, 200.0, 0.0, 2.0),
        ResearchKind::ShieldingTechnology => LevelCost::new(200.0, 600.0, 0.0, 2.0),
        ResearchKind::ArmourTechnology => LevelCost::new(1_000.0, 0.0, 0.0, 2.0),
    }
}

pub fn ship_cost(kind: ShipKind) -> Resources {
    match kind {
        ShipKind::SmallCargo => unit(2_000.0, 2_000.0, 0.0),
        ShipKind::LargeCargo => unit(6_000.0, 6_000.0, 0.0),
        ShipKind::LightFighter => unit(3_000.0, 1_000.0, 0.0),
        ShipKind::HeavyFighter => unit(6_000.0, 4_000.0, 0.0),
        ShipKind::Cruiser => unit(20_000.0, 7_000.0, 2_000.0),
        ShipKind::Battleship => unit(45_000.0, 15_000.0, 0.0),
        ShipKind::Battlecruiser => unit(30_000.0, 40_000.0, 15_000.0),
        ShipKind::Bomber => unit(50_000.0, 25_000.0, 15_000.0),
        ShipKind::Destroyer => unit(60_000.0, 50_000.0, 15_000.0),
        ShipKind::Deathstar => unit(5_000_000.0, 4_000_000.0, 1_000_000.0),
        ShipKind::Recycler => unit(10_000.0, 6_000.0, 2_000.0),
        ShipKind::EspionageProbe => unit(0.0, 1_000.0, 0.0),
        ShipKind::ColonyShip => unit(10_000.0, 20_000.0, 10_000.0),
    }
}

pub fn defense_cost(kind: DefenseKind) -> Resources {
    match kind {
        DefenseKind::RocketLauncher => unit(2_000.0, 0.0, 0.0),
        DefenseKind::LightLaser => unit(1_500.0, 500.0, 0.0),
        DefenseKind::HeavyLaser => unit(6_000.0, 2_000.0, 0.0),
        DefenseKind::GaussCannon => unit(20_000.0, 15_000.0, 2_000.0),
        DefenseKind::IonCannon => unit(5_000.0, 3_000.0, 0.0),
        DefenseKind::PlasmaTurret => unit(50_000.0, 50_000.0, 30_000.0),
        DefenseKind::SmallShieldDome => unit(10_000.0, 10_000.0, 0.0),
        DefenseKind::LargeShieldDome => unit(50_000.0, 50_000.0, 0.0),
    }
}
