//! Closed unit-kind enums for buildings, research, ships and defenses.
//!
//! Every inventory table stores one column per kind. Each enum carries the
//! total mapping between variant and storage column, so a query never looks
//! up a field by an unchecked string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A kind enum whose variants map one-to-one onto storage columns.
pub trait ColumnKind: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// Every variant, in storage column order.
    const ALL: &'static [Self];

    fn column(self) -> &'static str;

    /// Comma-separated column list for `SELECT` clauses.
    fn column_list() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.column())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

macro_rules! define_kind_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $column:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in storage column order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Storage column holding this kind's level or count.
            pub fn column(self) -> &'static str {
                match self {
                    $( $name::$variant => $column ),+
                }
            }

            /// Inverse of [`column`](Self::column).
            pub fn from_column(column: &str) -> Option<Self> {
                match column {
                    $( $column => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl ColumnKind for $name {
            const ALL: &'static [$name] = $name::ALL;

            fn column(self) -> &'static str {
                $name::column(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.column())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_column(s).ok_or_else(|| {
                    CoreError::Validation(format!("Unknown {} '{s}'", stringify!($name)))
                })
            }
        }
    };
}

define_kind_enum! {
    /// Planet buildings. Values are levels.
    BuildingKind {
        MetalMine => "metal_mine",
        CrystalMine => "crystal_mine",
        GasExtractor => "gas_extractor",
        SolarPlant => "solar_plant",
        FusionReactor => "fusion_reactor",
        RoboticsFactory => "robotics_factory",
        NaniteFactory => "nanite_factory",
        Shipyard => "shipyard",
        MetalStorage => "metal_storage",
        CrystalStorage => "crystal_storage",
        GasTank => "gas_tank",
        ResearchLab => "research_lab",
        MissileSilo => "missile_silo",
    }
}

define_kind_enum! {
    /// Per-user research. Values are levels.
    ResearchKind {
        EnergyTechnology => "energy_technology",
        LaserTechnology => "laser_technology",
        IonTechnology => "ion_technology",
        HyperspaceTechnology => "hyperspace_technology",
        PlasmaTechnology => "plasma_technology",
        CombustionDrive => "combustion_drive",
        ImpulseDrive => "impulse_drive",
        HyperspaceDrive => "hyperspace_drive",
        EspionageTechnology => "espionage_technology",
        ComputerTechnology => "computer_technology",
        Astrophysics => "astrophysics",
        WeaponsTechnology => "weapons_technology",
        ShieldingTechnology => "shielding_technology",
        ArmourTechnology => "armour_technology",
    }
}

define_kind_enum! {
    /// Mobile units. Values are counts.
    ShipKind {
        SmallCargo => "small_cargo",
        LargeCargo => "large_cargo",
        LightFighter => "light_fighter",
        HeavyFighter => "heavy_fighter",
        Cruiser => "cruiser",
        Battleship => "battleship",
        Battlecruiser => "battlecruiser",
        Bomber => "bomber",
        Destroyer => "destroyer",
        Deathstar => "deathstar",
        Recycler => "recycler",
        EspionageProbe => "espionage_probe",
        ColonyShip => "colony_ship",
    }
}

define_kind_enum! {
    /// Stationary planetary defenses. Values are counts.
    DefenseKind {
        RocketLauncher => "rocket_launcher",
        LightLaser => "light_laser",
        HeavyLaser => "heavy_laser",
        GaussCannon => "gauss_cannon",
        IonCannon => "ion_cannon",
        PlasmaTurret => "plasma_turret",
        SmallShieldDome => "small_shield_dome",
        LargeShieldDome => "large_shield_dome",
    }
}

/// Anything a shipyard order can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Ship(ShipKind),
    Defense(DefenseKind),
}

impl UnitKind {
    /// Storage column on `planet_ships` or `planet_defenses`.
    pub fn column(self) -> &'static str {
        match self {
            UnitKind::Ship(kind) => kind.column(),
            UnitKind::Defense(kind) => kind.column(),
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for UnitKind {
    type Err = CoreError;

    /// Ship and defense column names are disjoint, so a bare name is
    /// unambiguous.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(kind) = ShipKind::from_column(s) {
            return Ok(UnitKind::Ship(kind));
        }
        if let Some(kind) = DefenseKind::from_column(s) {
            return Ok(UnitKind::Defense(kind));
        }
        Err(CoreError::Validation(format!("Unknown unit kind '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn serde_name<T: Serialize>(value: T) -> String {
        serde_json::to_value(value)
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn serde_names_match_storage_columns() {
        for kind in BuildingKind::ALL {
            assert_eq!(serde_name(kind), kind.column());
        }
        for kind in ResearchKind::ALL {
            assert_eq!(serde_name(kind), kind.column());
        }
        for kind in ShipKind::ALL {
            assert_eq!(serde_name(kind), kind.column());
        }
        for kind in DefenseKind::ALL {
            assert_eq!(serde_name(kind), kind.column());
        }
    }

    #[test]
    fn column_mapping_round_trips_for_every_kind() {
        for &kind in ShipKind::ALL {
            assert_eq!(ShipKind::from_column(kind.column()), Some(kind));
        }
        for &kind in DefenseKind::ALL {
            assert_eq!(DefenseKind::from_column(kind.column()), Some(kind));
        }
    }

    #[test]
    fn ship_and_defense_columns_are_disjoint() {
        for ship in ShipKind::ALL {
            assert!(DefenseKind::from_column(ship.column()).is_none());
        }
    }

    #[test]
    fn unit_kind_parses_ships_and_defenses() {
        assert_eq!(
            "destroyer".parse::<UnitKind>().unwrap(),
            UnitKind::Ship(ShipKind::Destroyer)
        );
        assert_eq!(
            "rocket_launcher".parse::<UnitKind>().unwrap(),
            UnitKind::Defense(DefenseKind::RocketLauncher)
        );
    }

    #[test]
    fn column_list_covers_every_kind() {
        let list = DefenseKind::column_list();
        assert!(list.starts_with("rocket_launcher, light_laser"));
        assert_eq!(list.split(", ").count(), DefenseKind::ALL.len());
    }

    #[test]
    fn unknown_kind_is_a_validation_error() {
        let err = "warp_core".parse::<BuildingKind>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!("warp_core".parse::<UnitKind>().is_err());
    }
}
