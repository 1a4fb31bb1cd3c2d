//! Mission handlers.
//!
//! Each handler resolves an arrived `active` fleet against its target and
//! returns a [`Resolution`]: the fleet's surviving payload and what happens
//! to it next. The decision itself is a pure function of the fleet and the
//! target snapshot, kept next to each handler so it can be tested without a
//! database. The fleet processor applies the disposition.

use galaxy_core::combat::CombatResolver;
use galaxy_core::resources::{Manifest, Resources};
use galaxy_core::units::ShipKind;
use galaxy_db::models::fleet::Fleet;

use crate::bonus::BonusProvider;
use crate::config::EngineConfig;

pub mod attack;
pub mod colonize;
pub mod deploy;
pub mod expedition;
pub mod return_trip;
pub mod transport;

/// Shared collaborators for mission handlers.
pub struct MissionEnv<'a> {
    pub config: &'a EngineConfig,
    pub combat: &'a dyn CombatResolver,
    pub bonuses: &'a dyn BonusProvider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Fly home with the resolved payload.
    Return,
    /// Merged into the target; the fleet is done.
    Complete,
    /// Lost with everything aboard.
    Destroy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub disposition: Disposition,
    pub ships: Manifest<ShipKind>,
    pub cargo: Resources,
}

impl Resolution {
    pub fn returning(ships: Manifest<ShipKind>, cargo: Resources) -> Self {
        Self {
            disposition: Disposition::Return,
            ships,
            cargo,
        }
    }

    /// Return with the payload the fleet left with.
    pub fn unchanged(fleet: &Fleet) -> Self {
        Self::returning(fleet.ships.clone(), fleet.cargo)
    }

    pub fn complete(fleet: &Fleet) -> Self {
        Self {
            disposition: Disposition::Complete,
            ships: fleet.ships.clone(),
            cargo: fleet.cargo,
        }
    }

    pub fn destroyed() -> Self {
        Self {
            disposition: Disposition::Destroy,
            ships: Manifest::new(),
            cargo: Resources::ZERO,
        }
    }
}

/// Human-readable ship list for message bodies, e.g. `3 small_cargo, 1 cruiser`.
pub(crate) fn describe_ships(ships: &Manifest<ShipKind>) -> String {
    if ships.is_empty() {
        return "no ships".to_string();
    }
    ships
        .iter()
        .map(|(kind, count)| format!("{count} {kind}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn describe_resources(resources: &Resources) -> String {
    format!(
        "{:.0} metal, {:.0} crystal, {:.0} gas",
        resources.metal, resources.crystal, resources.gas
    )
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_ships_lists_positive_counts() {
        let ships: Manifest<ShipKind> = [(ShipKind::SmallCargo, 3), (ShipKind::Cruiser, 1)]
            .into_iter()
            .collect();
        assert_eq!(describe_ships(&ships), "3 small_cargo, 1 cruiser");
        assert_eq!(describe_ships(&Manifest::new()), "no ships");
    }

    #[test]
    fn destroyed_resolution_carries_nothing() {
        let resolution = Resolution::destroyed();
        assert_eq!(resolution.disposition, Disposition::Destroy);
        assert!(resolution.ships.is_empty());
        assert!(resolution.cargo.is_zero());
    }
}
