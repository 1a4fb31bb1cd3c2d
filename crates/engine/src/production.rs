//! Resource production accumulator.
//!
//! Converts the wall-clock time since a ledger's `last_update` into
//! resources, using the planet's building levels and its owner's bonuses.

use galaxy_core::production::{accrue, production_report, ProductionBonuses};
use galaxy_core::types::{DbId, Timestamp};
use galaxy_db::models::planet::Ledger;
use galaxy_db::repositories::{InventoryRepo, PlanetRepo, ResourceRepo};
use sqlx::PgConnection;

use crate::bonus::BonusProvider;
use crate::error::EngineError;

/// Less elapsed time than this is a no-op.
const MIN_ELAPSED_SECS: f64 = 1.0;

/// Bring a planet's ledger up to `now`.
///
/// Takes the ledger row lock on `conn`; it is held until the caller's
/// transaction ends, so run this inside the unit of work that goes on to
/// mutate the ledger. Returns the ledger as stored afterwards.
pub async fn accumulate(
    conn: &mut PgConnection,
    bonuses: &dyn BonusProvider,
    planet_id: DbId,
    now: Timestamp,
) -> Result<Ledger, EngineError> {
    let ledger = ResourceRepo::lock(conn, planet_id)
        .await?
        .ok_or_else(|| EngineError::not_found("planet", planet_id))?;

    let elapsed = (now - ledger.last_update).num_milliseconds() as f64 / 1000.0;
    if elapsed < MIN_ELAPSED_SECS {
        return Ok(ledger);
    }

    let planet = PlanetRepo::find_by_id(conn, planet_id)
        .await?
        .ok_or_else(|| EngineError::not_found("planet", planet_id))?;
    let buildings = InventoryRepo::buildings(conn, planet_id).await?;
    let owner_bonuses = match planet.owner_id {
        Some(owner_id) => bonuses.bonuses(conn, owner_id, now).await?,
        None => ProductionBonuses::default(),
    };

    let report = production_report(&buildings, &owner_bonuses);
    let amounts = accrue(ledger.resources(), &report, elapsed);
    let energy = report.energy_balance();

    ResourceRepo::store(conn, planet_id, &amounts, energy, now).await?;

    Ok(Ledger {
        metal: amounts.metal,
        crystal: amounts.crystal,
        gas: amounts.gas,
        energy,
        last_update: now,
        ..ledger
    })
}
