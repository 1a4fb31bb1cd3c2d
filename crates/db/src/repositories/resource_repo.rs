//! Repository for `planet_resources`, the per-planet resource ledger.
//!
//! Read-modify-write callers take the row with [`ResourceRepo::lock`] and
//! write back through the same connection before their transaction ends.
//! Credits and debits are single `UPDATE` statements and need no prior lock.

use galaxy_core::resources::Resources;
use galaxy_core::types::{DbId, Timestamp};
use sqlx::PgConnection;

use crate::models::planet::Ledger;

/// Column list for `planet_resources` queries.
const COLUMNS: &str = "planet_id, metal, crystal, gas, energy, last_update";

/// Provides ledger reads and writes.
pub struct ResourceRepo;

impl ResourceRepo {
    pub async fn find(
        conn: &mut PgConnection,
        planet_id: DbId,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM planet_resources WHERE planet_id = $1");
        sqlx::query_as::<_, Ledger>(&query)
            .bind(planet_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Read the ledger under an exclusive row lock (`FOR UPDATE`).
    pub async fn lock(
        conn: &mut PgConnection,
        planet_id: DbId,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM planet_resources WHERE planet_id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, Ledger>(&query)
            .bind(planet_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Write back accumulated totals.
    ///
    /// `last_update` never moves backwards: an older timestamp keeps the
    /// stored one.
    pub async fn store(
        conn: &mut PgConnection,
        planet_id: DbId,
        amounts: &Resources,
        energy: f64,
        last_update: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE planet_resources \
             SET metal = $2, crystal = $3, gas = $4, energy = $5, \
                 last_update = GREATEST(last_update, $6) \
             WHERE planet_id = $1",
        )
        .bind(planet_id)
        .bind(amounts.metal.max(0.0))
        .bind(amounts.crystal.max(0.0))
        .bind(amounts.gas.max(0.0))
        .bind(energy)
        .bind(last_update)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Add `amounts` to the ledger. Returns the new ledger, or `None` if
    /// the planet has no ledger row.
    pub async fn credit(
        conn: &mut PgConnection,
        planet_id: DbId,
        amounts: &Resources,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!(
            "UPDATE planet_resources \
             SET metal = metal + $2, crystal = crystal + $3, gas = gas + $4 \
             WHERE planet_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ledger>(&query)
            .bind(planet_id)
            .bind(amounts.metal.max(0.0))
            .bind(amounts.crystal.max(0.0))
            .bind(amounts.gas.max(0.0))
            .fetch_optional(&mut *conn)
            .await
    }

    /// Subtract `amounts`, flooring each resource at zero.
    pub async fn debit_floored(
        conn: &mut PgConnection,
        planet_id: DbId,
        amounts: &Resources,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!(
            "UPDATE planet_resources \
             SET metal = GREATEST(metal - $2, 0), \
                 crystal = GREATEST(crystal - $3, 0), \
                 gas = GREATEST(gas - $4, 0) \
             WHERE planet_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ledger>(&query)
            .bind(planet_id)
            .bind(amounts.metal.max(0.0))
            .bind(amounts.crystal.max(0.0))
            .bind(amounts.gas.max(0.0))
            .fetch_optional(&mut *conn)
            .await
    }

    /// Overwrite balances and `last_update` unconditionally. Used to seed
    /// and backdate ledgers.
    pub async fn reset(
        conn: &mut PgConnection,
        planet_id: DbId,
        amounts: &Resources,
        last_update: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE planet_resources \
             SET metal = $2, crystal = $3, gas = $4, last_update = $5 \
             WHERE planet_id = $1",
        )
        .bind(planet_id)
        .bind(amounts.metal.max(0.0))
        .bind(amounts.crystal.max(0.0))
        .bind(amounts.gas.max(0.0))
        .bind(last_update)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
