//! Repository for the `fleets` table.
//!
//! Status updates guard on the expected current status in SQL, so a
//! transition that lost a race (or was already applied) affects no rows and
//! returns `false` instead of regressing the lifecycle.

use galaxy_core::resources::{Manifest, Resources};
use galaxy_core::types::{DbId, Timestamp};
use galaxy_core::units::ShipKind;
use sqlx::types::Json;
use sqlx::PgConnection;

use crate::models::fleet::{CreateFleet, FleetRow};
use crate::models::status::FleetStatus;

/// Column list for `fleets` queries.
const COLUMNS: &str = "\
    id, owner_id, origin_planet_id, target_galaxy, target_system, target_slot, \
    mission_id, status_id, ships, metal, crystal, gas, \
    departure_at, arrival_at, return_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for fleets.
pub struct FleetRepo;

impl FleetRepo {
    /// Insert a dispatched fleet in `active` status.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateFleet,
    ) -> Result<FleetRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO fleets \
                (owner_id, origin_planet_id, target_galaxy, target_system, target_slot, \
                 mission_id, status_id, ships, metal, crystal, gas, departure_at, arrival_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FleetRow>(&query)
            .bind(input.owner_id)
            .bind(input.origin_planet_id)
            .bind(input.target.galaxy)
            .bind(input.target.system)
            .bind(input.target.slot)
            .bind(input.mission_id)
            .bind(FleetStatus::Active.id())
            .bind(Json(&input.ships))
            .bind(input.cargo.metal)
            .bind(input.cargo.crystal)
            .bind(input.cargo.gas)
            .bind(input.departure_at)
            .bind(input.arrival_at)
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<FleetRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fleets WHERE id = $1");
        sqlx::query_as::<_, FleetRow>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Fleets that are active or returning and have arrived by `now`.
    ///
    /// Rows are locked `FOR UPDATE SKIP LOCKED` so two concurrent ticks
    /// never process the same fleet.
    pub async fn list_due(
        conn: &mut PgConnection,
        now: Timestamp,
    ) -> Result<Vec<FleetRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM fleets \
             WHERE status_id IN ($1, $2) AND arrival_at <= $3 \
             ORDER BY arrival_at, id \
             FOR UPDATE SKIP LOCKED"
        );
        sqlx::query_as::<_, FleetRow>(&query)
            .bind(FleetStatus::Active.id())
            .bind(FleetStatus::Returning.id())
            .bind(now)
            .fetch_all(&mut *conn)
            .await
    }

    /// Replace the carried ships and resources.
    pub async fn update_payload(
        conn: &mut PgConnection,
        id: DbId,
        ships: &Manifest<ShipKind>,
        cargo: &Resources,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE fleets SET ships = $2, metal = $3, crystal = $4, gas = $5 WHERE id = $1",
        )
        .bind(id)
        .bind(Json(ships))
        .bind(cargo.metal.max(0.0))
        .bind(cargo.crystal.max(0.0))
        .bind(cargo.gas.max(0.0))
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// `active -> returning`, with a fresh departure and arrival.
    pub async fn mark_returning(
        conn: &mut PgConnection,
        id: DbId,
        departure_at: Timestamp,
        arrival_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE fleets \
             SET status_id = $2, departure_at = $3, arrival_at = $4, return_at = $4 \
             WHERE id = $1 AND status_id = $5",
        )
        .bind(id)
        .bind(FleetStatus::Returning.id())
        .bind(departure_at)
        .bind(arrival_at)
        .bind(FleetStatus::Active.id())
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Move to `completed` from `from` (returning, or active for colonize
    /// and deploy).
    pub async fn mark_completed(
        conn: &mut PgConnection,
        id: DbId,
        from: FleetStatus,
    ) -> Result<bool, sqlx::Error> {
        Self::transition(conn, id, from, FleetStatus::Completed).await
    }

    /// `active -> destroyed`. Ships and cargo are cleared.
    pub async fn mark_destroyed(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE fleets \
             SET status_id = $2, ships = '{}'::jsonb, metal = 0, crystal = 0, gas = 0 \
             WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(FleetStatus::Destroyed.id())
        .bind(FleetStatus::Active.id())
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn transition(
        conn: &mut PgConnection,
        id: DbId,
        from: FleetStatus,
        to: FleetStatus,
    ) -> Result<bool, sqlx::Error> {
        if !from.can_transition_to(to) {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE fleets SET status_id = $2 WHERE id = $1 AND status_id = $3")
            .bind(id)
            .bind(to.id())
            .bind(from.id())
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Ship manifests of the owner's fleets still in flight.
    pub async fn in_flight_ships_for_owner(
        conn: &mut PgConnection,
        owner_id: DbId,
    ) -> Result<Vec<Manifest<ShipKind>>, sqlx::Error> {
        let rows = sqlx::query_scalar::<_, Json<Manifest<ShipKind>>>(
            "SELECT ships FROM fleets WHERE owner_id = $1 AND status_id IN ($2, $3) ORDER BY id",
        )
        .bind(owner_id)
        .bind(FleetStatus::Active.id())
        .bind(FleetStatus::Returning.id())
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows.into_iter().map(|Json(ships)| ships).collect())
    }
}
