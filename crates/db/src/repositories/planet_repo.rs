//! Repository for the `planets` table and its one-to-one child rows.

use galaxy_core::types::{Coordinate, DbId};
use sqlx::{Connection, PgConnection};

use crate::models::planet::{CreatePlanet, Planet};

/// Column list for `planets` queries.
const COLUMNS: &str = "\
    id, owner_id, name, galaxy, system, slot, \
    fields_used, fields_max, created_at, updated_at";

/// Per-planet rows created alongside the planet itself.
const CHILD_TABLES: [&str; 3] = ["planet_buildings", "planet_ships", "planet_defenses"];

/// Provides CRUD operations for planets.
pub struct PlanetRepo;

impl PlanetRepo {
    /// Insert a planet with its ledger and zeroed inventory rows.
    ///
    /// Runs in a nested transaction so a failure leaves no partial planet
    /// behind. A taken coordinate surfaces as a unique violation on
    /// `uq_planets_coordinate`.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreatePlanet,
    ) -> Result<Planet, sqlx::Error> {
        let mut tx = conn.begin().await?;

        let query = format!(
            "INSERT INTO planets (owner_id, name, galaxy, system, slot, fields_max) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let planet = sqlx::query_as::<_, Planet>(&query)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(input.coordinate.galaxy)
            .bind(input.coordinate.system)
            .bind(input.coordinate.slot)
            .bind(input.fields_max)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO planet_resources (planet_id, metal, crystal, gas) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(planet.id)
        .bind(input.resources.metal)
        .bind(input.resources.crystal)
        .bind(input.resources.gas)
        .execute(&mut *tx)
        .await?;

        for table in CHILD_TABLES {
            sqlx::query(&format!("INSERT INTO {table} (planet_id) VALUES ($1)"))
                .bind(planet.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(planet)
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Planet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM planets WHERE id = $1");
        sqlx::query_as::<_, Planet>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn find_by_coordinate(
        conn: &mut PgConnection,
        coordinate: &Coordinate,
    ) -> Result<Option<Planet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM planets WHERE galaxy = $1 AND system = $2 AND slot = $3"
        );
        sqlx::query_as::<_, Planet>(&query)
            .bind(coordinate.galaxy)
            .bind(coordinate.system)
            .bind(coordinate.slot)
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn list_for_owner(
        conn: &mut PgConnection,
        owner_id: DbId,
    ) -> Result<Vec<Planet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM planets WHERE owner_id = $1 ORDER BY id");
        sqlx::query_as::<_, Planet>(&query)
            .bind(owner_id)
            .fetch_all(&mut *conn)
            .await
    }

    pub async fn increment_fields_used(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE planets SET fields_used = fields_used + 1 WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
