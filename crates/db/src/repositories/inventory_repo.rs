//! Repository for the wide inventory tables.
//!
//! `planet_buildings`, `planet_ships`, `planet_defenses` and `user_research`
//! hold one `BIGINT` column per kind. Every query builds its column list
//! from [`ColumnKind`], so reads cover every kind and writes can only name
//! real columns.

use galaxy_core::resources::Manifest;
use galaxy_core::types::DbId;
use galaxy_core::units::{BuildingKind, ColumnKind, DefenseKind, ResearchKind, ShipKind, UnitKind};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

const BUILDINGS: &str = "planet_buildings";
const SHIPS: &str = "planet_ships";
const DEFENSES: &str = "planet_defenses";
const RESEARCH: &str = "user_research";

/// Provides reads and counted updates for inventory rows.
pub struct InventoryRepo;

// ---------------------------------------------------------------------------
// Generic helpers
// ---------------------------------------------------------------------------

fn manifest_from_row<K: ColumnKind>(row: &PgRow) -> Result<Manifest<K>, sqlx::Error> {
    let mut manifest = Manifest::new();
    for &kind in K::ALL {
        manifest.set(kind, row.try_get::<i64, _>(kind.column())?);
    }
    Ok(manifest)
}

async fn load<K: ColumnKind>(
    conn: &mut PgConnection,
    table: &str,
    key_column: &str,
    id: DbId,
) -> Result<Manifest<K>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM {table} WHERE {key_column} = $1",
        K::column_list()
    );
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    manifest_from_row(&row)
}

/// Load every planet row owned by `owner_id`.
async fn load_for_owner<K: ColumnKind>(
    conn: &mut PgConnection,
    table: &str,
    owner_id: DbId,
) -> Result<Vec<Manifest<K>>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM {table} \
         WHERE planet_id IN (SELECT id FROM planets WHERE owner_id = $1) \
         ORDER BY planet_id",
        K::column_list()
    );
    let rows = sqlx::query(&query)
        .bind(owner_id)
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(manifest_from_row::<K>).collect()
}

/// Apply `col = <expr>` for every kind with a positive count in `delta`.
///
/// `expr` receives the column name and the bind placeholder.
async fn apply_delta<K: ColumnKind>(
    conn: &mut PgConnection,
    table: &str,
    id: DbId,
    delta: &Manifest<K>,
    expr: fn(&str, &str) -> String,
) -> Result<(), sqlx::Error> {
    let entries: Vec<(K, i64)> = delta.iter().collect();
    if entries.is_empty() {
        return Ok(());
    }

    let assignments = entries
        .iter()
        .enumerate()
        .map(|(i, (kind, _))| {
            let column = kind.column();
            format!("{column} = {}", expr(column, &format!("${}", i + 2)))
        })
        .collect::<Vec<_>>()
        .join(", ");
    let query = format!("UPDATE {table} SET {assignments} WHERE planet_id = $1");

    let mut q = sqlx::query(&query).bind(id);
    for (_, count) in &entries {
        q = q.bind(*count);
    }
    q.execute(&mut *conn).await?;
    Ok(())
}

fn plus(column: &str, param: &str) -> String {
    format!("{column} + {param}")
}

fn minus_floored(column: &str, param: &str) -> String {
    format!("GREATEST({column} - {param}, 0)")
}

// ---------------------------------------------------------------------------
// InventoryRepo
// ---------------------------------------------------------------------------

impl InventoryRepo {
    pub async fn buildings(
        conn: &mut PgConnection,
        planet_id: DbId,
    ) -> Result<Manifest<BuildingKind>, sqlx::Error> {
        load(conn, BUILDINGS, "planet_id", planet_id).await
    }

    pub async fn ships(
        conn: &mut PgConnection,
        planet_id: DbId,
    ) -> Result<Manifest<ShipKind>, sqlx::Error> {
        load(conn, SHIPS, "planet_id", planet_id).await
    }

    pub async fn defenses(
        conn: &mut PgConnection,
        planet_id: DbId,
    ) -> Result<Manifest<DefenseKind>, sqlx::Error> {
        load(conn, DEFENSES, "planet_id", planet_id).await
    }

    pub async fn research(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Manifest<ResearchKind>, sqlx::Error> {
        load(conn, RESEARCH, "user_id", user_id).await
    }

    pub async fn buildings_for_owner(
        conn: &mut PgConnection,
        owner_id: DbId,
    ) -> Result<Vec<Manifest<BuildingKind>>, sqlx::Error> {
        load_for_owner(conn, BUILDINGS, owner_id).await
    }

    pub async fn ships_for_owner(
        conn: &mut PgConnection,
        owner_id: DbId,
    ) -> Result<Vec<Manifest<ShipKind>>, sqlx::Error> {
        load_for_owner(conn, SHIPS, owner_id).await
    }

    pub async fn defenses_for_owner(
        conn: &mut PgConnection,
        owner_id: DbId,
    ) -> Result<Vec<Manifest<DefenseKind>>, sqlx::Error> {
        load_for_owner(conn, DEFENSES, owner_id).await
    }

    pub async fn add_ships(
        conn: &mut PgConnection,
        planet_id: DbId,
        ships: &Manifest<ShipKind>,
    ) -> Result<(), sqlx::Error> {
        apply_delta(conn, SHIPS, planet_id, ships, plus).await
    }

    /// Remove ships, flooring each count at zero.
    pub async fn remove_ships_floored(
        conn: &mut PgConnection,
        planet_id: DbId,
        ships: &Manifest<ShipKind>,
    ) -> Result<(), sqlx::Error> {
        apply_delta(conn, SHIPS, planet_id, ships, minus_floored).await
    }

    pub async fn add_defenses(
        conn: &mut PgConnection,
        planet_id: DbId,
        defenses: &Manifest<DefenseKind>,
    ) -> Result<(), sqlx::Error> {
        apply_delta(conn, DEFENSES, planet_id, defenses, plus).await
    }

    /// Remove defenses, flooring each count at zero.
    pub async fn remove_defenses_floored(
        conn: &mut PgConnection,
        planet_id: DbId,
        defenses: &Manifest<DefenseKind>,
    ) -> Result<(), sqlx::Error> {
        apply_delta(conn, DEFENSES, planet_id, defenses, minus_floored).await
    }

    /// Add `amount` units of a shipyard product to a planet.
    pub async fn add_unit(
        conn: &mut PgConnection,
        planet_id: DbId,
        unit: UnitKind,
        amount: i64,
    ) -> Result<(), sqlx::Error> {
        match unit {
            UnitKind::Ship(kind) => {
                let ships: Manifest<ShipKind> = [(kind, amount)].into_iter().collect();
                Self::add_ships(conn, planet_id, &ships).await
            }
            UnitKind::Defense(kind) => {
                let defenses: Manifest<DefenseKind> = [(kind, amount)].into_iter().collect();
                Self::add_defenses(conn, planet_id, &defenses).await
            }
        }
    }

    /// Raise a building by one level. Returns the new level, or `None` if
    /// the planet has no buildings row.
    pub async fn increment_building(
        conn: &mut PgConnection,
        planet_id: DbId,
        kind: BuildingKind,
    ) -> Result<Option<i64>, sqlx::Error> {
        let column = kind.column();
        let query = format!(
            "UPDATE {BUILDINGS} SET {column} = {column} + 1 WHERE planet_id = $1 RETURNING {column}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(planet_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Raise a research by one level. Returns the new level, or `None` if
    /// the user has no research row.
    pub async fn increment_research(
        conn: &mut PgConnection,
        user_id: DbId,
        kind: ResearchKind,
    ) -> Result<Option<i64>, sqlx::Error> {
        let column = kind.column();
        let query = format!(
            "UPDATE {RESEARCH} SET {column} = {column} + 1 WHERE user_id = $1 RETURNING {column}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Set a building level directly. Used to seed planets.
    pub async fn set_building(
        conn: &mut PgConnection,
        planet_id: DbId,
        kind: BuildingKind,
        level: i64,
    ) -> Result<(), sqlx::Error> {
        let column = kind.column();
        let query = format!("UPDATE {BUILDINGS} SET {column} = $2 WHERE planet_id = $1");
        sqlx::query(&query)
            .bind(planet_id)
            .bind(level.max(0))
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
