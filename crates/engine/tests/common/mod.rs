use std::sync::Arc;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use galaxy_core::resources::{Manifest, Resources};
use galaxy_core::types::{Coordinate, DbId};
use galaxy_core::units::ShipKind;
use galaxy_db::models::fleet::{CreateFleet, Fleet};
use galaxy_db::models::message::Message;
use galaxy_db::models::planet::{CreatePlanet, Planet};
use galaxy_db::models::status::Mission;
use galaxy_db::repositories::{FleetRepo, MessageRepo, PlanetRepo, ResourceRepo, UserRepo};
use galaxy_engine::bonus::NoBonuses;
use galaxy_engine::{EngineConfig, TickEngine};
use sqlx::{PgConnection, PgPool};

/// Current time truncated to whole seconds, so timestamps survive a
/// round-trip through Postgres unchanged.
pub fn now() -> DateTime<Utc> {
    Utc::now()
        .duration_trunc(TimeDelta::seconds(1))
        .unwrap()
}

/// An engine without bonuses and with a fixed expedition seed.
pub fn engine(pool: &PgPool) -> TickEngine {
    TickEngine::new(pool.clone(), EngineConfig::default())
        .with_bonuses(Arc::new(NoBonuses))
        .with_rng_seed(7)
}

pub async fn user(conn: &mut PgConnection, name: &str) -> DbId {
    UserRepo::create(conn, name).await.unwrap().id
}

/// A planet whose ledger holds `resources` as of `at`, so accumulating to
/// `at` adds nothing.
pub async fn planet(
    conn: &mut PgConnection,
    owner_id: Option<DbId>,
    coordinate: Coordinate,
    resources: Resources,
    at: DateTime<Utc>,
) -> Planet {
    let planet = PlanetRepo::create(
        conn,
        &CreatePlanet {
            owner_id,
            name: format!("Planet {coordinate}"),
            coordinate,
            fields_max: 163,
            resources,
        },
    )
    .await
    .unwrap();
    ResourceRepo::reset(conn, planet.id, &resources, at)
        .await
        .unwrap();
    planet
}

/// An active fleet that left ten minutes before `at` and arrived one
/// minute before it.
pub async fn fleet(
    conn: &mut PgConnection,
    owner_id: DbId,
    origin_planet_id: DbId,
    target: Coordinate,
    mission: Mission,
    ships: &[(ShipKind, i64)],
    cargo: Resources,
    at: DateTime<Utc>,
) -> DbId {
    let ships: Manifest<ShipKind> = ships.iter().copied().collect();
    FleetRepo::create(
        conn,
        &CreateFleet {
            owner_id,
            origin_planet_id,
            target,
            mission_id: mission.id(),
            ships,
            cargo,
            departure_at: at - TimeDelta::minutes(10),
            arrival_at: at - TimeDelta::minutes(1),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn load_fleet(conn: &mut PgConnection, id: DbId) -> Fleet {
    FleetRepo::find_by_id(conn, id)
        .await
        .unwrap()
        .unwrap()
        .decode()
        .unwrap()
}

pub async fn ledger(conn: &mut PgConnection, planet_id: DbId) -> Resources {
    ResourceRepo::find(conn, planet_id)
        .await
        .unwrap()
        .unwrap()
        .resources()
}

pub async fn titles(conn: &mut PgConnection, user_id: DbId) -> Vec<String> {
    MessageRepo::list_for_user(conn, user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|m: Message| m.title)
        .collect()
}
