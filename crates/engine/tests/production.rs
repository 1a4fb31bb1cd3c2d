//! Integration tests for resource accumulation, bonuses and points.

mod common;

use chrono::TimeDelta;
use galaxy_core::production::BonusKind;
use galaxy_core::resources::{Manifest, Resources};
use galaxy_core::types::Coordinate;
use galaxy_core::units::{BuildingKind, ShipKind};
use galaxy_db::models::bonus::SOURCE_BOOSTER;
use galaxy_db::models::status::Mission;
use galaxy_db::repositories::{BonusRepo, InventoryRepo, ResourceRepo, UserRepo};
use galaxy_engine::bonus::{BonusProvider, DbBonusProvider, NoBonuses};
use galaxy_engine::points::PointsRecalculator;
use galaxy_engine::production::accumulate;
use sqlx::PgPool;

const HOME: Coordinate = Coordinate {
    galaxy: 3,
    system: 9,
    slot: 4,
};

// ---------------------------------------------------------------------------
// Test: accumulation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accumulate_under_one_second_is_a_no_op(pool: PgPool) {
    let now = common::now();
    let mut conn = pool.acquire().await.unwrap();
    let owner = common::user(&mut conn, "miner").await;
    let planet = common::planet(
        &mut conn,
        Some(owner),
        HOME,
        Resources::new(100.0, 50.0, 0.0),
        now,
    )
    .await;

    let ledger = accumulate(&mut conn, &NoBonuses, planet.id, now + TimeDelta::milliseconds(500))
        .await
        .unwrap();
    assert_eq!(ledger.resources(), Resources::new(100.0, 50.0, 0.0));
    assert_eq!(ledger.last_update, now);

    let stored = ResourceRepo::find(&mut conn, planet.id).await.unwrap().unwrap();
    assert_eq!(stored.resources(), Resources::new(100.0, 50.0, 0.0));
    assert_eq!(stored.last_update, now);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accumulate_adds_production_and_moves_last_update(pool: PgPool) {
    let now = common::now();
    let mut conn = pool.acquire().await.unwrap();
    let owner = common::user(&mut conn, "miner").await;
    let planet = common::planet(&mut conn, Some(owner), HOME, Resources::ZERO, now).await;
    InventoryRepo::set_building(&mut conn, planet.id, BuildingKind::MetalMine, 5)
        .await
        .unwrap();
    InventoryRepo::set_building(&mut conn, planet.id, BuildingKind::SolarPlant, 5)
        .await
        .unwrap();

    let later = now + TimeDelta::hours(1);
    let ledger = accumulate(&mut conn, &NoBonuses, planet.id, later).await.unwrap();
    assert!(ledger.metal > 0.0);
    assert!(ledger.crystal > 0.0);
    assert!(ledger.gas >= 0.0);
    assert_eq!(ledger.last_update, later);

    let stored = ResourceRepo::find(&mut conn, planet.id).await.unwrap().unwrap();
    assert_eq!(stored.resources(), ledger.resources());

    // Accumulating again at the same instant changes nothing.
    let again = accumulate(&mut conn, &NoBonuses, planet.id, later).await.unwrap();
    assert_eq!(again.resources(), ledger.resources());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_booster_raises_production(pool: PgPool) {
    let now = common::now();
    let mut conn = pool.acquire().await.unwrap();
    let plain = common::user(&mut conn, "plain").await;
    let boosted = common::user(&mut conn, "boosted").await;
    let plain_planet = common::planet(&mut conn, Some(plain), HOME, Resources::ZERO, now).await;
    let boosted_planet = common::planet(
        &mut conn,
        Some(boosted),
        Coordinate::new(3, 9, 5),
        Resources::ZERO,
        now,
    )
    .await;
    for planet_id in [plain_planet.id, boosted_planet.id] {
        InventoryRepo::set_building(&mut conn, planet_id, BuildingKind::MetalMine, 3)
            .await
            .unwrap();
        InventoryRepo::set_building(&mut conn, planet_id, BuildingKind::SolarPlant, 5)
            .await
            .unwrap();
    }
    BonusRepo::grant(&mut conn, boosted, SOURCE_BOOSTER, BonusKind::Metal, 50.0, None)
        .await
        .unwrap();

    let percent = DbBonusProvider
        .percent(&mut conn, boosted, BonusKind::Metal, now)
        .await
        .unwrap();
    assert_eq!(percent, 50.0);

    let later = now + TimeDelta::hours(2);
    let plain_ledger = accumulate(&mut conn, &DbBonusProvider, plain_planet.id, later)
        .await
        .unwrap();
    let boosted_ledger = accumulate(&mut conn, &DbBonusProvider, boosted_planet.id, later)
        .await
        .unwrap();
    assert!(boosted_ledger.metal > plain_ledger.metal);
    assert_eq!(boosted_ledger.crystal, plain_ledger.crystal);
}

// ---------------------------------------------------------------------------
// Test: points
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_points_recompute_is_idempotent(pool: PgPool) {
    let now = common::now();
    let mut conn = pool.acquire().await.unwrap();
    let owner = common::user(&mut conn, "collector").await;
    let planet = common::planet(&mut conn, Some(owner), HOME, Resources::ZERO, now).await;
    InventoryRepo::set_building(&mut conn, planet.id, BuildingKind::MetalMine, 5)
        .await
        .unwrap();
    let cruisers: Manifest<ShipKind> = [(ShipKind::Cruiser, 10)].into_iter().collect();
    InventoryRepo::add_ships(&mut conn, planet.id, &cruisers)
        .await
        .unwrap();

    let first = PointsRecalculator::recompute(&mut conn, owner).await.unwrap();
    let second = PointsRecalculator::recompute(&mut conn, owner).await.unwrap();
    assert!(first > 0);
    assert_eq!(first, second);

    let user = UserRepo::find_by_id(&mut conn, owner).await.unwrap().unwrap();
    assert_eq!(user.points, first);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_points_count_fleets_in_flight(pool: PgPool) {
    let now = common::now();
    let mut conn = pool.acquire().await.unwrap();
    let owner = common::user(&mut conn, "pilot").await;
    let planet = common::planet(&mut conn, Some(owner), HOME, Resources::ZERO, now).await;
    let docked = PointsRecalculator::recompute(&mut conn, owner).await.unwrap();

    common::fleet(
        &mut conn,
        owner,
        planet.id,
        Coordinate::new(3, 9, 6),
        Mission::Transport,
        &[(ShipKind::Battleship, 2)],
        Resources::ZERO,
        now + TimeDelta::hours(1),
    )
    .await;

    let flying = PointsRecalculator::recompute(&mut conn, owner).await.unwrap();
    // Two battleships: 2 * 60_000 resources.
    assert_eq!(flying - docked, 120);
}
