//! Integration tests for the repository layer.
//!
//! Exercises against a real database:
//! - Planet creation with its ledger and inventory rows
//! - Ledger locking, credits and floored debits
//! - Wide inventory reads and counted updates
//! - Fleet lifecycle guards
//! - Queue enqueue / due selection / cancellation
//! - Bonus aggregation

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use galaxy_core::production::BonusKind;
use galaxy_core::resources::{Manifest, Resources};
use galaxy_core::types::{Coordinate, DbId};
use galaxy_core::units::{BuildingKind, DefenseKind, ResearchKind, ShipKind, UnitKind};
use galaxy_db::models::bonus::{SOURCE_BOOSTER, SOURCE_COMMANDER};
use galaxy_db::models::fleet::CreateFleet;
use galaxy_db::models::planet::CreatePlanet;
use galaxy_db::models::queue::{CreateQueueItem, QueueKind};
use galaxy_db::models::status::{FleetStatus, Mission};
use galaxy_db::repositories::{
    BonusRepo, FleetRepo, InventoryRepo, PlanetRepo, QueueRepo, ResourceRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_planet(owner_id: Option<DbId>, slot: i32) -> CreatePlanet {
    CreatePlanet {
        owner_id,
        name: "Homeworld".to_string(),
        coordinate: Coordinate::new(1, 1, slot),
        fields_max: 163,
        resources: Resources::new(500.0, 500.0, 0.0),
    }
}

fn new_fleet(owner_id: DbId, origin_planet_id: DbId) -> CreateFleet {
    let now = Utc::now();
    CreateFleet {
        owner_id,
        origin_planet_id,
        target: Coordinate::new(1, 2, 3),
        mission_id: Mission::Transport.id(),
        ships: [(ShipKind::SmallCargo, 2)].into_iter().collect(),
        cargo: Resources::new(100.0, 0.0, 0.0),
        departure_at: now - Duration::minutes(10),
        arrival_at: now - Duration::minutes(1),
    }
}

// ---------------------------------------------------------------------------
// Test: planets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_planet_create_inserts_child_rows(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let user = UserRepo::create(&mut conn, "alice").await.unwrap();
    let planet = PlanetRepo::create(&mut conn, &new_planet(Some(user.id), 4))
        .await
        .unwrap();

    assert_eq!(planet.owner_id, Some(user.id));
    assert_eq!(planet.coordinate(), Coordinate::new(1, 1, 4));
    assert_eq!(planet.fields_used, 0);

    let ledger = ResourceRepo::find(&mut conn, planet.id).await.unwrap().unwrap();
    assert_eq!(ledger.metal, 500.0);
    assert!(InventoryRepo::buildings(&mut conn, planet.id).await.unwrap().is_empty());
    assert!(InventoryRepo::ships(&mut conn, planet.id).await.unwrap().is_empty());
    assert!(InventoryRepo::defenses(&mut conn, planet.id).await.unwrap().is_empty());
    assert!(InventoryRepo::research(&mut conn, user.id).await.unwrap().is_empty());

    let found = PlanetRepo::find_by_coordinate(&mut conn, &Coordinate::new(1, 1, 4))
        .await
        .unwrap();
    assert_eq!(found.map(|p| p.id), Some(planet.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_planet_coordinate_is_unique(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    PlanetRepo::create(&mut conn, &new_planet(None, 7)).await.unwrap();

    let err = PlanetRepo::create(&mut conn, &new_planet(None, 7))
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref e) if e.is_unique_violation());

    // The failed create left nothing behind.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM planet_resources")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// Test: ledger
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ledger_credit_and_floored_debit(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let planet = PlanetRepo::create(&mut conn, &new_planet(None, 1)).await.unwrap();

    let ledger = ResourceRepo::credit(&mut conn, planet.id, &Resources::new(100.0, 0.0, 5.0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ledger.metal, 600.0);
    assert_eq!(ledger.gas, 5.0);

    let ledger =
        ResourceRepo::debit_floored(&mut conn, planet.id, &Resources::new(1000.0, 250.0, 1.0))
            .await
            .unwrap()
            .unwrap();
    assert_eq!(ledger.metal, 0.0);
    assert_eq!(ledger.crystal, 250.0);
    assert_eq!(ledger.gas, 4.0);

    assert!(ResourceRepo::credit(&mut conn, 999_999, &Resources::ZERO)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ledger_last_update_never_moves_back(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let planet = PlanetRepo::create(&mut conn, &new_planet(None, 1)).await.unwrap();
    let now = Utc::now();
    ResourceRepo::reset(&mut conn, planet.id, &Resources::ZERO, now)
        .await
        .unwrap();

    ResourceRepo::store(
        &mut conn,
        planet.id,
        &Resources::new(1.0, 1.0, 1.0),
        -5.0,
        now - Duration::hours(1),
    )
    .await
    .unwrap();

    let ledger = ResourceRepo::find(&mut conn, planet.id).await.unwrap().unwrap();
    assert_eq!(ledger.metal, 1.0);
    assert_eq!(ledger.energy, -5.0);
    assert!(ledger.last_update >= now - Duration::milliseconds(1));
}

// ---------------------------------------------------------------------------
// Test: inventory
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inventory_counted_updates(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let planet = PlanetRepo::create(&mut conn, &new_planet(None, 1)).await.unwrap();

    let defenses: Manifest<DefenseKind> = [(DefenseKind::RocketLauncher, 50)].into_iter().collect();
    InventoryRepo::add_defenses(&mut conn, planet.id, &defenses)
        .await
        .unwrap();

    let losses: Manifest<DefenseKind> = [(DefenseKind::RocketLauncher, 80)].into_iter().collect();
    InventoryRepo::remove_defenses_floored(&mut conn, planet.id, &losses)
        .await
        .unwrap();
    let left = InventoryRepo::defenses(&mut conn, planet.id).await.unwrap();
    assert_eq!(left.get(DefenseKind::RocketLauncher), 0);

    InventoryRepo::add_unit(&mut conn, planet.id, UnitKind::Ship(ShipKind::Cruiser), 3)
        .await
        .unwrap();
    InventoryRepo::add_unit(&mut conn, planet.id, UnitKind::Defense(DefenseKind::GaussCannon), 2)
        .await
        .unwrap();
    assert_eq!(
        InventoryRepo::ships(&mut conn, planet.id).await.unwrap().get(ShipKind::Cruiser),
        3
    );
    assert_eq!(
        InventoryRepo::defenses(&mut conn, planet.id)
            .await
            .unwrap()
            .get(DefenseKind::GaussCannon),
        2
    );

    let level = InventoryRepo::increment_building(&mut conn, planet.id, BuildingKind::MetalMine)
        .await
        .unwrap();
    assert_eq!(level, Some(1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_research_increment(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let user = UserRepo::create(&mut conn, "bob").await.unwrap();

    InventoryRepo::increment_research(&mut conn, user.id, ResearchKind::Astrophysics)
        .await
        .unwrap();
    let level = InventoryRepo::increment_research(&mut conn, user.id, ResearchKind::Astrophysics)
        .await
        .unwrap();
    assert_eq!(level, Some(2));

    let missing = InventoryRepo::increment_research(&mut conn, 999_999, ResearchKind::Astrophysics)
        .await
        .unwrap();
    assert_eq!(missing, None);
}

// ---------------------------------------------------------------------------
// Test: fleets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fleet_status_transitions_are_guarded(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let user = UserRepo::create(&mut conn, "carol").await.unwrap();
    let planet = PlanetRepo::create(&mut conn, &new_planet(Some(user.id), 1))
        .await
        .unwrap();
    let fleet = FleetRepo::create(&mut conn, &new_fleet(user.id, planet.id))
        .await
        .unwrap();
    assert_eq!(fleet.status_id, FleetStatus::Active.id());

    let due = FleetRepo::list_due(&mut conn, Utc::now()).await.unwrap();
    assert_eq!(due.len(), 1);

    let now = Utc::now();
    assert!(FleetRepo::mark_returning(&mut conn, fleet.id, now, now + Duration::minutes(9))
        .await
        .unwrap());
    // Already returning: a second transition out of active is a no-op.
    assert!(!FleetRepo::mark_returning(&mut conn, fleet.id, now, now)
        .await
        .unwrap());
    assert!(!FleetRepo::mark_destroyed(&mut conn, fleet.id).await.unwrap());

    // Not due any more: arrival moved into the future.
    assert!(FleetRepo::list_due(&mut conn, now).await.unwrap().is_empty());

    assert!(FleetRepo::mark_completed(&mut conn, fleet.id, FleetStatus::Returning)
        .await
        .unwrap());
    let row = FleetRepo::find_by_id(&mut conn, fleet.id).await.unwrap().unwrap();
    let decoded = row.decode().unwrap();
    assert_matches!(decoded.status, FleetStatus::Completed);
    assert!(FleetRepo::in_flight_ships_for_owner(&mut conn, user.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fleet_destroyed_clears_payload(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let user = UserRepo::create(&mut conn, "dave").await.unwrap();
    let planet = PlanetRepo::create(&mut conn, &new_planet(Some(user.id), 1))
        .await
        .unwrap();
    let fleet = FleetRepo::create(&mut conn, &new_fleet(user.id, planet.id))
        .await
        .unwrap();

    let in_flight = FleetRepo::in_flight_ships_for_owner(&mut conn, user.id)
        .await
        .unwrap();
    assert_eq!(in_flight.len(), 1);
    assert_eq!(in_flight[0].get(ShipKind::SmallCargo), 2);

    assert!(FleetRepo::mark_destroyed(&mut conn, fleet.id).await.unwrap());
    let fleet = FleetRepo::find_by_id(&mut conn, fleet.id)
        .await
        .unwrap()
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(fleet.status, FleetStatus::Destroyed);
    assert!(fleet.ships.is_empty());
    assert!(fleet.cargo.is_zero());
}

// ---------------------------------------------------------------------------
// Test: queues
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_queue_due_selection_and_cancel(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let user = UserRepo::create(&mut conn, "erin").await.unwrap();
    let planet = PlanetRepo::create(&mut conn, &new_planet(Some(user.id), 1))
        .await
        .unwrap();
    let now = Utc::now();

    let due = CreateQueueItem {
        planet_id: planet.id,
        user_id: user.id,
        target: "destroyer".to_string(),
        quantity: 2,
        started_at: now - Duration::hours(1),
        completes_at: now - Duration::minutes(1),
        cost: Resources::new(120_000.0, 100_000.0, 30_000.0),
    };
    let pending = CreateQueueItem {
        completes_at: now + Duration::hours(1),
        ..due.clone()
    };

    let due = QueueRepo::enqueue(&mut conn, QueueKind::Shipyard, &due).await.unwrap();
    let pending = QueueRepo::enqueue(&mut conn, QueueKind::Shipyard, &pending)
        .await
        .unwrap();
    assert_eq!(due.target, "destroyer");
    assert_eq!(due.quantity, 2);

    let listed = QueueRepo::list_due(&mut conn, QueueKind::Shipyard, now).await.unwrap();
    assert_eq!(listed.iter().map(|i| i.id).collect::<Vec<_>>(), vec![due.id]);

    // Due items cannot be cancelled.
    assert!(QueueRepo::take_pending(&mut conn, QueueKind::Shipyard, due.id, now)
        .await
        .unwrap()
        .is_none());
    let taken = QueueRepo::take_pending(&mut conn, QueueKind::Shipyard, pending.id, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(taken.reserved(), Resources::new(120_000.0, 100_000.0, 30_000.0));

    assert!(QueueRepo::delete(&mut conn, QueueKind::Shipyard, due.id).await.unwrap());
    assert!(!QueueRepo::delete(&mut conn, QueueKind::Shipyard, due.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: bonuses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bonus_percent_sums_active_sources(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let user = UserRepo::create(&mut conn, "frank").await.unwrap();
    let now = Utc::now();

    BonusRepo::grant(&mut conn, user.id, SOURCE_COMMANDER, BonusKind::Metal, 10.0, None)
        .await
        .unwrap();
    BonusRepo::grant(
        &mut conn,
        user.id,
        SOURCE_BOOSTER,
        BonusKind::Metal,
        25.0,
        Some(now + Duration::days(1)),
    )
    .await
    .unwrap();
    BonusRepo::grant(
        &mut conn,
        user.id,
        SOURCE_BOOSTER,
        BonusKind::Metal,
        50.0,
        Some(now - Duration::days(1)),
    )
    .await
    .unwrap();

    let metal = BonusRepo::percent_for(&mut conn, user.id, BonusKind::Metal, now)
        .await
        .unwrap();
    assert_eq!(metal, 35.0);
    let gas = BonusRepo::percent_for(&mut conn, user.id, BonusKind::Gas, now)
        .await
        .unwrap();
    assert_eq!(gas, 0.0);
    assert_eq!(BonusRepo::active(&mut conn, user.id, now).await.unwrap().len(), 2);
}
