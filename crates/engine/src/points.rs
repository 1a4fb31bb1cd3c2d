//! Points recalculation.
//!
//! Score is a derived figure: it is recomputed from current holdings after
//! the tick's stages have committed, on a separate connection.

use std::collections::BTreeSet;

use galaxy_core::points::{score, ScoreSnapshot};
use galaxy_core::types::DbId;
use galaxy_db::repositories::{FleetRepo, InventoryRepo, UserRepo};
use sqlx::{PgConnection, PgPool};

use crate::error::EngineError;

pub struct PointsRecalculator;

impl PointsRecalculator {
    /// Everything `user_id` owns: planets, research and fleets in flight.
    pub async fn snapshot(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<ScoreSnapshot, EngineError> {
        let mut ships = InventoryRepo::ships_for_owner(conn, user_id).await?;
        ships.extend(FleetRepo::in_flight_ships_for_owner(conn, user_id).await?);

        Ok(ScoreSnapshot {
            buildings: InventoryRepo::buildings_for_owner(conn, user_id).await?,
            ships,
            defenses: InventoryRepo::defenses_for_owner(conn, user_id).await?,
            research: InventoryRepo::research(conn, user_id).await?,
        })
    }

    /// Recompute and store one user's points.
    pub async fn recompute(conn: &mut PgConnection, user_id: DbId) -> Result<i64, EngineError> {
        let snapshot = Self::snapshot(conn, user_id).await?;
        let points = score(&snapshot);
        if !UserRepo::set_points(conn, user_id, points).await? {
            return Err(EngineError::not_found("user", user_id));
        }
        Ok(points)
    }

    /// Recompute every user in `user_ids`. Failures are logged and skipped.
    ///
    /// Returns how many users were updated.
    pub async fn recompute_all(pool: &PgPool, user_ids: &BTreeSet<DbId>) -> usize {
        if user_ids.is_empty() {
            return 0;
        }

        let mut conn = match pool.acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(error = %e, "Points recalculation skipped: no connection");
                return 0;
            }
        };

        let mut updated = 0;
        for &user_id in user_ids {
            match Self::recompute(&mut conn, user_id).await {
                Ok(points) => {
                    updated += 1;
                    tracing::debug!(user_id, points, "Points updated");
                }
                Err(e) => {
                    tracing::error!(user_id, error = %e, "Points recalculation failed");
                }
            }
        }
        updated
    }
}
