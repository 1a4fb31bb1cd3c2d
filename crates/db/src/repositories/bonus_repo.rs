//! Repository for the `user_bonuses` table.

use galaxy_core::production::BonusKind;
use galaxy_core::types::{DbId, Timestamp};
use sqlx::PgConnection;

use crate::models::bonus::UserBonus;

/// Column list for `user_bonuses` queries.
const COLUMNS: &str = "id, user_id, source, kind, percent, expires_at, created_at";

/// Provides commander and booster bonus lookups.
pub struct BonusRepo;

impl BonusRepo {
    pub async fn grant(
        conn: &mut PgConnection,
        user_id: DbId,
        source: &str,
        kind: BonusKind,
        percent: f64,
        expires_at: Option<Timestamp>,
    ) -> Result<UserBonus, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_bonuses (user_id, source, kind, percent, expires_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserBonus>(&query)
            .bind(user_id)
            .bind(source)
            .bind(kind.as_str())
            .bind(percent)
            .bind(expires_at)
            .fetch_one(&mut *conn)
            .await
    }

    /// Bonuses that have not expired at `now`.
    pub async fn active(
        conn: &mut PgConnection,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<Vec<UserBonus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_bonuses \
             WHERE user_id = $1 AND (expires_at IS NULL OR expires_at > $2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, UserBonus>(&query)
            .bind(user_id)
            .bind(now)
            .fetch_all(&mut *conn)
            .await
    }

    /// Summed active percentage for one kind, across all sources.
    pub async fn percent_for(
        conn: &mut PgConnection,
        user_id: DbId,
        kind: BonusKind,
        now: Timestamp,
    ) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(percent), 0)::DOUBLE PRECISION FROM user_bonuses \
             WHERE user_id = $1 AND kind = $2 AND (expires_at IS NULL OR expires_at > $3)",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(now)
        .fetch_one(&mut *conn)
        .await
    }
}
