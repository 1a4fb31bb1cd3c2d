//! Commander and booster production bonuses.

use async_trait::async_trait;
use galaxy_core::production::{BonusKind, ProductionBonuses};
use galaxy_core::types::{DbId, Timestamp};
use galaxy_db::repositories::BonusRepo;
use sqlx::PgConnection;

/// Source of per-user production bonuses, in percent.
#[async_trait]
pub trait BonusProvider: Send + Sync {
    /// Active percentage for one kind.
    async fn percent(
        &self,
        conn: &mut PgConnection,
        user_id: DbId,
        kind: BonusKind,
        now: Timestamp,
    ) -> Result<f64, sqlx::Error>;

    /// All kinds at once.
    async fn bonuses(
        &self,
        conn: &mut PgConnection,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<ProductionBonuses, sqlx::Error> {
        let mut bonuses = ProductionBonuses::default();
        for kind in BonusKind::ALL {
            bonuses.add(kind, self.percent(conn, user_id, kind, now).await?);
        }
        Ok(bonuses)
    }
}

/// Reads active rows from `user_bonuses`, summing commander and booster
/// sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct DbBonusProvider;

#[async_trait]
impl BonusProvider for DbBonusProvider {
    async fn percent(
        &self,
        conn: &mut PgConnection,
        user_id: DbId,
        kind: BonusKind,
        now: Timestamp,
    ) -> Result<f64, sqlx::Error> {
        BonusRepo::percent_for(conn, user_id, kind, now).await
    }

    async fn bonuses(
        &self,
        conn: &mut PgConnection,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<ProductionBonuses, sqlx::Error> {
        let mut bonuses = ProductionBonuses::default();
        for row in BonusRepo::active(conn, user_id, now).await? {
            match BonusKind::ALL.into_iter().find(|kind| kind.as_str() == row.kind) {
                Some(kind) => bonuses.add(kind, row.percent),
                None => tracing::warn!(user_id, kind = %row.kind, "Ignoring unknown bonus kind"),
            }
        }
        Ok(bonuses)
    }
}

/// No bonuses for anyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBonuses;

#[async_trait]
impl BonusProvider for NoBonuses {
    async fn percent(
        &self,
        _conn: &mut PgConnection,
        _user_id: DbId,
        _kind: BonusKind,
        _now: Timestamp,
    ) -> Result<f64, sqlx::Error> {
        Ok(0.0)
    }
}
