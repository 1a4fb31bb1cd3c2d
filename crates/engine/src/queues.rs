//! Construction queue sweepers and order cancellation.
//!
//! The three queues share one sweep shape: select due rows, apply each
//! row's effect and delete it inside its own savepoint. Orders were
//! validated and paid when they were placed; the sweep only applies them.

use std::sync::Arc;

use galaxy_core::error::CoreError;
use galaxy_core::types::{DbId, Timestamp};
use galaxy_core::units::{BuildingKind, ResearchKind, UnitKind};
use galaxy_db::models::message::MessageCategory;
use galaxy_db::models::queue::{QueueItem, QueueKind};
use galaxy_db::repositories::{InventoryRepo, PlanetRepo, QueueRepo, ResourceRepo, UserRepo};
use sqlx::{Connection, PgConnection, PgPool};

use crate::bonus::BonusProvider;
use crate::error::EngineError;
use crate::notifier::Notifier;
use crate::production::accumulate;
use crate::tick::StageOutcome;

pub struct QueueSweeper {
    bonuses: Arc<dyn BonusProvider>,
}

impl QueueSweeper {
    pub fn new(bonuses: Arc<dyn BonusProvider>) -> Self {
        Self { bonuses }
    }

    /// Apply and delete every `kind` item due by `now`.
    pub async fn sweep(
        &self,
        pool: &PgPool,
        kind: QueueKind,
        now: Timestamp,
    ) -> Result<StageOutcome, EngineError> {
        let mut tx = pool.begin().await?;
        let due = QueueRepo::list_due(&mut tx, kind, now).await?;
        let mut outcome = StageOutcome::default();

        for item in due {
            let mut notifier = Notifier::for_source(kind.table(), item.id);
            let mut savepoint = Connection::begin(&mut *tx).await?;

            match self.complete(&mut savepoint, kind, &item, &mut notifier, now).await {
                Ok(()) => {
                    savepoint.commit().await?;
                    outcome.processed += 1;
                    outcome.touched.insert(item.user_id);
                    outcome.events.extend(notifier.into_events());
                }
                Err(e) => {
                    savepoint.rollback().await?;
                    outcome.failed += 1;
                    tracing::error!(
                        queue = kind.as_str(),
                        item_id = item.id,
                        planet_id = item.planet_id,
                        error = %e,
                        "Queue item failed, rolled back"
                    );
                }
            }
        }

        tx.commit().await?;
        Ok(outcome)
    }

    async fn complete(
        &self,
        conn: &mut PgConnection,
        kind: QueueKind,
        item: &QueueItem,
        notifier: &mut Notifier,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let planet = PlanetRepo::find_by_id(conn, item.planet_id)
            .await?
            .ok_or_else(|| EngineError::not_found("planet", item.planet_id))?;

        let (category, title, body) = match kind {
            QueueKind::Building => {
                let building: BuildingKind = item.target.parse()?;
                // Production up to now still runs at the old level.
                accumulate(conn, self.bonuses.as_ref(), planet.id, now).await?;
                let level = InventoryRepo::increment_building(conn, planet.id, building)
                    .await?
                    .ok_or_else(|| EngineError::not_found("planet", planet.id))?;
                PlanetRepo::increment_fields_used(conn, planet.id).await?;
                (
                    MessageCategory::Construction,
                    "Construction complete",
                    format!("{building} on {} reached level {level}.", planet.name),
                )
            }
            QueueKind::Research => {
                let research: ResearchKind = item.target.parse()?;
                let level = InventoryRepo::increment_research(conn, item.user_id, research)
                    .await?
                    .ok_or_else(|| EngineError::not_found("user", item.user_id))?;
                UserRepo::set_research_in_progress(conn, item.user_id, false).await?;
                (
                    MessageCategory::Research,
                    "Research complete",
                    format!("{research} reached level {level}."),
                )
            }
            QueueKind::Shipyard => {
                let unit: UnitKind = item.target.parse()?;
                InventoryRepo::add_unit(conn, planet.id, unit, item.quantity).await?;
                (
                    MessageCategory::Shipyard,
                    "Shipyard order complete",
                    format!("{} {unit} completed on {}.", item.quantity, planet.name),
                )
            }
        };

        if !QueueRepo::delete(conn, kind, item.id).await? {
            return Err(EngineError::InvalidState(format!(
                "{} item {} was already removed",
                kind.as_str(),
                item.id
            )));
        }

        notifier
            .notify(conn, item.user_id, category, title, &body)
            .await?;
        tracing::debug!(
            queue = kind.as_str(),
            item_id = item.id,
            planet_id = planet.id,
            target = %item.target,
            "Queue item completed"
        );
        Ok(())
    }
}

/// Cancel a not-yet-due order and refund its reserved cost.
///
/// The refund lands on an accumulated ledger. A research cancel also clears
/// the user's in-progress flag. Fails with `NotFound` for an unknown item
/// and `Conflict` for one that is already due.
pub async fn cancel_order(
    conn: &mut PgConnection,
    bonuses: &dyn BonusProvider,
    kind: QueueKind,
    id: DbId,
    now: Timestamp,
) -> Result<QueueItem, EngineError> {
    let mut tx = conn.begin().await?;

    let Some(item) = QueueRepo::take_pending(&mut tx, kind, id, now).await? else {
        return match QueueRepo::find_by_id(&mut tx, kind, id).await? {
            Some(_) => Err(CoreError::Conflict(format!(
                "{} item {id} is already due",
                kind.as_str()
            ))
            .into()),
            None => Err(EngineError::not_found("queue item", id)),
        };
    };

    accumulate(&mut tx, bonuses, item.planet_id, now).await?;
    ResourceRepo::credit(&mut tx, item.planet_id, &item.reserved())
        .await?
        .ok_or_else(|| EngineError::not_found("planet", item.planet_id))?;
    if kind == QueueKind::Research {
        UserRepo::set_research_in_progress(&mut tx, item.user_id, false).await?;
    }

    tx.commit().await?;
    tracing::info!(
        queue = kind.as_str(),
        item_id = item.id,
        planet_id = item.planet_id,
        "Order cancelled and refunded"
    );
    Ok(item)
}
