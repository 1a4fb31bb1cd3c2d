//! The tick entry point.
//!
//! A tick runs four stages in order: fleets, then the building, research
//! and shipyard queues. Each stage commits on its own, and its events are
//! published only after that commit. Points for every user touched by a
//! committed stage are recomputed last.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use galaxy_core::combat::{AttritionResolver, CombatResolver};
use galaxy_core::types::{DbId, Timestamp};
use galaxy_db::models::queue::QueueKind;
use galaxy_events::{EventBus, GameEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::bonus::{BonusProvider, DbBonusProvider};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fleet::FleetProcessor;
use crate::notifier::publish_all;
use crate::points::PointsRecalculator;
use crate::queues::QueueSweeper;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Per-stage counts. `failed` items were rolled back and will be retried
/// on the next tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub processed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub fleets: StageReport,
    pub buildings: StageReport,
    pub research: StageReport,
    pub shipyard: StageReport,
    pub points_updated: usize,
}

impl TickReport {
    pub fn processed(&self) -> usize {
        self.stages().iter().map(|s| s.processed).sum()
    }

    pub fn failed(&self) -> usize {
        self.stages().iter().map(|s| s.failed).sum()
    }

    fn stages(&self) -> [StageReport; 4] {
        [self.fleets, self.buildings, self.research, self.shipyard]
    }
}

/// What a committed stage hands back to the tick.
#[derive(Debug, Default)]
pub struct StageOutcome {
    pub processed: usize,
    pub failed: usize,
    /// Users whose holdings may have changed.
    pub touched: BTreeSet<DbId>,
    /// Events from committed items, not yet published.
    pub events: Vec<GameEvent>,
}

impl StageOutcome {
    fn report(&self) -> StageReport {
        StageReport {
            processed: self.processed,
            failed: self.failed,
        }
    }
}

// ---------------------------------------------------------------------------
// TickEngine
// ---------------------------------------------------------------------------

/// Advances the simulation. Build once and call [`run_tick`](Self::run_tick)
/// on a fixed cadence.
pub struct TickEngine {
    pool: PgPool,
    fleets: FleetProcessor,
    queues: QueueSweeper,
    event_bus: Option<Arc<EventBus>>,
}

impl TickEngine {
    /// An engine with the default combat resolver, database-backed bonuses,
    /// an OS-seeded RNG and no event bus.
    pub fn new(pool: PgPool, config: EngineConfig) -> Self {
        let bonuses: Arc<dyn BonusProvider> = Arc::new(DbBonusProvider);
        Self {
            pool,
            queues: QueueSweeper::new(Arc::clone(&bonuses)),
            fleets: FleetProcessor::new(
                config,
                Arc::new(AttritionResolver),
                bonuses,
                StdRng::from_rng(&mut rand::rng()),
            ),
            event_bus: None,
        }
    }

    pub fn with_combat(mut self, combat: Arc<dyn CombatResolver>) -> Self {
        self.fleets.combat = combat;
        self
    }

    pub fn with_bonuses(mut self, bonuses: Arc<dyn BonusProvider>) -> Self {
        self.queues = QueueSweeper::new(Arc::clone(&bonuses));
        self.fleets.bonuses = bonuses;
        self
    }

    /// Make expedition draws reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.fleets.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub async fn run_tick(&self) -> Result<TickReport, EngineError> {
        self.run_tick_at(Utc::now()).await
    }

    /// Run one tick as of `now`.
    ///
    /// A stage that fails to open, select or commit aborts the tick; stages
    /// that already committed stay committed and re-running is safe.
    pub async fn run_tick_at(&self, now: Timestamp) -> Result<TickReport, EngineError> {
        let started = Instant::now();
        let mut report = TickReport::default();
        let mut touched = BTreeSet::new();

        let fleets = self.fleets.sweep(&self.pool, now).await?;
        report.fleets = self.finish_stage(fleets, &mut touched);

        for kind in QueueKind::ALL {
            let stage = self.queues.sweep(&self.pool, kind, now).await?;
            let stage_report = self.finish_stage(stage, &mut touched);
            match kind {
                QueueKind::Building => report.buildings = stage_report,
                QueueKind::Research => report.research = stage_report,
                QueueKind::Shipyard => report.shipyard = stage_report,
            }
        }

        report.points_updated = PointsRecalculator::recompute_all(&self.pool, &touched).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if report.processed() > 0 || report.failed() > 0 {
            tracing::info!(
                fleets = report.fleets.processed,
                fleets_failed = report.fleets.failed,
                buildings = report.buildings.processed,
                buildings_failed = report.buildings.failed,
                research = report.research.processed,
                research_failed = report.research.failed,
                shipyard = report.shipyard.processed,
                shipyard_failed = report.shipyard.failed,
                points_updated = report.points_updated,
                elapsed_ms,
                "Tick complete"
            );
        } else {
            tracing::debug!(elapsed_ms, "Tick complete, nothing due");
        }

        Ok(report)
    }

    fn finish_stage(&self, stage: StageOutcome, touched: &mut BTreeSet<DbId>) -> StageReport {
        let report = stage.report();
        touched.extend(stage.touched);
        publish_all(self.event_bus.as_deref(), stage.events);
        report
    }
}
