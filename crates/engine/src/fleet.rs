//! Fleet lifecycle processor.
//!
//! One sweep runs in a single stage transaction: the due fleets are
//! selected `FOR UPDATE SKIP LOCKED`, then each fleet is handled inside its
//! own savepoint. A fleet that fails is rolled back to its savepoint and
//! counted; the rest of the sweep carries on.

use std::sync::Arc;

use galaxy_core::combat::CombatResolver;
use galaxy_core::expedition::draw_outcome;
use galaxy_core::types::{DbId, Timestamp};
use galaxy_db::models::fleet::{Fleet, FleetRow};
use galaxy_db::models::status::{FleetStatus, Mission};
use galaxy_db::repositories::FleetRepo;
use rand::rngs::StdRng;
use sqlx::{Connection, PgConnection, PgPool};
use tokio::sync::Mutex;

use crate::bonus::BonusProvider;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::missions::return_trip::{arrive_home, return_leg};
use crate::missions::{
    attack, colonize, deploy, expedition, transport, Disposition, MissionEnv, Resolution,
};
use crate::notifier::Notifier;
use crate::tick::StageOutcome;

pub struct FleetProcessor {
    pub(crate) config: EngineConfig,
    pub(crate) combat: Arc<dyn CombatResolver>,
    pub(crate) bonuses: Arc<dyn BonusProvider>,
    pub(crate) rng: Mutex<StdRng>,
}

impl FleetProcessor {
    pub fn new(
        config: EngineConfig,
        combat: Arc<dyn CombatResolver>,
        bonuses: Arc<dyn BonusProvider>,
        rng: StdRng,
    ) -> Self {
        Self {
            config,
            combat,
            bonuses,
            rng: Mutex::new(rng),
        }
    }

    /// Process every fleet that has arrived by `now`.
    ///
    /// Only failures opening or committing the stage, or selecting the due
    /// fleets, are returned. Events are handed back unpublished.
    pub async fn sweep(&self, pool: &PgPool, now: Timestamp) -> Result<StageOutcome, EngineError> {
        let mut tx = pool.begin().await?;
        let due = FleetRepo::list_due(&mut tx, now).await?;
        let mut outcome = StageOutcome::default();

        for row in due {
            let fleet_id = row.id;
            let mut notifier = Notifier::for_source("fleet", fleet_id);
            let mut savepoint = Connection::begin(&mut *tx).await?;

            match self.process(&mut savepoint, row, &mut notifier, now).await {
                Ok(owner_id) => {
                    savepoint.commit().await?;
                    outcome.processed += 1;
                    outcome.touched.insert(owner_id);
                    outcome.touched.extend(notifier.recipients());
                    outcome.events.extend(notifier.into_events());
                }
                Err(e) => {
                    savepoint.rollback().await?;
                    outcome.failed += 1;
                    tracing::error!(fleet_id, error = %e, "Fleet processing failed, rolled back");
                }
            }
        }

        tx.commit().await?;
        Ok(outcome)
    }

    /// Handle one due fleet. Returns its owner.
    async fn process(
        &self,
        conn: &mut PgConnection,
        row: FleetRow,
        notifier: &mut Notifier,
        now: Timestamp,
    ) -> Result<DbId, EngineError> {
        let fleet = row.decode()?;
        let env = MissionEnv {
            config: &self.config,
            combat: self.combat.as_ref(),
            bonuses: self.bonuses.as_ref(),
        };

        if fleet.status == FleetStatus::Returning {
            arrive_home(&env, conn, &fleet, notifier, now).await?;
            tracing::debug!(fleet_id = fleet.id, user_id = fleet.owner_id, "Fleet returned home");
            return Ok(fleet.owner_id);
        }

        let resolution = match fleet.mission {
            Some(Mission::Transport) => transport::resolve(&env, conn, &fleet, notifier, now).await?,
            Some(Mission::Colonize) => colonize::resolve(&env, conn, &fleet, notifier, now).await?,
            Some(Mission::Attack) => attack::resolve(&env, conn, &fleet, notifier, now).await?,
            Some(Mission::Expedition) => {
                let drawn = {
                    let mut rng = self.rng.lock().await;
                    draw_outcome(&mut *rng)
                };
                expedition::resolve(conn, &fleet, &drawn, notifier, now).await?
            }
            Some(Mission::Deploy) => deploy::resolve(&env, conn, &fleet, notifier, now).await?,
            None => {
                tracing::warn!(
                    fleet_id = fleet.id,
                    mission_id = fleet.mission_id,
                    "Unrecognised mission, sending fleet home"
                );
                Resolution::unchanged(&fleet)
            }
        };

        let disposition = resolution.disposition;
        self.apply(conn, &fleet, resolution, now).await?;
        tracing::debug!(
            fleet_id = fleet.id,
            user_id = fleet.owner_id,
            mission = fleet.mission.map(Mission::as_str).unwrap_or("unknown"),
            ships = fleet.ships.total_units(),
            ?disposition,
            "Fleet mission resolved"
        );
        Ok(fleet.owner_id)
    }

    async fn apply(
        &self,
        conn: &mut PgConnection,
        fleet: &Fleet,
        resolution: Resolution,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let applied = match resolution.disposition {
            Disposition::Return => {
                FleetRepo::update_payload(conn, fleet.id, &resolution.ships, &resolution.cargo)
                    .await?;
                let (departure_at, arrival_at) = return_leg(fleet, now, self.config.min_return);
                FleetRepo::mark_returning(conn, fleet.id, departure_at, arrival_at).await?
            }
            Disposition::Complete => {
                FleetRepo::mark_completed(conn, fleet.id, FleetStatus::Active).await?
            }
            Disposition::Destroy => FleetRepo::mark_destroyed(conn, fleet.id).await?,
        };

        if !applied {
            return Err(EngineError::InvalidState(format!(
                "fleet {} is no longer active",
                fleet.id
            )));
        }
        Ok(())
    }
}
