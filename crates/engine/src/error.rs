use galaxy_core::error::CoreError;
use galaxy_db::models::fleet::FleetDecodeError;

/// Errors raised while running a tick.
///
/// Inside a sweep every variant is an isolation failure for the fleet or
/// queue item that raised it. Only errors opening or committing a stage, or
/// selecting its due rows, escape [`run_tick`](crate::tick::TickEngine::run_tick).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Decode error: {0}")]
    Decode(#[from] FleetDecodeError),

    /// A guarded update matched no row: the item was already handled or
    /// its state no longer allows the transition.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: galaxy_core::types::DbId) -> Self {
        EngineError::Core(CoreError::NotFound { entity, id })
    }
}
