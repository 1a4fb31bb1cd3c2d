//! The galaxy tick engine.
//!
//! [`TickEngine::run_tick`] advances everything that has come due: arrived
//! fleets are resolved by their mission handlers or merged back home, and
//! finished building, research and shipyard orders are applied. Every fleet
//! and queue item runs inside its own savepoint, so one bad row is rolled
//! back and logged while the rest of the tick proceeds.
//!
//! - [`fleet`]: fleet lifecycle processor.
//! - [`missions`]: per-mission outcome handlers and the return trip.
//! - [`production`]: resource accumulation on a locked ledger.
//! - [`queues`]: queue sweepers and order cancellation.
//! - [`points`]: score recomputation for touched users.
//! - [`notifier`]: in-game messages with deferred event publication.

pub mod bonus;
pub mod config;
pub mod error;
pub mod fleet;
pub mod missions;
pub mod notifier;
pub mod points;
pub mod production;
pub mod queues;
pub mod tick;

pub use config::EngineConfig;
pub use error::EngineError;
pub use tick::{StageReport, TickEngine, TickReport};
