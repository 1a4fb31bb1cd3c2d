//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&mut PgConnection` as the first argument. Pass a pool connection
//! for standalone reads, or a transaction (`&mut *tx`) to run inside a unit
//! of work.

pub mod bonus_repo;
pub mod fleet_repo;
pub mod inventory_repo;
pub mod message_repo;
pub mod planet_repo;
pub mod queue_repo;
pub mod resource_repo;
pub mod user_repo;

pub use bonus_repo::BonusRepo;
pub use fleet_repo::FleetRepo;
pub use inventory_repo::InventoryRepo;
pub use message_repo::MessageRepo;
pub use planet_repo::PlanetRepo;
pub use queue_repo::QueueRepo;
pub use resource_repo::ResourceRepo;
pub use user_repo::UserRepo;
