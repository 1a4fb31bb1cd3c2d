//! Row models and lookup enums.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! database row and, where the engine or command boundary inserts rows, a
//! create DTO.

pub mod bonus;
pub mod fleet;
pub mod message;
pub mod planet;
pub mod queue;
pub mod status;
pub mod user;
