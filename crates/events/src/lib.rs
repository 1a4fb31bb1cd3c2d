//! Game event bus and push-notification fan-out.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`GameEvent`]: the event envelope published after a unit of work
//!   commits.
//! - [`push`]: the webhook fan-out subscriber. Delivery failures are
//!   logged and never reach the publisher.

pub mod bus;
pub mod push;

pub use bus::{EventBus, GameEvent};
pub use push::{PushDelivery, PushFanout};
