//! Pure domain logic for the galaxy simulation.
//!
//! Nothing in this crate touches storage or the network:
//!
//! - [`units`]: closed enums for every building, research, ship and defense kind.
//! - [`resources`]: resource bundles and enum-keyed unit manifests.
//! - [`production`]: mine output, energy balance and the starvation factor.
//! - [`costs`] / [`points`]: construction cost tables and the derived score.
//! - [`combat`]: the combat resolver contract and its default implementation.
//! - [`expedition`]: expedition outcome draws.

pub mod combat;
pub mod costs;
pub mod error;
pub mod expedition;
pub mod points;
pub mod production;
pub mod resources;
pub mod types;
pub mod units;
