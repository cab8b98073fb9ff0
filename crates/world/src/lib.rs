#![warn(missing_docs)]
//! Deterministic gallery world: chunk generation, density zoning, placement
//! relaxation and inverse location.
//!
//! Every function here is pure. Nothing is persisted; a chunk is re-derived
//! from its world seed and coordinate whenever it is needed.

mod config;
mod error;
mod generator;
mod locator;
mod plan;
mod query;
mod relax;
mod zoning;

pub use config::*;
pub use error::*;
pub use generator::*;
pub use locator::*;
pub use plan::*;
pub use query::*;
pub use relax::*;
pub use zoning::*;
