#![warn(missing_docs)]
//! Resolution of content identifiers into renderable image assets.
//!
//! The upstream is slow, rate-limited and hands out links that expire, so
//! every lookup goes through a TTL cache, an optional persistent override
//! store, a process-wide gate and a bounded retry policy.

mod asset;
mod cache;
mod clock;
mod config;
mod error;
mod gate;
mod provider;
mod proxy;
mod resolver;
mod retry;
mod store;
mod telegram;

pub use asset::*;
pub use cache::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use gate::*;
pub use provider::*;
pub use proxy::*;
pub use resolver::*;
pub use retry::*;
pub use store::*;
pub use telegram::*;
