#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod coord;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use coord::ChunkCoord;

/// Identifier of one item in the external content catalog.
pub type ContentId = u32;

/// Opaque string naming one logical world (usually one content collection).
///
/// Never stored; callers build one per request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(String);

impl WorldSeed {
    /// Wrap an arbitrary seed string.
    pub fn new(seed: impl Into<String>) -> Self {
        Self(seed.into())
    }

    /// Borrow the raw seed string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorldSeed {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for WorldSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical seed string for one chunk: `"{world_seed}:{cx},{cy},{cz}"`.
pub fn chunk_seed_string(world_seed: &WorldSeed, coord: ChunkCoord) -> String {
    format!("{}:{},{},{}", world_seed.as_str(), coord.x, coord.y, coord.z)
}

/// Numeric seed for a chunk: the first 8 bytes (little endian) of the blake3
/// digest of [`chunk_seed_string`].
pub fn chunk_seed(world_seed: &WorldSeed, coord: ChunkCoord) -> u64 {
    let digest = blake3::hash(chunk_seed_string(world_seed, coord).as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

/// Helper to derive a reproducible RNG for one chunk of one world.
pub fn chunk_rng(world_seed: &WorldSeed, coord: ChunkCoord) -> StdRng {
    StdRng::seed_from_u64(chunk_seed(world_seed, coord))
}
