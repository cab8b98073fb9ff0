//! Inverse location: find where in world space a content identifier was placed.
//!
//! Nothing is indexed. The locator re-draws chunk plans shell by shell around
//! the observer and stops at the first item carrying the target identifier.
//! Positions are pre-relaxation, so a match is approximate by up to one
//! relaxation push.

use anemone_core::{ChunkCoord, ContentId, WorldSeed};
use glam::DVec3;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::generator::{chunk_origin, ChunkGenerator};
use crate::WorldError;

/// Observer chunk coordinates beyond this magnitude are rejected.
const MAX_OBSERVER_CHUNK: f64 = 1.0e9;

/// Result of a locate query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocateOutcome {
    /// The identifier was drawn in `chunk`.
    Found {
        /// Chunk holding the match.
        chunk: ChunkCoord,
        /// Index of the matching item inside the chunk.
        index: usize,
        /// Chunk origin plus the pre-relaxation local position.
        world_position: DVec3,
        /// Euclidean distance from the observer.
        distance: f64,
    },
    /// No chunk within the searched shells drew the identifier.
    NotFound {
        /// Outermost shell radius that was examined.
        shells_searched: u32,
    },
}

impl LocateOutcome {
    /// Whether the search produced a match.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Chunk containing a world-space position (each axis rounded to the nearest chunk).
pub fn chunk_containing(position: DVec3, chunk_size: f64) -> Result<ChunkCoord, WorldError> {
    let raw = position.to_array();
    if !position.is_finite() {
        return Err(WorldError::NonFiniteObserver(raw));
    }
    let scaled = (position / chunk_size).round();
    if scaled.abs().max_element() > MAX_OBSERVER_CHUNK {
        return Err(WorldError::ObserverOutOfRange(raw));
    }
    Ok(ChunkCoord::new(
        scaled.x as i32,
        scaled.y as i32,
        scaled.z as i32,
    ))
}

/// Every coordinate at Chebyshev distance exactly `radius` from `center`.
///
/// Ordered by x, then y, then z. Radius 0 yields only `center`.
pub fn shell(center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
    if radius == 0 {
        return vec![center];
    }
    let mut coords = Vec::with_capacity(shell_len(radius));
    let radius = i32::try_from(radius).unwrap_or(i32::MAX);
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if dx.abs() == radius || dy.abs() == radius {
                for dz in -radius..=radius {
                    coords.push(center.offset(dx, dy, dz));
                }
            } else {
                coords.push(center.offset(dx, dy, -radius));
                coords.push(center.offset(dx, dy, radius));
            }
        }
    }
    coords
}

/// Number of coordinates in a shell of the given radius.
pub fn shell_len(radius: u32) -> usize {
    if radius == 0 {
        return 1;
    }
    let outer = (2 * radius as usize + 1).pow(3);
    let inner = (2 * radius as usize - 1).pow(3);
    outer - inner
}

impl ChunkGenerator {
    /// Search outward from `observer` for the chunk that drew `target`.
    ///
    /// `search_shells` is clamped to the configured maximum; a negative value
    /// is invalid input. First match wins: farther shells are never examined
    /// once a match is found.
    #[instrument(skip(self), fields(world_seed = %world_seed))]
    pub fn locate(
        &self,
        world_seed: &WorldSeed,
        target: ContentId,
        observer: DVec3,
        max_content_id: ContentId,
        search_shells: i64,
    ) -> Result<LocateOutcome, WorldError> {
        if search_shells < 0 {
            return Err(WorldError::NegativeSearchRadius(search_shells));
        }
        if max_content_id == 0 {
            return Err(WorldError::EmptyContentPool);
        }
        let config = self.config();
        let center = chunk_containing(observer, config.chunk_size)?;
        let shells = u32::try_from(search_shells)
            .unwrap_or(u32::MAX)
            .min(config.max_search_shells);

        for radius in 0..=shells {
            for coord in shell(center, radius) {
                let plan = self.plan(world_seed, coord, max_content_id)?;
                let Some(hit) = plan.items.iter().find(|item| item.content_id == target) else {
                    continue;
                };
                let world_position = chunk_origin(coord, config.chunk_size) + hit.position;
                let distance = world_position.distance(observer);
                debug!(%coord, radius, distance, "content located");
                return Ok(LocateOutcome::Found {
                    chunk: coord,
                    index: hit.index,
                    world_position,
                    distance,
                });
            }
        }

        debug!(shells, "content not found within search budget");
        Ok(LocateOutcome::NotFound {
            shells_searched: shells,
        })
    }
}
