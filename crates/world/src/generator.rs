//! Seeded chunk generation.
//!
//! Generates the items of one chunk from a world seed and chunk coordinate,
//! with no I/O and no retained state.

use anemone_core::{ChunkCoord, ContentId, WorldSeed};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::plan::{ChunkPlan, ChunkPlanner, PlannedItem};
use crate::relax::{relax, RelaxParams};
use crate::{WorldConfig, WorldError};

/// One framed image placed inside a chunk.
///
/// Serialized with the gallery client's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    /// `"{cx}_{cy}_{cz}_{index}"`.
    #[serde(rename = "id")]
    pub local_id: String,
    /// Chunk-local position after relaxation.
    #[serde(rename = "pos")]
    pub position: DVec3,
    /// Width and height.
    #[serde(rename = "scale")]
    pub size: DVec2,
    /// Catalog identifier to resolve into an image.
    #[serde(rename = "post_id")]
    pub content_id: ContentId,
    /// Euler rotation; Z is always zero.
    pub rotation: DVec3,
}

impl PlacedItem {
    fn from_plan(coord: ChunkCoord, planned: &PlannedItem, aspect_ratio: f64) -> Self {
        Self {
            local_id: local_id(coord, planned.index),
            position: planned.position,
            size: DVec2::new(planned.size, planned.size * aspect_ratio),
            content_id: planned.content_id,
            rotation: DVec3::new(planned.tilt[0], planned.tilt[1], 0.0),
        }
    }
}

/// Deterministic identifier of the `index`-th item of a chunk.
pub fn local_id(coord: ChunkCoord, index: usize) -> String {
    format!("{}_{}_{}_{}", coord.x, coord.y, coord.z, index)
}

/// World-space centre of a chunk.
pub fn chunk_origin(coord: ChunkCoord, chunk_size: f64) -> DVec3 {
    DVec3::new(coord.x as f64, coord.y as f64, coord.z as f64) * chunk_size
}

/// Chunk generator that turns plans into relaxed item layouts.
#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    planner: ChunkPlanner,
}

impl ChunkGenerator {
    /// Create a generator, rejecting invalid configurations up front.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        Ok(Self {
            planner: ChunkPlanner::new(config)?,
        })
    }

    /// Configuration used for every chunk.
    pub fn config(&self) -> &WorldConfig {
        self.planner.config()
    }

    /// Draw the raw plan for a chunk without relaxing it.
    pub fn plan(
        &self,
        world_seed: &WorldSeed,
        coord: ChunkCoord,
        max_content_id: ContentId,
    ) -> Result<ChunkPlan, WorldError> {
        self.planner.plan(world_seed, coord, max_content_id)
    }

    /// Generate the relaxed item layout of a chunk.
    ///
    /// Two calls with the same arguments return identical lists.
    #[instrument(skip(self), fields(world_seed = %world_seed, coord = %coord))]
    pub fn generate_chunk(
        &self,
        world_seed: &WorldSeed,
        coord: ChunkCoord,
        max_content_id: ContentId,
    ) -> Result<Vec<PlacedItem>, WorldError> {
        let plan = self.plan(world_seed, coord, max_content_id)?;
        let config = self.config();

        let mut items: Vec<PlacedItem> = plan
            .items
            .iter()
            .map(|planned| PlacedItem::from_plan(coord, planned, config.aspect_ratio))
            .collect();
        relax(&mut items, RelaxParams::from_config(config));

        debug!(
            items = items.len(),
            core = plan.zone.is_core,
            id_lower = plan.zone.id_lower,
            id_upper = plan.zone.id_upper,
            "chunk generated"
        );
        Ok(items)
    }
}
