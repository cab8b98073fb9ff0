//! The chunk content plan: the single owner of the per-chunk draw order.
//!
//! Both the generator and the locator go through [`ChunkPlanner::plan`], so the
//! sequence of random draws for a chunk lives in exactly one place:
//!
//! 1. item count
//! 2. per item, in index order: position x, y, z; size; tilt x, tilt y; content id
//!
//! Zoning is a pure function of the coordinate and consumes no draws. The
//! relaxer never draws either (its degenerate push axis is fixed).

use anemone_core::{chunk_rng, ChunkCoord, ContentId, WorldSeed};
use glam::DVec3;
use rand::Rng;

use crate::zoning::{classify, ZoneClass};
use crate::{WorldConfig, WorldError};

/// Raw, pre-relaxation draw results for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedItem {
    /// Index of the item within its chunk.
    pub index: usize,
    /// Chunk-local position inside the safety-margined spawn cube.
    pub position: DVec3,
    /// Width of the item; height is width times the aspect ratio.
    pub size: f64,
    /// Tilt around the X and Y axes, in radians.
    pub tilt: [f64; 2],
    /// Assigned catalog identifier.
    pub content_id: ContentId,
}

/// Everything drawn for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPlan {
    /// Chunk the plan belongs to.
    pub coord: ChunkCoord,
    /// Density zone of the chunk.
    pub zone: ZoneClass,
    /// Items in draw order.
    pub items: Vec<PlannedItem>,
}

/// Draws chunk plans for a validated [`WorldConfig`].
#[derive(Debug, Clone)]
pub struct ChunkPlanner {
    config: WorldConfig,
}

impl ChunkPlanner {
    /// Validate `config` and build a planner around it.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration this planner draws with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Draw the plan for one chunk.
    pub fn plan(
        &self,
        world_seed: &WorldSeed,
        coord: ChunkCoord,
        max_content_id: ContentId,
    ) -> Result<ChunkPlan, WorldError> {
        let zone = classify(coord, max_content_id, self.config.density_factor)?;
        let mut rng = chunk_rng(world_seed, coord);

        let limit = self.config.boundary_limit();
        let tilt = self.config.max_tilt;
        let count = rng.gen_range(self.config.min_items..=self.config.max_items) as usize;

        let items = (0..count)
            .map(|index| {
                let position = DVec3::new(
                    rng.gen_range(-limit..=limit),
                    rng.gen_range(-limit..=limit),
                    rng.gen_range(-limit..=limit),
                );
                let size = rng.gen_range(self.config.min_size..=self.config.max_size);
                let tilt = [rng.gen_range(-tilt..=tilt), rng.gen_range(-tilt..=tilt)];
                let content_id = rng.gen_range(zone.id_lower..=zone.id_upper);
                PlannedItem {
                    index,
                    position,
                    size,
                    tilt,
                    content_id,
                }
            })
            .collect();

        Ok(ChunkPlan { coord, zone, items })
    }
}
