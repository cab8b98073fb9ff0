//! Tunable constants for chunk generation and location.
//!
//! The defaults were tuned empirically. [`WorldConfig::validate`] enforces
//! the margin/min-distance relationship and caps the per-chunk and search budgets.

use anemone_core::ContentId;
use serde::{Deserialize, Serialize};

use crate::WorldError;

/// Largest accepted `max_search_shells`.
pub const SEARCH_SHELL_LIMIT: u32 = 1024;
/// Largest accepted `max_items`.
pub const ITEMS_PER_CHUNK_LIMIT: u32 = 256;

/// Generation parameters shared by the generator, relaxer and locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of one chunk cube in world units.
    pub chunk_size: f64,
    /// Distance kept free between the spawn cube and the chunk faces.
    pub edge_margin: f64,
    /// Minimum centre-to-centre distance the relaxer tries to enforce.
    pub min_distance: f64,
    /// Scales chunk distance into the cubic identifier range.
    pub density_factor: f64,
    /// Fewest items placed in one chunk.
    pub min_items: u32,
    /// Most items placed in one chunk.
    pub max_items: u32,
    /// Smallest item width.
    pub min_size: f64,
    /// Largest item width.
    pub max_size: f64,
    /// Height/width ratio of every item.
    pub aspect_ratio: f64,
    /// Largest absolute tilt (radians) on the X and Y rotation axes.
    pub max_tilt: f64,
    /// Number of repulsion-then-clamp passes.
    pub relax_passes: u32,
    /// Content pool size used when a query does not declare one.
    pub default_max_content_id: ContentId,
    /// Hard cap on the locator's shell radius.
    pub max_search_shells: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1500.0,
            edge_margin: 260.0,
            min_distance: 450.0,
            density_factor: 0.9,
            min_items: 2,
            max_items: 4,
            min_size: 100.0,
            max_size: 300.0,
            aspect_ratio: 1.5,
            max_tilt: 0.2,
            relax_passes: 5,
            default_max_content_id: 8504,
            max_search_shells: 12,
        }
    }
}

impl WorldConfig {
    /// Half-extent of the cube items may occupy, centred on the chunk centre.
    pub fn boundary_limit(&self) -> f64 {
        self.chunk_size / 2.0 - self.edge_margin
    }

    /// Reject configurations the generator cannot honour.
    pub fn validate(&self) -> Result<(), WorldError> {
        let invalid = |msg: String| Err(WorldError::InvalidConfig(msg));

        if !(self.chunk_size.is_finite() && self.chunk_size > 0.0) {
            return invalid(format!("chunk_size must be positive, got {}", self.chunk_size));
        }
        if !(self.min_distance.is_finite() && self.min_distance >= 0.0) {
            return invalid(format!(
                "min_distance must be non-negative, got {}",
                self.min_distance
            ));
        }
        // Relaxation must never push an item into a neighbouring chunk.
        if self.edge_margin < self.min_distance / 2.0 {
            return invalid(format!(
                "edge_margin {} is smaller than half of min_distance {}",
                self.edge_margin, self.min_distance
            ));
        }
        if self.boundary_limit() <= 0.0 {
            return invalid(format!(
                "edge_margin {} leaves no room inside chunk_size {}",
                self.edge_margin, self.chunk_size
            ));
        }
        if !(self.density_factor.is_finite() && self.density_factor > 0.0) {
            return invalid(format!(
                "density_factor must be positive, got {}",
                self.density_factor
            ));
        }
        if self.min_items == 0 || self.min_items > self.max_items {
            return invalid(format!(
                "item count range {}..={} is empty or zero",
                self.min_items, self.max_items
            ));
        }
        if !(self.min_size > 0.0 && self.min_size <= self.max_size && self.max_size.is_finite()) {
            return invalid(format!(
                "size range {}..{} is invalid",
                self.min_size, self.max_size
            ));
        }
        if !(self.max_tilt.is_finite() && self.max_tilt >= 0.0) {
            return invalid(format!("max_tilt must be non-negative, got {}", self.max_tilt));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            ));
        }
        if self.max_items > ITEMS_PER_CHUNK_LIMIT {
            return invalid(format!(
                "max_items {} exceeds {ITEMS_PER_CHUNK_LIMIT}",
                self.max_items
            ));
        }
        if self.max_search_shells > SEARCH_SHELL_LIMIT {
            return invalid(format!(
                "max_search_shells {} exceeds {SEARCH_SHELL_LIMIT}",
                self.max_search_shells
            ));
        }
        if self.default_max_content_id == 0 {
            return Err(WorldError::EmptyContentPool);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = WorldConfig::default();
        config.validate().expect("default config");
        assert_eq!(config.boundary_limit(), 490.0);
    }

    #[test]
    fn margin_must_cover_half_min_distance() {
        let config = WorldConfig {
            edge_margin: 200.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WorldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_item_range_is_rejected() {
        let config = WorldConfig {
            min_items: 5,
            max_items: 3,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_budgets_are_rejected() {
        let shells = WorldConfig {
            max_search_shells: 3_000_000_000,
            ..WorldConfig::default()
        };
        assert!(matches!(shells.validate(), Err(WorldError::InvalidConfig(_))));

        let items = WorldConfig {
            max_items: u32::MAX,
            ..WorldConfig::default()
        };
        assert!(matches!(items.validate(), Err(WorldError::InvalidConfig(_))));

        let at_limit = WorldConfig {
            max_search_shells: SEARCH_SHELL_LIMIT,
            max_items: ITEMS_PER_CHUNK_LIMIT,
            ..WorldConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: WorldConfig = serde_json::from_str(r#"{"chunk_size": 2000.0}"#).unwrap();
        assert_eq!(config.chunk_size, 2000.0);
        assert_eq!(config.relax_passes, 5);
    }
}
