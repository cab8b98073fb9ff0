//! Placement relaxation: pairwise repulsion followed by boundary clamping.
//!
//! This is a fixed-iteration, best-effort pass rather than a solver. With two to
//! four items per chunk and a generous edge margin it settles in practice, and
//! the fixed schedule keeps layouts identical to any other renderer running the
//! same passes.

use glam::DVec3;

use crate::{PlacedItem, WorldConfig};

/// Below this distance two items count as coincident.
const COINCIDENT_EPSILON: f64 = 1e-6;

/// Parameters for [`relax`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxParams {
    /// Centre-to-centre distance the passes try to reach.
    pub min_distance: f64,
    /// Every position component is clamped to `[-boundary_limit, boundary_limit]`.
    pub boundary_limit: f64,
    /// Number of repulsion-then-clamp passes.
    pub passes: u32,
}

impl RelaxParams {
    /// Parameters matching a world configuration.
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            min_distance: config.min_distance,
            boundary_limit: config.boundary_limit(),
            passes: config.relax_passes,
        }
    }
}

/// Push overlapping items apart, then clamp them back inside the spawn cube.
///
/// Clamping runs last in every pass, so containment always holds on return even
/// when the minimum distance cannot be met.
pub fn relax(items: &mut [PlacedItem], params: RelaxParams) {
    for _ in 0..params.passes {
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                let delta = items[i].position - items[j].position;
                let distance = delta.length();
                if distance >= params.min_distance {
                    continue;
                }
                // Coincident items have no connecting vector; push along X.
                let direction = if distance < COINCIDENT_EPSILON {
                    DVec3::X
                } else {
                    delta / distance
                };
                let push = direction * ((params.min_distance - distance) / 2.0);
                items[i].position += push;
                items[j].position -= push;
            }
        }

        let limit = DVec3::splat(params.boundary_limit);
        for item in items.iter_mut() {
            item.position = item.position.clamp(-limit, limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn item_at(position: DVec3) -> PlacedItem {
        PlacedItem {
            local_id: String::new(),
            position,
            size: DVec2::new(100.0, 150.0),
            content_id: 1,
            rotation: DVec3::ZERO,
        }
    }

    fn params() -> RelaxParams {
        RelaxParams {
            min_distance: 450.0,
            boundary_limit: 490.0,
            passes: 5,
        }
    }

    #[test]
    fn close_pair_is_pushed_to_min_distance() {
        let mut items = vec![
            item_at(DVec3::new(-50.0, 0.0, 0.0)),
            item_at(DVec3::new(50.0, 0.0, 0.0)),
        ];
        relax(&mut items, params());
        let distance = items[0].position.distance(items[1].position);
        assert!((distance - 450.0).abs() < 1e-9, "distance {distance}");
        // Symmetric push keeps the midpoint.
        assert!((items[0].position + items[1].position).length() < 1e-9);
    }

    #[test]
    fn coincident_items_separate_along_x() {
        let mut items = vec![item_at(DVec3::ZERO), item_at(DVec3::ZERO)];
        relax(&mut items, params());
        assert_eq!(items[0].position, DVec3::new(225.0, 0.0, 0.0));
        assert_eq!(items[1].position, DVec3::new(-225.0, 0.0, 0.0));
    }

    #[test]
    fn pushes_never_leave_the_boundary() {
        let mut items = vec![
            item_at(DVec3::new(480.0, 480.0, 480.0)),
            item_at(DVec3::new(470.0, 470.0, 470.0)),
            item_at(DVec3::new(-490.0, 0.0, 490.0)),
        ];
        relax(&mut items, params());
        for item in &items {
            assert!(item.position.abs().max_element() <= 490.0);
        }
    }

    #[test]
    fn distant_items_are_untouched() {
        let original = vec![
            item_at(DVec3::new(-400.0, 0.0, 0.0)),
            item_at(DVec3::new(400.0, 0.0, 0.0)),
        ];
        let mut items = original.clone();
        relax(&mut items, params());
        assert_eq!(items, original);
    }

    #[test]
    fn zero_passes_is_identity() {
        let original = vec![item_at(DVec3::ZERO), item_at(DVec3::ONE)];
        let mut items = original.clone();
        relax(
            &mut items,
            RelaxParams {
                passes: 0,
                ..params()
            },
        );
        assert_eq!(items, original);
    }
}
