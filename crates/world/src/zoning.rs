//! Density zoning: which identifiers a chunk may draw from.
//!
//! The identifier range grows with the cube of the distance from the origin, so
//! identifier density per unit volume stays roughly constant outwards and the
//! lowest (oldest) identifiers cluster around the centre. Once the distance
//! range no longer overlaps the content pool the chunk is in the periphery and
//! draws from the whole pool.

use anemone_core::{ChunkCoord, ContentId};
use serde::Serialize;

use crate::WorldError;

/// Added to the chunk distance before computing the upper bound.
const UPPER_DISTANCE_PAD: f64 = 1.2;
/// Added to the cubic lower bound.
const LOWER_ID_PAD: u64 = 1;
/// Added to the cubic upper bound.
const UPPER_ID_PAD: u64 = 5;

/// Classification of one chunk plus the identifier range it draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneClass {
    /// True when distance-appropriate identifiers still exist in the pool.
    pub is_core: bool,
    /// Inclusive lower end of the assignable range.
    pub id_lower: ContentId,
    /// Inclusive upper end of the assignable range.
    pub id_upper: ContentId,
}

impl ZoneClass {
    /// Number of identifiers the chunk can draw from.
    pub fn span(&self) -> u32 {
        self.id_upper - self.id_lower + 1
    }

    /// Whether `id` lies inside the assignable range.
    pub fn contains(&self, id: ContentId) -> bool {
        (self.id_lower..=self.id_upper).contains(&id)
    }
}

/// Unclamped identifier bounds for a distance (in chunk units).
///
/// Returns `(floor((d*f)^3) + 1, floor(((d + 1.2)*f)^3) + 5)`, saturating at `u64::MAX`.
pub fn theoretical_bounds(distance: f64, density_factor: f64) -> (u64, u64) {
    let cube = |d: f64| (d * density_factor).powi(3).floor() as u64;
    (
        cube(distance).saturating_add(LOWER_ID_PAD),
        cube(distance + UPPER_DISTANCE_PAD).saturating_add(UPPER_ID_PAD),
    )
}

/// Classify a chunk against a content pool of `max_content_id` identifiers.
pub fn classify(
    coord: ChunkCoord,
    max_content_id: ContentId,
    density_factor: f64,
) -> Result<ZoneClass, WorldError> {
    if max_content_id == 0 {
        return Err(WorldError::EmptyContentPool);
    }
    Ok(classify_distance(
        coord.distance_from_origin(),
        max_content_id,
        density_factor,
    ))
}

fn classify_distance(distance: f64, max_content_id: ContentId, density_factor: f64) -> ZoneClass {
    let pool = u64::from(max_content_id);
    let (lower, upper) = theoretical_bounds(distance, density_factor);

    if lower > pool {
        return ZoneClass {
            is_core: false,
            id_lower: 1,
            id_upper: max_content_id,
        };
    }

    // lower <= pool here, so both clamped ends fit in a ContentId.
    let id_upper = upper.min(pool);
    let id_lower = lower.min(id_upper);
    ZoneClass {
        is_core: true,
        id_lower: id_lower as ContentId,
        id_upper: id_upper as ContentId,
    }
}

/// One ring of a zone survey.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneRing {
    /// Distance from the origin in whole chunks.
    pub distance: u32,
    /// Zone a chunk at that distance falls into.
    pub zone: ZoneClass,
}

/// Classify every whole-chunk distance from 0 to `radius`.
///
/// Useful for seeing where the core boundary falls for a given pool size.
pub fn survey_zones(
    max_content_id: ContentId,
    radius: u32,
    density_factor: f64,
) -> Result<Vec<ZoneRing>, WorldError> {
    if max_content_id == 0 {
        return Err(WorldError::EmptyContentPool);
    }
    Ok((0..=radius)
        .map(|distance| ZoneRing {
            distance,
            zone: classify_distance(f64::from(distance), max_content_id, density_factor),
        })
        .collect())
}
