//! Request/response shapes for the chunk and locate queries.
//!
//! The route layer deserializes raw query parameters into these types and
//! serializes the responses as-is. Invalid input never escapes as an error:
//! it is logged and answered with an empty or not-found response.

use anemone_core::{ChunkCoord, ContentId, WorldSeed};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::generator::{ChunkGenerator, PlacedItem};
use crate::locator::LocateOutcome;
use crate::WorldError;

/// `GET chunk` parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChunkQuery {
    /// World (collection) the chunk belongs to.
    pub world_seed: String,
    /// Chunk X.
    #[serde(rename = "x")]
    pub cx: i64,
    /// Chunk Y.
    #[serde(rename = "y")]
    pub cy: i64,
    /// Chunk Z.
    #[serde(rename = "z")]
    pub cz: i64,
    /// Size of the content pool; the configured default when absent.
    #[serde(default)]
    pub max_content_id: Option<i64>,
}

/// Items of one chunk, echoing the requested coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkResponse {
    /// Requested chunk X.
    pub cx: i64,
    /// Requested chunk Y.
    pub cy: i64,
    /// Requested chunk Z.
    pub cz: i64,
    /// Generated items; empty when the query was invalid.
    pub items: Vec<PlacedItem>,
}

/// `GET locate` parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocateQuery {
    /// World (collection) to search.
    pub world_seed: String,
    /// Identifier to find.
    pub post_id: i64,
    /// Observer X in world units.
    pub x: f64,
    /// Observer Y in world units.
    pub y: f64,
    /// Observer Z in world units.
    pub z: f64,
    /// Size of the content pool; the configured default when absent.
    #[serde(default)]
    pub max_content_id: Option<i64>,
    /// Shell budget; the configured maximum when absent.
    #[serde(default)]
    pub radius: Option<i64>,
}

/// World-space point in the client's `{x, y, z}` shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldPoint {
    /// X.
    pub x: f64,
    /// Y.
    pub y: f64,
    /// Z.
    pub z: f64,
}

impl From<DVec3> for WorldPoint {
    fn from(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Result of a locate query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocateResponse {
    /// Whether the identifier was found within the budget.
    pub found: bool,
    /// World position of the match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<WorldPoint>,
    /// Distance from the observer to the match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl LocateResponse {
    const NOT_FOUND: Self = Self {
        found: false,
        pos: None,
        distance: None,
    };
}

impl From<LocateOutcome> for LocateResponse {
    fn from(outcome: LocateOutcome) -> Self {
        match outcome {
            LocateOutcome::Found {
                world_position,
                distance,
                ..
            } => Self {
                found: true,
                pos: Some(world_position.into()),
                distance: Some(distance),
            },
            LocateOutcome::NotFound { .. } => Self::NOT_FOUND,
        }
    }
}

fn coord_component(value: i64, axis: &str) -> Result<i32, WorldError> {
    i32::try_from(value).map_err(|_| WorldError::CoordOutOfRange(format!("{axis}={value}")))
}

fn content_pool(requested: Option<i64>, default: ContentId) -> Result<ContentId, WorldError> {
    match requested {
        None => Ok(default),
        Some(value) if value >= 1 => {
            Ok(ContentId::try_from(value).unwrap_or(ContentId::MAX))
        }
        Some(_) => Err(WorldError::EmptyContentPool),
    }
}

impl ChunkGenerator {
    /// Answer a chunk query; invalid input yields an empty item list.
    pub fn handle_chunk_query(&self, query: &ChunkQuery) -> ChunkResponse {
        let items = self.chunk_items(query).unwrap_or_else(|err| {
            warn!(error = %err, ?query, "rejecting chunk query");
            Vec::new()
        });
        ChunkResponse {
            cx: query.cx,
            cy: query.cy,
            cz: query.cz,
            items,
        }
    }

    fn chunk_items(&self, query: &ChunkQuery) -> Result<Vec<PlacedItem>, WorldError> {
        let coord = ChunkCoord::new(
            coord_component(query.cx, "x")?,
            coord_component(query.cy, "y")?,
            coord_component(query.cz, "z")?,
        );
        let pool = content_pool(query.max_content_id, self.config().default_max_content_id)?;
        self.generate_chunk(&WorldSeed::new(query.world_seed.as_str()), coord, pool)
    }

    /// Answer a locate query; invalid input yields `found: false`.
    pub fn handle_locate_query(&self, query: &LocateQuery) -> LocateResponse {
        match self.locate_query(query) {
            Ok(outcome) => outcome.into(),
            Err(err) => {
                warn!(error = %err, ?query, "rejecting locate query");
                LocateResponse::NOT_FOUND
            }
        }
    }

    fn locate_query(&self, query: &LocateQuery) -> Result<LocateOutcome, WorldError> {
        let Ok(target) = ContentId::try_from(query.post_id) else {
            return Ok(LocateOutcome::NotFound { shells_searched: 0 });
        };
        let pool = content_pool(query.max_content_id, self.config().default_max_content_id)?;
        let radius = query
            .radius
            .unwrap_or(i64::from(self.config().max_search_shells));
        self.locate(
            &WorldSeed::new(query.world_seed.as_str()),
            target,
            DVec3::new(query.x, query.y, query.z),
            pool,
            radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorldConfig;

    fn generator() -> ChunkGenerator {
        ChunkGenerator::new(WorldConfig::default()).unwrap()
    }

    fn chunk_query(x: i64) -> ChunkQuery {
        ChunkQuery {
            world_seed: "world-A".into(),
            cx: x,
            cy: 0,
            cz: 0,
            max_content_id: None,
        }
    }

    #[test]
    fn chunk_query_echoes_coordinates() {
        let response = generator().handle_chunk_query(&chunk_query(3));
        assert_eq!((response.cx, response.cy, response.cz), (3, 0, 0));
        assert!(!response.items.is_empty());
    }

    #[test]
    fn out_of_range_coordinate_yields_empty_items() {
        let response = generator().handle_chunk_query(&chunk_query(i64::MAX));
        assert!(response.items.is_empty());
    }

    #[test]
    fn zero_pool_yields_empty_items() {
        let mut query = chunk_query(0);
        query.max_content_id = Some(0);
        assert!(generator().handle_chunk_query(&query).items.is_empty());
    }

    #[test]
    fn chunk_query_parses_client_parameters() {
        let query: ChunkQuery =
            serde_json::from_str(r#"{"world_seed":"@anemonn","x":1,"y":-2,"z":3}"#).unwrap();
        assert_eq!((query.cx, query.cy, query.cz), (1, -2, 3));
        assert_eq!(query.max_content_id, None);
    }

    #[test]
    fn locate_round_trips_through_query_layer() {
        let generator = generator();
        let items = generator
            .generate_chunk(&WorldSeed::new("world-A"), ChunkCoord::ORIGIN, 8504)
            .unwrap();
        let query = LocateQuery {
            world_seed: "world-A".into(),
            post_id: i64::from(items[0].content_id),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            max_content_id: Some(8504),
            radius: Some(2),
        };
        let response = generator.handle_locate_query(&query);
        assert!(response.found);
        assert!(response.distance.is_some());
    }

    #[test]
    fn negative_radius_yields_not_found() {
        let query = LocateQuery {
            world_seed: "world-A".into(),
            post_id: 1,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            max_content_id: None,
            radius: Some(-3),
        };
        let response = generator().handle_locate_query(&query);
        assert_eq!(response, LocateResponse::NOT_FOUND);
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json, serde_json::json!({ "found": false }));
    }
}
