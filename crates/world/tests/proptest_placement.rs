//! Property-based tests for chunk placement, zoning and location
//!
//! Critical invariants:
//! - Generation is a pure function of (seed, coordinate, pool)
//! - Relaxed items never leave the safety-margined sub-cube
//! - Once a distance is periphery, every greater distance is periphery
//! - The locator finds any generated item given enough shells, from inside or near its chunk

use anemone_core::{ChunkCoord, WorldSeed};
use anemone_world::{
    chunk_origin, classify, theoretical_bounds, ChunkGenerator, LocateOutcome, WorldConfig,
};
use glam::DVec3;
use proptest::prelude::*;

fn generator() -> ChunkGenerator {
    ChunkGenerator::new(WorldConfig::default()).expect("default config")
}

proptest! {
    /// Property: two independent generations are identical
    #[test]
    fn generation_is_deterministic(
        seed in "[a-zA-Z0-9@_-]{0,16}",
        x in -500i32..500,
        y in -500i32..500,
        z in -500i32..500,
        pool in 1u32..20_000,
    ) {
        let seed = WorldSeed::new(seed);
        let coord = ChunkCoord::new(x, y, z);
        let a = generator().generate_chunk(&seed, coord, pool).unwrap();
        let b = generator().generate_chunk(&seed, coord, pool).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Property: relaxed positions stay within the boundary limit
    #[test]
    fn relaxed_items_are_contained(
        x in -1000i32..1000,
        y in -1000i32..1000,
        z in -1000i32..1000,
    ) {
        let generator = generator();
        let limit = generator.config().boundary_limit();
        let items = generator
            .generate_chunk(&WorldSeed::new("containment"), ChunkCoord::new(x, y, z), 8504)
            .unwrap();
        for item in items {
            prop_assert!(
                item.position.abs().max_element() <= limit,
                "item {} at {:?} exceeds {}", item.local_id, item.position, limit
            );
        }
    }

    /// Property: periphery is never followed by core at a greater distance
    #[test]
    fn periphery_is_monotone(
        pool in 1u32..1_000_000,
        d in 0.0f64..200.0,
        step in 0.0f64..50.0,
    ) {
        let (near_lower, _) = theoretical_bounds(d, 0.9);
        let (far_lower, _) = theoretical_bounds(d + step, 0.9);
        let near_core = near_lower <= u64::from(pool);
        let far_core = far_lower <= u64::from(pool);
        prop_assert!(near_core || !far_core);
    }

    /// Property: core chunks draw only ids inside the pool
    #[test]
    fn zone_range_is_within_pool(
        x in -60i32..60,
        y in -60i32..60,
        z in -60i32..60,
        pool in 1u32..50_000,
    ) {
        let zone = classify(ChunkCoord::new(x, y, z), pool, 0.9).unwrap();
        prop_assert!(zone.id_lower >= 1);
        prop_assert!(zone.id_lower <= zone.id_upper);
        prop_assert!(zone.id_upper <= pool);
    }

    /// Property: a generated id is located at its pre-relaxation world position
    #[test]
    fn locator_finds_generated_items(
        x in -3i32..=3,
        y in -3i32..=3,
        z in -3i32..=3,
        pick in 0usize..4,
    ) {
        let generator = generator();
        let seed = WorldSeed::new("world-A");
        let coord = ChunkCoord::new(x, y, z);
        let plan = generator.plan(&seed, coord, 8504).unwrap();
        let target = plan.items[pick % plan.items.len()].content_id;

        // Observer sits at the chunk's centre, so radius 0 covers the chunk.
        let observer = chunk_origin(coord, generator.config().chunk_size);
        let outcome = generator.locate(&seed, target, observer, 8504, 0).unwrap();

        let expected = plan.items.iter().find(|item| item.content_id == target).unwrap();
        match outcome {
            LocateOutcome::Found { chunk, world_position, distance, .. } => {
                prop_assert_eq!(chunk, coord);
                let want = observer + expected.position;
                prop_assert!((world_position - want).length() < 1e-6);
                prop_assert!((distance - expected.position.length()).abs() < 1e-6);
            }
            other => prop_assert!(false, "expected match, got {:?}", other),
        }
    }

    /// Property: an observer a few chunks away still finds the id within its shell budget
    #[test]
    fn locator_finds_items_from_neighbouring_chunks(
        x in -3i32..=3,
        y in -3i32..=3,
        z in -3i32..=3,
        dx in -3i32..=3,
        dy in -3i32..=3,
        dz in -3i32..=3,
        pick in 0usize..4,
    ) {
        prop_assume!(dx != 0 || dy != 0 || dz != 0);
        let generator = generator();
        let chunk_size = generator.config().chunk_size;
        let seed = WorldSeed::new("world-A");
        let coord = ChunkCoord::new(x, y, z);
        let plan = generator.plan(&seed, coord, 8504).unwrap();
        let target = plan.items[pick % plan.items.len()].content_id;

        let observer_chunk = coord.offset(dx, dy, dz);
        let observer = chunk_origin(observer_chunk, chunk_size);
        let away = observer_chunk.chebyshev_distance(coord);
        let outcome = generator
            .locate(&seed, target, observer, 8504, i64::from(away))
            .unwrap();

        // A duplicate in a nearer shell may win, so only consistency is checked.
        match outcome {
            LocateOutcome::Found { chunk, index, world_position, distance } => {
                prop_assert!(chunk.chebyshev_distance(observer_chunk) <= away);
                let found = generator.plan(&seed, chunk, 8504).unwrap();
                let item = &found.items[index];
                prop_assert_eq!(item.content_id, target);
                let want = chunk_origin(chunk, chunk_size) + item.position;
                prop_assert!((world_position - want).length() < 1e-6);
                prop_assert!((distance - world_position.distance(observer)).abs() < 1e-6);
            }
            other => prop_assert!(false, "expected match, got {:?}", other),
        }
    }
}

#[test]
fn example_scenario_world_a_origin() {
    let generator = generator();
    let seed = WorldSeed::new("world-A");
    let items = generator
        .generate_chunk(&seed, ChunkCoord::ORIGIN, 8504)
        .unwrap();
    assert!((2..=4).contains(&items.len()));
    assert!(items.iter().all(|item| (1..=6).contains(&item.content_id)));

    let plan = generator.plan(&seed, ChunkCoord::ORIGIN, 8504).unwrap();
    let target = items[0].content_id;
    let outcome = generator
        .locate(&seed, target, DVec3::ZERO, 8504, 6)
        .unwrap();
    let expected = plan
        .items
        .iter()
        .find(|item| item.content_id == target)
        .unwrap();
    match outcome {
        LocateOutcome::Found { distance, .. } => {
            assert!((distance - expected.position.length()).abs() < 1e-6);
        }
        other => panic!("expected match, got {other:?}"),
    }
}
