//! Chunk streaming through the full app schedule: the anchor transform
//! drives loading, eviction honors the margin, and every change is
//! announced as a message.

mod common;
use common::{logic_app, pump_until, spawn_anchor};

use bevy::prelude::*;
use hexstead::constants::{CHUNKS_PER_FRAME, EVICT_MARGIN, RENDER_DISTANCE};
use hexstead::hex::HexCoord;
use hexstead::map::{ChunkCoord, HexMap};
use hexstead::messages::{ChunkLoaded, MapRegenerated, RegenerateRequest};

fn render_square() -> usize {
    let side = (2 * RENDER_DISTANCE + 1) as usize;
    side * side
}

fn square_loaded(map: &HexMap, center: ChunkCoord) -> bool {
    (-RENDER_DISTANCE..=RENDER_DISTANCE).all(|dq| {
        (-RENDER_DISTANCE..=RENDER_DISTANCE)
            .all(|dr| map.is_chunk_loaded(ChunkCoord::new(center.q + dq, center.r + dr)))
    })
}

#[test]
fn streaming_fills_the_render_square_around_the_anchor() {
    let mut app = logic_app();
    spawn_anchor(&mut app, Vec3::ZERO);

    // The first frame only loads a handful of chunks.
    app.update();
    let early = app.world().resource::<HexMap>().chunk_count();
    assert!(early <= CHUNKS_PER_FRAME);

    pump_until(&mut app, 64, |app| {
        app.world().resource::<HexMap>().chunk_count() == render_square()
    });

    let map = app.world().resource::<HexMap>();
    assert!(square_loaded(map, ChunkCoord::new(0, 0)));
}

#[test]
fn chunk_loads_are_announced_exactly_once() {
    let mut app = logic_app();
    spawn_anchor(&mut app, Vec3::ZERO);

    let mut announced = 0;
    for _ in 0..64 {
        app.update();
        announced += app
            .world_mut()
            .resource_mut::<Messages<ChunkLoaded>>()
            .drain()
            .count();
        if app.world().resource::<HexMap>().chunk_count() == render_square() {
            break;
        }
    }

    assert_eq!(announced, render_square());
}

#[test]
fn dragging_the_anchor_east_evicts_the_far_edge() {
    let mut app = logic_app();
    let anchor = spawn_anchor(&mut app, Vec3::ZERO);
    pump_until(&mut app, 64, |app| {
        app.world().resource::<HexMap>().chunk_count() == render_square()
    });

    // Hop two chunks past the eviction ring in one go.
    let hop = RENDER_DISTANCE + EVICT_MARGIN + 2;
    let target = ChunkCoord::new(hop, 0);
    app.world_mut()
        .entity_mut(anchor)
        .get_mut::<Transform>()
        .unwrap()
        .translation = target.origin().to_world(0);

    pump_until(&mut app, 64, |app| {
        square_loaded(app.world().resource::<HexMap>(), target)
    });

    let map = app.world().resource::<HexMap>();
    assert!(!map.is_chunk_loaded(ChunkCoord::new(-RENDER_DISTANCE, 0)));
    assert!(!map.is_chunk_loaded(ChunkCoord::new(0, 0)));
    // Chunks inside the margin ride along instead of thrashing.
    assert!(map.is_chunk_loaded(ChunkCoord::new(hop - RENDER_DISTANCE - EVICT_MARGIN, 0)));
}

#[test]
fn regenerate_requests_reseed_the_world() {
    let mut app = logic_app();
    spawn_anchor(&mut app, Vec3::ZERO);
    pump_until(&mut app, 64, |app| {
        app.world().resource::<HexMap>().chunk_count() == render_square()
    });

    app.world_mut()
        .resource_mut::<Messages<RegenerateRequest>>()
        .write(RegenerateRequest { seed: 777 });
    app.update();

    // The same frame drops everything and starts reloading.
    let map = app.world().resource::<HexMap>();
    assert_eq!(map.seed(), 777);
    assert_eq!(map.chunk_count(), CHUNKS_PER_FRAME);
    assert!(
        !app.world()
            .resource::<Messages<MapRegenerated>>()
            .is_empty()
    );

    pump_until(&mut app, 64, |app| {
        app.world().resource::<HexMap>().chunk_count() == render_square()
    });

    // The replacement terrain matches a fresh map built from the same seed.
    let mut fresh = HexMap::new(777);
    fresh.generate_area(HexCoord::ZERO, 2);
    let map = app.world().resource::<HexMap>();
    for (coord, tile) in fresh.tiles_in_radius(HexCoord::ZERO, 2) {
        assert_eq!(map.tile(coord), Some(tile), "mismatch at {coord}");
    }
}
