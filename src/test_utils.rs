//! Testing utilities.
//!
//! Helpers for exercising game systems in isolation: a headless app
//! running the logic plugins, hand-built uniform maps, and path
//! assertions shared across test modules.

use bevy::prelude::*;

use crate::hex::HexCoord;
use crate::map::chunk::{Chunk, ChunkCoord, Tile};
use crate::map::{HexMap, StreamAnchor, Terrain};

/// A headless app with the full logic stack (streaming, placement,
/// simulation) and no rendering or input.
pub fn logic_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(crate::LogicPlugins);
    app
}

/// Spawns a streaming anchor at the given world position.
pub fn spawn_anchor(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((StreamAnchor, Transform::from_translation(position)))
        .id()
}

/// Runs `frames` updates.
pub fn pump(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// A map whose chunks within `chunk_radius` of the origin are uniform
/// `terrain` at elevation 1 with no decorations. Generated terrain
/// stays out of the way so tests can focus on one rule at a time.
pub fn flat_map(terrain: Terrain, chunk_radius: i32) -> HexMap {
    let mut map = HexMap::new(0);
    let tile = Tile {
        terrain,
        elevation: 1,
        decoration: None,
        rotation: 0.0,
    };
    for q in -chunk_radius..=chunk_radius {
        for r in -chunk_radius..=chunk_radius {
            map.insert_chunk(Chunk::filled(ChunkCoord::new(q, r), tile));
        }
    }
    map
}

/// Asserts that two hexes are exactly one step apart.
pub fn assert_adjacent(a: HexCoord, b: HexCoord) {
    let distance = a.distance(b);
    assert_eq!(
        distance, 1,
        "{a} and {b} are not adjacent (distance {distance})"
    );
}

/// Asserts that consecutive path entries are adjacent. Empty and
/// single-tile paths are trivially valid.
pub fn assert_valid_path(path: &[HexCoord]) {
    for window in path.windows(2) {
        assert_adjacent(window[0], window[1]);
    }
}
