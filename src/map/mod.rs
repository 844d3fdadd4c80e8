//! The hex world: procedural terrain in fixed-size chunks, streamed in
//! and out around an anchor entity as it moves.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::constants::{CHUNKS_PER_FRAME, EVICT_MARGIN, RENDER_DISTANCE, WORLD_SEED};
use crate::hex::HexCoord;
use crate::messages::{ChunkLoaded, ChunkUnloaded, MapRegenerated, RegenerateRequest};

pub mod chunk;
pub mod terrain;

pub use chunk::{Chunk, ChunkCoord, Tile};
pub use terrain::{DecorationKind, Terrain, TerrainGenerator, TerrainProperties};

/// Top-level ordering for game systems within `Update`.
///
/// Streaming runs first so the frame's map state is settled before
/// anything reads it; interaction runs last so player requests see the
/// results of this frame's simulation.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum GameSet {
    Streaming,
    Simulation,
    Interaction,
}

/// Marks the entity whose position drives chunk streaming. The camera
/// rig carries this in game; tests spawn a bare transform.
#[derive(Component, Debug, Default)]
pub struct StreamAnchor;

/// What a single streaming pass did.
#[derive(Debug, Default)]
pub struct StreamReport {
    pub loaded: Vec<ChunkCoord>,
    pub unloaded: Vec<ChunkCoord>,
}

impl StreamReport {
    /// True when the pass neither loaded nor evicted anything.
    pub fn is_quiet(&self) -> bool {
        self.loaded.is_empty() && self.unloaded.is_empty()
    }
}

/// The single authority on map state: which chunks are resident and
/// what every loaded tile contains.
///
/// There is no persistence. A world is its seed, and regenerating with
/// the same seed always rebuilds identical terrain, so nothing here is
/// ever written to disk.
#[derive(Resource)]
pub struct HexMap {
    chunks: HashMap<ChunkCoord, Chunk>,
    generator: TerrainGenerator,
    /// Chunks are kept loaded within this chessboard radius of the anchor.
    pub render_distance: i32,
    /// Upper bound on chunk generations per streaming pass.
    pub chunks_per_frame: usize,
}

impl Default for HexMap {
    fn default() -> Self {
        Self::new(WORLD_SEED)
    }
}

impl HexMap {
    pub fn new(seed: u64) -> Self {
        Self {
            chunks: HashMap::new(),
            generator: TerrainGenerator::new(seed),
            render_distance: RENDER_DISTANCE,
            chunks_per_frame: CHUNKS_PER_FRAME,
        }
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    /// One streaming pass around a world-space anchor position.
    ///
    /// Evicts chunks further than `render_distance + EVICT_MARGIN`
    /// (the margin keeps a chunk from thrashing when the anchor sits
    /// on a boundary), then generates the missing chunks within
    /// `render_distance`, nearest first, at most `chunks_per_frame` of
    /// them. Call repeatedly to converge.
    pub fn stream(&mut self, anchor: Vec3) -> StreamReport {
        let center = ChunkCoord::containing(HexCoord::from_world(anchor));

        let evict_beyond = self.render_distance + EVICT_MARGIN;
        let unloaded: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|coord| coord.chebyshev_distance(center) > evict_beyond)
            .collect();
        for coord in &unloaded {
            self.chunks.remove(coord);
        }

        let mut missing = Vec::new();
        for dq in -self.render_distance..=self.render_distance {
            for dr in -self.render_distance..=self.render_distance {
                let coord = ChunkCoord::new(center.q + dq, center.r + dr);
                if !self.chunks.contains_key(&coord) {
                    missing.push(coord);
                }
            }
        }
        missing.sort_by_key(|coord| coord.distance_sq(center));
        missing.truncate(self.chunks_per_frame);

        for &coord in &missing {
            self.chunks
                .insert(coord, Chunk::generate(coord, &self.generator));
        }

        StreamReport {
            loaded: missing,
            unloaded,
        }
    }

    /// Drop every chunk and reseed the generator. Returns the dropped
    /// chunk coordinates so callers can announce them.
    pub fn regenerate(&mut self, seed: u64) -> Vec<ChunkCoord> {
        self.generator = TerrainGenerator::new(seed);
        let mut dropped: Vec<ChunkCoord> = self.chunks.drain().map(|(coord, _)| coord).collect();
        dropped.sort_unstable_by_key(|coord| (coord.q, coord.r));
        dropped
    }

    /// Load every chunk touching the hex area around `center`, without
    /// throttling or eviction. For tools and tests; the game proper
    /// streams instead.
    pub fn generate_area(&mut self, center: HexCoord, radius: i32) -> Vec<ChunkCoord> {
        let min = ChunkCoord::containing(center + HexCoord::new(-radius, -radius));
        let max = ChunkCoord::containing(center + HexCoord::new(radius, radius));
        let mut loaded = Vec::new();
        for q in min.q..=max.q {
            for r in min.r..=max.r {
                let coord = ChunkCoord::new(q, r);
                if !self.chunks.contains_key(&coord) {
                    self.chunks
                        .insert(coord, Chunk::generate(coord, &self.generator));
                    loaded.push(coord);
                }
            }
        }
        loaded
    }

    pub fn tile(&self, coord: HexCoord) -> Option<&Tile> {
        self.chunks
            .get(&ChunkCoord::containing(coord))
            .and_then(|chunk| chunk.tile(coord))
    }

    pub fn has_tile(&self, coord: HexCoord) -> bool {
        self.tile(coord).is_some()
    }

    /// Unloaded tiles are not walkable; the world ends at the loaded edge.
    pub fn is_walkable(&self, coord: HexCoord) -> bool {
        self.tile(coord).is_some_and(Tile::is_walkable)
    }

    pub fn movement_cost(&self, coord: HexCoord) -> f32 {
        self.tile(coord).map_or(1.0, Tile::movement_cost)
    }

    pub fn surface_height(&self, coord: HexCoord) -> Option<f32> {
        self.tile(coord).map(Tile::surface_height)
    }

    /// Loaded neighbor tiles in canonical direction order.
    pub fn neighbors(&self, coord: HexCoord) -> Vec<(HexCoord, &Tile)> {
        coord
            .neighbors()
            .into_iter()
            .filter_map(|n| self.tile(n).map(|tile| (n, tile)))
            .collect()
    }

    /// Loaded tiles within `radius` steps of `center`, center included.
    pub fn tiles_in_radius(&self, center: HexCoord, radius: i32) -> Vec<(HexCoord, &Tile)> {
        center
            .area(radius)
            .into_iter()
            .filter_map(|c| self.tile(c).map(|tile| (c, tile)))
            .collect()
    }

    /// Loaded tiles along the hex line from `from` to `to`, inclusive.
    pub fn tiles_in_line(&self, from: HexCoord, to: HexCoord) -> Vec<(HexCoord, &Tile)> {
        from.line_to(to)
            .into_iter()
            .filter_map(|c| self.tile(c).map(|tile| (c, tile)))
            .collect()
    }

    /// Overwrite the terrain of a loaded tile. Returns false if the
    /// tile is not loaded.
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: Terrain) -> bool {
        match self.tile_mut(coord) {
            Some(tile) => {
                tile.terrain = terrain;
                true
            }
            None => false,
        }
    }

    /// Remove and return a tile's decoration, if it has one.
    pub fn clear_decoration(&mut self, coord: HexCoord) -> Option<DecorationKind> {
        self.tile_mut(coord)?.decoration.take()
    }

    /// Put a decoration on a loaded, bare tile. Returns false when the
    /// tile is missing or already decorated.
    pub fn set_decoration(&mut self, coord: HexCoord, kind: DecorationKind) -> bool {
        match self.tile_mut(coord) {
            Some(tile) if tile.decoration.is_none() => {
                tile.decoration = Some(kind);
                true
            }
            _ => false,
        }
    }

    pub fn is_chunk_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    fn tile_mut(&mut self, coord: HexCoord) -> Option<&mut Tile> {
        self.chunks
            .get_mut(&ChunkCoord::containing(coord))?
            .tile_mut(coord)
    }

    /// Insert a hand-built chunk, bypassing generation.
    #[cfg(test)]
    pub(crate) fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.coord(), chunk);
    }
}

/// Plugin that owns the hex map and its streaming systems, and anchors
/// the shared `GameSet` ordering.
pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HexMap>();

        app.add_message::<RegenerateRequest>()
            .add_message::<ChunkLoaded>()
            .add_message::<ChunkUnloaded>()
            .add_message::<MapRegenerated>();

        app.configure_sets(
            Update,
            (
                GameSet::Streaming,
                GameSet::Simulation,
                GameSet::Interaction,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (handle_regenerate_requests, stream_chunks)
                .chain()
                .in_set(GameSet::Streaming),
        );
    }
}

/// Stream chunks around the anchor entity and announce the changes.
fn stream_chunks(
    mut map: ResMut<HexMap>,
    anchors: Query<&Transform, With<StreamAnchor>>,
    mut loaded: MessageWriter<ChunkLoaded>,
    mut unloaded: MessageWriter<ChunkUnloaded>,
) {
    let Ok(anchor) = anchors.single() else {
        return;
    };

    let report = map.stream(anchor.translation);
    if report.is_quiet() {
        return;
    }

    debug!(
        "Streamed chunks: {} in, {} out, {} resident",
        report.loaded.len(),
        report.unloaded.len(),
        map.chunk_count()
    );
    for coord in report.loaded {
        loaded.write(ChunkLoaded { coord });
    }
    for coord in report.unloaded {
        unloaded.write(ChunkUnloaded { coord });
    }
}

/// Rebuild the world from a new seed. Multiple requests in one frame
/// collapse to the last one.
fn handle_regenerate_requests(
    mut requests: MessageReader<RegenerateRequest>,
    mut map: ResMut<HexMap>,
    mut unloaded: MessageWriter<ChunkUnloaded>,
    mut regenerated: MessageWriter<MapRegenerated>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };

    let dropped = map.regenerate(request.seed);
    info!(
        "Regenerated map with seed {} ({} chunks dropped)",
        request.seed,
        dropped.len()
    );
    for coord in dropped {
        unloaded.write(ChunkUnloaded { coord });
    }
    regenerated.write(MapRegenerated { seed: request.seed });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CHUNK_SIZE;

    fn converge(map: &mut HexMap, anchor: Vec3) {
        for _ in 0..64 {
            if map.stream(anchor).is_quiet() {
                return;
            }
        }
        panic!("streaming did not converge at {anchor:?}");
    }

    #[test]
    fn streaming_converges_to_square_and_goes_quiet() {
        let mut map = HexMap::new(99);
        map.render_distance = 1;

        converge(&mut map, Vec3::ZERO);

        assert_eq!(map.chunk_count(), 9);
        for q in -1..=1 {
            for r in -1..=1 {
                assert!(map.is_chunk_loaded(ChunkCoord::new(q, r)));
            }
        }
        assert!(map.stream(Vec3::ZERO).is_quiet());
    }

    #[test]
    fn loads_are_throttled_and_nearest_first() {
        let mut map = HexMap::new(99);
        map.render_distance = 2;
        map.chunks_per_frame = 4;

        let report = map.stream(Vec3::ZERO);
        assert_eq!(report.loaded.len(), 4);
        // The anchor's own chunk is strictly closest, so it comes first.
        assert_eq!(report.loaded[0], ChunkCoord::new(0, 0));
        for coord in &report.loaded {
            assert!(coord.chebyshev_distance(ChunkCoord::new(0, 0)) <= 1);
        }
    }

    #[test]
    fn eviction_waits_for_the_margin() {
        let mut map = HexMap::new(7);
        map.render_distance = 1;
        map.chunks_per_frame = 64;

        converge(&mut map, Vec3::ZERO);

        // Two chunks over: everything old is still within the margin.
        let near = ChunkCoord::new(2, 0).origin().to_world(0);
        let report = map.stream(near);
        assert!(report.unloaded.is_empty());
        assert!(map.is_chunk_loaded(ChunkCoord::new(-1, 0)));

        // Four chunks over: distance 5 and 4 fall out, distance 3 stays.
        let far = ChunkCoord::new(4, 0).origin().to_world(0);
        converge(&mut map, far);
        assert!(!map.is_chunk_loaded(ChunkCoord::new(-1, 0)));
        assert!(!map.is_chunk_loaded(ChunkCoord::new(0, 0)));
        assert!(map.is_chunk_loaded(ChunkCoord::new(1, 0)));
    }

    #[test]
    fn tiles_resolve_across_chunk_boundaries() {
        let mut map = HexMap::new(5);
        map.generate_area(HexCoord::ZERO, CHUNK_SIZE + 4);

        for coord in [
            HexCoord::new(0, 0),
            HexCoord::new(CHUNK_SIZE - 1, CHUNK_SIZE - 1),
            HexCoord::new(CHUNK_SIZE, 0),
            HexCoord::new(-1, -1),
            HexCoord::new(-CHUNK_SIZE, CHUNK_SIZE),
        ] {
            assert!(map.has_tile(coord), "missing tile at {coord}");
            assert_eq!(map.tile(coord).is_some(), map.has_tile(coord));
        }

        let interior = HexCoord::new(2, 2);
        assert_eq!(map.neighbors(interior).len(), 6);
        assert_eq!(map.tiles_in_radius(interior, 2).len(), 19);
        assert_eq!(
            map.tiles_in_line(interior, HexCoord::new(6, 2)).len(),
            5
        );
    }

    #[test]
    fn unloaded_tiles_read_as_absent_and_unwalkable() {
        let map = HexMap::new(5);
        let nowhere = HexCoord::new(1_000, 1_000);

        assert!(map.tile(nowhere).is_none());
        assert!(!map.has_tile(nowhere));
        assert!(!map.is_walkable(nowhere));
        assert_eq!(map.surface_height(nowhere), None);
    }

    #[test]
    fn terrain_and_decoration_edits_hit_loaded_tiles_only() {
        let mut map = HexMap::new(5);
        map.insert_chunk(Chunk::filled(
            ChunkCoord::new(0, 0),
            Tile {
                terrain: Terrain::Grass,
                elevation: 1,
                decoration: Some(DecorationKind::Tree),
                rotation: 0.0,
            },
        ));

        let inside = HexCoord::new(3, 3);
        assert!(map.set_terrain(inside, Terrain::Road));
        assert_eq!(map.tile(inside).map(|t| t.terrain), Some(Terrain::Road));
        assert_eq!(map.clear_decoration(inside), Some(DecorationKind::Tree));
        assert_eq!(map.clear_decoration(inside), None);

        // Bare tiles accept one decoration, decorated ones refuse more.
        assert!(map.set_decoration(inside, DecorationKind::Rock));
        assert!(!map.set_decoration(inside, DecorationKind::Bush));
        assert_eq!(map.clear_decoration(inside), Some(DecorationKind::Rock));

        let outside = HexCoord::new(CHUNK_SIZE, 0);
        assert!(!map.set_terrain(outside, Terrain::Road));
        assert!(!map.set_decoration(outside, DecorationKind::Bush));
        assert_eq!(map.clear_decoration(outside), None);
    }

    #[test]
    fn regeneration_drops_chunks_and_matches_a_fresh_map() {
        let mut map = HexMap::new(1);
        map.render_distance = 1;
        converge(&mut map, Vec3::ZERO);

        let dropped = map.regenerate(2);
        assert_eq!(dropped.len(), 9);
        assert_eq!(map.chunk_count(), 0);
        assert_eq!(map.seed(), 2);

        converge(&mut map, Vec3::ZERO);

        let mut fresh = HexMap::new(2);
        fresh.render_distance = 1;
        converge(&mut fresh, Vec3::ZERO);

        for chunk in fresh.loaded_chunks() {
            assert_eq!(map.chunk(chunk.coord()), Some(chunk));
        }
    }
}
