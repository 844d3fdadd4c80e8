//! Chunks: fixed-size blocks of tiles generated and streamed as a unit.

use crate::constants::{CHUNK_SIZE, ELEVATION_STEP};
use crate::hex::HexCoord;
use crate::map::terrain::{DecorationKind, Terrain, TerrainGenerator};

/// Coordinate of a chunk on the chunk grid.
///
/// A hex belongs to the chunk at `(floor(q / CHUNK_SIZE), floor(r / CHUNK_SIZE))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkCoord {
    pub q: i32,
    pub r: i32,
}

impl ChunkCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The chunk owning the given hex. Floor division, so negative
    /// coordinates land in the correct chunk instead of truncating
    /// toward zero.
    pub fn containing(hex: HexCoord) -> Self {
        Self {
            q: hex.q.div_euclid(CHUNK_SIZE),
            r: hex.r.div_euclid(CHUNK_SIZE),
        }
    }

    /// Global hex coordinate of this chunk's local (0, 0) tile.
    pub const fn origin(&self) -> HexCoord {
        HexCoord::new(self.q * CHUNK_SIZE, self.r * CHUNK_SIZE)
    }

    /// Chessboard distance on the chunk grid; streaming radii are square.
    pub fn chebyshev_distance(&self, other: Self) -> i32 {
        (self.q - other.q).abs().max((self.r - other.r).abs())
    }

    /// Squared Euclidean distance, for nearest-first load ordering.
    pub fn distance_sq(&self, other: Self) -> i64 {
        let dq = (self.q - other.q) as i64;
        let dr = (self.r - other.r) as i64;
        dq * dq + dr * dr
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.q, self.r)
    }
}

/// A single map tile, owned by exactly one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub terrain: Terrain,
    /// Integer height step; world height is `elevation * ELEVATION_STEP`.
    pub elevation: i32,
    /// At most one decoration dresses a tile.
    pub decoration: Option<DecorationKind>,
    /// Yaw applied to the decoration model, radians.
    pub rotation: f32,
}

impl Tile {
    /// Units may enter this tile.
    pub fn is_walkable(&self) -> bool {
        self.terrain.properties().is_passable
            && !self.decoration.is_some_and(|d| d.blocks_movement())
    }

    /// Per-step path cost for entering this tile.
    pub fn movement_cost(&self) -> f32 {
        self.terrain.properties().movement_cost
    }

    /// World-space height of the tile surface.
    pub fn surface_height(&self) -> f32 {
        self.elevation as f32 * ELEVATION_STEP
    }
}

/// A CHUNK_SIZE x CHUNK_SIZE block of tiles.
///
/// Tiles are stored row-major by local (q, r); the public API speaks
/// global hex coordinates and converts internally.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    coord: ChunkCoord,
    tiles: Vec<Tile>,
}

impl Chunk {
    /// Generate this chunk's tiles from the world generator.
    ///
    /// Depends only on the generator's seed and `coord`, never on which
    /// other chunks exist, so generation order cannot change the result.
    pub fn generate(coord: ChunkCoord, generator: &TerrainGenerator) -> Self {
        let origin = coord.origin();
        let mut tiles = Vec::with_capacity((CHUNK_SIZE * CHUNK_SIZE) as usize);
        for r in 0..CHUNK_SIZE {
            for q in 0..CHUNK_SIZE {
                tiles.push(generator.generate_tile(origin + HexCoord::new(q, r)));
            }
        }
        Self { coord, tiles }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Tile at a global hex coordinate; `None` if the hex lies outside
    /// this chunk.
    pub fn tile(&self, hex: HexCoord) -> Option<&Tile> {
        self.index_of(hex).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, hex: HexCoord) -> Option<&mut Tile> {
        self.index_of(hex).map(move |i| &mut self.tiles[i])
    }

    /// Iterate over all tiles with their global coordinates.
    pub fn tiles(&self) -> impl Iterator<Item = (HexCoord, &Tile)> {
        let origin = self.coord.origin();
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            let q = i as i32 % CHUNK_SIZE;
            let r = i as i32 / CHUNK_SIZE;
            (origin + HexCoord::new(q, r), tile)
        })
    }

    fn index_of(&self, hex: HexCoord) -> Option<usize> {
        let local = hex - self.coord.origin();
        if (0..CHUNK_SIZE).contains(&local.q) && (0..CHUNK_SIZE).contains(&local.r) {
            Some((local.r * CHUNK_SIZE + local.q) as usize)
        } else {
            None
        }
    }

    /// A chunk where every tile is a copy of `tile`.
    #[cfg(test)]
    pub(crate) fn filled(coord: ChunkCoord, tile: Tile) -> Self {
        Self {
            coord,
            tiles: vec![tile; (CHUNK_SIZE * CHUNK_SIZE) as usize],
        }
    }
}
