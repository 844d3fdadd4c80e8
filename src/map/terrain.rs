//! Terrain types and the seeded terrain generator.
//!
//! Two independently-seeded fractal noise fields (elevation and moisture)
//! drive a fixed threshold classification. Everything here is a pure
//! function of the seed and the tile coordinate, which is what makes chunk
//! generation order-independent.

use crate::constants::{
    BUSH_MOISTURE, COAST_BAND, ELEVATION_FREQUENCY, ELEVATION_OCTAVES, HILL_LEVEL, MAX_ELEVATION,
    MOISTURE_FREQUENCY, MOISTURE_OCTAVES, MOISTURE_SEED_OFFSET, MOUNTAIN_LEVEL, NOISE_LACUNARITY,
    NOISE_PERSISTENCE, RIVER_BAND, RIVER_MOISTURE, TREE_MOISTURE, WATER_LEVEL,
};
use crate::hex::HexCoord;
use crate::map::chunk::Tile;
use crate::noise::Perlin;

/// Base terrain of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Water,
    Coast,
    Grass,
    Road,
    River,
    Hill,
    Mountain,
}

/// Gameplay-relevant attributes of a terrain type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainProperties {
    /// Per-step path cost for units entering this tile. Must stay >= 1
    /// so the pathfinder's distance heuristic remains admissible.
    pub movement_cost: f32,
    pub is_passable: bool,
    pub is_buildable: bool,
}

impl Terrain {
    pub const fn properties(self) -> TerrainProperties {
        match self {
            Terrain::Water => TerrainProperties {
                movement_cost: 0.0,
                is_passable: false,
                is_buildable: false,
            },
            Terrain::Coast => TerrainProperties {
                movement_cost: 2.0,
                is_passable: true,
                is_buildable: true,
            },
            Terrain::Grass => TerrainProperties {
                movement_cost: 1.5,
                is_passable: true,
                is_buildable: true,
            },
            Terrain::Road => TerrainProperties {
                movement_cost: 1.0,
                is_passable: true,
                is_buildable: false,
            },
            Terrain::River => TerrainProperties {
                movement_cost: 0.0,
                is_passable: false,
                is_buildable: false,
            },
            Terrain::Hill => TerrainProperties {
                movement_cost: 3.0,
                is_passable: true,
                is_buildable: true,
            },
            Terrain::Mountain => TerrainProperties {
                movement_cost: 0.0,
                is_passable: false,
                is_buildable: false,
            },
        }
    }

    /// Model cache key for this terrain's tile mesh.
    pub const fn model(self) -> &'static str {
        match self {
            Terrain::Water => "tile/water",
            Terrain::Coast => "tile/coast",
            Terrain::Grass => "tile/grass",
            Terrain::Road => "tile/road",
            Terrain::River => "tile/river",
            Terrain::Hill => "tile/hill",
            Terrain::Mountain => "tile/mountain",
        }
    }
}

/// Secondary tile dressing, independent of the terrain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    Tree,
    Rock,
    Bush,
}

impl DecorationKind {
    pub const fn blocks_movement(self) -> bool {
        matches!(self, DecorationKind::Rock)
    }

    /// Model cache key for this decoration's mesh.
    pub const fn model(self) -> &'static str {
        match self {
            DecorationKind::Tree => "decor/tree",
            DecorationKind::Rock => "decor/rock",
            DecorationKind::Bush => "decor/bush",
        }
    }

    /// Fraction of eligible tiles this decoration appears on.
    const fn density(self) -> f64 {
        match self {
            DecorationKind::Tree => 0.55,
            DecorationKind::Rock => 0.30,
            DecorationKind::Bush => 0.18,
        }
    }
}

/// Deterministic tile synthesis from a world seed.
pub struct TerrainGenerator {
    elevation: Perlin,
    moisture: Perlin,
    seed: u64,
}

impl TerrainGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            elevation: Perlin::new(seed),
            moisture: Perlin::new(seed.wrapping_add(MOISTURE_SEED_OFFSET)),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Synthesize the tile at a global coordinate.
    pub fn generate_tile(&self, coord: HexCoord) -> Tile {
        let x = coord.q as f64;
        let y = coord.r as f64;

        let elevation = self.elevation.fractal(
            x * ELEVATION_FREQUENCY,
            y * ELEVATION_FREQUENCY,
            ELEVATION_OCTAVES,
            NOISE_PERSISTENCE,
            NOISE_LACUNARITY,
        );
        let moisture = self.moisture.fractal(
            x * MOISTURE_FREQUENCY,
            y * MOISTURE_FREQUENCY,
            MOISTURE_OCTAVES,
            NOISE_PERSISTENCE,
            NOISE_LACUNARITY,
        );

        let terrain = classify_terrain(elevation, moisture);
        let hash = tile_hash(self.seed, coord);

        Tile {
            terrain,
            elevation: elevation_steps(elevation, terrain),
            decoration: decoration_for(terrain, moisture, unit_roll(hash)),
            rotation: rotation_angle(hash),
        }
    }
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new(crate::constants::WORLD_SEED)
    }
}

/// Threshold ladder from (elevation, moisture) to terrain.
fn classify_terrain(elevation: f64, moisture: f64) -> Terrain {
    if elevation < WATER_LEVEL {
        return Terrain::Water;
    }
    if elevation < WATER_LEVEL + COAST_BAND {
        return Terrain::Coast;
    }
    if elevation > MOUNTAIN_LEVEL {
        return Terrain::Mountain;
    }
    if elevation > HILL_LEVEL {
        return Terrain::Hill;
    }
    // Wet lowland just above the coast carries rivers
    if elevation < WATER_LEVEL + COAST_BAND + RIVER_BAND && moisture > RIVER_MOISTURE {
        return Terrain::River;
    }
    Terrain::Grass
}

/// Integer elevation step for the tile (0 for water, 1..=MAX_ELEVATION for land).
fn elevation_steps(elevation: f64, terrain: Terrain) -> i32 {
    if terrain == Terrain::Water {
        return 0;
    }
    let land = (elevation - WATER_LEVEL) / (1.0 - WATER_LEVEL);
    (1 + (land * (MAX_ELEVATION - 1) as f64) as i32).min(MAX_ELEVATION)
}

fn decoration_for(terrain: Terrain, moisture: f64, roll: f64) -> Option<DecorationKind> {
    match terrain {
        Terrain::Grass => {
            if moisture > TREE_MOISTURE && roll < DecorationKind::Tree.density() {
                Some(DecorationKind::Tree)
            } else if moisture > BUSH_MOISTURE && roll < DecorationKind::Bush.density() {
                Some(DecorationKind::Bush)
            } else {
                None
            }
        }
        Terrain::Hill | Terrain::Mountain => {
            if roll < DecorationKind::Rock.density() {
                Some(DecorationKind::Rock)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Mix seed and coordinate into a well-distributed 64-bit hash
/// (splitmix64 finalizer).
fn tile_hash(seed: u64, coord: HexCoord) -> u64 {
    let mut h = seed
        ^ (coord.q as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (coord.r as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= h >> 30;
    h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^= h >> 31;
    h
}

/// Decoration yaw in [0, tau), from the low hash bits.
fn rotation_angle(hash: u64) -> f32 {
    (hash & 0xFFFF) as f32 / 65536.0 * std::f32::consts::TAU
}

/// Uniform roll in [0, 1), from the high hash bits.
fn unit_roll(hash: u64) -> f64 {
    (hash >> 32) as f64 / (1u64 << 32) as f64
}
