//! Game constants and configuration values
//!
//! This module centralizes all magic numbers and tuning values used throughout the game.

// ============================================================================
// HEX GRID CONSTANTS
// ============================================================================

/// Hex cell size: world-space distance from a cell center to any corner
pub const HEX_SIZE: f32 = 1.0;

/// World-space height of one elevation step
pub const ELEVATION_STEP: f32 = 0.4;

// ============================================================================
// CHUNKING / STREAMING CONSTANTS
// ============================================================================

/// Chunk edge length in tiles (chunks are CHUNK_SIZE x CHUNK_SIZE)
pub const CHUNK_SIZE: i32 = 16;

/// Chunk radius around the camera that must be kept loaded
pub const RENDER_DISTANCE: i32 = 3;

/// Extra chunk distance a loaded chunk may drift past RENDER_DISTANCE
/// before eviction, so the boundary doesn't thrash while the camera moves
pub const EVICT_MARGIN: i32 = 2;

/// Maximum number of missing chunks generated per streaming update
pub const CHUNKS_PER_FRAME: usize = 4;

/// World seed used when none is supplied
pub const WORLD_SEED: u64 = 12345;

// ============================================================================
// NOISE / TERRAIN GENERATION CONSTANTS
// ============================================================================

/// Seed offset separating the moisture field from the elevation field
pub const MOISTURE_SEED_OFFSET: u64 = 1000;

/// Frequency of the elevation noise field (per tile)
pub const ELEVATION_FREQUENCY: f64 = 0.05;

/// Frequency of the moisture noise field (per tile)
pub const MOISTURE_FREQUENCY: f64 = 0.08;

/// Octave count for fractal elevation sampling
pub const ELEVATION_OCTAVES: u32 = 4;

/// Octave count for fractal moisture sampling
pub const MOISTURE_OCTAVES: u32 = 3;

/// Amplitude falloff between octaves
pub const NOISE_PERSISTENCE: f64 = 0.5;

/// Frequency growth between octaves
pub const NOISE_LACUNARITY: f64 = 2.0;

/// Elevation below this is open water
pub const WATER_LEVEL: f64 = 0.35;

/// Elevation band above water that becomes coast
pub const COAST_BAND: f64 = 0.04;

/// Elevation band above the coast that can carry a river when wet enough
pub const RIVER_BAND: f64 = 0.08;

/// Moisture required for a river tile inside the river band
pub const RIVER_MOISTURE: f64 = 0.78;

/// Elevation above this becomes hills
pub const HILL_LEVEL: f64 = 0.62;

/// Elevation above this becomes mountains
pub const MOUNTAIN_LEVEL: f64 = 0.76;

/// Moisture above this grows trees on grass
pub const TREE_MOISTURE: f64 = 0.58;

/// Moisture band that grows bushes on grass
pub const BUSH_MOISTURE: f64 = 0.45;

/// Highest elevation step assigned to land tiles
pub const MAX_ELEVATION: i32 = 5;

// ============================================================================
// PATHFINDING CONSTANTS
// ============================================================================

/// Upper bound on A* node expansions before a search is abandoned.
/// Keeps a search over an open, partially-loaded world from flooding
/// when the goal is fenced off.
pub const SEARCH_NODE_LIMIT: usize = 16_384;

// ============================================================================
// UNIT CONSTANTS
// ============================================================================

/// Distance at which a moving unit snaps to its current waypoint
pub const UNIT_ARRIVAL_THRESHOLD: f32 = 0.05;

/// Height of a unit's visual anchor above the tile surface
pub const UNIT_Y_OFFSET: f32 = 0.3;

// ============================================================================
// STORAGE / ECONOMY CONSTANTS
// ============================================================================

/// Per-resource storage capacity before any Townhall bonuses
pub const BASE_STORAGE_CAPACITY: u32 = 200;

/// Starting wood for a new settlement
pub const STARTING_WOOD: u32 = 120;

/// Starting stone for a new settlement
pub const STARTING_STONE: u32 = 80;

/// Starting food for a new settlement
pub const STARTING_FOOD: u32 = 60;

// ============================================================================
// CAMERA RIG CONSTANTS
// ============================================================================

/// Camera pan speed in world units per second (at zoom 1.0)
pub const CAMERA_PAN_SPEED: f32 = 12.0;

/// Base offset from the focus point to the camera eye
pub const CAMERA_BASE_OFFSET: bevy::math::Vec3 = bevy::math::Vec3::new(0.0, 16.0, 12.0);

/// Closest allowed zoom factor
pub const CAMERA_ZOOM_MIN: f32 = 0.3;

/// Farthest allowed zoom factor
pub const CAMERA_ZOOM_MAX: f32 = 3.0;

/// Zoom factor applied per mouse wheel notch (inverted when zooming out)
pub const CAMERA_ZOOM_STEP: f32 = 0.9;

// ============================================================================
// RENDERING CONSTANTS
// ============================================================================

/// How far a tile prism extends below its surface, hiding gaps between
/// neighbors at different elevation steps. Must cover
/// MAX_ELEVATION * ELEVATION_STEP.
pub const TILE_SKIRT_DEPTH: f32 = 2.2;

/// Height of the hover highlight above the tile surface
pub const HOVER_MARKER_LIFT: f32 = 0.03;
