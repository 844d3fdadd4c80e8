//! Static definitions for everything the player can place or spawn.
//!
//! All balance data lives in const tables here; the managers consult
//! them through the `*_def` lookups and never hard-code numbers.

use crate::map::DecorationKind;
use crate::storage::{Cost, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingKind {
    Townhall,   // Storage hub, one per settlement in practice
    House,      // No function yet beyond occupying ground
    Farm,       // Food; needs fresh water next door
    Lumberyard, // Wood
    Quarry,     // Stone
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Wall,  // Blocks units
    Tower, // Blocks units
    Gate,  // Wall-sized but passable
    Road,  // Paves the tile for cheap movement
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Settler,
    Worker,
    Scout,
}

/// Passive output of a finished building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Production {
    pub output: ResourceKind,
    pub amount: u32,
    /// Seconds between batches.
    pub interval: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingDef {
    pub name: &'static str,
    pub model: &'static str,
    pub cost: &'static [Cost],
    /// Construction time in seconds.
    pub build_time: f32,
    /// Added to global storage capacity while the building stands.
    pub storage_bonus: u32,
    pub production: Option<Production>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureDef {
    pub name: &'static str,
    pub model: &'static str,
    pub cost: &'static [Cost],
    pub build_time: f32,
    pub blocks_movement: bool,
    /// Road-like structures turn their tile into paved terrain.
    pub paves: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationDef {
    pub name: &'static str,
    pub cost: &'static [Cost],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    pub name: &'static str,
    pub model: &'static str,
    pub cost: &'static [Cost],
    /// Tiles per second along a path.
    pub speed: f32,
}

const TOWNHALL: BuildingDef = BuildingDef {
    name: "townhall",
    model: "building/townhall",
    cost: &[
        Cost::new(ResourceKind::Wood, 60),
        Cost::new(ResourceKind::Stone, 40),
    ],
    build_time: 10.0,
    storage_bonus: 200,
    production: None,
};

const HOUSE: BuildingDef = BuildingDef {
    name: "house",
    model: "building/house",
    cost: &[Cost::new(ResourceKind::Wood, 25)],
    build_time: 4.0,
    storage_bonus: 0,
    production: None,
};

const FARM: BuildingDef = BuildingDef {
    name: "farm",
    model: "building/farm",
    cost: &[Cost::new(ResourceKind::Wood, 30)],
    build_time: 5.0,
    storage_bonus: 0,
    production: Some(Production {
        output: ResourceKind::Food,
        amount: 8,
        interval: 12.0,
    }),
};

const LUMBERYARD: BuildingDef = BuildingDef {
    name: "lumberyard",
    model: "building/lumberyard",
    cost: &[
        Cost::new(ResourceKind::Wood, 20),
        Cost::new(ResourceKind::Stone, 10),
    ],
    build_time: 6.0,
    storage_bonus: 0,
    production: Some(Production {
        output: ResourceKind::Wood,
        amount: 6,
        interval: 10.0,
    }),
};

const QUARRY: BuildingDef = BuildingDef {
    name: "quarry",
    model: "building/quarry",
    cost: &[Cost::new(ResourceKind::Wood, 40)],
    build_time: 8.0,
    storage_bonus: 0,
    production: Some(Production {
        output: ResourceKind::Stone,
        amount: 5,
        interval: 14.0,
    }),
};

const WALL: StructureDef = StructureDef {
    name: "wall",
    model: "structure/wall",
    cost: &[Cost::new(ResourceKind::Stone, 15)],
    build_time: 3.0,
    blocks_movement: true,
    paves: false,
};

const TOWER: StructureDef = StructureDef {
    name: "tower",
    model: "structure/tower",
    cost: &[
        Cost::new(ResourceKind::Stone, 30),
        Cost::new(ResourceKind::Wood, 10),
    ],
    build_time: 6.0,
    blocks_movement: true,
    paves: false,
};

const GATE: StructureDef = StructureDef {
    name: "gate",
    model: "structure/gate",
    cost: &[
        Cost::new(ResourceKind::Stone, 25),
        Cost::new(ResourceKind::Wood, 15),
    ],
    build_time: 5.0,
    blocks_movement: false,
    paves: false,
};

const ROAD: StructureDef = StructureDef {
    name: "road",
    model: "structure/road",
    cost: &[Cost::new(ResourceKind::Stone, 5)],
    build_time: 1.5,
    blocks_movement: false,
    paves: true,
};

const TREE: DecorationDef = DecorationDef {
    name: "tree",
    cost: &[Cost::new(ResourceKind::Wood, 2)],
};

const ROCK: DecorationDef = DecorationDef {
    name: "rock",
    cost: &[Cost::new(ResourceKind::Stone, 2)],
};

const BUSH: DecorationDef = DecorationDef {
    name: "bush",
    cost: &[Cost::new(ResourceKind::Wood, 1)],
};

const SETTLER: UnitDef = UnitDef {
    name: "settler",
    model: "unit/settler",
    cost: &[Cost::new(ResourceKind::Food, 20)],
    speed: 2.0,
};

const WORKER: UnitDef = UnitDef {
    name: "worker",
    model: "unit/worker",
    cost: &[Cost::new(ResourceKind::Food, 15)],
    speed: 2.5,
};

const SCOUT: UnitDef = UnitDef {
    name: "scout",
    model: "unit/scout",
    cost: &[
        Cost::new(ResourceKind::Food, 10),
        Cost::new(ResourceKind::Gold, 5),
    ],
    speed: 4.0,
};

pub const ALL_BUILDINGS: [BuildingKind; 5] = [
    BuildingKind::Townhall,
    BuildingKind::House,
    BuildingKind::Farm,
    BuildingKind::Lumberyard,
    BuildingKind::Quarry,
];

pub const ALL_STRUCTURES: [StructureKind; 4] = [
    StructureKind::Wall,
    StructureKind::Tower,
    StructureKind::Gate,
    StructureKind::Road,
];

pub const ALL_DECORATIONS: [DecorationKind; 3] = [
    DecorationKind::Tree,
    DecorationKind::Rock,
    DecorationKind::Bush,
];

pub const ALL_UNITS: [UnitKind; 3] = [UnitKind::Settler, UnitKind::Worker, UnitKind::Scout];

pub const fn building_def(kind: BuildingKind) -> &'static BuildingDef {
    match kind {
        BuildingKind::Townhall => &TOWNHALL,
        BuildingKind::House => &HOUSE,
        BuildingKind::Farm => &FARM,
        BuildingKind::Lumberyard => &LUMBERYARD,
        BuildingKind::Quarry => &QUARRY,
    }
}

pub const fn structure_def(kind: StructureKind) -> &'static StructureDef {
    match kind {
        StructureKind::Wall => &WALL,
        StructureKind::Tower => &TOWER,
        StructureKind::Gate => &GATE,
        StructureKind::Road => &ROAD,
    }
}

pub const fn decoration_def(kind: DecorationKind) -> &'static DecorationDef {
    match kind {
        DecorationKind::Tree => &TREE,
        DecorationKind::Rock => &ROCK,
        DecorationKind::Bush => &BUSH,
    }
}

pub const fn unit_def(kind: UnitKind) -> &'static UnitDef {
    match kind {
        UnitKind::Settler => &SETTLER,
        UnitKind::Worker => &WORKER,
        UnitKind::Scout => &SCOUT,
    }
}

/// Anything a build request can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Buildable {
    Building(BuildingKind),
    Structure(StructureKind),
    Decoration(DecorationKind),
}

impl Buildable {
    pub const fn name(&self) -> &'static str {
        match self {
            Buildable::Building(kind) => building_def(*kind).name,
            Buildable::Structure(kind) => structure_def(*kind).name,
            Buildable::Decoration(kind) => decoration_def(*kind).name,
        }
    }

    pub const fn cost(&self) -> &'static [Cost] {
        match self {
            Buildable::Building(kind) => building_def(*kind).cost,
            Buildable::Structure(kind) => structure_def(*kind).cost,
            Buildable::Decoration(kind) => decoration_def(*kind).cost,
        }
    }

    /// Model cache key for this buildable's mesh.
    pub const fn model(&self) -> &'static str {
        match self {
            Buildable::Building(kind) => building_def(*kind).model,
            Buildable::Structure(kind) => structure_def(*kind).model,
            Buildable::Decoration(kind) => kind.model(),
        }
    }
}

/// Hotbar order for the build input layer.
pub const BUILD_MENU: &[Buildable] = &[
    Buildable::Building(BuildingKind::Townhall),
    Buildable::Building(BuildingKind::House),
    Buildable::Building(BuildingKind::Farm),
    Buildable::Building(BuildingKind::Lumberyard),
    Buildable::Building(BuildingKind::Quarry),
    Buildable::Structure(StructureKind::Wall),
    Buildable::Structure(StructureKind::Tower),
    Buildable::Structure(StructureKind::Gate),
    Buildable::Structure(StructureKind::Road),
    Buildable::Decoration(DecorationKind::Tree),
    Buildable::Decoration(DecorationKind::Rock),
    Buildable::Decoration(DecorationKind::Bush),
];
