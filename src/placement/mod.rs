//! Placement: buildings, structures, decorations, and units, plus the
//! request messages that drive them.
//!
//! Each category has its own manager resource; this module wires them
//! to the request/outcome messages and keeps them from stepping on each
//! other's tiles.

pub mod buildings;
pub mod decorations;
pub mod definitions;
pub mod structures;
pub mod units;

use bevy::prelude::*;
use thiserror::Error;

use crate::map::{ChunkCoord, GameSet, HexMap, Terrain};
use crate::messages::{
    BuildRequest, ChunkLoaded, DemolishRequest, MapRegenerated, MoveUnitRequest, Placed,
    PlacementRejected, Removed, SpawnUnitRequest, UnitSpawned,
};
use crate::storage::Storage;

pub use buildings::{Building, Buildings};
pub use definitions::{BUILD_MENU, Buildable, BuildingKind, StructureKind, UnitKind};
pub use structures::{Structure, Structures};
pub use units::{Unit, UnitId, Units};

use buildings::{construction_tick, production_tick};
use definitions::unit_def;
use structures::structure_construction_tick;
use units::advance_units;

/// Why a placement or spawn request was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("tile is not loaded")]
    TileNotLoaded,
    #[error("tile is already occupied")]
    Occupied,
    #[error("terrain does not allow it")]
    Terrain,
    #[error("a required neighbor is missing")]
    MissingNeighbor,
    #[error("not enough resources")]
    InsufficientResources,
}

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Storage>()
            .init_resource::<Buildings>()
            .init_resource::<Structures>()
            .init_resource::<Units>()
            .add_message::<BuildRequest>()
            .add_message::<DemolishRequest>()
            .add_message::<SpawnUnitRequest>()
            .add_message::<MoveUnitRequest>()
            .add_message::<Placed>()
            .add_message::<Removed>()
            .add_message::<PlacementRejected>()
            .add_message::<UnitSpawned>()
            .add_systems(
                Update,
                (
                    reset_on_regenerate,
                    reapply_paving_on_load,
                    construction_tick,
                    production_tick,
                    structure_construction_tick,
                    advance_units,
                )
                    .chain()
                    .in_set(GameSet::Simulation),
            )
            .add_systems(
                Update,
                (
                    apply_build_requests,
                    apply_demolish_requests,
                    apply_spawn_unit_requests,
                    apply_move_unit_requests,
                )
                    .chain()
                    .in_set(GameSet::Interaction),
            );
    }
}

/// Routes build requests to the right manager. A tile claimed by one
/// manager is occupied for all of them.
pub fn apply_build_requests(
    mut requests: MessageReader<BuildRequest>,
    mut map: ResMut<HexMap>,
    mut storage: ResMut<Storage>,
    mut buildings: ResMut<Buildings>,
    mut structures: ResMut<Structures>,
    mut placed: MessageWriter<Placed>,
    mut rejected: MessageWriter<PlacementRejected>,
) {
    for request in requests.read() {
        let BuildRequest { buildable, coord } = *request;
        let result = match buildable {
            Buildable::Building(kind) => {
                if structures.occupies(coord) {
                    Err(PlacementError::Occupied)
                } else {
                    buildings.place(kind, coord, &map, &mut storage)
                }
            }
            Buildable::Structure(kind) => {
                if buildings.occupies(coord) {
                    Err(PlacementError::Occupied)
                } else {
                    structures.place(kind, coord, &mut map, &mut storage)
                }
            }
            Buildable::Decoration(kind) => {
                if buildings.occupies(coord) || structures.occupies(coord) {
                    Err(PlacementError::Occupied)
                } else {
                    decorations::plant(kind, coord, &mut map, &mut storage)
                }
            }
        };

        match result {
            Ok(()) => {
                info!("Placed {} at {coord}", buildable.name());
                placed.write(Placed { buildable, coord });
            }
            Err(reason) => {
                debug!("Refused {} at {coord}: {reason}", buildable.name());
                rejected.write(PlacementRejected {
                    buildable,
                    coord,
                    reason,
                });
            }
        }
    }
}

/// Clears whatever stands on the requested tile. Buildings take
/// priority over structures, structures over decorations.
pub fn apply_demolish_requests(
    mut requests: MessageReader<DemolishRequest>,
    mut map: ResMut<HexMap>,
    mut storage: ResMut<Storage>,
    mut buildings: ResMut<Buildings>,
    mut structures: ResMut<Structures>,
    mut removed: MessageWriter<Removed>,
) {
    for request in requests.read() {
        let coord = request.coord;
        let buildable = if let Some(kind) = buildings.remove(coord, &mut storage) {
            Buildable::Building(kind)
        } else if let Some(kind) = structures.remove(coord, &mut map) {
            Buildable::Structure(kind)
        } else if let Some(kind) = map.clear_decoration(coord) {
            Buildable::Decoration(kind)
        } else {
            debug!("Nothing to demolish at {coord}");
            continue;
        };

        info!("Removed {} at {coord}", buildable.name());
        removed.write(Removed { buildable, coord });
    }
}

pub fn apply_spawn_unit_requests(
    mut requests: MessageReader<SpawnUnitRequest>,
    map: Res<HexMap>,
    mut storage: ResMut<Storage>,
    mut units: ResMut<Units>,
    mut spawned: MessageWriter<UnitSpawned>,
) {
    for request in requests.read() {
        let name = unit_def(request.kind).name;
        match units.spawn(request.kind, request.coord, &map, &mut storage) {
            Ok(unit) => {
                info!("Spawned {name} {unit} at {}", request.coord);
                spawned.write(UnitSpawned {
                    unit,
                    kind: request.kind,
                    coord: request.coord,
                });
            }
            Err(reason) => warn!("Cannot spawn {name} at {}: {reason}", request.coord),
        }
    }
}

/// Structures that block movement are layered over terrain walkability
/// when routing. Unroutable orders are dropped with a warning.
pub fn apply_move_unit_requests(
    mut requests: MessageReader<MoveUnitRequest>,
    map: Res<HexMap>,
    structures: Res<Structures>,
    mut units: ResMut<Units>,
) {
    for request in requests.read() {
        units.order_move(request.unit, request.goal, &map, |c| structures.blocks(c));
    }
}

/// Evicted chunks regenerate from the seed alone, so a reloaded tile
/// loses any paving a road applied to it. Roads live on in the manager;
/// repave their tiles when the chunk comes back.
pub fn reapply_paving_on_load(
    mut loaded: MessageReader<ChunkLoaded>,
    structures: Res<Structures>,
    mut map: ResMut<HexMap>,
) {
    for message in loaded.read() {
        for structure in structures.iter() {
            if definitions::structure_def(structure.kind).paves
                && ChunkCoord::containing(structure.coord) == message.coord
            {
                map.set_terrain(structure.coord, Terrain::Road);
            }
        }
    }
}

/// A fresh map invalidates everything placed on the old one.
pub fn reset_on_regenerate(
    mut regenerated: MessageReader<MapRegenerated>,
    mut storage: ResMut<Storage>,
    mut buildings: ResMut<Buildings>,
    mut structures: ResMut<Structures>,
    mut units: ResMut<Units>,
) {
    if regenerated.read().last().is_none() {
        return;
    }
    buildings.clear();
    structures.clear();
    units.clear();
    *storage = Storage::default();
    info!("Cleared placements and stores for the new map");
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy::prelude::*;

    use super::*;
    use crate::constants::{STARTING_FOOD, STARTING_WOOD};
    use crate::hex::HexCoord;
    use crate::map::{Chunk, DecorationKind, Terrain, Tile};
    use crate::storage::ResourceKind;
    use crate::test_utils::flat_map;

    fn setup_world() -> World {
        let mut world = World::new();
        world.init_resource::<Messages<ChunkLoaded>>();
        world.init_resource::<Messages<BuildRequest>>();
        world.init_resource::<Messages<DemolishRequest>>();
        world.init_resource::<Messages<SpawnUnitRequest>>();
        world.init_resource::<Messages<MoveUnitRequest>>();
        world.init_resource::<Messages<Placed>>();
        world.init_resource::<Messages<Removed>>();
        world.init_resource::<Messages<PlacementRejected>>();
        world.init_resource::<Messages<UnitSpawned>>();
        world.init_resource::<Messages<MapRegenerated>>();
        world.insert_resource(flat_map(Terrain::Grass, 1));
        world.insert_resource(Storage::default());
        world.insert_resource(Buildings::default());
        world.insert_resource(Structures::default());
        world.insert_resource(Units::default());
        world
    }

    fn request_build(world: &mut World, buildable: Buildable, coord: HexCoord) {
        world
            .resource_mut::<Messages<BuildRequest>>()
            .write(BuildRequest { buildable, coord });
    }

    #[test]
    fn build_requests_place_and_report() {
        let mut world = setup_world();
        let coord = HexCoord::new(1, 1);
        request_build(&mut world, Buildable::Building(BuildingKind::House), coord);

        let _ = world.run_system_once(apply_build_requests);

        assert!(world.resource::<Buildings>().occupies(coord));
        assert_eq!(world.resource::<Messages<Placed>>().len(), 1);
        assert!(world.resource::<Messages<PlacementRejected>>().is_empty());
        assert!(world.resource::<Storage>().get(ResourceKind::Wood) < STARTING_WOOD);
    }

    #[test]
    fn managers_respect_each_others_tiles() {
        let mut world = setup_world();
        let first = HexCoord::new(0, 0);
        let second = HexCoord::new(3, -1);

        // One batch: later requests see the tiles the earlier ones took.
        request_build(&mut world, Buildable::Building(BuildingKind::House), first);
        request_build(&mut world, Buildable::Structure(StructureKind::Wall), first);
        request_build(
            &mut world,
            Buildable::Decoration(DecorationKind::Tree),
            first,
        );
        request_build(&mut world, Buildable::Structure(StructureKind::Wall), second);
        request_build(&mut world, Buildable::Building(BuildingKind::House), second);

        let _ = world.run_system_once(apply_build_requests);

        assert!(world.resource::<Buildings>().occupies(first));
        assert!(world.resource::<Structures>().occupies(second));
        assert_eq!(world.resource::<Messages<Placed>>().len(), 2);

        let rejections: Vec<_> = world
            .resource_mut::<Messages<PlacementRejected>>()
            .drain()
            .collect();
        assert_eq!(rejections.len(), 3);
        assert!(
            rejections
                .iter()
                .all(|r| r.reason == PlacementError::Occupied)
        );
    }

    #[test]
    fn demolish_requests_clear_tiles_by_kind() {
        let mut world = setup_world();
        let house = HexCoord::new(0, 0);
        let wall = HexCoord::new(2, 0);
        let tree = HexCoord::new(0, 2);
        let empty = HexCoord::new(3, 3);

        request_build(&mut world, Buildable::Building(BuildingKind::House), house);
        request_build(&mut world, Buildable::Structure(StructureKind::Wall), wall);
        request_build(&mut world, Buildable::Decoration(DecorationKind::Tree), tree);
        let _ = world.run_system_once(apply_build_requests);
        assert_eq!(world.resource::<Messages<Placed>>().len(), 3);

        for coord in [house, wall, tree, empty] {
            world
                .resource_mut::<Messages<DemolishRequest>>()
                .write(DemolishRequest { coord });
        }
        let _ = world.run_system_once(apply_demolish_requests);

        assert!(world.resource::<Buildings>().is_empty());
        assert!(world.resource::<Structures>().is_empty());
        let map = world.resource::<HexMap>();
        assert_eq!(map.tile(tree).and_then(|t| t.decoration), None);
        assert_eq!(world.resource::<Messages<Removed>>().len(), 3);
    }

    #[test]
    fn unit_requests_spawn_and_set_paths() {
        let mut world = setup_world();
        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(3, -1);

        world
            .resource_mut::<Messages<SpawnUnitRequest>>()
            .write(SpawnUnitRequest {
                kind: UnitKind::Settler,
                coord: start,
            });
        let _ = world.run_system_once(apply_spawn_unit_requests);

        assert_eq!(world.resource::<Messages<UnitSpawned>>().len(), 1);
        let id = world.resource::<Units>().latest().expect("unit spawned");
        assert!(world.resource::<Storage>().get(ResourceKind::Food) < STARTING_FOOD);

        world
            .resource_mut::<Messages<MoveUnitRequest>>()
            .write(MoveUnitRequest { unit: id, goal });
        let _ = world.run_system_once(apply_move_unit_requests);

        let units = world.resource::<Units>();
        assert!(units.get(id).expect("unit must exist").is_moving());
    }

    #[test]
    fn reloaded_chunks_are_repaved() {
        let mut world = setup_world();
        let coord = HexCoord::new(2, 2);
        request_build(&mut world, Buildable::Structure(StructureKind::Road), coord);
        let _ = world.run_system_once(apply_build_requests);
        assert_eq!(
            world.resource::<HexMap>().tile(coord).map(|t| t.terrain),
            Some(Terrain::Road)
        );

        // Eviction drops the paved tile; a reload regenerates it bare.
        let chunk_coord = ChunkCoord::containing(coord);
        world.resource_mut::<HexMap>().insert_chunk(Chunk::filled(
            chunk_coord,
            Tile {
                terrain: Terrain::Grass,
                elevation: 1,
                decoration: None,
                rotation: 0.0,
            },
        ));
        assert_eq!(
            world.resource::<HexMap>().tile(coord).map(|t| t.terrain),
            Some(Terrain::Grass)
        );

        world
            .resource_mut::<Messages<ChunkLoaded>>()
            .write(ChunkLoaded { coord: chunk_coord });
        let _ = world.run_system_once(reapply_paving_on_load);
        assert_eq!(
            world.resource::<HexMap>().tile(coord).map(|t| t.terrain),
            Some(Terrain::Road)
        );
    }

    #[test]
    fn regeneration_resets_placement_state() {
        let mut world = setup_world();
        request_build(
            &mut world,
            Buildable::Building(BuildingKind::House),
            HexCoord::new(1, 0),
        );
        let _ = world.run_system_once(apply_build_requests);
        world
            .resource_mut::<Messages<SpawnUnitRequest>>()
            .write(SpawnUnitRequest {
                kind: UnitKind::Worker,
                coord: HexCoord::ZERO,
            });
        let _ = world.run_system_once(apply_spawn_unit_requests);
        assert!(!world.resource::<Buildings>().is_empty());
        assert!(!world.resource::<Units>().is_empty());

        world
            .resource_mut::<Messages<MapRegenerated>>()
            .write(MapRegenerated { seed: 7 });
        let _ = world.run_system_once(reset_on_regenerate);

        assert!(world.resource::<Buildings>().is_empty());
        assert!(world.resource::<Structures>().is_empty());
        assert!(world.resource::<Units>().is_empty());
        assert_eq!(
            world.resource::<Storage>().get(ResourceKind::Wood),
            STARTING_WOOD
        );
    }
}
