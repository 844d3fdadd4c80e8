//! Structures: walls, towers, gates, and roads.
//!
//! Structures are the only placements that edit terrain. Roads pave
//! their tile and remember what was underneath so demolition can put
//! it back.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::hex::HexCoord;
use crate::map::{HexMap, Terrain};
use crate::placement::definitions::{structure_def, StructureKind};
use crate::placement::PlacementError;
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct Structure {
    pub kind: StructureKind,
    pub coord: HexCoord,
    build_remaining: f32,
    /// What the tile was before paving; restored on demolition.
    prior_terrain: Option<Terrain>,
}

impl Structure {
    fn new(kind: StructureKind, coord: HexCoord, prior_terrain: Option<Terrain>) -> Self {
        Self {
            kind,
            coord,
            build_remaining: structure_def(kind).build_time,
            prior_terrain,
        }
    }

    pub fn is_built(&self) -> bool {
        self.build_remaining <= 0.0
    }

    pub fn build_progress(&self) -> f32 {
        let total = structure_def(self.kind).build_time;
        (1.0 - self.build_remaining / total).clamp(0.0, 1.0)
    }

    pub fn tick_construction(&mut self, dt: f32) -> bool {
        if self.is_built() {
            return false;
        }
        self.build_remaining -= dt;
        self.is_built()
    }
}

/// All placed structures, indexed by tile.
#[derive(Resource, Debug, Default)]
pub struct Structures {
    list: Vec<Structure>,
    by_coord: HashMap<HexCoord, usize>,
}

impl Structures {
    pub fn can_place(
        &self,
        kind: StructureKind,
        coord: HexCoord,
        map: &HexMap,
        storage: &Storage,
    ) -> Result<(), PlacementError> {
        let Some(tile) = map.tile(coord) else {
            return Err(PlacementError::TileNotLoaded);
        };
        if self.occupies(coord) || tile.decoration.is_some() {
            return Err(PlacementError::Occupied);
        }
        let def = structure_def(kind);
        let properties = tile.terrain.properties();
        // Roads only need ground a unit could already cross; anything
        // defensive needs buildable ground.
        let terrain_ok = if def.paves {
            properties.is_passable
        } else {
            properties.is_buildable
        };
        if !terrain_ok {
            return Err(PlacementError::Terrain);
        }
        if !storage.has(def.cost) {
            return Err(PlacementError::InsufficientResources);
        }
        Ok(())
    }

    /// Validates, pays, places, and paves in one step. On any error
    /// nothing changes, the map included.
    pub fn place(
        &mut self,
        kind: StructureKind,
        coord: HexCoord,
        map: &mut HexMap,
        storage: &mut Storage,
    ) -> Result<(), PlacementError> {
        self.can_place(kind, coord, map, storage)?;
        let def = structure_def(kind);
        if !storage.consume(def.cost) {
            return Err(PlacementError::InsufficientResources);
        }

        let prior_terrain = if def.paves {
            let prior = map.tile(coord).map(|tile| tile.terrain);
            map.set_terrain(coord, Terrain::Road);
            prior
        } else {
            None
        };

        self.by_coord.insert(coord, self.list.len());
        self.list.push(Structure::new(kind, coord, prior_terrain));
        Ok(())
    }

    /// Removes the structure on `coord` and unpaves its tile if it had
    /// paved it.
    pub fn remove(&mut self, coord: HexCoord, map: &mut HexMap) -> Option<StructureKind> {
        let index = self.by_coord.remove(&coord)?;
        let removed = self.list.swap_remove(index);

        if let Some(moved) = self.list.get(index) {
            self.by_coord.insert(moved.coord, index);
        }

        if let Some(prior) = removed.prior_terrain {
            map.set_terrain(coord, prior);
        }
        Some(removed.kind)
    }

    /// True when a movement-blocking structure sits on `coord`.
    /// Construction sites block as soon as they are placed.
    pub fn blocks(&self, coord: HexCoord) -> bool {
        self.get(coord)
            .is_some_and(|structure| structure_def(structure.kind).blocks_movement)
    }

    pub fn get(&self, coord: HexCoord) -> Option<&Structure> {
        self.by_coord.get(&coord).map(|&index| &self.list[index])
    }

    pub fn occupies(&self, coord: HexCoord) -> bool {
        self.by_coord.contains_key(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.by_coord.clear();
    }
}

/// Advances every structure construction site.
pub fn structure_construction_tick(time: Res<Time>, mut structures: ResMut<Structures>) {
    let dt = time.delta_secs();
    for structure in &mut structures.list {
        if structure.tick_construction(dt) {
            info!(
                "{} at {} finished construction",
                structure_def(structure.kind).name,
                structure.coord
            );
        }
    }
}
