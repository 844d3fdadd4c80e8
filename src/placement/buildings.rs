//! Building placement, construction progress, and passive production.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::hex::HexCoord;
use crate::map::{HexMap, Terrain};
use crate::placement::definitions::{building_def, BuildingKind};
use crate::placement::PlacementError;
use crate::storage::{ResourceKind, Storage};

/// One placed building. Starts as a construction site and becomes
/// functional when `build_remaining` runs out.
#[derive(Debug, Clone)]
pub struct Building {
    pub kind: BuildingKind,
    pub coord: HexCoord,
    build_remaining: f32,
    production_timer: f32,
}

impl Building {
    fn new(kind: BuildingKind, coord: HexCoord) -> Self {
        Self {
            kind,
            coord,
            build_remaining: building_def(kind).build_time,
            production_timer: 0.0,
        }
    }

    pub fn is_built(&self) -> bool {
        self.build_remaining <= 0.0
    }

    /// Construction progress in `[0, 1]`.
    pub fn build_progress(&self) -> f32 {
        let total = building_def(self.kind).build_time;
        (1.0 - self.build_remaining / total).clamp(0.0, 1.0)
    }

    /// Advances construction. True exactly once, on the tick that
    /// finishes the building.
    pub fn tick_construction(&mut self, dt: f32) -> bool {
        if self.is_built() {
            return false;
        }
        self.build_remaining -= dt;
        self.is_built()
    }

    /// Advances the production timer and returns a finished batch, if
    /// one came due. Unfinished buildings and non-producers yield
    /// nothing; leftover time carries into the next interval.
    pub fn tick_production(&mut self, dt: f32) -> Option<(ResourceKind, u32)> {
        if !self.is_built() {
            return None;
        }
        let production = building_def(self.kind).production?;
        self.production_timer += dt;
        if self.production_timer < production.interval {
            return None;
        }
        self.production_timer -= production.interval;
        Some((production.output, production.amount))
    }
}

/// All placed buildings, indexed by tile.
#[derive(Resource, Debug, Default)]
pub struct Buildings {
    list: Vec<Building>,
    by_coord: HashMap<HexCoord, usize>,
}

impl Buildings {
    /// Checks every placement rule without changing anything. Rules are
    /// ordered so the caller always learns the most fundamental problem
    /// first.
    pub fn can_place(
        &self,
        kind: BuildingKind,
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
        if !tile.terrain.properties().is_buildable {
            return Err(PlacementError::Terrain);
        }
        if kind == BuildingKind::Farm && !has_fresh_water_neighbor(map, coord) {
            return Err(PlacementError::MissingNeighbor);
        }
        if !storage.has(building_def(kind).cost) {
            return Err(PlacementError::InsufficientResources);
        }
        Ok(())
    }

    /// Validates, pays, and places in one step. On any error the store
    /// and the building list are left untouched.
    pub fn place(
        &mut self,
        kind: BuildingKind,
        coord: HexCoord,
        map: &HexMap,
        storage: &mut Storage,
    ) -> Result<(), PlacementError> {
        self.can_place(kind, coord, map, storage)?;
        let def = building_def(kind);
        if !storage.consume(def.cost) {
            return Err(PlacementError::InsufficientResources);
        }

        self.by_coord.insert(coord, self.list.len());
        self.list.push(Building::new(kind, coord));
        if def.storage_bonus > 0 {
            storage.add_capacity(def.storage_bonus);
        }
        Ok(())
    }

    /// Removes the building on `coord`, unwinding its storage bonus.
    pub fn remove(&mut self, coord: HexCoord, storage: &mut Storage) -> Option<BuildingKind> {
        let index = self.by_coord.remove(&coord)?;
        let removed = self.list.swap_remove(index);

        // swap_remove moved the former tail into `index`.
        if let Some(moved) = self.list.get(index) {
            self.by_coord.insert(moved.coord, index);
        }

        let def = building_def(removed.kind);
        if def.storage_bonus > 0 {
            storage.remove_capacity(def.storage_bonus);
        }
        Some(removed.kind)
    }

    pub fn get(&self, coord: HexCoord) -> Option<&Building> {
        self.by_coord.get(&coord).map(|&index| &self.list[index])
    }

    pub fn occupies(&self, coord: HexCoord) -> bool {
        self.by_coord.contains_key(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Building> {
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

fn has_fresh_water_neighbor(map: &HexMap, coord: HexCoord) -> bool {
    map.neighbors(coord)
        .iter()
        .any(|(_, tile)| matches!(tile.terrain, Terrain::Water | Terrain::River))
}

/// Advances every construction site.
pub fn construction_tick(time: Res<Time>, mut buildings: ResMut<Buildings>) {
    let dt = time.delta_secs();
    for building in &mut buildings.list {
        if building.tick_construction(dt) {
            info!(
                "{} at {} finished construction",
                building_def(building.kind).name,
                building.coord
            );
        }
    }
}

/// Collects due production batches into storage. Batches that do not
/// fit are discarded, not banked.
pub fn production_tick(
    time: Res<Time>,
    mut buildings: ResMut<Buildings>,
    mut storage: ResMut<Storage>,
) {
    let dt = time.delta_secs();
    for building in &mut buildings.list {
        if let Some((kind, amount)) = building.tick_production(dt) {
            let stored = storage.add(kind, amount);
            if stored < amount {
                debug!(
                    "{} at {}: storage full, {} {} lost",
                    building_def(building.kind).name,
                    building.coord,
                    amount - stored,
                    kind.name()
                );
            }
        }
    }
}
