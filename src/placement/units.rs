//! Units: spawning, movement orders, and per-frame path walking.

use bevy::prelude::*;
use std::collections::{HashMap, VecDeque};

use crate::constants::{UNIT_ARRIVAL_THRESHOLD, UNIT_Y_OFFSET};
use crate::hex::HexCoord;
use crate::map::HexMap;
use crate::pathfinding::find_path_with_cost;
use crate::placement::definitions::{unit_def, UnitKind};
use crate::placement::PlacementError;
use crate::storage::Storage;

/// Stable handle to a unit. List indices shift as units die; ids never
/// do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    /// Logical tile, updated as waypoints are reached.
    pub coord: HexCoord,
    /// Smoothed world position that trails the logical tile.
    pub world_pos: Vec3,
    path: VecDeque<HexCoord>,
    target: Option<Vec3>,
}

impl Unit {
    pub fn is_moving(&self) -> bool {
        self.target.is_some() || !self.path.is_empty()
    }

    /// Waypoints still ahead of the unit, nearest first.
    pub fn remaining_path(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.path.iter().copied()
    }

    /// Moves the unit along its path. Steps are clamped to the segment
    /// length, so oversized `dt` values settle on waypoints instead of
    /// overshooting them.
    pub fn advance(&mut self, dt: f32, map: &HexMap) {
        if self.target.is_none() {
            let Some(&next) = self.path.front() else {
                return;
            };
            self.target = Some(waypoint_position(map, next));
        }
        let Some(target) = self.target else {
            return;
        };

        let delta = target - self.world_pos;
        let distance = delta.length();
        let step = unit_def(self.kind).speed * dt;

        if distance <= step || distance < UNIT_ARRIVAL_THRESHOLD {
            self.world_pos = target;
            self.target = None;
            if let Some(reached) = self.path.pop_front() {
                self.coord = reached;
            }
        } else {
            self.world_pos += delta / distance * step;
        }
    }
}

/// All living units, indexed by id.
#[derive(Resource, Debug, Default)]
pub struct Units {
    list: Vec<Unit>,
    by_id: HashMap<UnitId, usize>,
    next_id: u32,
}

impl Units {
    /// Pays for and spawns a unit on a loaded, walkable tile. Units do
    /// not occupy tiles, so several may share one.
    pub fn spawn(
        &mut self,
        kind: UnitKind,
        coord: HexCoord,
        map: &HexMap,
        storage: &mut Storage,
    ) -> Result<UnitId, PlacementError> {
        if !map.has_tile(coord) {
            return Err(PlacementError::TileNotLoaded);
        }
        if !map.is_walkable(coord) {
            return Err(PlacementError::Terrain);
        }
        if !storage.consume(unit_def(kind).cost) {
            return Err(PlacementError::InsufficientResources);
        }

        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.by_id.insert(id, self.list.len());
        self.list.push(Unit {
            id,
            kind,
            coord,
            world_pos: waypoint_position(map, coord),
            path: VecDeque::new(),
            target: None,
        });
        Ok(id)
    }

    /// Routes the unit to `goal`, replacing any current path. `blocked`
    /// layers placement state (walls, rocks) over terrain walkability.
    /// Returns false and leaves the unit alone when no route exists.
    pub fn order_move<B>(&mut self, id: UnitId, goal: HexCoord, map: &HexMap, blocked: B) -> bool
    where
        B: Fn(HexCoord) -> bool,
    {
        let Some(&index) = self.by_id.get(&id) else {
            return false;
        };
        let start = self.list[index].coord;

        let path = find_path_with_cost(
            start,
            goal,
            |c| map.is_walkable(c) && !blocked(c),
            |c| map.movement_cost(c),
        );
        if path.is_empty() {
            warn!("Unit {id} has no route from {start} to {goal}");
            return false;
        }

        let unit = &mut self.list[index];
        unit.path = path.into_iter().skip(1).collect();
        unit.target = None;
        true
    }

    pub fn remove(&mut self, id: UnitId) -> Option<UnitKind> {
        let index = self.by_id.remove(&id)?;
        let removed = self.list.swap_remove(index);
        if let Some(moved) = self.list.get(index) {
            self.by_id.insert(moved.id, index);
        }
        Some(removed.kind)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.by_id.get(&id).map(|&index| &self.list[index])
    }

    /// The most recently spawned unit still alive.
    pub fn latest(&self) -> Option<UnitId> {
        self.list.iter().map(|unit| unit.id.0).max().map(UnitId)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
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
        self.by_id.clear();
        self.next_id = 0;
    }

    pub fn advance_all(&mut self, dt: f32, map: &HexMap) {
        for unit in &mut self.list {
            unit.advance(dt, map);
        }
    }
}

/// World position of a unit standing on `coord`.
fn waypoint_position(map: &HexMap, coord: HexCoord) -> Vec3 {
    let mut position = coord.to_world(0);
    position.y = map.surface_height(coord).unwrap_or(0.0) + UNIT_Y_OFFSET;
    position
}

/// Walks every unit along its path.
pub fn advance_units(time: Res<Time>, mut units: ResMut<Units>, map: Res<HexMap>) {
    units.advance_all(time.delta_secs(), &map);
}
