//! Messages exchanged between the map, placement, and input layers.
//!
//! Requests carry player intent and may be refused; the notification
//! messages below them state facts after the fact and are safe to
//! consume from rendering without re-validating.

use bevy::prelude::*;

use crate::hex::HexCoord;
use crate::map::ChunkCoord;
use crate::placement::definitions::{Buildable, UnitKind};
use crate::placement::units::UnitId;
use crate::placement::PlacementError;

/// Throw the current map away and generate a fresh one from `seed`.
#[derive(Message, Debug, Clone, Copy)]
pub struct RegenerateRequest {
    pub seed: u64,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct BuildRequest {
    pub buildable: Buildable,
    pub coord: HexCoord,
}

/// Clear whatever occupies `coord`: a managed placement if there is
/// one, otherwise the generated decoration.
#[derive(Message, Debug, Clone, Copy)]
pub struct DemolishRequest {
    pub coord: HexCoord,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct SpawnUnitRequest {
    pub kind: UnitKind,
    pub coord: HexCoord,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct MoveUnitRequest {
    pub unit: UnitId,
    pub goal: HexCoord,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct ChunkLoaded {
    pub coord: ChunkCoord,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct ChunkUnloaded {
    pub coord: ChunkCoord,
}

/// All chunks were dropped and the generator reseeded; every cached
/// visual derived from the old map is stale.
#[derive(Message, Debug, Clone, Copy)]
pub struct MapRegenerated {
    pub seed: u64,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct Placed {
    pub buildable: Buildable,
    pub coord: HexCoord,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct Removed {
    pub buildable: Buildable,
    pub coord: HexCoord,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct PlacementRejected {
    pub buildable: Buildable,
    pub coord: HexCoord,
    pub reason: PlacementError,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct UnitSpawned {
    pub unit: UnitId,
    pub kind: UnitKind,
    pub coord: HexCoord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_send_sync_static() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}

        assert_send_sync_static::<RegenerateRequest>();
        assert_send_sync_static::<BuildRequest>();
        assert_send_sync_static::<DemolishRequest>();
        assert_send_sync_static::<SpawnUnitRequest>();
        assert_send_sync_static::<MoveUnitRequest>();
        assert_send_sync_static::<ChunkLoaded>();
        assert_send_sync_static::<ChunkUnloaded>();
        assert_send_sync_static::<MapRegenerated>();
        assert_send_sync_static::<Placed>();
        assert_send_sync_static::<Removed>();
        assert_send_sync_static::<PlacementRejected>();
        assert_send_sync_static::<UnitSpawned>();
    }
}
