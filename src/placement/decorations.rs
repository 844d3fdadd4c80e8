//! Planting decorations.
//!
//! Unlike buildings and structures, a planted decoration is not
//! tracked in its own ledger: it becomes part of the tile, exactly
//! like a generated one. One decoration per tile, whoever put it
//! there, and demolition clears it through the map.

use crate::hex::HexCoord;
use crate::map::{DecorationKind, HexMap};
use crate::placement::definitions::decoration_def;
use crate::placement::PlacementError;
use crate::storage::Storage;

pub fn can_plant(
    kind: DecorationKind,
    coord: HexCoord,
    map: &HexMap,
    storage: &Storage,
) -> Result<(), PlacementError> {
    let Some(tile) = map.tile(coord) else {
        return Err(PlacementError::TileNotLoaded);
    };
    if tile.decoration.is_some() {
        return Err(PlacementError::Occupied);
    }
    if !tile.terrain.properties().is_buildable {
        return Err(PlacementError::Terrain);
    }
    if !storage.has(decoration_def(kind).cost) {
        return Err(PlacementError::InsufficientResources);
    }
    Ok(())
}

/// Validates, pays, and writes the decoration onto the tile.
pub fn plant(
    kind: DecorationKind,
    coord: HexCoord,
    map: &mut HexMap,
    storage: &mut Storage,
) -> Result<(), PlacementError> {
    can_plant(kind, coord, map, storage)?;
    if !storage.consume(decoration_def(kind).cost) {
        return Err(PlacementError::InsufficientResources);
    }
    map.set_decoration(coord, kind);
    Ok(())
}
