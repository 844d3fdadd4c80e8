//! Keyboard and mouse bindings that turn the hovered tile into
//! requests.
//!
//! Nothing here touches game state directly. Every action goes out as
//! a request message, so the placement layer stays the only authority
//! on what actually happens.

use bevy::prelude::*;
use rand::Rng;

use crate::map::GameSet;
use crate::messages::{
    BuildRequest, DemolishRequest, MoveUnitRequest, RegenerateRequest, SpawnUnitRequest,
};
use crate::picking::HoveredHex;
use crate::placement::definitions::{BUILD_MENU, Buildable, UnitKind};
use crate::placement::Units;

/// Index into [`BUILD_MENU`] of the entry the next left click places.
#[derive(Resource, Default, Debug)]
pub struct SelectedBuildable(pub usize);

impl SelectedBuildable {
    pub fn current(&self) -> Buildable {
        BUILD_MENU[self.0 % BUILD_MENU.len()]
    }
}

const DIGITS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

pub struct BuildInputPlugin;

impl Plugin for BuildInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedBuildable>().add_systems(
            Update,
            (
                select_buildable,
                send_build_requests,
                send_unit_requests,
                send_regenerate_requests,
            )
                .in_set(GameSet::Interaction)
                .after(crate::picking::update_hovered_hex)
                .before(crate::placement::apply_build_requests),
        );
    }
}

/// Digit keys pick a menu entry directly, Tab cycles to the next one.
fn select_buildable(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut selected: ResMut<SelectedBuildable>,
) {
    for (index, key) in DIGITS.iter().enumerate() {
        if keyboard.just_pressed(*key) && index < BUILD_MENU.len() {
            selected.0 = index;
            info!("Selected {}", selected.current().name());
        }
    }
    if keyboard.just_pressed(KeyCode::Tab) {
        selected.0 = (selected.0 + 1) % BUILD_MENU.len();
        info!("Selected {}", selected.current().name());
    }
}

/// Left click builds the selected entry on the hovered tile, right
/// click demolishes whatever stands there.
fn send_build_requests(
    mouse: Res<ButtonInput<MouseButton>>,
    hovered: Res<HoveredHex>,
    selected: Res<SelectedBuildable>,
    mut build: MessageWriter<BuildRequest>,
    mut demolish: MessageWriter<DemolishRequest>,
) {
    let Some(coord) = hovered.0 else {
        return;
    };
    if mouse.just_pressed(MouseButton::Left) {
        build.write(BuildRequest {
            buildable: selected.current(),
            coord,
        });
    }
    if mouse.just_pressed(MouseButton::Right) {
        demolish.write(DemolishRequest { coord });
    }
}

/// `U` spawns a settler on the hovered tile, `M` orders the newest
/// unit to walk there.
fn send_unit_requests(
    keyboard: Res<ButtonInput<KeyCode>>,
    hovered: Res<HoveredHex>,
    units: Res<Units>,
    mut spawn: MessageWriter<SpawnUnitRequest>,
    mut movement: MessageWriter<MoveUnitRequest>,
) {
    let Some(coord) = hovered.0 else {
        return;
    };
    if keyboard.just_pressed(KeyCode::KeyU) {
        spawn.write(SpawnUnitRequest {
            kind: UnitKind::Settler,
            coord,
        });
    }
    if keyboard.just_pressed(KeyCode::KeyM)
        && let Some(unit) = units.latest()
    {
        movement.write(MoveUnitRequest { unit, goal: coord });
    }
}

/// `R` rerolls the whole world under a fresh seed.
fn send_regenerate_requests(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut regenerate: MessageWriter<RegenerateRequest>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        let seed = rand::rng().random();
        info!("Regenerating the map with seed {seed}");
        regenerate.write(RegenerateRequest { seed });
    }
}
