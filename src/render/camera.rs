//! Camera rig: WASD pan and wheel zoom over the hex world.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

use crate::constants::{
    CAMERA_BASE_OFFSET, CAMERA_PAN_SPEED, CAMERA_ZOOM_MAX, CAMERA_ZOOM_MIN, CAMERA_ZOOM_STEP,
};
use crate::map::StreamAnchor;

/// The camera eye sits at `focus + CAMERA_BASE_OFFSET * zoom`, looking
/// at the focus point on the ground.
#[derive(Component, Debug)]
pub struct CameraRig {
    pub focus: Vec3,
    pub zoom: f32,
}

impl CameraRig {
    fn transform(&self) -> Transform {
        Transform::from_translation(self.focus + CAMERA_BASE_OFFSET * self.zoom)
            .looking_at(self.focus, Vec3::Y)
    }
}

/// Plugin that handles camera setup and control
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup)
            .add_systems(Update, movement);
    }
}

/// Set up the camera at startup. The camera doubles as the streaming
/// anchor: chunks load around whatever it looks at.
fn setup(mut commands: Commands) {
    let rig = CameraRig {
        focus: Vec3::ZERO,
        zoom: 1.0,
    };
    let transform = rig.transform();
    commands.spawn((
        Name::new("RigCamera"),
        Camera3d::default(),
        StreamAnchor,
        rig,
        transform,
    ));
}

/// Handle camera movement and zooming
pub fn movement(
    time: Res<Time>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut scroll_evr: MessageReader<MouseWheel>,
    mut query: Query<(&mut CameraRig, &mut Transform)>,
) {
    for (mut rig, mut transform) in query.iter_mut() {
        let mut direction = Vec3::ZERO;

        if keyboard_input.pressed(KeyCode::KeyA) {
            direction -= Vec3::new(1.0, 0.0, 0.0);
        }

        if keyboard_input.pressed(KeyCode::KeyD) {
            direction += Vec3::new(1.0, 0.0, 0.0);
        }

        if keyboard_input.pressed(KeyCode::KeyW) {
            direction -= Vec3::new(0.0, 0.0, 1.0);
        }

        if keyboard_input.pressed(KeyCode::KeyS) {
            direction += Vec3::new(0.0, 0.0, 1.0);
        }

        for ev in scroll_evr.read() {
            let zoom_factor = if ev.y > 0.0 {
                CAMERA_ZOOM_STEP
            } else {
                1.0 / CAMERA_ZOOM_STEP
            };
            rig.zoom *= zoom_factor;
        }

        // Clamp zoom levels to reasonable bounds
        rig.zoom = rig.zoom.clamp(CAMERA_ZOOM_MIN, CAMERA_ZOOM_MAX);

        // Scale movement speed based on zoom level for consistent feel
        let pan_speed = CAMERA_PAN_SPEED * rig.zoom;
        rig.focus += time.delta_secs() * direction.normalize_or_zero() * pan_speed;

        *transform = rig.transform();
    }
}
