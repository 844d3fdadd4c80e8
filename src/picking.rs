//! Cursor picking: unproject the mouse into a world ray, drop it onto
//! the ground plane, and snap the hit to a hex.
//!
//! The math lives in free functions over plain matrices so it can be
//! tested against hand-built cameras; only the thin system on top
//! touches the ECS.

use bevy::prelude::*;

use crate::hex::HexCoord;
use crate::map::{GameSet, HexMap};

/// A ray in world space with a normalized direction.
#[derive(Debug, Clone, Copy)]
pub struct WorldRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// The loaded hex under the cursor this frame, if any.
#[derive(Resource, Debug, Default)]
pub struct HoveredHex(pub Option<HexCoord>);

/// Unprojects a cursor position into a world-space ray.
///
/// `cursor` is in logical pixels with the origin at the top left;
/// `world_from_view` is the camera's global transform matrix and
/// `clip_from_view` its projection. The projection's depth convention
/// does not matter: the eye-space z and w are overwritten, so only the
/// x/y scales of the projection are consulted.
pub fn ray_from_screen(
    cursor: Vec2,
    viewport: Vec2,
    world_from_view: Mat4,
    clip_from_view: Mat4,
) -> WorldRay {
    let ndc = Vec2::new(
        2.0 * cursor.x / viewport.x - 1.0,
        1.0 - 2.0 * cursor.y / viewport.y,
    );

    let mut eye = clip_from_view.inverse() * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
    eye.z = -1.0;
    eye.w = 0.0;

    WorldRay {
        origin: world_from_view.w_axis.truncate(),
        direction: (world_from_view * eye).truncate().normalize(),
    }
}

/// Where the ray meets the horizontal plane at height `plane_y`.
/// `None` when the ray runs parallel to the plane or the plane lies
/// behind the origin.
pub fn ray_plane_y(ray: &WorldRay, plane_y: f32) -> Option<Vec3> {
    if ray.direction.y.abs() < f32::EPSILON {
        return None;
    }
    let t = (plane_y - ray.origin.y) / ray.direction.y;
    if t < 0.0 {
        return None;
    }
    Some(ray.origin + ray.direction * t)
}

/// The hex under a cursor position, loaded or not.
pub fn pick_hex(
    cursor: Vec2,
    viewport: Vec2,
    world_from_view: Mat4,
    clip_from_view: Mat4,
    plane_y: f32,
) -> Option<HexCoord> {
    let ray = ray_from_screen(cursor, viewport, world_from_view, clip_from_view);
    ray_plane_y(&ray, plane_y).map(HexCoord::from_world)
}

/// Like [`pick_hex`], but only reports hexes whose tile is loaded.
pub fn pick_tile(
    cursor: Vec2,
    viewport: Vec2,
    world_from_view: Mat4,
    clip_from_view: Mat4,
    map: &HexMap,
) -> Option<HexCoord> {
    pick_hex(cursor, viewport, world_from_view, clip_from_view, 0.0)
        .filter(|&coord| map.has_tile(coord))
}

/// Keeps [`HoveredHex`] in sync with the cursor.
pub fn update_hovered_hex(
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    map: Res<HexMap>,
    mut hovered: ResMut<HoveredHex>,
) {
    let Ok(window) = windows.single() else {
        hovered.0 = None;
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        hovered.0 = None;
        return;
    };
    let (Some(cursor), Some(viewport)) = (window.cursor_position(), camera.logical_viewport_size())
    else {
        hovered.0 = None;
        return;
    };

    hovered.0 = pick_tile(
        cursor,
        viewport,
        camera_transform.to_matrix(),
        camera.clip_from_view(),
        &map,
    );
}

pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoveredHex>();
        app.add_systems(Update, update_hovered_hex.in_set(GameSet::Interaction));
    }
}
