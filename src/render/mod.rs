//! Rendering: turns map and placement state into meshes.
//!
//! Everything here reacts to the outcome messages the logic layer
//! writes; logic never touches meshes. Tile spawns are grouped per
//! chunk under a parent entity so an unload is a single recursive
//! despawn, and all entities share mesh/material handles through the
//! [`ModelCache`].

pub mod camera;

use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use std::collections::HashMap;

use crate::constants::{HEX_SIZE, HOVER_MARKER_LIFT, TILE_SKIRT_DEPTH};
use crate::hex::HexCoord;
use crate::map::{ChunkCoord, GameSet, HexMap};
use crate::messages::{ChunkLoaded, ChunkUnloaded, Placed, Removed, UnitSpawned};
use crate::picking::HoveredHex;
use crate::placement::definitions::unit_def;
use crate::placement::{Buildable, Buildings, Structures, UnitId, Units};

/// Shared mesh and material handles for one model key. `lift` is the
/// model origin's height above the tile surface it stands on.
#[derive(Clone)]
pub struct ModelHandles {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    pub lift: f32,
}

/// Render-side cache keyed by model path. The same key always returns
/// the same shared handles; unknown keys get a loud fallback model.
#[derive(Resource, Default)]
pub struct ModelCache {
    models: HashMap<&'static str, ModelHandles>,
    tile_mesh: Option<Handle<Mesh>>,
}

impl ModelCache {
    pub fn get_or_load(
        &mut self,
        key: &'static str,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> ModelHandles {
        if let Some(handles) = self.models.get(key) {
            return handles.clone();
        }
        let handles = self.build(key, meshes, materials).unwrap_or_else(|| {
            warn!("No model for key {key}, substituting the fallback");
            ModelHandles {
                mesh: meshes.add(Cuboid::new(0.5, 0.5, 0.5)),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(1.0, 0.0, 0.8),
                    unlit: true,
                    ..default()
                }),
                lift: 0.25,
            }
        });
        self.models.insert(key, handles.clone());
        handles
    }

    /// Stand-in procedural meshes, one silhouette per model key.
    fn build(
        &mut self,
        key: &'static str,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> Option<ModelHandles> {
        let (mesh, lift, color) = match key {
            "tile/water" => (self.tile_mesh(meshes), 0.0, Color::srgb(0.16, 0.35, 0.62)),
            "tile/coast" => (self.tile_mesh(meshes), 0.0, Color::srgb(0.80, 0.72, 0.49)),
            "tile/grass" => (self.tile_mesh(meshes), 0.0, Color::srgb(0.33, 0.55, 0.27)),
            "tile/road" => (self.tile_mesh(meshes), 0.0, Color::srgb(0.42, 0.38, 0.34)),
            "tile/river" => (self.tile_mesh(meshes), 0.0, Color::srgb(0.22, 0.46, 0.68)),
            "tile/hill" => (self.tile_mesh(meshes), 0.0, Color::srgb(0.47, 0.42, 0.30)),
            "tile/mountain" => (self.tile_mesh(meshes), 0.0, Color::srgb(0.55, 0.54, 0.52)),
            "decor/tree" => (
                meshes.add(Cone::new(0.30, 0.85)),
                0.42,
                Color::srgb(0.13, 0.35, 0.16),
            ),
            "decor/rock" => (
                meshes.add(Sphere::new(0.26)),
                0.18,
                Color::srgb(0.45, 0.44, 0.42),
            ),
            "decor/bush" => (
                meshes.add(Sphere::new(0.17)),
                0.12,
                Color::srgb(0.22, 0.42, 0.20),
            ),
            "building/townhall" => (
                meshes.add(Cuboid::new(1.15, 0.95, 1.15)),
                0.47,
                Color::srgb(0.62, 0.48, 0.34),
            ),
            "building/house" => (
                meshes.add(Cuboid::new(0.70, 0.55, 0.70)),
                0.27,
                Color::srgb(0.72, 0.57, 0.40),
            ),
            "building/farm" => (
                meshes.add(Cuboid::new(1.00, 0.25, 1.00)),
                0.12,
                Color::srgb(0.78, 0.68, 0.35),
            ),
            "building/lumberyard" => (
                meshes.add(Cuboid::new(0.90, 0.50, 0.70)),
                0.25,
                Color::srgb(0.48, 0.35, 0.22),
            ),
            "building/quarry" => (
                meshes.add(Cuboid::new(0.95, 0.35, 0.95)),
                0.17,
                Color::srgb(0.52, 0.50, 0.48),
            ),
            "structure/wall" => (
                meshes.add(Cuboid::new(0.95, 0.65, 0.45)),
                0.32,
                Color::srgb(0.58, 0.56, 0.53),
            ),
            "structure/tower" => (
                meshes.add(Cylinder::new(0.30, 1.25)),
                0.62,
                Color::srgb(0.56, 0.54, 0.51),
            ),
            "structure/gate" => (
                meshes.add(Cuboid::new(0.95, 0.80, 0.30)),
                0.40,
                Color::srgb(0.46, 0.40, 0.32),
            ),
            "structure/road" => (
                meshes.add(Cylinder::new(0.78, 0.06)),
                0.03,
                Color::srgb(0.40, 0.36, 0.32),
            ),
            "unit/settler" => (
                meshes.add(Capsule3d::new(0.18, 0.35)),
                0.0,
                Color::srgb(0.85, 0.78, 0.60),
            ),
            "unit/worker" => (
                meshes.add(Capsule3d::new(0.18, 0.35)),
                0.0,
                Color::srgb(0.75, 0.55, 0.35),
            ),
            "unit/scout" => (
                meshes.add(Capsule3d::new(0.16, 0.42)),
                0.0,
                Color::srgb(0.45, 0.60, 0.80),
            ),
            _ => return None,
        };
        let material = materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: 0.9,
            ..default()
        });
        Some(ModelHandles {
            mesh,
            material,
            lift,
        })
    }

    /// The hex prism every terrain key shares.
    fn tile_mesh(&mut self, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
        self.tile_mesh
            .get_or_insert_with(|| meshes.add(hex_prism(HEX_SIZE, TILE_SKIRT_DEPTH)))
            .clone()
    }
}

/// Parent of all tile meshes belonging to one chunk.
#[derive(Component, Debug)]
pub struct ChunkRoot {
    pub coord: ChunkCoord,
}

/// Visual for anything standing on a tile: a building, a structure, or
/// a decoration.
#[derive(Component, Debug)]
pub struct PlacedVisual {
    pub coord: HexCoord,
}

/// Visual following one unit.
#[derive(Component, Debug)]
pub struct UnitVisual {
    pub id: UnitId,
}

/// The translucent hex that tracks [`HoveredHex`].
#[derive(Component)]
pub struct HoverMarker;

pub struct WorldRenderingPlugin;

impl Plugin for WorldRenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelCache>()
            .add_systems(Startup, setup_scene)
            .add_systems(
                Update,
                (
                    despawn_chunk_visuals,
                    spawn_chunk_visuals,
                    despawn_removed_visuals,
                    spawn_placed_visuals,
                    spawn_unit_visuals,
                    sync_unit_visuals,
                    update_hover_marker,
                )
                    .chain()
                    .in_set(GameSet::Interaction),
            );
    }
}

/// Lights and the hover marker.
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
        ..default()
    });
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.5, 0.0)),
    ));

    let mesh = meshes.add(hex_prism(HEX_SIZE * 1.02, 0.04));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 0.95, 0.55, 0.35),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    commands.spawn((
        Name::new("HoverMarker"),
        HoverMarker,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        Visibility::Hidden,
    ));
}

/// Spawns tile meshes for freshly loaded chunks, plus the visuals of
/// any buildings and structures whose managers outlived an eviction.
fn spawn_chunk_visuals(
    mut commands: Commands,
    mut loaded: MessageReader<ChunkLoaded>,
    map: Res<HexMap>,
    buildings: Res<Buildings>,
    structures: Res<Structures>,
    visuals: Query<&PlacedVisual>,
    mut cache: ResMut<ModelCache>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for message in loaded.read() {
        let Some(chunk) = map.chunk(message.coord) else {
            continue;
        };

        let root = commands
            .spawn((
                Name::new(format!("Chunk {}", message.coord)),
                ChunkRoot {
                    coord: message.coord,
                },
                Transform::IDENTITY,
                Visibility::default(),
            ))
            .id();

        for (coord, tile) in chunk.tiles() {
            let handles = cache.get_or_load(tile.terrain.model(), &mut meshes, &mut materials);
            let tile_entity = commands
                .spawn((
                    Mesh3d(handles.mesh),
                    MeshMaterial3d(handles.material),
                    Transform::from_translation(coord.to_world(tile.elevation)),
                ))
                .id();
            commands.entity(root).add_child(tile_entity);

            // Decorations stand alone so demolition can drop just them.
            if let Some(decoration) = tile.decoration {
                let handles = cache.get_or_load(decoration.model(), &mut meshes, &mut materials);
                let mut position = coord.to_world(tile.elevation);
                position.y += handles.lift;
                commands.spawn((
                    PlacedVisual { coord },
                    Mesh3d(handles.mesh),
                    MeshMaterial3d(handles.material),
                    Transform::from_translation(position)
                        .with_rotation(Quat::from_rotation_y(tile.rotation)),
                ));
            }
        }

        for building in buildings.iter() {
            if ChunkCoord::containing(building.coord) == message.coord
                && !occupied_visual(&visuals, building.coord)
            {
                spawn_placed_visual(
                    &mut commands,
                    &mut cache,
                    &mut meshes,
                    &mut materials,
                    &map,
                    Buildable::Building(building.kind),
                    building.coord,
                );
            }
        }
        for structure in structures.iter() {
            if ChunkCoord::containing(structure.coord) == message.coord
                && !occupied_visual(&visuals, structure.coord)
            {
                spawn_placed_visual(
                    &mut commands,
                    &mut cache,
                    &mut meshes,
                    &mut materials,
                    &map,
                    Buildable::Structure(structure.kind),
                    structure.coord,
                );
            }
        }
    }
}

/// Drops chunk roots and the standalone visuals standing on their
/// tiles when a chunk unloads.
fn despawn_chunk_visuals(
    mut commands: Commands,
    mut unloaded: MessageReader<ChunkUnloaded>,
    roots: Query<(Entity, &ChunkRoot)>,
    placed: Query<(Entity, &PlacedVisual)>,
) {
    for message in unloaded.read() {
        for (entity, root) in &roots {
            if root.coord == message.coord {
                commands.entity(entity).despawn();
            }
        }
        for (entity, visual) in &placed {
            if ChunkCoord::containing(visual.coord) == message.coord {
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Spawns a visual for each successful placement, re-checking the
/// managers so a same-frame demolition cannot leave a ghost.
fn spawn_placed_visuals(
    mut commands: Commands,
    mut placed: MessageReader<Placed>,
    map: Res<HexMap>,
    buildings: Res<Buildings>,
    structures: Res<Structures>,
    visuals: Query<&PlacedVisual>,
    mut cache: ResMut<ModelCache>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for message in placed.read() {
        let present = match message.buildable {
            Buildable::Building(kind) => buildings
                .get(message.coord)
                .is_some_and(|building| building.kind == kind),
            Buildable::Structure(kind) => structures
                .get(message.coord)
                .is_some_and(|structure| structure.kind == kind),
            Buildable::Decoration(kind) => {
                map.tile(message.coord).and_then(|tile| tile.decoration) == Some(kind)
            }
        };
        if !present || occupied_visual(&visuals, message.coord) {
            continue;
        }
        spawn_placed_visual(
            &mut commands,
            &mut cache,
            &mut meshes,
            &mut materials,
            &map,
            message.buildable,
            message.coord,
        );
    }
}

fn despawn_removed_visuals(
    mut commands: Commands,
    mut removed: MessageReader<Removed>,
    visuals: Query<(Entity, &PlacedVisual)>,
) {
    for message in removed.read() {
        for (entity, visual) in &visuals {
            if visual.coord == message.coord {
                commands.entity(entity).despawn();
            }
        }
    }
}

fn spawn_unit_visuals(
    mut commands: Commands,
    mut spawned: MessageReader<UnitSpawned>,
    units: Res<Units>,
    mut cache: ResMut<ModelCache>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for message in spawned.read() {
        let Some(unit) = units.get(message.unit) else {
            continue;
        };
        let handles = cache.get_or_load(unit_def(message.kind).model, &mut meshes, &mut materials);
        commands.spawn((
            Name::new(format!("{} {}", unit_def(message.kind).name, message.unit)),
            UnitVisual { id: message.unit },
            Mesh3d(handles.mesh),
            MeshMaterial3d(handles.material),
            Transform::from_translation(unit.world_pos),
        ));
    }
}

/// Follows unit positions and drops visuals whose unit is gone.
fn sync_unit_visuals(
    mut commands: Commands,
    units: Res<Units>,
    mut visuals: Query<(Entity, &UnitVisual, &mut Transform)>,
) {
    for (entity, visual, mut transform) in &mut visuals {
        match units.get(visual.id) {
            Some(unit) => transform.translation = unit.world_pos,
            None => commands.entity(entity).despawn(),
        }
    }
}

fn update_hover_marker(
    hovered: Res<HoveredHex>,
    map: Res<HexMap>,
    mut marker: Query<(&mut Transform, &mut Visibility), With<HoverMarker>>,
) {
    let Ok((mut transform, mut visibility)) = marker.single_mut() else {
        return;
    };
    let surface = hovered
        .0
        .and_then(|coord| map.surface_height(coord).map(|height| (coord, height)));
    match surface {
        Some((coord, height)) => {
            let mut position = coord.to_world(0);
            position.y = height + HOVER_MARKER_LIFT;
            transform.translation = position;
            *visibility = Visibility::Visible;
        }
        None => *visibility = Visibility::Hidden,
    }
}

fn occupied_visual(visuals: &Query<&PlacedVisual>, coord: HexCoord) -> bool {
    visuals.iter().any(|visual| visual.coord == coord)
}

#[allow(clippy::too_many_arguments)]
fn spawn_placed_visual(
    commands: &mut Commands,
    cache: &mut ModelCache,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    map: &HexMap,
    buildable: Buildable,
    coord: HexCoord,
) {
    let Some(height) = map.surface_height(coord) else {
        return;
    };
    let handles = cache.get_or_load(buildable.model(), meshes, materials);
    let mut position = coord.to_world(0);
    position.y = height + handles.lift;
    commands.spawn((
        Name::new(format!("{} {coord}", buildable.name())),
        PlacedVisual { coord },
        Mesh3d(handles.mesh),
        MeshMaterial3d(handles.material),
        Transform::from_translation(position),
    ));
}

/// Pointy-top hexagonal prism: a top face at y = 0 and a skirt down to
/// y = -depth so neighbors at lower elevations never show a gap.
fn hex_prism(radius: f32, depth: f32) -> Mesh {
    let corners: Vec<Vec2> = (0..6)
        .map(|i| {
            let angle = (60.0 * i as f32 - 30.0).to_radians();
            Vec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(31);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(31);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(31);
    let mut indices: Vec<u16> = Vec::with_capacity(54);

    // Top fan.
    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 1.0, 0.0]);
    uvs.push([0.5, 0.5]);
    for corner in &corners {
        positions.push([corner.x, 0.0, corner.y]);
        normals.push([0.0, 1.0, 0.0]);
        uvs.push([
            0.5 + corner.x / (2.0 * radius),
            0.5 + corner.y / (2.0 * radius),
        ]);
    }
    for i in 0..6u16 {
        indices.extend_from_slice(&[0, 1 + (i + 1) % 6, 1 + i]);
    }

    // Skirt quads, one per edge, flat outward normals.
    for i in 0..6 {
        let a = corners[i];
        let b = corners[(i + 1) % 6];
        let normal = (a + b).normalize();
        let base = positions.len() as u16;

        positions.push([a.x, 0.0, a.y]);
        positions.push([b.x, 0.0, b.y]);
        positions.push([a.x, -depth, a.y]);
        positions.push([b.x, -depth, b.y]);
        for _ in 0..4 {
            normals.push([normal.x, 0.0, normal.y]);
        }
        uvs.push([i as f32 / 6.0, 0.0]);
        uvs.push([(i + 1) as f32 / 6.0, 0.0]);
        uvs.push([i as f32 / 6.0, 1.0]);
        uvs.push([(i + 1) as f32 / 6.0, 1.0]);

        indices.extend_from_slice(&[base, base + 3, base + 2, base, base + 1, base + 3]);
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U16(indices))
}
