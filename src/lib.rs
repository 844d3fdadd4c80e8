//! Hexstead - a settlement builder on an endless, chunk-streamed hex map
//!
//! This library exposes the core game components for testing and potential reuse.

use crate::input::BuildInputPlugin;
use crate::map::MapPlugin;
use crate::picking::PickingPlugin;
use crate::placement::PlacementPlugin;
use crate::render::WorldRenderingPlugin;
use crate::render::camera::CameraPlugin;
use bevy::app::PluginGroup;
use bevy::prelude::*;

#[cfg(feature = "debug")]
use bevy_inspector_egui::bevy_egui::EguiPlugin;
#[cfg(feature = "debug")]
use bevy_inspector_egui::quick::WorldInspectorPlugin;

pub mod constants;
pub mod hex;
pub mod input;
pub mod map;
pub mod messages;
pub mod noise;
pub mod pathfinding;
pub mod picking;
pub mod placement;
pub mod render;
pub mod storage;

/// Plugin group for core game logic (headless-compatible)
/// Use this for tests that don't need rendering or player input
pub struct LogicPlugins;

impl PluginGroup for LogicPlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(MapPlugin)
            .add(PlacementPlugin)
    }
}

/// Plugin group for world rendering (requires graphics/window)
/// Use this with LogicPlugins for visual output without player interaction
pub struct RenderingPlugins;

impl PluginGroup for RenderingPlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(WorldRenderingPlugin)
            .add(CameraPlugin)
    }
}

/// Plugin group for player input (requires user interaction)
/// Use this with LogicPlugins and RenderingPlugins for the full game
pub struct InputPlugins;

impl PluginGroup for InputPlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(PickingPlugin)
            .add(BuildInputPlugin)
    }
}

pub fn app() -> App {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hexstead".into(),
            ..default()
        }),
        ..default()
    }));

    app.add_plugins(LogicPlugins)
        .add_plugins(RenderingPlugins)
        .add_plugins(InputPlugins);

    #[cfg(feature = "debug")]
    app.add_plugins((EguiPlugin::default(), WorldInspectorPlugin::new()));

    app
}

#[cfg(test)]
pub mod test_utils;
