//! Shared helpers for integration tests.

use bevy::prelude::*;
use hexstead::LogicPlugins;
use hexstead::map::StreamAnchor;

/// A headless app running the full logic stack with no rendering.
pub fn logic_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogicPlugins));
    app
}

/// Spawn the entity whose transform drives chunk streaming.
pub fn spawn_anchor(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((StreamAnchor, Transform::from_translation(position)))
        .id()
}

/// Run updates until `done` holds, panicking after `max` frames.
pub fn pump_until(app: &mut App, max: usize, mut done: impl FnMut(&App) -> bool) {
    for _ in 0..max {
        app.update();
        if done(app) {
            return;
        }
    }
    panic!("condition not met after {max} frames");
}
