use baubles::config;
use baubles::scene::ScenePlugin;
use baubles::simulation::{SceneSetup, SimulationPlugin};
use baubles::test_mode;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use std::env;

fn main() {
    // Check for test mode
    let test_mode = env::var("BAUBLES_TEST").ok();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Baubles".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
    .add_plugins((SimulationPlugin, ScenePlugin))
    // Load config first so every setup system sees the final values.
    .add_systems(Startup, config::load_scene_config.before(SceneSetup));

    if let Some(test_name) = test_mode {
        test_mode::configure_test_mode(&mut app, &test_name);
    }

    app.run();
}
