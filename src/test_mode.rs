use bevy::prelude::*;
use bevy_rapier3d::prelude::PhysicsSet;

use crate::pointer;
use crate::simulation::{SceneSetup, SimulationSet};
use crate::testing::{
    self, spawn_test_bounded_cluster, spawn_test_origin_guard, spawn_test_pointer_corner,
    TestConfig,
};

pub fn configure_test_mode(app: &mut App, test_name: &str) {
    app.insert_resource(TestConfig {
        enabled: true,
        ..Default::default()
    });

    add_test_startup_system(app, test_name);

    // The override sits between the real pointer sample and the cursor write.
    app.add_systems(
        Update,
        testing::pointer_override_system
            .after(pointer::pointer_input_system)
            .before(pointer::cursor_body_system)
            .in_set(SimulationSet),
    );

    app.add_systems(
        PostUpdate,
        (
            testing::test_logging_system,
            testing::test_verification_system,
        )
            .chain()
            .after(PhysicsSet::Writeback),
    );

    println!("Running test: {}", test_name);
}

fn add_test_startup_system(app: &mut App, test_name: &str) {
    match test_name {
        "pointer_corner" => app.add_systems(Startup, spawn_test_pointer_corner.after(SceneSetup)),
        "origin_guard" => app.add_systems(Startup, spawn_test_origin_guard.after(SceneSetup)),
        "bounded_cluster" => {
            app.add_systems(Startup, spawn_test_bounded_cluster.after(SceneSetup))
        }
        other => {
            println!("Unknown test '{other}', running bounded_cluster");
            app.add_systems(Startup, spawn_test_bounded_cluster.after(SceneSetup))
        }
    };
}
