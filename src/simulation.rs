//! Simulation plugin: physics-context tuning, scene setup order, and the
//! per-frame force/control pipeline.
//!
//! ## Startup (in [`SceneSetup`], chained)
//!
//! 1. [`setup_physics_context`]: zero gravity, solver iteration count.
//! 2. [`seed_scene_rng`]: seeded random source for the population.
//! 3. [`spawn_boundary_field`]: four static planes.
//! 4. [`spawn_cursor_body`]: kinematic pointer sphere.
//! 5. [`spawn_ornaments`]: the ornament population.
//!
//! ## Update (in [`SimulationSet`], chained)
//!
//! Pointer sampling, viewport extents, cursor write, ornament forces.  All of
//! it lands before Rapier steps in `PostUpdate`, so every mutation of the
//! physics world for a frame happens in one exclusive pass.

use crate::boundary::spawn_boundary_field;
use crate::config::{BroadphaseStrategy, SceneConfig};
use crate::ornament::{ornament_repulsion_system, seed_scene_rng, spawn_ornaments};
use crate::pointer::{
    cursor_body_system, pointer_input_system, spawn_cursor_body, viewport_extents_system,
    PointerState, ViewportExtents,
};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Startup set that builds the physics side of the scene.
///
/// Anything that must see the final [`SceneConfig`] (e.g. the config loader)
/// runs `.before(SceneSetup)`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneSetup;

/// Per-frame set that writes forces and kinematic targets.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationSet;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneConfig>()
            .init_resource::<PointerState>()
            .init_resource::<ViewportExtents>()
            .configure_sets(Startup, SceneSetup)
            .configure_sets(Update, SimulationSet)
            .add_systems(
                Startup,
                (
                    setup_physics_context,
                    seed_scene_rng,
                    spawn_boundary_field,
                    spawn_cursor_body,
                    spawn_ornaments,
                )
                    .chain()
                    .in_set(SceneSetup),
            )
            .add_systems(
                Update,
                (
                    pointer_input_system,
                    viewport_extents_system,
                    cursor_body_system,
                    ornament_repulsion_system,
                )
                    .chain()
                    .in_set(SimulationSet),
            );
    }
}

/// Configure Rapier: disable gravity and set the contact solver iteration count.
pub fn setup_physics_context(
    config: Res<SceneConfig>,
    mut rapier_configs: Query<&mut RapierConfiguration>,
    mut simulations: Query<&mut RapierContextSimulation>,
) {
    for mut cfg in rapier_configs.iter_mut() {
        cfg.gravity = Vec3::ZERO;
    }
    for mut simulation in simulations.iter_mut() {
        simulation.integration_parameters.num_solver_iterations = config.solver_iterations;
    }
    match config.broadphase {
        BroadphaseStrategy::SweepAndPrune => info!(
            "Physics: zero gravity, {} solver iteration(s), sweep-and-prune broadphase",
            config.solver_iterations
        ),
    }
}
