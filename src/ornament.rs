//! Ornament bodies and the radial force field that keeps them clustered.
//!
//! Every ornament is a compound Rapier body: a ball at the body origin plus a
//! small cuboid offset along local +Z where the cap sits.  Each frame
//! [`ornament_repulsion_system`] pulls every ornament back toward the world
//! origin with a constant-magnitude force, so the cluster keeps collapsing,
//! colliding, and rebounding instead of settling.
//!
//! Population parameters are drawn once at startup from [`SceneRng`], a seeded
//! generator, so a given seed always produces the same sizes and start
//! positions.

use crate::config::SceneConfig;
use crate::constants::{
    CAP_BOX_HALF_EXTENT, CAP_BOX_OFFSET, CAP_MESH_OFFSET, CAP_MESH_SCALE, ORIGIN_EPSILON,
};
use crate::scene::SceneEntity;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Marker + size for an ornament body entity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ornament {
    pub size_scale: f32,
}

/// Immutable per-ornament parameters, generated once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentSpec {
    /// One of the entries of `SceneConfig::size_table`.
    pub size_scale: f32,
    pub mass: f32,
    /// Fraction of angular velocity lost per second.
    pub angular_damping: f32,
    /// Fraction of linear velocity lost per second.
    pub linear_damping: f32,
}

impl OrnamentSpec {
    /// Draw one spec: a size from the weighted table, everything else fixed.
    pub fn random(rng: &mut impl Rng, config: &SceneConfig) -> Self {
        let size_scale = config.size_table[rng.gen_range(0..config.size_table.len())];
        Self {
            size_scale,
            mass: config.ornament_mass,
            angular_damping: config.angular_damping,
            linear_damping: config.linear_damping,
        }
    }
}

/// Seeded random source for everything generated at scene setup.
#[derive(Resource)]
pub struct SceneRng(pub StdRng);

impl SceneRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Generate `config.ornament_count` specs.
pub fn generate_population(rng: &mut impl Rng, config: &SceneConfig) -> Vec<OrnamentSpec> {
    (0..config.ornament_count)
        .map(|_| OrnamentSpec::random(rng, config))
        .collect()
}

/// Uniform start position inside the configured scatter volume.
pub fn spawn_position(rng: &mut impl Rng, config: &SceneConfig) -> Vec3 {
    let center = config.spawn_center();
    let half = config.spawn_half_extents();
    let mut axis = |c: f32, h: f32| if h > 0.0 { rng.gen_range(c - h..=c + h) } else { c };
    Vec3::new(
        axis(center.x, half.x),
        axis(center.y, half.y),
        axis(center.z, half.z),
    )
}

/// Convert a per-second velocity loss `d` into Rapier's damping rate.
///
/// Rapier integrates `v' = -rate·v`, so `(1 − d)^t = e^(−rate·t)` gives
/// `rate = −ln(1 − d)`.
pub fn retention_to_rate(loss_per_second: f32) -> f32 {
    -(1.0 - loss_per_second).ln()
}

/// Collision shapes of an ornament in body-local space.
pub fn ornament_shapes(size_scale: f32) -> Vec<(Vec3, Quat, Collider)> {
    let half = CAP_BOX_HALF_EXTENT * size_scale;
    vec![
        (
            Vec3::new(0.0, 0.0, CAP_BOX_OFFSET * size_scale),
            Quat::IDENTITY,
            Collider::cuboid(half, half, half),
        ),
        (Vec3::ZERO, Quat::IDENTITY, Collider::ball(size_scale)),
    ]
}

/// Local transforms of the two visual meshes: the body sphere and the cap.
///
/// The cap node is offset along −Z, opposite the cap collider box; the cap
/// geometry itself is authored far enough up its local +Z to reach the box.
pub fn ornament_visual_transforms(size_scale: f32) -> (Transform, Transform) {
    let sphere = Transform::from_scale(Vec3::splat(size_scale));
    let cap = Transform::from_xyz(0.0, 0.0, -CAP_MESH_OFFSET * size_scale)
        .with_scale(Vec3::splat(CAP_MESH_SCALE * size_scale));
    (sphere, cap)
}

/// Force pulling an ornament at `position` back toward the origin.
///
/// Magnitude is `strength · size_scale` regardless of distance.  Positions at
/// (or numerically indistinguishable from) the origin, or non-finite ones,
/// yield [`Vec3::ZERO`] so a NaN never reaches the physics world.
pub fn repulsion_force(position: Vec3, size_scale: f32, strength: f32) -> Vec3 {
    let dist = position.length();
    if !dist.is_finite() || dist <= ORIGIN_EPSILON {
        return Vec3::ZERO;
    }
    -(position / dist) * strength * size_scale
}

/// Spawn one ornament body (physics only; visuals are attached by
/// [`crate::scene::attach_ornament_visuals_system`]).
pub fn spawn_ornament(commands: &mut Commands, spec: OrnamentSpec, position: Vec3) -> Entity {
    commands
        .spawn((
            (
                Ornament {
                    size_scale: spec.size_scale,
                },
                SceneEntity,
                Transform::from_translation(position),
                Visibility::default(),
                RigidBody::Dynamic,
            ),
            (
                Collider::compound(ornament_shapes(spec.size_scale)),
                ColliderMassProperties::Mass(spec.mass),
                Damping {
                    linear_damping: retention_to_rate(spec.linear_damping),
                    angular_damping: retention_to_rate(spec.angular_damping),
                },
                ExternalForce::default(),
                Velocity::zero(),
                Sleeping::disabled(),
            ),
        ))
        .id()
}

/// Startup system: seed [`SceneRng`] from the config (or a fresh seed).
pub fn seed_scene_rng(mut commands: Commands, config: Res<SceneConfig>) {
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Ornament seed: {seed} (set `seed = {seed}` in assets/scene.toml to replay)");
    commands.insert_resource(SceneRng::from_seed(seed));
}

/// Startup system: generate the population and spawn every ornament.
pub fn spawn_ornaments(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut rng: ResMut<SceneRng>,
) {
    let specs = generate_population(&mut rng.0, &config);
    for spec in &specs {
        let position = spawn_position(&mut rng.0, &config);
        spawn_ornament(&mut commands, *spec, position);
    }
    info!("Spawned {} ornaments", specs.len());
}

/// Overwrite each ornament's `ExternalForce` with its pull toward the origin.
///
/// Runs in `Update`, so it reads the transform Rapier wrote back after the
/// previous step; the force applied this step lags the body by one tick.
pub fn ornament_repulsion_system(
    config: Res<SceneConfig>,
    mut query: Query<(&Transform, &Ornament, &mut ExternalForce)>,
) {
    for (transform, ornament, mut external_force) in query.iter_mut() {
        external_force.force =
            repulsion_force(transform.translation, ornament.size_scale, config.repulsion_strength);
        external_force.torque = Vec3::ZERO;
    }
}
