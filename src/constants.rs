//! Centralised scene, physics, and rendering constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! [`crate::config::SceneConfig`] mirrors every value below and can override
//! any of them from `assets/scene.toml` without recompiling.  After editing,
//! run the `bounded_cluster` test scenario (`BAUBLES_TEST=bounded_cluster`)
//! to confirm the cluster still stays inside the box.

// ── Population ────────────────────────────────────────────────────────────────

/// Number of ornaments spawned at startup.
pub const ORNAMENT_COUNT: usize = 50;

/// Weighted size table an ornament's `size_scale` is drawn from.
///
/// Each slot is equally likely, so 0.6 and 0.8 appear twice as often as 1.0.
pub const ORNAMENT_SIZE_TABLE: [f32; 5] = [0.6, 0.6, 0.8, 0.8, 1.0];

/// Mass of every ornament body (kg), independent of its size.
pub const ORNAMENT_MASS: f32 = 1.0;

/// Fraction of angular velocity lost per second.
///
/// Stored as a retention loss (`ω(t) = ω₀·(1 − d)^t`); converted to a Rapier
/// damping rate at spawn time.
pub const ORNAMENT_ANGULAR_DAMPING: f32 = 0.2;

/// Fraction of linear velocity lost per second.  At 0.95 a free ornament keeps
/// 5 % of its speed after one second, which is what keeps the cluster from
/// blowing apart under the constant inward pull.
pub const ORNAMENT_LINEAR_DAMPING: f32 = 0.95;

// ── Ornament Geometry ─────────────────────────────────────────────────────────

/// Half extent of the cap collider box, as a multiple of `size_scale`.
pub const CAP_BOX_HALF_EXTENT: f32 = 0.4;

/// Offset of the cap collider box along local +Z, as a multiple of `size_scale`.
pub const CAP_BOX_OFFSET: f32 = 1.2;

/// Scale of the cap mesh relative to `size_scale`.
pub const CAP_MESH_SCALE: f32 = 2.5;

/// Offset of the cap mesh along local −Z, as a multiple of `size_scale`.
pub const CAP_MESH_OFFSET: f32 = 1.8;

/// Latitude/longitude segment count of the shared body sphere mesh.
pub const SPHERE_SEGMENTS: u32 = 28;

// ── Force Field ───────────────────────────────────────────────────────────────

/// Magnitude of the inward pull per unit of `size_scale` (N).
///
/// Constant with distance: a 1.0 ornament at 0.5 u and at 50 u both feel 35 N.
pub const REPULSION_STRENGTH: f32 = 35.0;

/// Positions closer to the origin than this produce no force.
pub const ORIGIN_EPSILON: f32 = 1e-5;

/// Half extents of the volume ornaments are scattered in at startup.
pub const SPAWN_HALF_EXTENTS: [f32; 3] = [5.0, 3.0, 3.0];

/// Centre of the startup scatter volume; sits midway between the back and
/// front planes.
pub const SPAWN_CENTER: [f32; 3] = [0.0, 0.0, 4.0];

// ── Boundary ──────────────────────────────────────────────────────────────────

/// Distance between the back plane (z = 0) and the front plane.
pub const BOUNDARY_DEPTH: f32 = 8.0;

/// Distance from the origin to the floor and ceiling planes.
pub const BOUNDARY_HALF_HEIGHT: f32 = 4.0;

// ── Cursor ────────────────────────────────────────────────────────────────────

/// World-space Z of the pointer-driven kinematic sphere.
pub const CURSOR_DEPTH: f32 = 2.5;

/// Radius of the pointer-driven kinematic sphere.
pub const CURSOR_RADIUS: f32 = 2.0;

// ── Physics Context ───────────────────────────────────────────────────────────

/// Contact solver iterations per step.  One iteration favours frame time over
/// contact accuracy; overlaps resolve over a few frames instead of one.
pub const SOLVER_ITERATIONS: usize = 1;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Camera position; it looks at the origin.
pub const CAMERA_POSITION: [f32; 3] = [0.0, 0.0, 20.0];

/// Vertical field of view (degrees).
pub const CAMERA_FOV_DEGREES: f32 = 35.0;

/// Near clip plane.  Everything in the box lies between 12 and 20 u away.
pub const CAMERA_NEAR: f32 = 10.0;

/// Far clip plane.
pub const CAMERA_FAR: f32 = 40.0;

/// Tone-mapping exposure multiplier on top of Bevy's default exposure.
pub const CAMERA_EXPOSURE: f32 = 1.5;

// ── Lighting ──────────────────────────────────────────────────────────────────

/// Brightness of the ambient light attached to the camera.
pub const AMBIENT_BRIGHTNESS: f32 = 750.0;

/// Illuminance (lux) of each of the two directional lights.
pub const DIRECTIONAL_ILLUMINANCE: f32 = 4_000.0;

/// Luminous power (lm) of the red spot light.
pub const SPOT_INTENSITY: f32 = 4_000_000.0;

/// Spot light cone half-angle (radians).
pub const SPOT_OUTER_ANGLE: f32 = 0.2;

/// Environment map intensity.  High so the metallic caps pick up the reflection.
pub const ENVIRONMENT_INTENSITY: f32 = 9_000.0;

// ── Materials ─────────────────────────────────────────────────────────────────

pub const BODY_BASE_COLOR: &str = "#a0a090";
pub const BODY_EMISSIVE_COLOR: &str = "#ff0000";
pub const CAP_BASE_COLOR: &str = "#8a300f";
pub const CAP_EMISSIVE_COLOR: &str = "#600000";
pub const CAP_METALLIC: f32 = 0.9;
pub const CAP_ROUGHNESS: f32 = 0.1;

// ── Assets ────────────────────────────────────────────────────────────────────

/// Cap mesh asset path, including the glTF sub-asset label.
pub const CAP_MESH_PATH: &str = "models/cap.glb#Mesh0/Primitive0";

pub const ENVIRONMENT_DIFFUSE_PATH: &str = "environment_maps/adamsbridge_diffuse_rgb9e5_zstd.ktx2";
pub const ENVIRONMENT_SPECULAR_PATH: &str =
    "environment_maps/adamsbridge_specular_rgb9e5_zstd.ktx2";

// ── Ambient Occlusion ─────────────────────────────────────────────────────────

/// Occlusion radius that maps to Bevy's default SSAO object thickness (0.25).
///
/// `thickness = finest_radius / OCCLUSION_RADIUS_PER_THICKNESS`.
pub const OCCLUSION_RADIUS_PER_THICKNESS: f32 = 20.0;

/// Coarse occlusion pass: few samples, wide radius.
pub const OCCLUSION_COARSE_SAMPLES: u32 = 11;
pub const OCCLUSION_COARSE_RADIUS: f32 = 30.0;

/// Fine occlusion pass: more samples, tight radius.
pub const OCCLUSION_FINE_SAMPLES: u32 = 21;
pub const OCCLUSION_FINE_RADIUS: f32 = 5.0;

pub const OCCLUSION_INTENSITY: f32 = 30.0;
pub const OCCLUSION_LUMINANCE_INFLUENCE: f32 = 0.6;
pub const OCCLUSION_COLOR: &str = "#ff0000";
