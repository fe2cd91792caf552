//! Runtime scene configuration loaded from `assets/scene.toml`.
//!
//! [`SceneConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_scene_config`] reads
//! `assets/scene.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! seed = 1225
//! ornament_count = 80
//! repulsion_strength = 20.0
//!
//! [[occlusion]]
//! samples = 16
//! radius = 8.0
//! ```
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `SceneConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_finite, validate_fraction, validate_positive, SceneError, SceneResult,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Broadphase strategy requested for the physics context.
///
/// Rapier ships a single broadphase; the setting is validated and logged so a
/// config asking for something else is caught instead of silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadphaseStrategy {
    #[default]
    SweepAndPrune,
}

/// One entry of the ambient-occlusion stack, coarsest first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OcclusionPass {
    pub samples: u32,
    pub radius: f32,
    pub intensity: f32,
    pub luminance_influence: f32,
    pub color: String,
}

impl Default for OcclusionPass {
    fn default() -> Self {
        Self {
            samples: OCCLUSION_FINE_SAMPLES,
            radius: OCCLUSION_FINE_RADIUS,
            intensity: OCCLUSION_INTENSITY,
            luminance_influence: OCCLUSION_LUMINANCE_INFLUENCE,
            color: OCCLUSION_COLOR.to_string(),
        }
    }
}

/// Runtime-tunable scene, physics, and rendering configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset in `assets/scene.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    // ── Population ───────────────────────────────────────────────────────────
    pub ornament_count: usize,
    /// Seed for ornament sizes and start positions.  `None` draws a fresh seed
    /// per run; the chosen seed is logged so a run can be reproduced.
    pub seed: Option<u64>,
    pub size_table: Vec<f32>,
    pub ornament_mass: f32,
    pub angular_damping: f32,
    pub linear_damping: f32,

    // ── Force Field ──────────────────────────────────────────────────────────
    pub repulsion_strength: f32,
    pub spawn_center: [f32; 3],
    pub spawn_half_extents: [f32; 3],

    // ── Boundary ─────────────────────────────────────────────────────────────
    pub boundary_depth: f32,
    pub boundary_half_height: f32,

    // ── Cursor ───────────────────────────────────────────────────────────────
    pub cursor_depth: f32,
    pub cursor_radius: f32,

    // ── Physics Context ──────────────────────────────────────────────────────
    pub solver_iterations: usize,
    pub broadphase: BroadphaseStrategy,

    // ── Camera ───────────────────────────────────────────────────────────────
    pub camera_position: [f32; 3],
    pub camera_fov_degrees: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    /// Linear exposure multiplier; 1.0 keeps Bevy's default.
    pub camera_exposure: f32,

    // ── Lighting ─────────────────────────────────────────────────────────────
    pub ambient_brightness: f32,
    pub directional_illuminance: f32,
    pub spot_intensity: f32,
    pub spot_outer_angle: f32,
    pub environment_intensity: f32,

    // ── Materials ────────────────────────────────────────────────────────────
    pub body_base_color: String,
    pub body_emissive_color: String,
    pub cap_base_color: String,
    pub cap_emissive_color: String,
    pub cap_metallic: f32,
    pub cap_roughness: f32,

    // ── Assets ───────────────────────────────────────────────────────────────
    pub cap_mesh_path: String,
    pub environment_diffuse_path: String,
    pub environment_specular_path: String,

    // ── Ambient Occlusion ────────────────────────────────────────────────────
    pub occlusion: Vec<OcclusionPass>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            // Population
            ornament_count: ORNAMENT_COUNT,
            seed: None,
            size_table: ORNAMENT_SIZE_TABLE.to_vec(),
            ornament_mass: ORNAMENT_MASS,
            angular_damping: ORNAMENT_ANGULAR_DAMPING,
            linear_damping: ORNAMENT_LINEAR_DAMPING,
            // Force Field
            repulsion_strength: REPULSION_STRENGTH,
            spawn_center: SPAWN_CENTER,
            spawn_half_extents: SPAWN_HALF_EXTENTS,
            // Boundary
            boundary_depth: BOUNDARY_DEPTH,
            boundary_half_height: BOUNDARY_HALF_HEIGHT,
            // Cursor
            cursor_depth: CURSOR_DEPTH,
            cursor_radius: CURSOR_RADIUS,
            // Physics Context
            solver_iterations: SOLVER_ITERATIONS,
            broadphase: BroadphaseStrategy::SweepAndPrune,
            // Camera
            camera_position: CAMERA_POSITION,
            camera_fov_degrees: CAMERA_FOV_DEGREES,
            camera_near: CAMERA_NEAR,
            camera_far: CAMERA_FAR,
            camera_exposure: CAMERA_EXPOSURE,
            // Lighting
            ambient_brightness: AMBIENT_BRIGHTNESS,
            directional_illuminance: DIRECTIONAL_ILLUMINANCE,
            spot_intensity: SPOT_INTENSITY,
            spot_outer_angle: SPOT_OUTER_ANGLE,
            environment_intensity: ENVIRONMENT_INTENSITY,
            // Materials
            body_base_color: BODY_BASE_COLOR.to_string(),
            body_emissive_color: BODY_EMISSIVE_COLOR.to_string(),
            cap_base_color: CAP_BASE_COLOR.to_string(),
            cap_emissive_color: CAP_EMISSIVE_COLOR.to_string(),
            cap_metallic: CAP_METALLIC,
            cap_roughness: CAP_ROUGHNESS,
            // Assets
            cap_mesh_path: CAP_MESH_PATH.to_string(),
            environment_diffuse_path: ENVIRONMENT_DIFFUSE_PATH.to_string(),
            environment_specular_path: ENVIRONMENT_SPECULAR_PATH.to_string(),
            // Ambient Occlusion
            occlusion: vec![
                OcclusionPass {
                    samples: OCCLUSION_COARSE_SAMPLES,
                    radius: OCCLUSION_COARSE_RADIUS,
                    ..Default::default()
                },
                OcclusionPass {
                    samples: OCCLUSION_FINE_SAMPLES,
                    radius: OCCLUSION_FINE_RADIUS,
                    ..Default::default()
                },
            ],
        }
    }
}

impl SceneConfig {
    pub fn spawn_center(&self) -> Vec3 {
        Vec3::from_array(self.spawn_center)
    }

    pub fn spawn_half_extents(&self) -> Vec3 {
        Vec3::from_array(self.spawn_half_extents)
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_position)
    }

    pub fn camera_fov(&self) -> f32 {
        self.camera_fov_degrees.to_radians()
    }

    /// Reject values that would break the simulation or the renderer.
    ///
    /// Called by [`load_scene_config`] before a file's values replace the
    /// defaults.
    pub fn validate(&self) -> SceneResult<()> {
        if self.ornament_count == 0 {
            return Err(SceneError::InvalidConstant {
                name: "ornament_count",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        if self.size_table.is_empty() {
            return Err(SceneError::InvalidConstant {
                name: "size_table",
                value: 0.0,
                safe_range: "at least one entry",
            });
        }
        for &size in &self.size_table {
            validate_positive("size_table", size)?;
        }
        validate_positive("ornament_mass", self.ornament_mass)?;
        validate_fraction("angular_damping", self.angular_damping)?;
        validate_fraction("linear_damping", self.linear_damping)?;
        validate_positive("repulsion_strength", self.repulsion_strength)?;
        validate_finite("spawn_center", &self.spawn_center)?;
        for &half in &self.spawn_half_extents {
            if !half.is_finite() || half < 0.0 {
                return Err(SceneError::InvalidConstant {
                    name: "spawn_half_extents",
                    value: half,
                    safe_range: "[0.0, ∞)",
                });
            }
        }
        validate_positive("boundary_depth", self.boundary_depth)?;
        validate_positive("boundary_half_height", self.boundary_half_height)?;
        validate_positive("cursor_radius", self.cursor_radius)?;
        validate_finite("cursor_depth", &[self.cursor_depth])?;
        if self.solver_iterations == 0 {
            return Err(SceneError::InvalidConstant {
                name: "solver_iterations",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        if !(self.camera_fov_degrees > 0.0 && self.camera_fov_degrees < 180.0) {
            return Err(SceneError::InvalidConstant {
                name: "camera_fov_degrees",
                value: self.camera_fov_degrees,
                safe_range: "(0.0, 180.0)",
            });
        }
        validate_finite("camera_position", &self.camera_position)?;
        // The camera looks at the origin, so it can't sit on it.
        if self.camera_position().length() <= self.camera_near {
            return Err(SceneError::InvalidConstant {
                name: "camera_position",
                value: self.camera_position().length(),
                safe_range: "distance from origin > camera_near",
            });
        }
        validate_positive("camera_near", self.camera_near)?;
        if self.camera_far <= self.camera_near {
            return Err(SceneError::InvalidConstant {
                name: "camera_far",
                value: self.camera_far,
                safe_range: "(camera_near, ∞)",
            });
        }
        validate_positive("camera_exposure", self.camera_exposure)?;
        if self.occlusion.is_empty() {
            return Err(SceneError::InvalidConstant {
                name: "occlusion",
                value: 0.0,
                safe_range: "at least one pass",
            });
        }
        for pass in &self.occlusion {
            validate_positive("occlusion.radius", pass.radius)?;
            if pass.samples == 0 {
                return Err(SceneError::InvalidConstant {
                    name: "occlusion.samples",
                    value: 0.0,
                    safe_range: "[1, ∞)",
                });
            }
            parse_color("occlusion.color", &pass.color)?;
        }
        parse_color("body_base_color", &self.body_base_color)?;
        parse_color("body_emissive_color", &self.body_emissive_color)?;
        parse_color("cap_base_color", &self.cap_base_color)?;
        parse_color("cap_emissive_color", &self.cap_emissive_color)?;
        Ok(())
    }
}

/// Parse a `#rrggbb` / `rrggbb` colour string.
pub fn parse_color(name: &'static str, value: &str) -> SceneResult<Color> {
    Srgba::hex(value)
        .map(Color::from)
        .map_err(|_| SceneError::InvalidColor {
            name,
            value: value.to_string(),
        })
}

/// Parse and validate a TOML document into a [`SceneConfig`].
pub fn parse_scene_config(path: &str, contents: &str) -> SceneResult<SceneConfig> {
    let config =
        toml::from_str::<SceneConfig>(contents).map_err(|e| SceneError::ConfigParse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    config.validate()?;
    Ok(config)
}

/// Startup system: attempt to load `assets/scene.toml` and overwrite the
/// `SceneConfig` resource with the values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are logged but do not abort the scene.  A missing file is not an error.
pub fn load_scene_config(mut config: ResMut<SceneConfig>) {
    let path = "assets/scene.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_scene_config(path, &contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded scene config from {path}");
            }
            Err(e) => {
                error!("{e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SceneConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_occlusion_stack_is_coarse_then_fine() {
        let config = SceneConfig::default();
        assert_eq!(config.occlusion.len(), 2);
        assert_eq!(config.occlusion[0].samples, 11);
        assert_eq!(config.occlusion[0].radius, 30.0);
        assert_eq!(config.occlusion[1].samples, 21);
        assert_eq!(config.occlusion[1].radius, 5.0);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = parse_scene_config("test.toml", "seed = 7\nornament_count = 12\n")
            .expect("partial config should parse");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.ornament_count, 12);
        assert_eq!(config.repulsion_strength, REPULSION_STRENGTH);
        assert_eq!(config.broadphase, BroadphaseStrategy::SweepAndPrune);
    }

    #[test]
    fn broadphase_parses_snake_case() {
        let config = parse_scene_config("test.toml", "broadphase = \"sweep_and_prune\"\n")
            .expect("broadphase should parse");
        assert_eq!(config.broadphase, BroadphaseStrategy::SweepAndPrune);
        assert!(parse_scene_config("test.toml", "broadphase = \"naive\"\n").is_err());
    }

    #[test]
    fn occlusion_table_overrides_whole_stack() {
        let config = parse_scene_config(
            "test.toml",
            "[[occlusion]]\nsamples = 16\nradius = 8.0\n",
        )
        .expect("occlusion override should parse");
        assert_eq!(config.occlusion.len(), 1);
        assert_eq!(config.occlusion[0].samples, 16);
        assert_eq!(config.occlusion[0].intensity, OCCLUSION_INTENSITY);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_scene_config("bad.toml", "seed = [").unwrap_err();
        assert!(matches!(err, SceneError::ConfigParse { .. }), "got {err:?}");
    }

    #[test]
    fn zero_solver_iterations_is_rejected() {
        let err = parse_scene_config("test.toml", "solver_iterations = 0\n").unwrap_err();
        assert!(
            matches!(
                err,
                SceneError::InvalidConstant {
                    name: "solver_iterations",
                    ..
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn full_damping_is_rejected() {
        let config = SceneConfig {
            linear_damping: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_colour_is_rejected() {
        let config = SceneConfig {
            cap_base_color: "not-a-colour".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SceneError::InvalidColor {
                name: "cap_base_color",
                ..
            })
        ));
    }

    #[test]
    fn far_plane_must_exceed_near_plane() {
        let config = SceneConfig {
            camera_near: 40.0,
            camera_far: 10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_spawn_center_is_rejected() {
        let err = parse_scene_config("test.toml", "spawn_center = [nan, 0.0, 4.0]\n").unwrap_err();
        assert!(
            matches!(
                err,
                SceneError::InvalidConstant {
                    name: "spawn_center",
                    ..
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn infinite_cursor_depth_is_rejected() {
        let err = parse_scene_config("test.toml", "cursor_depth = inf\n").unwrap_err();
        assert!(
            matches!(
                err,
                SceneError::InvalidConstant {
                    name: "cursor_depth",
                    ..
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn nan_camera_position_is_rejected() {
        let config = SceneConfig {
            camera_position: [0.0, f32::NAN, 20.0],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SceneError::InvalidConstant {
                name: "camera_position",
                ..
            })
        ));
    }

    #[test]
    fn camera_at_origin_is_rejected() {
        let err = parse_scene_config("test.toml", "camera_position = [0.0, 0.0, 0.0]\n").unwrap_err();
        assert!(
            matches!(
                err,
                SceneError::InvalidConstant {
                    name: "camera_position",
                    ..
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn exposure_must_be_positive() {
        let config = SceneConfig {
            camera_exposure: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(SceneConfig::default().camera_exposure, 1.5);
    }

    #[test]
    fn shipped_scene_toml_is_valid() {
        let config = parse_scene_config("assets/scene.toml", include_str!("../assets/scene.toml"))
            .expect("shipped config should parse");
        assert_eq!(config.cap_mesh_path, CAP_MESH_PATH);
        assert_eq!(config.ornament_count, ORNAMENT_COUNT);
    }
}
