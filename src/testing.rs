//! In-app test scenarios, selected with `BAUBLES_TEST=<name>`.
//!
//! | scenario          | frames | checks                                            |
//! |-------------------|--------|---------------------------------------------------|
//! | `bounded_cluster` | 600    | every ornament stays inside the box, all finite   |
//! | `pointer_corner`  | 60     | cursor body sits at the top-right view corner     |
//! | `origin_guard`    | 120    | an ornament spawned on the origin never goes NaN  |
//!
//! Each run prints a PASS/FAIL line and exits with a matching status, so the
//! scenarios can be scripted alongside `cargo test`.

use crate::boundary::boundary_planes;
use crate::config::SceneConfig;
use crate::ornament::{spawn_ornament, Ornament, OrnamentSpec};
use crate::pointer::{CursorBody, PointerState, ViewportExtents};
use bevy::prelude::*;

/// Ornaments further than this from the origin count as escaped.
///
/// The cluster's own radius is a few units; the open X axis is the only way
/// out, so this only trips if the inward pull stops working.
pub const CLUSTER_RADIUS_LIMIT: f32 = 25.0;

/// Penetration tolerated past a boundary plane (Rapier resolves overlaps over
/// a few steps at one solver iteration).
pub const PLANE_TOLERANCE: f32 = 0.5;

/// Test configuration
#[derive(Resource)]
pub struct TestConfig {
    pub enabled: bool,
    pub test_name: String,
    pub frame_limit: u32,
    pub frame_count: u32,
    /// Pointer position forced every frame, overriding the real cursor.
    pub pointer_override: Option<Vec2>,
    /// Largest ornament distance from the origin seen so far.
    pub max_distance: f32,
    /// First violation recorded, if any.
    pub failure: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            test_name: String::new(),
            frame_limit: 100,
            frame_count: 0,
            pointer_override: None,
            max_distance: 0.0,
            failure: None,
        }
    }
}

/// True when `position` is finite, on the free side of every boundary plane
/// (within `tolerance`), and inside [`CLUSTER_RADIUS_LIMIT`].
pub fn ornament_within_bounds(position: Vec3, config: &SceneConfig, tolerance: f32) -> bool {
    position.is_finite()
        && position.length() <= CLUSTER_RADIUS_LIMIT
        && boundary_planes(config)
            .iter()
            .all(|plane| plane.signed_distance(position) >= -tolerance)
}

/// Spawn test scenario: the default population, left alone.
pub fn spawn_test_bounded_cluster(mut test_config: ResMut<TestConfig>) {
    test_config.test_name = "bounded_cluster".to_string();
    test_config.frame_limit = 600;
    println!("✓ Spawned test: default population, no pointer input");
}

/// Spawn test scenario: pointer pinned to the top-right corner.
pub fn spawn_test_pointer_corner(mut test_config: ResMut<TestConfig>) {
    test_config.test_name = "pointer_corner".to_string();
    test_config.frame_limit = 60;
    test_config.pointer_override = Some(Vec2::ONE);
    println!("✓ Spawned test: pointer forced to (1, 1)");
}

/// Spawn test scenario: one extra ornament exactly on the origin.
pub fn spawn_test_origin_guard(mut commands: Commands, mut test_config: ResMut<TestConfig>) {
    test_config.test_name = "origin_guard".to_string();
    test_config.frame_limit = 120;
    let spec = OrnamentSpec {
        size_scale: 1.0,
        mass: 1.0,
        angular_damping: 0.2,
        linear_damping: 0.95,
    };
    spawn_ornament(&mut commands, spec, Vec3::ZERO);
    println!("✓ Spawned test: ornament at the origin");
}

/// Force [`PointerState`] to the scenario's override.
pub fn pointer_override_system(test_config: Res<TestConfig>, mut pointer: ResMut<PointerState>) {
    if let Some(normalized) = test_config.pointer_override {
        pointer.normalized = normalized;
    }
}

/// Per-frame bookkeeping: frame counter, max distance, first violation.
pub fn test_logging_system(
    mut test_config: ResMut<TestConfig>,
    config: Res<SceneConfig>,
    q: Query<&Transform, With<Ornament>>,
) {
    if !test_config.enabled {
        return;
    }

    test_config.frame_count += 1;
    let frame = test_config.frame_count;

    for transform in q.iter() {
        let p = transform.translation;
        if p.is_finite() {
            test_config.max_distance = test_config.max_distance.max(p.length());
        }
        // Bodies spawned overlapping need a moment to separate.
        if frame > 30
            && test_config.failure.is_none()
            && !ornament_within_bounds(p, &config, PLANE_TOLERANCE)
        {
            test_config.failure = Some(format!("frame {frame}: ornament out of bounds at {p:?}"));
        }
    }

    if frame == 1 || frame % 100 == 0 {
        println!(
            "[Frame {}] {} | ornaments: {} | max distance: {:.2}",
            frame,
            test_config.test_name,
            q.iter().count(),
            test_config.max_distance
        );
    }
}

/// Evaluate the scenario at `frame_limit`, print the verdict, and exit.
pub fn test_verification_system(
    test_config: Res<TestConfig>,
    extents: Res<ViewportExtents>,
    config: Res<SceneConfig>,
    q_ornaments: Query<&Transform, With<Ornament>>,
    q_cursor: Query<&Transform, With<CursorBody>>,
    mut exit: MessageWriter<bevy::app::AppExit>,
) {
    if !test_config.enabled || test_config.frame_count < test_config.frame_limit {
        return;
    }

    let mut failure = test_config.failure.clone();

    match test_config.test_name.as_str() {
        "pointer_corner" => {
            // Top-right corner of the view at the cursor plane.
            let expected = Vec3::new(extents.half_width, extents.half_height, config.cursor_depth);
            match q_cursor.single() {
                Ok(t) if (t.translation - expected).length() < 1e-3 => {}
                Ok(t) => {
                    failure.get_or_insert(format!(
                        "cursor at {:?}, expected {:?}",
                        t.translation, expected
                    ));
                }
                Err(_) => {
                    failure.get_or_insert("cursor body missing".to_string());
                }
            }
        }
        "origin_guard" => {
            if q_ornaments.iter().any(|t| !t.translation.is_finite()) {
                failure.get_or_insert("non-finite ornament transform".to_string());
            }
        }
        _ => {}
    }

    match failure {
        None => {
            println!(
                "PASS: {} ({} frames, max distance {:.2})",
                test_config.test_name, test_config.frame_count, test_config.max_distance
            );
            exit.write(bevy::app::AppExit::Success);
        }
        Some(reason) => {
            println!("FAIL: {}: {}", test_config.test_name, reason);
            exit.write(bevy::app::AppExit::error());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::app::AppExit;

    fn pointer_corner_app(cursor: Vec3) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SceneConfig::default());
        app.insert_resource(ViewportExtents {
            half_width: 10.0,
            half_height: 6.0,
        });
        app.insert_resource(TestConfig {
            enabled: true,
            test_name: "pointer_corner".to_string(),
            frame_limit: 1,
            frame_count: 1,
            ..Default::default()
        });
        app.world_mut()
            .spawn((CursorBody, Transform::from_translation(cursor)));
        app.add_systems(Update, test_verification_system);
        app
    }

    #[test]
    fn pointer_corner_passes_with_cursor_at_view_corner() {
        let mut app = pointer_corner_app(Vec3::new(10.0, 6.0, 2.5));
        app.update();
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }

    #[test]
    fn pointer_corner_fails_with_cursor_left_at_centre() {
        let mut app = pointer_corner_app(Vec3::new(0.0, 0.0, 2.5));
        app.update();
        assert!(matches!(app.should_exit(), Some(AppExit::Error(_))));
    }

    #[test]
    fn box_centre_is_within_bounds() {
        let config = SceneConfig::default();
        assert!(ornament_within_bounds(Vec3::new(0.0, 0.0, 4.0), &config, 0.0));
    }

    #[test]
    fn behind_back_plane_is_out_of_bounds() {
        let config = SceneConfig::default();
        assert!(!ornament_within_bounds(Vec3::new(0.0, 0.0, -1.0), &config, 0.5));
        assert!(ornament_within_bounds(Vec3::new(0.0, 0.0, -0.4), &config, 0.5));
    }

    #[test]
    fn above_ceiling_is_out_of_bounds() {
        let config = SceneConfig::default();
        assert!(!ornament_within_bounds(Vec3::new(0.0, 5.0, 4.0), &config, 0.5));
    }

    #[test]
    fn far_along_open_axis_is_out_of_bounds() {
        let config = SceneConfig::default();
        assert!(!ornament_within_bounds(Vec3::new(30.0, 0.0, 4.0), &config, 0.5));
    }

    #[test]
    fn nan_is_out_of_bounds() {
        let config = SceneConfig::default();
        assert!(!ornament_within_bounds(Vec3::new(f32::NAN, 0.0, 4.0), &config, 0.5));
    }
}
