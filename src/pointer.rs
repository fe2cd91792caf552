//! Pointer-driven kinematic sphere.
//!
//! ## Pipeline (runs in order every `Update` frame, before Rapier steps)
//!
//! 1. [`pointer_input_system`]: window cursor → [`PointerState`] in `[-1, 1]²`.
//! 2. [`viewport_extents_system`]: camera + window → [`ViewportExtents`].
//! 3. [`cursor_body_system`]: writes the [`CursorBody`] transform.
//!
//! The two resources are the input abstraction layer: tests populate them
//! directly and run only `cursor_body_system`.  The kinematic body's transform
//! is overwritten every frame, so the step always sees the latest target.

use crate::config::SceneConfig;
use crate::scene::SceneEntity;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier3d::prelude::*;

/// Normalized pointer position, +Y up, origin at the window centre.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub normalized: Vec2,
}

/// World-space half extents of the view at the origin's depth.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportExtents {
    pub half_width: f32,
    pub half_height: f32,
}

/// Marker for the kinematic sphere that follows the pointer.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBody;

/// Map a window-space cursor (origin top-left, +Y down) to `[-1, 1]²`, +Y up.
pub fn normalize_cursor(cursor: Vec2, window_size: Vec2) -> Vec2 {
    Vec2::new(
        2.0 * cursor.x / window_size.x - 1.0,
        1.0 - 2.0 * cursor.y / window_size.y,
    )
}

/// Half extents of a perspective view at `distance` from the camera.
pub fn viewport_half_extents(fov: f32, aspect_ratio: f32, distance: f32) -> ViewportExtents {
    let half_height = (fov * 0.5).tan() * distance;
    ViewportExtents {
        half_width: half_height * aspect_ratio,
        half_height,
    }
}

/// Target world position of the cursor body.
pub fn cursor_target(pointer: &PointerState, extents: &ViewportExtents, depth: f32) -> Vec3 {
    Vec3::new(
        pointer.normalized.x * extents.half_width,
        pointer.normalized.y * extents.half_height,
        depth,
    )
}

/// Startup system: spawn the kinematic cursor sphere.
pub fn spawn_cursor_body(mut commands: Commands, config: Res<SceneConfig>) {
    commands.spawn((
        CursorBody,
        SceneEntity,
        RigidBody::KinematicPositionBased,
        Collider::ball(config.cursor_radius),
        Transform::from_xyz(0.0, 0.0, config.cursor_depth),
    ));
}

/// Sample the primary window's cursor into [`PointerState`].
///
/// A cursor outside the window keeps the last value, so the sphere parks where
/// the pointer left instead of snapping to the centre.
pub fn pointer_input_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut pointer: ResMut<PointerState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = window.size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    if let Some(cursor) = window.cursor_position() {
        pointer.normalized = normalize_cursor(cursor, size).clamp(Vec2::NEG_ONE, Vec2::ONE);
    }
}

/// Recompute [`ViewportExtents`] from the camera projection and window aspect.
pub fn viewport_extents_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Transform, &Projection), With<Camera3d>>,
    mut extents: ResMut<ViewportExtents>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((transform, projection)) = cameras.single() else {
        return;
    };
    let Projection::Perspective(perspective) = projection else {
        return;
    };
    let size = window.size();
    if size.y <= 0.0 {
        return;
    }
    *extents = viewport_half_extents(
        perspective.fov,
        size.x / size.y,
        transform.translation.length(),
    );
}

/// Write this frame's target into the cursor body's transform.
pub fn cursor_body_system(
    pointer: Res<PointerState>,
    extents: Res<ViewportExtents>,
    config: Res<SceneConfig>,
    mut query: Query<&mut Transform, With<CursorBody>>,
) {
    let target = cursor_target(&pointer, &extents, config.cursor_depth);
    for mut transform in query.iter_mut() {
        transform.translation = target;
    }
}
