//! Static boundary planes: an open-ended box the ornaments tumble inside.
//!
//! | plane   | position      | rotation    | free side |
//! |---------|---------------|-------------|-----------|
//! | back    | (0, 0, 0)     | identity    | +Z        |
//! | front   | (0, 0, depth) | Y by −π     | −Z        |
//! | floor   | (0, −h, 0)    | X by −π/2   | +Y        |
//! | ceiling | (0, +h, 0)    | X by +π/2   | −Y        |
//!
//! The X axis is left open; the inward pull keeps ornaments from drifting
//! along it.  Planes are Rapier half-spaces on fixed bodies, so nothing can
//! tunnel through or move them.

use crate::config::SceneConfig;
use crate::error::{SceneError, SceneResult};
use crate::scene::SceneEntity;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI};

/// Marker for a spawned boundary plane.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryWall;

/// A static plane; its free side faces `rotation * Vec3::Z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPlane {
    pub position: Vec3,
    pub rotation: Quat,
}

impl BoundaryPlane {
    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Signed distance of `point` from the plane; positive on the free side.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.position).dot(self.normal())
    }
}

/// The four boundary planes for the configured box.
pub fn boundary_planes(config: &SceneConfig) -> [BoundaryPlane; 4] {
    let depth = config.boundary_depth;
    let half_height = config.boundary_half_height;
    [
        BoundaryPlane {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        },
        BoundaryPlane {
            position: Vec3::new(0.0, 0.0, depth),
            rotation: Quat::from_rotation_y(-PI),
        },
        BoundaryPlane {
            position: Vec3::new(0.0, -half_height, 0.0),
            rotation: Quat::from_rotation_x(-FRAC_PI_2),
        },
        BoundaryPlane {
            position: Vec3::new(0.0, half_height, 0.0),
            rotation: Quat::from_rotation_x(FRAC_PI_2),
        },
    ]
}

/// Build the half-space collider for plane `index`.
///
/// The collider's outward normal is local +Z; the entity transform carries
/// the plane's rotation.
pub fn plane_collider(index: usize, plane: &BoundaryPlane) -> SceneResult<Collider> {
    if !plane.normal().is_normalized() {
        return Err(SceneError::DegeneratePlane { index });
    }
    Collider::halfspace(Vec3::Z).ok_or(SceneError::DegeneratePlane { index })
}

/// Startup system: register the four planes with the physics world.
pub fn spawn_boundary_field(mut commands: Commands, config: Res<SceneConfig>) {
    for (index, plane) in boundary_planes(&config).iter().enumerate() {
        match plane_collider(index, plane) {
            Ok(collider) => {
                commands.spawn((
                    BoundaryWall,
                    SceneEntity,
                    RigidBody::Fixed,
                    collider,
                    Transform::from_translation(plane.position).with_rotation(plane.rotation),
                ));
            }
            Err(e) => error!("{e}; plane skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_planes_match_box_layout() {
        let planes = boundary_planes(&SceneConfig::default());
        let expected = [
            (Vec3::ZERO, Vec3::Z),
            (Vec3::new(0.0, 0.0, 8.0), Vec3::NEG_Z),
            (Vec3::new(0.0, -4.0, 0.0), Vec3::Y),
            (Vec3::new(0.0, 4.0, 0.0), Vec3::NEG_Y),
        ];
        for (plane, (position, normal)) in planes.iter().zip(expected) {
            assert_eq!(plane.position, position);
            assert!(
                approx(plane.normal(), normal),
                "plane at {position:?}: expected normal {normal:?}, got {:?}",
                plane.normal()
            );
        }
    }

    #[test]
    fn normals_face_into_the_box() {
        // The box centre must lie on the free side of every plane.
        let centre = Vec3::new(0.0, 0.0, 4.0);
        for plane in boundary_planes(&SceneConfig::default()) {
            assert!(plane.signed_distance(centre) > 0.0, "{plane:?}");
        }
    }

    #[test]
    fn planes_follow_config() {
        let config = SceneConfig {
            boundary_depth: 12.0,
            boundary_half_height: 6.0,
            ..Default::default()
        };
        let planes = boundary_planes(&config);
        assert_eq!(planes[1].position.z, 12.0);
        assert_eq!(planes[2].position.y, -6.0);
        assert_eq!(planes[3].position.y, 6.0);
    }

    #[test]
    fn spawns_exactly_four_fixed_walls() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SceneConfig::default());
        app.add_systems(Startup, spawn_boundary_field);
        app.update();

        let mut query = app
            .world_mut()
            .query_filtered::<(&RigidBody, &Transform), With<BoundaryWall>>();
        let walls: Vec<_> = query.iter(app.world()).collect();
        assert_eq!(walls.len(), 4);
        for (body, _) in &walls {
            assert_eq!(**body, RigidBody::Fixed);
        }
        let floor = walls
            .iter()
            .find(|(_, t)| t.translation == Vec3::new(0.0, -4.0, 0.0))
            .expect("floor plane spawned");
        assert!(approx(floor.1.rotation * Vec3::Z, Vec3::Y));
    }
}
