//! Scene composition: camera, lights, environment map, ambient occlusion,
//! ornament visuals, and teardown.
//!
//! The physics side of the scene is built by [`crate::simulation::SimulationPlugin`];
//! [`ScenePlugin`] layers everything that only matters when there is a window
//! to render into.

use crate::assets::{load_scene_assets, watch_asset_loads_system, CapMesh, SceneAssets};
use crate::config::{OcclusionPass, SceneConfig};
use crate::constants::OCCLUSION_RADIUS_PER_THICKNESS;
use crate::ornament::{ornament_visual_transforms, Ornament};
use crate::simulation::SceneSetup;
use bevy::camera::Exposure;
use bevy::light::EnvironmentMapLight;
use bevy::pbr::{ScreenSpaceAmbientOcclusion, ScreenSpaceAmbientOcclusionQualityLevel};
use bevy::prelude::*;

/// Tags every entity the scene owns; [`dispose_scene`] despawns them all.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneEntity;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::NONE))
            .add_systems(
                Startup,
                (load_scene_assets, setup_camera, setup_lights)
                    .chain()
                    .after(SceneSetup),
            )
            .add_systems(
                Update,
                (attach_ornament_visuals_system, watch_asset_loads_system).chain(),
            )
            .add_systems(Last, dispose_on_exit_system);
    }
}

/// Fold the occlusion stack into Bevy's single SSAO pass.
///
/// The quality level covers the densest pass's sample count; the object
/// thickness follows the finest radius, so the tight pass keeps its contact
/// shadows.  Returns `None` for an empty stack.
pub fn occlusion_settings(passes: &[OcclusionPass]) -> Option<ScreenSpaceAmbientOcclusion> {
    let samples = passes.iter().map(|p| p.samples).max()?;
    let finest_radius = passes.iter().map(|p| p.radius).fold(f32::INFINITY, f32::min);
    // Samples per quality level: slices × samples-per-side × 2.
    let quality_level = match samples {
        0..=4 => ScreenSpaceAmbientOcclusionQualityLevel::Low,
        5..=8 => ScreenSpaceAmbientOcclusionQualityLevel::Medium,
        9..=18 => ScreenSpaceAmbientOcclusionQualityLevel::High,
        _ => ScreenSpaceAmbientOcclusionQualityLevel::Ultra,
    };
    Some(ScreenSpaceAmbientOcclusion {
        quality_level,
        constant_object_thickness: finest_radius / OCCLUSION_RADIUS_PER_THICKNESS,
    })
}

/// Camera exposure brightening the image by a linear `multiplier` relative to
/// Bevy's default.  Each doubling is one stop, i.e. one EV100 lower.
pub fn camera_exposure(multiplier: f32) -> Exposure {
    Exposure {
        ev100: Exposure::default().ev100 - multiplier.log2(),
    }
}

/// Spawn the camera with its ambient light, environment map, and SSAO.
pub fn setup_camera(mut commands: Commands, config: Res<SceneConfig>, assets: Res<SceneAssets>) {
    let mut camera = commands.spawn((
        SceneEntity,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera_fov(),
            near: config.camera_near,
            far: config.camera_far,
            ..default()
        }),
        Transform::from_translation(config.camera_position()).looking_at(Vec3::ZERO, Vec3::Y),
        camera_exposure(config.camera_exposure),
        // SSAO needs multisampling off.
        Msaa::Off,
        AmbientLight {
            color: Color::WHITE,
            brightness: config.ambient_brightness,
            ..default()
        },
        EnvironmentMapLight {
            diffuse_map: assets.environment_diffuse.clone(),
            specular_map: assets.environment_specular.clone(),
            intensity: config.environment_intensity,
            ..default()
        },
    ));
    if let Some(ssao) = occlusion_settings(&config.occlusion) {
        camera.insert(ssao);
    }
    for pass in &config.occlusion {
        info!(
            "Occlusion pass: {} samples, radius {}, colour {}",
            pass.samples, pass.radius, pass.color
        );
    }
}

/// Spawn the spot light and the two directional lights.
pub fn setup_lights(mut commands: Commands, config: Res<SceneConfig>) {
    let red = Color::srgb(1.0, 0.0, 0.0);
    commands.spawn((
        SceneEntity,
        SpotLight {
            color: red,
            intensity: config.spot_intensity,
            range: 60.0,
            outer_angle: config.spot_outer_angle,
            // Full penumbra: the falloff starts at the cone axis.
            inner_angle: 0.0,
            ..default()
        },
        Transform::from_xyz(20.0, 20.0, 25.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        SceneEntity,
        DirectionalLight {
            illuminance: config.directional_illuminance,
            ..default()
        },
        Transform::from_xyz(0.0, 5.0, -4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    // Straight up from below; Y can't be the up vector here.
    commands.spawn((
        SceneEntity,
        DirectionalLight {
            color: red,
            illuminance: config.directional_illuminance,
            ..default()
        },
        Transform::from_xyz(0.0, -15.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));
}

/// Attach the sphere and cap meshes to every newly spawned [`Ornament`].
pub fn attach_ornament_visuals_system(
    mut commands: Commands,
    assets: Res<SceneAssets>,
    query: Query<(Entity, &Ornament), Added<Ornament>>,
) {
    for (entity, ornament) in query.iter() {
        let (sphere_transform, cap_transform) = ornament_visual_transforms(ornament.size_scale);
        commands.entity(entity).with_children(|parent| {
            parent.spawn((
                Mesh3d(assets.sphere.clone()),
                MeshMaterial3d(assets.body_material.clone()),
                sphere_transform,
            ));
            parent.spawn((
                CapMesh,
                Mesh3d(assets.cap.clone()),
                MeshMaterial3d(assets.cap_material.clone()),
                cap_transform,
            ));
        });
    }
}

/// Despawn every [`SceneEntity`] (bodies, planes, cursor, lights, camera).
pub fn dispose_scene(mut commands: Commands, query: Query<Entity, With<SceneEntity>>) {
    let mut count = 0;
    for entity in query.iter() {
        commands.entity(entity).despawn();
        count += 1;
    }
    info!("Disposed {count} scene entities");
}

/// Tear the scene down once the app is asked to exit.
pub fn dispose_on_exit_system(
    mut exits: MessageReader<AppExit>,
    commands: Commands,
    query: Query<Entity, With<SceneEntity>>,
) {
    if exits.read().next().is_some() {
        dispose_scene(commands, query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::spawn_boundary_field;
    use crate::ornament::{spawn_ornament, OrnamentSpec};
    use crate::pointer::spawn_cursor_body;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn default_stack_maps_to_ultra_with_default_thickness() {
        let ssao = occlusion_settings(&SceneConfig::default().occlusion).expect("two passes");
        assert!(matches!(
            ssao.quality_level,
            ScreenSpaceAmbientOcclusionQualityLevel::Ultra
        ));
        assert!((ssao.constant_object_thickness - 0.25).abs() < 1e-6);
    }

    #[test]
    fn sparse_single_pass_maps_to_low() {
        let passes = [OcclusionPass {
            samples: 4,
            radius: 10.0,
            ..Default::default()
        }];
        let ssao = occlusion_settings(&passes).unwrap();
        assert!(matches!(
            ssao.quality_level,
            ScreenSpaceAmbientOcclusionQualityLevel::Low
        ));
        assert!((ssao.constant_object_thickness - 0.5).abs() < 1e-6);
    }

    #[test]
    fn exposure_multiplier_lowers_ev100_by_stops() {
        let base = Exposure::default().ev100;
        assert!((camera_exposure(1.0).ev100 - base).abs() < 1e-6);
        assert!((camera_exposure(2.0).ev100 - (base - 1.0)).abs() < 1e-6);
        // Default config: 1.5x brighter.
        let default = camera_exposure(SceneConfig::default().camera_exposure).ev100;
        assert!((base - default - 1.5f32.log2()).abs() < 1e-6);
    }

    #[test]
    fn empty_stack_has_no_ssao() {
        assert!(occlusion_settings(&[]).is_none());
    }

    #[test]
    fn dispose_removes_every_scene_entity() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SceneConfig::default());
        app.add_systems(Startup, (spawn_boundary_field, spawn_cursor_body));
        app.update();

        let spec = OrnamentSpec {
            size_scale: 1.0,
            mass: 1.0,
            angular_damping: 0.2,
            linear_damping: 0.95,
        };
        {
            let mut commands = app.world_mut().commands();
            spawn_ornament(&mut commands, spec, Vec3::new(1.0, 0.0, 4.0));
        }
        app.world_mut().flush();
        let unrelated = app.world_mut().spawn(Transform::default()).id();

        let mut scene = app.world_mut().query_filtered::<Entity, With<SceneEntity>>();
        assert_eq!(scene.iter(app.world()).count(), 6);

        app.world_mut()
            .run_system_once(dispose_scene)
            .expect("dispose runs");

        assert_eq!(scene.iter(app.world()).count(), 0);
        assert!(app.world().get_entity(unrelated).is_ok());
    }
}
