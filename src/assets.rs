//! Meshes, materials, and environment maps shared by every ornament.
//!
//! [`SceneAssets`] is built once at startup by [`load_scene_assets`] and handed
//! to the systems that need it as a resource.  Loads run asynchronously; the
//! simulation never waits on them.  [`watch_asset_loads_system`] reports a
//! failed load once and, for the cap mesh, swaps in a procedural stand-in so
//! ornaments still read as baubles.

use crate::config::{parse_color, SceneConfig};
use crate::constants::SPHERE_SEGMENTS;
use crate::error::{SceneError, SceneResult};
use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

/// Marker for the cap mesh child of an ornament.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapMesh;

/// Progress of an asynchronous load as seen by the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetStatus {
    #[default]
    Pending,
    Ready,
    /// Load failed and the failure has been reported.
    Failed,
}

/// Explicitly owned scene resources.
#[derive(Resource, Debug, Clone)]
pub struct SceneAssets {
    pub sphere: Handle<Mesh>,
    pub cap: Handle<Mesh>,
    pub body_material: Handle<StandardMaterial>,
    pub cap_material: Handle<StandardMaterial>,
    pub environment_diffuse: Handle<Image>,
    pub environment_specular: Handle<Image>,
    pub cap_status: AssetStatus,
    pub environment_status: AssetStatus,
}

/// Lambert-like body material and metallic cap material.
pub fn scene_materials(config: &SceneConfig) -> SceneResult<(StandardMaterial, StandardMaterial)> {
    let body = StandardMaterial {
        base_color: parse_color("body_base_color", &config.body_base_color)?,
        emissive: parse_color("body_emissive_color", &config.body_emissive_color)?.to_linear(),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        reflectance: 0.0,
        ..default()
    };
    let cap = StandardMaterial {
        base_color: parse_color("cap_base_color", &config.cap_base_color)?,
        emissive: parse_color("cap_emissive_color", &config.cap_emissive_color)?.to_linear(),
        perceptual_roughness: config.cap_roughness,
        metallic: config.cap_metallic,
        ..default()
    };
    Ok((body, cap))
}

/// Startup system: create the shared meshes and materials and start loading
/// the cap mesh and environment maps.
pub fn load_scene_assets(
    mut commands: Commands,
    config: Res<SceneConfig>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let (body, cap) = scene_materials(&config).unwrap_or_else(|e| {
        error!("{e}; using default materials");
        (StandardMaterial::default(), StandardMaterial::default())
    });

    commands.insert_resource(SceneAssets {
        sphere: meshes.add(Sphere::new(1.0).mesh().uv(SPHERE_SEGMENTS, SPHERE_SEGMENTS)),
        cap: asset_server.load(config.cap_mesh_path.clone()),
        body_material: materials.add(body),
        cap_material: materials.add(cap),
        environment_diffuse: asset_server.load(config.environment_diffuse_path.clone()),
        environment_specular: asset_server.load(config.environment_specular_path.clone()),
        cap_status: AssetStatus::Pending,
        environment_status: AssetStatus::Pending,
    });
    info!("Loading cap mesh from {}", config.cap_mesh_path);
}

/// Report load failures once; replace a failed cap mesh with [`cap_fallback_mesh`].
pub fn watch_asset_loads_system(
    asset_server: Res<AssetServer>,
    config: Res<SceneConfig>,
    mut assets: ResMut<SceneAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut caps: Query<&mut Mesh3d, With<CapMesh>>,
) {
    if assets.cap_status == AssetStatus::Pending {
        match asset_server.get_load_state(assets.cap.id()) {
            Some(LoadState::Loaded) => assets.cap_status = AssetStatus::Ready,
            Some(LoadState::Failed(err)) => {
                let e = SceneError::AssetLoad {
                    path: config.cap_mesh_path.clone(),
                    reason: err.to_string(),
                };
                error!("{e}; using procedural cap");
                let fallback = meshes.add(cap_fallback_mesh(0.14, 1.12, 1.24, 16));
                for mut mesh in caps.iter_mut() {
                    mesh.0 = fallback.clone();
                }
                assets.cap = fallback;
                assets.cap_status = AssetStatus::Failed;
            }
            _ => {}
        }
    }

    if assets.environment_status == AssetStatus::Pending {
        let diffuse = asset_server.get_load_state(assets.environment_diffuse.id());
        let specular = asset_server.get_load_state(assets.environment_specular.id());
        match (diffuse, specular) {
            (Some(LoadState::Failed(err)), _) | (_, Some(LoadState::Failed(err))) => {
                let e = SceneError::AssetLoad {
                    path: format!(
                        "{} / {}",
                        config.environment_diffuse_path, config.environment_specular_path
                    ),
                    reason: err.to_string(),
                };
                error!("{e}; caps will render without reflections");
                assets.environment_status = AssetStatus::Failed;
            }
            (Some(LoadState::Loaded), Some(LoadState::Loaded)) => {
                assets.environment_status = AssetStatus::Ready;
            }
            _ => {}
        }
    }
}

/// Closed cylinder along local +Z from `z_min` to `z_max`.
///
/// Stand-in for the glTF cap: with the cap node's offset and scale it lands
/// over the ornament's cap collider box.
pub fn cap_fallback_mesh(radius: f32, z_min: f32, z_max: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(3 * n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(3 * n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(3 * n + 1);

    // Side wall: bottom ring then top ring, radial normals.
    for z in [z_min, z_max] {
        for i in 0..n {
            let angle = std::f32::consts::TAU * i as f32 / n as f32;
            let (sin, cos) = angle.sin_cos();
            positions.push([radius * cos, radius * sin, z]);
            normals.push([cos, sin, 0.0]);
            uvs.push([i as f32 / n as f32, if z == z_min { 0.0 } else { 1.0 }]);
        }
    }

    // Top disc: centre then rim, facing +Z.
    let top_centre = positions.len() as u32;
    positions.push([0.0, 0.0, z_max]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);
    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let (sin, cos) = angle.sin_cos();
        positions.push([radius * cos, radius * sin, z_max]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([0.5 + 0.5 * cos, 0.5 + 0.5 * sin]);
    }

    let n32 = n as u32;
    let mut indices: Vec<u32> = Vec::with_capacity(n * 9);
    for i in 0..n32 {
        let next = (i + 1) % n32;
        let (b0, b1) = (i, next);
        let (t0, t1) = (i + n32, next + n32);
        indices.extend_from_slice(&[b0, b1, t1, b0, t1, t0]);
        indices.extend_from_slice(&[top_centre, top_centre + 1 + i, top_centre + 1 + next]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_materials_parse() {
        let (body, cap) = scene_materials(&SceneConfig::default()).expect("defaults parse");
        assert_eq!(body.metallic, 0.0);
        assert_eq!(body.perceptual_roughness, 1.0);
        assert_eq!(cap.metallic, 0.9);
        assert_eq!(cap.perceptual_roughness, 0.1);
        assert_eq!(body.emissive, LinearRgba::RED);
    }

    #[test]
    fn bad_emissive_colour_is_reported() {
        let config = SceneConfig {
            body_emissive_color: "#zz0000".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            scene_materials(&config),
            Err(SceneError::InvalidColor {
                name: "body_emissive_color",
                ..
            })
        ));
    }

    #[test]
    fn fallback_cap_has_wall_and_lid() {
        let mesh = cap_fallback_mesh(0.14, 1.12, 1.24, 16);
        // Two wall rings + lid centre + lid rim.
        assert_eq!(mesh.count_vertices(), 16 * 3 + 1);
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        // Two wall triangles and one lid triangle per side.
        assert_eq!(indices.len(), 16 * 9);
        assert!(indices.iter().all(|&i| (i as usize) < mesh.count_vertices()));
    }

    #[test]
    fn fallback_cap_lies_between_bounds() {
        let mesh = cap_fallback_mesh(0.2, 1.0, 1.5, 8);
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
            .expect("positions are float3");
        for p in positions {
            assert!(p[2] >= 1.0 && p[2] <= 1.5, "{p:?}");
            assert!((p[0] * p[0] + p[1] * p[1]).sqrt() <= 0.2 + 1e-5, "{p:?}");
        }
    }
}
