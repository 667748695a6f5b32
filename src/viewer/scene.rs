use crate::viewer::camera::{OrbitCameraState, ViewerCamera};
use crate::viewer::settings::ViewerSettings;
use crate::viewer::{EGUI_RENDER_LAYER, KEY_LIGHT_DIRECTION, POINT_LIGHT_POSITION};
use bevy::camera::ClearColorConfig;
use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;
use bevy_egui::PrimaryEguiContext;

#[derive(Component)]
pub struct SkyBox;

pub fn setup_viewer_scene(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    orbit: Res<OrbitCameraState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: settings.camera.fov_degrees.to_radians(),
            ..default()
        }),
        Transform::from_translation(orbit.eye()).looking_at(orbit.target, Vec3::Y),
        ViewerCamera,
    ));
    commands.spawn((
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        RenderLayers::layer(EGUI_RENDER_LAYER),
        PrimaryEguiContext,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 6_000.0,
            ..default()
        },
        Transform::from_translation(KEY_LIGHT_DIRECTION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            color: Color::WHITE,
            intensity: settings.point_light_intensity,
            range: 100.0,
            ..default()
        },
        Transform::from_translation(POINT_LIGHT_POSITION),
    ));

    if let Some(size) = settings.sky_box_size {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(size, size, size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.09, 0.09, 0.11),
                unlit: true,
                cull_mode: None,
                ..default()
            })),
            Transform::default(),
            SkyBox,
        ));
    }
}
