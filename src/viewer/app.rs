use crate::viewer::camera::{
    MouseCaptureState, OrbitCameraState, UiInteractionState, orbit_camera_system,
    sync_mouse_capture, update_camera_viewport,
};
use crate::viewer::content::{measure_content, spawn_content};
use crate::viewer::fitting::{fit_content_system, request_refit_on_resize};
use crate::viewer::scene::setup_viewer_scene;
use crate::viewer::settings::ViewerSettings;
use crate::viewer::state::FramingState;
use crate::viewer::ui::ui_system;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

pub fn run(settings: ViewerSettings) {
    let (r, g, b) = settings.clear_color;

    App::new()
        .insert_resource(OrbitCameraState::from_settings(&settings.camera))
        .insert_resource(ClearColor(Color::srgb(r, g, b)))
        .insert_resource(GlobalAmbientLight {
            color: Color::WHITE,
            brightness: settings.ambient_brightness,
            affects_lightmapped_meshes: true,
        })
        .insert_resource(settings)
        .insert_resource(FramingState::default())
        .insert_resource(UiInteractionState::default())
        .insert_resource(MouseCaptureState::default())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "framefit".to_string(),
                resolution: (1400, 900).into(),
                present_mode: PresentMode::AutoVsync,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_systems(Startup, (setup_viewer_scene, spawn_content))
        .add_systems(
            Update,
            (
                update_camera_viewport,
                request_refit_on_resize,
                measure_content,
                fit_content_system,
                orbit_camera_system,
            )
                .chain(),
        )
        .add_systems(Update, sync_mouse_capture)
        .add_systems(EguiPrimaryContextPass, ui_system)
        .run();
}
