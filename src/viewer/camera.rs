use crate::viewer::state::FramingState;
use crate::viewer::settings::{CameraSettings, ViewerSettings};
use bevy::camera::Viewport;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow, Window};
use std::f32::consts::FRAC_PI_2;

/// Keeps the camera from flipping over the pole.
const MIN_POLAR: f32 = 0.01;

#[derive(Component)]
pub struct ViewerCamera;

/// Orbit rig around `target`, Y up.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCameraState {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    /// Angle from the +Y axis; `FRAC_PI_2` is level with the target.
    pub polar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_polar: f32,
    pub auto_rotate_speed: f32,
}

impl Default for OrbitCameraState {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

impl OrbitCameraState {
    pub fn from_settings(camera: &CameraSettings) -> Self {
        // Values loaded from disk were already reported; this only keeps the
        // clamps below well defined.
        let mut camera = camera.clone();
        camera.sanitize();
        let mut state = Self {
            target: Vec3::ZERO,
            distance: camera.radius,
            yaw: camera.yaw,
            polar: camera.polar,
            min_distance: camera.min_radius,
            max_distance: camera.max_radius,
            max_polar: camera.max_polar.clamp(MIN_POLAR, FRAC_PI_2 * 2.0 - MIN_POLAR),
            auto_rotate_speed: camera.auto_rotate_speed,
        };
        state.polar = state.polar.clamp(MIN_POLAR, state.max_polar);
        state
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let offset = Vec3::new(
            self.yaw.cos() * sin_polar,
            cos_polar,
            self.yaw.sin() * sin_polar,
        );
        self.target + offset * self.distance
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_polar: f32) {
        self.yaw += delta_yaw;
        self.polar = (self.polar + delta_polar).clamp(MIN_POLAR, self.max_polar);
    }

    /// Exponential zoom, one step per scroll line.
    pub fn zoom(&mut self, scroll_lines: f32, step: f32) {
        let zoom_factor = (1.0 - scroll_lines * step).clamp(0.2, 5.0);
        self.set_distance(self.distance * zoom_factor);
    }

    /// Sets the radius, honouring the rig's limits.
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }
}

#[derive(Resource, Default)]
pub struct UiInteractionState {
    pub wants_pointer_input: bool,
    pub side_panel_width: f32,
}

#[derive(Resource, Default)]
pub struct MouseCaptureState {
    pub active: bool,
    pub restore_position: Option<Vec2>,
}

/// Keeps the 3D view to the right of the settings panel and asks for a refit
/// whenever the visible area changes shape.
pub fn update_camera_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    mut framing: ResMut<FramingState>,
    mut camera_query: Query<&mut Camera, With<ViewerCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let physical_width = window.physical_width();
    let physical_height = window.physical_height().max(1);
    if physical_width == 0 {
        return;
    }

    let panel_px = (ui_state.side_panel_width.max(0.0) * window.scale_factor() as f32) as u32;
    let viewport_x = panel_px.min(physical_width.saturating_sub(1));
    let viewport_width = physical_width.saturating_sub(viewport_x).max(1);
    let size = UVec2::new(viewport_width, physical_height);

    for mut camera in &mut camera_query {
        let unchanged = camera
            .viewport
            .as_ref()
            .is_some_and(|viewport| {
                viewport.physical_size == size && viewport.physical_position.x == viewport_x
            });
        if unchanged {
            continue;
        }
        camera.viewport = Some(Viewport {
            physical_position: UVec2::new(viewport_x, 0),
            physical_size: size,
            depth: 0.0..1.0,
        });
        framing.needs_fit = true;
    }
}

pub fn orbit_camera_system(
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    settings: Res<ViewerSettings>,
    mut orbit: ResMut<OrbitCameraState>,
    mut camera_query: Query<&mut Transform, With<ViewerCamera>>,
) {
    let mouse_delta = mouse_motion.delta;
    let scroll_delta = mouse_scroll.delta.y;

    let pointer_in_window = windows
        .single()
        .ok()
        .and_then(|w| w.cursor_position())
        .is_some();
    let can_capture_mouse = pointer_in_window && !ui_state.wants_pointer_input;
    let dragging = can_capture_mouse && mouse_buttons.pressed(MouseButton::Right);

    if dragging && mouse_delta.length_squared() > 0.0 {
        let sensitivity = settings.camera.orbit_sensitivity;
        orbit.rotate(mouse_delta.x * sensitivity, -mouse_delta.y * sensitivity);
    } else if !dragging && orbit.auto_rotate_speed != 0.0 {
        let step = orbit.auto_rotate_speed * time.delta_secs();
        orbit.rotate(step, 0.0);
    }

    if can_capture_mouse && scroll_delta.abs() > f32::EPSILON {
        orbit.zoom(scroll_delta, settings.camera.zoom_step);
    }

    let eye = orbit.eye();
    for mut transform in &mut camera_query {
        *transform = Transform::from_translation(eye).looking_at(orbit.target, Vec3::Y);
    }
}

pub fn sync_mouse_capture(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    ui_state: Res<UiInteractionState>,
    mut capture_state: ResMut<MouseCaptureState>,
    mut window_query: Query<(&mut Window, &mut CursorOptions), With<PrimaryWindow>>,
) {
    let Ok((mut window, mut cursor_options)) = window_query.single_mut() else {
        return;
    };

    let pointer_in_window = window.cursor_position().is_some();
    let should_capture = window.focused
        && mouse_buttons.pressed(MouseButton::Right)
        && pointer_in_window
        && !ui_state.wants_pointer_input;

    if should_capture {
        if !capture_state.active {
            capture_state.restore_position = window.cursor_position();
            capture_state.active = true;
        }
        cursor_options.visible = false;
        cursor_options.grab_mode = CursorGrabMode::Locked;
    } else {
        if capture_state.active {
            if let Some(pos) = capture_state.restore_position.take() {
                window.set_cursor_position(Some(pos));
            }
        }
        capture_state.active = false;
        cursor_options.visible = true;
        cursor_options.grab_mode = CursorGrabMode::None;
    }
}
