pub mod app;
pub mod camera;
pub mod content;
pub mod fitting;
pub mod scene;
pub mod settings;
pub mod state;
pub mod ui;

use bevy::math::Vec3;

pub const SETTINGS_PATH: &str = "config/framefit.ron";
pub const FALLBACK_SPHERE_DIAMETER: f32 = 2.0;
pub const FALLBACK_SPHERE_POSITION: Vec3 = Vec3::new(0.0, 1.0, 0.0);
/// Frames to wait for a loaded scene to produce bounds before giving up.
pub const MAX_SPAWN_WAIT_FRAMES: u32 = 120;
pub const KEY_LIGHT_DIRECTION: Vec3 = Vec3::new(0.5, 1.0, 0.25);
pub const POINT_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 10.0);
pub const EGUI_RENDER_LAYER: usize = 31;
