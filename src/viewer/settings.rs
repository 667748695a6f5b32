use crate::framing::FitConfig;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// What gets placed in front of the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentSource {
    /// Generated slab standing in for a text banner; the pivot sits at its
    /// lower-left corner, like glyph geometry does.
    Showcase { width: f32, height: f32, depth: f32 },
    /// glTF/GLB file loaded through the asset server.
    Model { path: String },
}

impl ContentSource {
    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model { .. })
    }

    pub fn label(&self) -> String {
        match self {
            Self::Showcase { .. } => "showcase banner".to_string(),
            Self::Model { path } => format!("model '{path}'"),
        }
    }
}

impl Default for ContentSource {
    fn default() -> Self {
        Self::Showcase {
            width: 10.0,
            height: 1.6,
            depth: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub yaw: f32,
    /// Angle between the up axis and the camera direction from the target.
    pub polar: f32,
    pub radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub max_polar: f32,
    /// Radians per second around the up axis; zero disables auto rotation.
    pub auto_rotate_speed: f32,
    pub orbit_sensitivity: f32,
    pub zoom_step: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.8,
            yaw: FRAC_PI_2,
            polar: PI / 2.8,
            radius: 30.0,
            min_radius: 2.0,
            max_radius: 500.0,
            max_polar: PI / 2.05,
            auto_rotate_speed: 0.0,
            orbit_sensitivity: 0.006,
            zoom_step: 0.10,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub fit: FitConfig,
    /// Uniform scale used when the content has nothing to measure.
    pub fallback_scale: f32,
    pub content: ContentSource,
    pub camera: CameraSettings,
    pub clear_color: (f32, f32, f32),
    pub ambient_brightness: f32,
    pub point_light_intensity: f32,
    /// Edge length of the inward-facing sky box, `None` for a flat clear colour.
    pub sky_box_size: Option<f32>,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            fit: FitConfig::default(),
            fallback_scale: 0.1,
            content: ContentSource::default(),
            camera: CameraSettings::default(),
            clear_color: (0.0, 0.0, 0.0),
            ambient_brightness: 600.0,
            point_light_intensity: 400_000.0,
            sky_box_size: None,
        }
    }
}

impl ViewerSettings {
    /// Switches to viewing a model file: slow turntable and a sky box.
    pub fn with_model(mut self, path: impl Into<String>) -> Self {
        self.content = ContentSource::Model { path: path.into() };
        if self.camera.auto_rotate_speed == 0.0 {
            self.camera.auto_rotate_speed = 0.5;
        }
        if self.sky_box_size.is_none() {
            self.sky_box_size = Some(1000.0);
        }
        self
    }

    /// Resets out-of-range values to their defaults and describes each reset.
    ///
    /// Runs before the app (and its log subscriber) exists, so the notes are
    /// handed back to the caller instead of being logged here.
    fn sanitize(&mut self) -> Vec<String> {
        let mut notes = Vec::new();
        if let Err(err) = self.fit.validate() {
            notes.push(format!("Ignoring fit settings: {err}"));
            self.fit = FitConfig::default();
        }
        if !(self.fallback_scale.is_finite() && self.fallback_scale > 0.0) {
            notes.push(format!(
                "Ignoring fallback_scale {}, must be > 0",
                self.fallback_scale
            ));
            self.fallback_scale = ViewerSettings::default().fallback_scale;
        }
        notes.extend(self.camera.sanitize());
        notes
    }
}

impl CameraSettings {
    pub fn sanitize(&mut self) -> Vec<String> {
        let defaults = CameraSettings::default();
        let mut notes = Vec::new();

        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            notes.push(format!(
                "Ignoring fov_degrees {}, must be in (0, 180)",
                self.fov_degrees
            ));
            self.fov_degrees = defaults.fov_degrees;
        }
        if !self.yaw.is_finite() {
            notes.push(format!("Ignoring yaw {}", self.yaw));
            self.yaw = defaults.yaw;
        }
        if !(self.max_polar > 0.0 && self.max_polar < PI) {
            notes.push(format!(
                "Ignoring max_polar {}, must be in (0, pi)",
                self.max_polar
            ));
            self.max_polar = defaults.max_polar;
        }
        if !(self.polar > 0.0 && self.polar < PI) {
            notes.push(format!("Ignoring polar {}, must be in (0, pi)", self.polar));
            self.polar = defaults.polar;
        }
        let limits_ok = self.min_radius > 0.0
            && self.max_radius.is_finite()
            && self.max_radius >= self.min_radius;
        if !limits_ok {
            notes.push(format!(
                "Ignoring camera radius limits {}..{}",
                self.min_radius, self.max_radius
            ));
            self.min_radius = defaults.min_radius;
            self.max_radius = defaults.max_radius;
        }
        if self.radius.is_nan() {
            notes.push("Ignoring radius NaN".to_string());
            self.radius = defaults.radius;
        }
        self.radius = self.radius.clamp(self.min_radius, self.max_radius);

        for (name, value, fallback) in [
            (
                "auto_rotate_speed",
                &mut self.auto_rotate_speed,
                defaults.auto_rotate_speed,
            ),
            (
                "orbit_sensitivity",
                &mut self.orbit_sensitivity,
                defaults.orbit_sensitivity,
            ),
            ("zoom_step", &mut self.zoom_step, defaults.zoom_step),
        ] {
            if !value.is_finite() {
                notes.push(format!("Ignoring {name} {value}"));
                *value = fallback;
            }
        }
        notes
    }
}

/// Settings read from disk plus a note for every value that had to be reset.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSettings {
    pub settings: ViewerSettings,
    pub warnings: Vec<String>,
}

pub fn load_settings(path: &Path) -> Result<LoadedSettings, SettingsError> {
    if !path.exists() {
        return Ok(LoadedSettings {
            settings: ViewerSettings::default(),
            warnings: Vec::new(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut settings = ron::from_str::<ViewerSettings>(&text).map_err(|source| {
        SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let warnings = settings.sanitize();
    Ok(LoadedSettings { settings, warnings })
}

/// Loads settings for startup, reporting problems on stderr.
pub fn load_settings_or_default(path: &Path) -> ViewerSettings {
    match load_settings(path) {
        Ok(LoadedSettings { settings, warnings }) => {
            for warning in warnings {
                eprintln!("{}: {warning}", path.display());
            }
            settings
        }
        Err(err) => {
            eprintln!("Falling back to built-in viewer settings: {err}");
            ViewerSettings::default()
        }
    }
}
