use crate::framing::FitError;
use bevy::prelude::Vec3;

/// Where the camera sits relative to the object being framed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraPlacement {
    /// Camera rotating around `target` at `distance`.
    Orbit { distance: f32, target: Vec3 },
    /// Camera at `eye`, looking at an object anchored at `anchor` in world
    /// space.
    FreePosition { eye: Vec3, anchor: Vec3 },
}

impl CameraPlacement {
    pub fn orbit(distance: f32, target: Vec3) -> Self {
        Self::Orbit { distance, target }
    }

    pub fn free(eye: Vec3, anchor: Vec3) -> Self {
        Self::FreePosition { eye, anchor }
    }

    pub fn is_orbit(&self) -> bool {
        matches!(self, Self::Orbit { .. })
    }

    /// Distance from the camera to the framed object along the view axis.
    pub fn distance_to_object(&self) -> f32 {
        match *self {
            Self::Orbit { distance, .. } => distance,
            Self::FreePosition { eye, anchor } => eye.distance(anchor),
        }
    }

    pub fn validate(&self) -> Result<(), FitError> {
        match *self {
            Self::Orbit { distance, .. } => {
                if !distance.is_finite() || distance <= 0.0 {
                    return Err(FitError::InvalidPlacement(format!(
                        "orbit distance must be > 0, got {distance}"
                    )));
                }
            }
            Self::FreePosition { eye, anchor } => {
                if !eye.is_finite() || !anchor.is_finite() {
                    return Err(FitError::InvalidPlacement(
                        "eye and anchor must be finite".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
