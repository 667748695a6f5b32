use crate::framing::FitError;
use bevy::prelude::Projection;
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionKind {
    /// Vertical field of view in radians.
    Perspective { vertical_fov: f32 },
    /// Visible height of the orthographic view volume, in world units.
    Orthographic { height: f32 },
}

/// Camera projection parameters the fitter needs, detached from any camera
/// component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjection {
    pub kind: ProjectionKind,
    /// Viewport width divided by height.
    pub aspect_ratio: f32,
}

impl CameraProjection {
    pub fn perspective(vertical_fov: f32, aspect_ratio: f32) -> Self {
        Self {
            kind: ProjectionKind::Perspective { vertical_fov },
            aspect_ratio,
        }
    }

    pub fn orthographic(height: f32, aspect_ratio: f32) -> Self {
        Self {
            kind: ProjectionKind::Orthographic { height },
            aspect_ratio,
        }
    }

    /// Reads field of view or orthographic extents from a Bevy projection.
    ///
    /// `aspect_ratio` is taken from the caller rather than the projection,
    /// because the projection's own copy is only refreshed after a resize has
    /// been processed by the camera systems.
    pub fn from_bevy(projection: &Projection, aspect_ratio: f32) -> Result<Self, FitError> {
        let converted = match projection {
            Projection::Perspective(perspective) => Self::perspective(perspective.fov, aspect_ratio),
            Projection::Orthographic(orthographic) => {
                Self::orthographic(orthographic.area.height(), aspect_ratio)
            }
            _ => {
                return Err(FitError::InvalidProjection(
                    "custom projections are not supported".to_string(),
                ));
            }
        };
        converted.validate()?;
        Ok(converted)
    }

    pub fn validate(&self) -> Result<(), FitError> {
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(FitError::InvalidProjection(format!(
                "aspect ratio must be > 0, got {}",
                self.aspect_ratio
            )));
        }

        match self.kind {
            ProjectionKind::Perspective { vertical_fov } => {
                if !(vertical_fov > 0.0 && vertical_fov < PI) {
                    return Err(FitError::InvalidProjection(format!(
                        "vertical field of view must be in (0, pi), got {vertical_fov}"
                    )));
                }
            }
            ProjectionKind::Orthographic { height } => {
                if !height.is_finite() || height <= 0.0 {
                    return Err(FitError::InvalidProjection(format!(
                        "orthographic height must be > 0, got {height}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Height of the visible slice of the frustum at `distance` from the eye.
    pub fn frustum_height_at(&self, distance: f32) -> f32 {
        match self.kind {
            ProjectionKind::Perspective { vertical_fov } => {
                2.0 * distance * (vertical_fov * 0.5).tan()
            }
            ProjectionKind::Orthographic { height } => height,
        }
    }

    pub fn frustum_width_at(&self, distance: f32) -> f32 {
        self.frustum_height_at(distance) * self.aspect_ratio
    }
}
