//! Frame fitting: uniform scale and orbit radius that make an object fill a
//! chosen share of the camera's view.
//!
//! Everything here is a pure function of its inputs. Applying the result to
//! transforms and cameras is up to the caller.

mod error;
mod extent;
mod placement;
mod projection;

pub use error::FitError;
pub use extent::BoundingExtent;
pub use placement::CameraPlacement;
pub use projection::{CameraProjection, ProjectionKind};

use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_FRACTION: f32 = 0.8;
pub const DEFAULT_SAFETY_MARGIN: f32 = 1.25;

/// Tunables for [`FrameFitter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Share of the visible frustum width the object should cover.
    pub target_fraction: f32,
    /// Multiplier on the tightest orbit radius, keeps corners off the frustum
    /// edge.
    pub safety_margin: f32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            target_fraction: DEFAULT_TARGET_FRACTION,
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<(), FitError> {
        let fraction = self.target_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(FitError::InvalidTargetFraction(fraction));
        }
        if !self.safety_margin.is_finite() || self.safety_margin < 1.0 {
            return Err(FitError::InvalidSafetyMargin(self.safety_margin));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    /// Uniform scale for all three axes.
    pub scale: f32,
    /// New orbit radius; only set for perspective orbit cameras.
    pub recommended_distance: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameFitter {
    pub config: FitConfig,
}

impl FrameFitter {
    pub fn new(config: FitConfig) -> Self {
        Self { config }
    }

    pub fn compute_fit(
        &self,
        extent: BoundingExtent,
        projection: &CameraProjection,
        placement: &CameraPlacement,
    ) -> Result<FitResult, FitError> {
        self.config.validate()?;
        projection.validate()?;
        placement.validate()?;

        if extent.is_degenerate() {
            return Err(FitError::DegenerateGeometry {
                width: extent.width,
                height: extent.height,
            });
        }

        let distance = placement.distance_to_object();
        let frustum_width = projection.frustum_width_at(distance);
        if !(frustum_width > 0.0) {
            return Err(FitError::InvalidPlacement(format!(
                "camera is {distance} units from the object, nothing is visible"
            )));
        }

        let desired_world_width = frustum_width * self.config.target_fraction;
        let scale = desired_world_width / extent.width;

        let recommended_distance = match (projection.kind, placement) {
            (ProjectionKind::Perspective { vertical_fov }, CameraPlacement::Orbit { .. }) => {
                Some(self.orbit_distance(extent.scaled(scale), vertical_fov, projection.aspect_ratio))
            }
            _ => None,
        };

        let representable = |value: f32| value.is_finite() && value > 0.0;
        if !representable(scale) || !recommended_distance.is_none_or(representable) {
            return Err(FitError::OutOfRange(format!(
                "scale {scale} / orbit radius {recommended_distance:?} for a {} x {} object {distance} units away",
                extent.width, extent.height
            )));
        }

        Ok(FitResult {
            scale,
            recommended_distance,
        })
    }

    fn orbit_distance(&self, scaled: BoundingExtent, vertical_fov: f32, aspect_ratio: f32) -> f32 {
        let half_fov_tan = (vertical_fov * 0.5).tan();
        let radius_for_height = (scaled.height * 0.5) / half_fov_tan;
        let radius_for_width = (scaled.width * 0.5 / aspect_ratio) / half_fov_tan;
        radius_for_height.max(radius_for_width) * self.config.safety_margin
    }
}

/// [`FrameFitter::compute_fit`] with the default safety margin.
pub fn compute_fit(
    extent: BoundingExtent,
    projection: &CameraProjection,
    placement: &CameraPlacement,
    target_fraction: f32,
) -> Result<FitResult, FitError> {
    FrameFitter::new(FitConfig {
        target_fraction,
        ..FitConfig::default()
    })
    .compute_fit(extent, projection, placement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bevy::prelude::Vec3;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_2;

    fn wide_perspective() -> CameraProjection {
        CameraProjection::perspective(FRAC_PI_2, 1.5)
    }

    #[test]
    fn right_angle_orbit_scenario() {
        let fit = compute_fit(
            BoundingExtent::new(5.0, 2.0),
            &wide_perspective(),
            &CameraPlacement::orbit(10.0, Vec3::ZERO),
            0.8,
        )
        .unwrap();

        assert_relative_eq!(fit.scale, 4.8, epsilon = 1e-4);
        assert_relative_eq!(fit.recommended_distance.unwrap(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn tall_content_is_bound_by_height() {
        // 1 x 4 object: after scaling, height drives the radius.
        let fit = compute_fit(
            BoundingExtent::new(1.0, 4.0),
            &wide_perspective(),
            &CameraPlacement::orbit(10.0, Vec3::ZERO),
            0.8,
        )
        .unwrap();

        let scaled_height = 4.0 * fit.scale;
        let expected = (scaled_height * 0.5) / (FRAC_PI_2 * 0.5).tan() * DEFAULT_SAFETY_MARGIN;
        assert_relative_eq!(fit.recommended_distance.unwrap(), expected, epsilon = 1e-3);
    }

    #[test]
    fn free_camera_uses_eye_to_anchor_distance() {
        let fit = compute_fit(
            BoundingExtent::new(5.0, 2.0),
            &wide_perspective(),
            &CameraPlacement::free(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO),
            0.8,
        )
        .unwrap();

        assert_relative_eq!(fit.scale, 4.8, epsilon = 1e-4);
        assert_eq!(fit.recommended_distance, None);
    }

    #[test]
    fn orthographic_orbit_keeps_radius() {
        let fit = compute_fit(
            BoundingExtent::new(4.0, 1.0),
            &CameraProjection::orthographic(10.0, 2.0),
            &CameraPlacement::orbit(7.0, Vec3::ZERO),
            0.5,
        )
        .unwrap();

        assert_relative_eq!(fit.scale, 2.5, epsilon = 1e-6);
        assert_eq!(fit.recommended_distance, None);
    }

    #[rstest]
    #[case(BoundingExtent::new(0.0, 2.0))]
    #[case(BoundingExtent::new(5.0, 0.0))]
    #[case(BoundingExtent::default())]
    fn empty_content_is_degenerate(#[case] extent: BoundingExtent) {
        let err = compute_fit(
            extent,
            &wide_perspective(),
            &CameraPlacement::orbit(10.0, Vec3::ZERO),
            0.8,
        )
        .unwrap_err();
        assert!(err.is_degenerate_geometry());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.5)]
    #[case(1.01)]
    #[case(f32::NAN)]
    fn fraction_outside_unit_interval_is_rejected(#[case] fraction: f32) {
        let err = compute_fit(
            BoundingExtent::new(1.0, 1.0),
            &wide_perspective(),
            &CameraPlacement::orbit(10.0, Vec3::ZERO),
            fraction,
        )
        .unwrap_err();
        assert!(matches!(err, FitError::InvalidTargetFraction(_)));
    }

    #[test]
    fn full_fraction_is_allowed() {
        assert!(
            compute_fit(
                BoundingExtent::new(1.0, 1.0),
                &wide_perspective(),
                &CameraPlacement::orbit(10.0, Vec3::ZERO),
                1.0,
            )
            .is_ok()
        );
    }

    #[test]
    fn margin_below_one_is_rejected() {
        let fitter = FrameFitter::new(FitConfig {
            safety_margin: 0.9,
            ..FitConfig::default()
        });
        let err = fitter
            .compute_fit(
                BoundingExtent::new(1.0, 1.0),
                &wide_perspective(),
                &CameraPlacement::orbit(10.0, Vec3::ZERO),
            )
            .unwrap_err();
        assert_eq!(err, FitError::InvalidSafetyMargin(0.9));
    }

    #[test]
    fn custom_margin_scales_radius() {
        let extent = BoundingExtent::new(5.0, 2.0);
        let placement = CameraPlacement::orbit(10.0, Vec3::ZERO);
        let tight = FrameFitter::new(FitConfig {
            safety_margin: 1.0,
            ..FitConfig::default()
        })
        .compute_fit(extent, &wide_perspective(), &placement)
        .unwrap();

        assert_relative_eq!(tight.recommended_distance.unwrap(), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn invalid_projection_is_reported_before_geometry() {
        let err = compute_fit(
            BoundingExtent::default(),
            &CameraProjection::perspective(FRAC_PI_2, 0.0),
            &CameraPlacement::orbit(10.0, Vec3::ZERO),
            0.8,
        )
        .unwrap_err();
        assert!(matches!(err, FitError::InvalidProjection(_)));
    }

    #[test]
    fn eye_on_anchor_is_rejected_for_perspective() {
        let err = compute_fit(
            BoundingExtent::new(1.0, 1.0),
            &wide_perspective(),
            &CameraPlacement::free(Vec3::ONE, Vec3::ONE),
            0.8,
        )
        .unwrap_err();
        assert!(matches!(err, FitError::InvalidPlacement(_)));
    }

    #[test]
    fn eye_on_anchor_is_fine_for_orthographic() {
        let fit = compute_fit(
            BoundingExtent::new(2.0, 1.0),
            &CameraProjection::orthographic(4.0, 1.0),
            &CameraPlacement::free(Vec3::ONE, Vec3::ONE),
            1.0,
        )
        .unwrap();
        assert_eq!(fit.scale, 2.0);
    }

    #[rstest]
    #[case(BoundingExtent::new(f32::INFINITY, 2.0))]
    #[case(BoundingExtent::new(5.0, f32::INFINITY))]
    #[case(BoundingExtent::new(f32::NEG_INFINITY, 2.0))]
    fn infinite_extent_is_degenerate(#[case] extent: BoundingExtent) {
        let err = compute_fit(
            extent,
            &wide_perspective(),
            &CameraPlacement::orbit(10.0, Vec3::ZERO),
            0.8,
        )
        .unwrap_err();
        assert!(err.is_degenerate_geometry());
    }

    #[rstest]
    #[case(BoundingExtent::new(5.0, 2.0), 1.0e38, 3.0)]
    #[case(BoundingExtent::new(1.0e-30, 2.0), 1.0e30, FRAC_PI_2)]
    #[case(BoundingExtent::new(1.0e30, 1.0e30), 1.0e-30, 0.001)]
    fn overflowing_results_are_rejected(
        #[case] extent: BoundingExtent,
        #[case] distance: f32,
        #[case] fov: f32,
    ) {
        let err = compute_fit(
            extent,
            &CameraProjection::perspective(fov, 1.5),
            &CameraPlacement::orbit(distance, Vec3::ZERO),
            0.8,
        )
        .unwrap_err();
        assert!(matches!(err, FitError::OutOfRange(_)), "{err:?}");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: FitConfig = ron::from_str("(target_fraction: 0.6)").unwrap();
        assert_eq!(config.target_fraction, 0.6);
        assert_eq!(config.safety_margin, DEFAULT_SAFETY_MARGIN);
    }
}
