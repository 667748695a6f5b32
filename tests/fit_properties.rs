use approx::assert_relative_eq;
use bevy::prelude::Vec3;
use framefit::framing::{
    BoundingExtent, CameraPlacement, CameraProjection, FitError, compute_fit,
};
use proptest::prelude::*;

fn fov() -> impl Strategy<Value = f32> {
    0.1_f32..3.0
}

fn aspect() -> impl Strategy<Value = f32> {
    0.25_f32..4.0
}

fn fraction() -> impl Strategy<Value = f32> {
    0.05_f32..=1.0
}

fn dimension() -> impl Strategy<Value = f32> {
    0.01_f32..100.0
}

fn distance() -> impl Strategy<Value = f32> {
    0.5_f32..200.0
}

proptest! {
    #[test]
    fn scaled_width_matches_requested_share(
        fov in fov(),
        aspect in aspect(),
        fraction in fraction(),
        width in dimension(),
        height in dimension(),
        distance in distance(),
    ) {
        let projection = CameraProjection::perspective(fov, aspect);
        let fit = compute_fit(
            BoundingExtent::new(width, height),
            &projection,
            &CameraPlacement::orbit(distance, Vec3::ZERO),
            fraction,
        )
        .unwrap();

        let expected = projection.frustum_width_at(distance) * fraction;
        assert_relative_eq!(fit.scale * width, expected, max_relative = 1e-4);
    }

    #[test]
    fn scale_does_not_depend_on_height(
        fov in fov(),
        aspect in aspect(),
        width in dimension(),
        first_height in dimension(),
        second_height in dimension(),
        distance in distance(),
    ) {
        let projection = CameraProjection::perspective(fov, aspect);
        let placement = CameraPlacement::orbit(distance, Vec3::ZERO);
        let first = compute_fit(BoundingExtent::new(width, first_height), &projection, &placement, 0.8).unwrap();
        let second = compute_fit(BoundingExtent::new(width, second_height), &projection, &placement, 0.8).unwrap();
        prop_assert_eq!(first.scale, second.scale);
    }

    #[test]
    fn identical_inputs_give_identical_outputs(
        fov in fov(),
        aspect in aspect(),
        fraction in fraction(),
        width in dimension(),
        height in dimension(),
        distance in distance(),
    ) {
        let projection = CameraProjection::perspective(fov, aspect);
        let placement = CameraPlacement::orbit(distance, Vec3::new(1.0, -2.0, 3.0));
        let extent = BoundingExtent::new(width, height);
        let first = compute_fit(extent, &projection, &placement, fraction).unwrap();
        let second = compute_fit(extent, &projection, &placement, fraction).unwrap();
        prop_assert_eq!(first.scale.to_bits(), second.scale.to_bits());
        prop_assert_eq!(
            first.recommended_distance.map(f32::to_bits),
            second.recommended_distance.map(f32::to_bits)
        );
    }

    #[test]
    fn moving_away_grows_the_scale(
        fov in fov(),
        aspect in aspect(),
        width in dimension(),
        height in dimension(),
        near in distance(),
        extra in 0.5_f32..100.0,
    ) {
        let projection = CameraProjection::perspective(fov, aspect);
        let extent = BoundingExtent::new(width, height);
        let close = compute_fit(extent, &projection, &CameraPlacement::orbit(near, Vec3::ZERO), 0.8).unwrap();
        let far = compute_fit(extent, &projection, &CameraPlacement::orbit(near + extra, Vec3::ZERO), 0.8).unwrap();
        prop_assert!(far.scale > close.scale);
    }

    #[test]
    fn orthographic_scale_ignores_distance(
        height in 0.5_f32..50.0,
        aspect in aspect(),
        width in dimension(),
        first in distance(),
        second in distance(),
    ) {
        let projection = CameraProjection::orthographic(height, aspect);
        let extent = BoundingExtent::new(width, 1.0);
        let near = compute_fit(extent, &projection, &CameraPlacement::free(Vec3::new(0.0, 0.0, first), Vec3::ZERO), 0.8).unwrap();
        let far = compute_fit(extent, &projection, &CameraPlacement::free(Vec3::new(0.0, 0.0, second), Vec3::ZERO), 0.8).unwrap();
        prop_assert_eq!(near.scale, far.scale);
    }

    #[test]
    fn recommended_orbit_contains_scaled_content(
        fov in fov(),
        aspect in aspect(),
        fraction in fraction(),
        width in dimension(),
        height in dimension(),
        distance in distance(),
    ) {
        let projection = CameraProjection::perspective(fov, aspect);
        let fit = compute_fit(
            BoundingExtent::new(width, height),
            &projection,
            &CameraPlacement::orbit(distance, Vec3::ZERO),
            fraction,
        )
        .unwrap();

        let radius = fit.recommended_distance.unwrap();
        let visible_height = projection.frustum_height_at(radius);
        let visible_width = projection.frustum_width_at(radius);
        prop_assert!(visible_height >= height * fit.scale);
        prop_assert!(visible_width >= width * fit.scale);
    }

    #[test]
    fn zero_width_or_height_never_yields_a_scale(
        fov in fov(),
        aspect in aspect(),
        size in dimension(),
        zero_width in any::<bool>(),
    ) {
        let extent = if zero_width {
            BoundingExtent::new(0.0, size)
        } else {
            BoundingExtent::new(size, 0.0)
        };
        let result = compute_fit(
            extent,
            &CameraProjection::perspective(fov, aspect),
            &CameraPlacement::orbit(10.0, Vec3::ZERO),
            0.8,
        );
        let is_degenerate = matches!(result, Err(FitError::DegenerateGeometry { .. }));
        prop_assert!(is_degenerate);
    }

    #[test]
    fn any_accepted_fit_is_finite_and_positive(
        width in any::<f32>(),
        height in any::<f32>(),
        distance in any::<f32>(),
        fov in any::<f32>(),
        aspect in any::<f32>(),
    ) {
        let result = compute_fit(
            BoundingExtent::new(width, height),
            &CameraProjection::perspective(fov, aspect),
            &CameraPlacement::orbit(distance, Vec3::ZERO),
            0.8,
        );
        if let Ok(fit) = result {
            prop_assert!(fit.scale.is_finite() && fit.scale > 0.0);
            let radius = fit.recommended_distance.unwrap();
            prop_assert!(radius.is_finite() && radius > 0.0);
        }
    }
}

#[test]
fn fitter_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<framefit::framing::FrameFitter>();
    assert_send_sync::<framefit::framing::FitResult>();
    assert_send_sync::<FitError>();
}
