use crate::framing::{
    CameraPlacement, CameraProjection, FitError, FitResult, FrameFitter,
};
use crate::viewer::camera::{OrbitCameraState, ViewerCamera};
use crate::viewer::content::{FramedContent, spawn_fallback_placeholder};
use crate::viewer::settings::ViewerSettings;
use crate::viewer::state::{FramingState, LocalBounds};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use tracing::{debug, warn};

/// What the viewer should do with the content and camera after a fit.
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    /// Content rescaled and re-centred on the origin.
    Framed {
        fit: FitResult,
        translation: Vec3,
        orbit_target: Vec3,
    },
    /// Content left as is, camera pointed at it.
    Targeted {
        orbit_target: Vec3,
        orbit_distance: Option<f32>,
    },
    /// Nothing to measure: fallback scale at the origin plus a placeholder.
    Fallback { scale: f32, reason: String },
    /// Camera parameters unusable this time round; keep the previous framing.
    Skipped(FitError),
}

/// Decides how to frame the content. Pure so it can be exercised without an
/// app.
///
/// `rescale_content` selects between scaling the content to the view
/// (showcase) and moving the camera to the content (model viewing).
pub fn plan_fit(
    fitter: &FrameFitter,
    bounds: Option<&LocalBounds>,
    content_transform: &Transform,
    projection: &CameraProjection,
    placement: &CameraPlacement,
    rescale_content: bool,
    fallback_scale: f32,
) -> FitOutcome {
    let Some(bounds) = bounds.filter(|bounds| !bounds.is_empty()) else {
        return FitOutcome::Fallback {
            scale: fallback_scale,
            reason: "content has no geometry".to_string(),
        };
    };

    match fitter.compute_fit(bounds.extent(), projection, placement) {
        Ok(fit) if rescale_content => FitOutcome::Framed {
            fit,
            translation: -bounds.center() * fit.scale,
            orbit_target: Vec3::ZERO,
        },
        // Scaling the content by `s` is equivalent to shrinking the orbit by `1/s`.
        Ok(fit) => FitOutcome::Targeted {
            orbit_target: content_transform.transform_point(bounds.center()),
            orbit_distance: fit.recommended_distance.map(|radius| radius / fit.scale),
        },
        Err(err) if err.is_degenerate_geometry() => FitOutcome::Fallback {
            scale: fallback_scale,
            reason: err.to_string(),
        },
        Err(err) => FitOutcome::Skipped(err),
    }
}

pub fn request_refit_on_resize(
    mut resized: MessageReader<WindowResized>,
    mut state: ResMut<FramingState>,
) {
    if resized.read().count() > 0 {
        state.needs_fit = true;
    }
}

/// Applies a fresh fit whenever the content became ready or the view changed
/// shape.
pub fn fit_content_system(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    mut state: ResMut<FramingState>,
    mut orbit: ResMut<OrbitCameraState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &Projection), With<ViewerCamera>>,
    mut content: Query<&mut Transform, With<FramedContent>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !state.needs_fit || state.is_pending() {
        return;
    }
    let Some(root) = state.root else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, projection)) = cameras.single() else {
        return;
    };

    let view_size = camera
        .viewport
        .as_ref()
        .map(|viewport| viewport.physical_size)
        .unwrap_or_else(|| UVec2::new(window.physical_width(), window.physical_height()));
    if view_size.x == 0 || view_size.y == 0 {
        // Minimised; try again once there is something to look at.
        return;
    }
    let aspect_ratio = view_size.x as f32 / view_size.y as f32;

    state.needs_fit = false;

    let projection = match CameraProjection::from_bevy(projection, aspect_ratio) {
        Ok(projection) => projection,
        Err(err) => {
            warn!("Skipping fit: {err}");
            state.status = format!("Fit skipped: {err}");
            return;
        }
    };

    let Ok(mut transform) = content.get_mut(root) else {
        return;
    };

    let fitter = FrameFitter::new(settings.fit);
    let placement = CameraPlacement::orbit(orbit.distance, orbit.target);
    let outcome = plan_fit(
        &fitter,
        state.bounds(),
        &transform,
        &projection,
        &placement,
        !settings.content.is_model(),
        settings.fallback_scale,
    );

    match outcome {
        FitOutcome::Framed {
            fit,
            translation,
            orbit_target,
        } => {
            transform.scale = Vec3::splat(fit.scale);
            transform.translation = translation;
            orbit.target = orbit_target;
            if let Some(distance) = fit.recommended_distance {
                orbit.set_distance(distance);
            }
            debug!(
                "Framed content: scale {:.4}, orbit radius {:.3}",
                fit.scale, orbit.distance
            );
            state.last_fit = Some(fit);
            state.status = format!("Framed at scale {:.3}", fit.scale);
        }
        FitOutcome::Targeted {
            orbit_target,
            orbit_distance,
        } => {
            orbit.target = orbit_target;
            if let Some(distance) = orbit_distance {
                orbit.set_distance(distance);
            }
            debug!("Camera targeted at {orbit_target:?}, radius {:.3}", orbit.distance);
            state.status = "Camera centred on model".to_string();
        }
        FitOutcome::Fallback { scale, reason } => {
            warn!("Cannot frame content ({reason}), using scale {scale} at the origin");
            transform.scale = Vec3::splat(scale);
            transform.translation = Vec3::ZERO;
            state.last_fit = None;
            state.status = format!("Fallback: {reason}");
            spawn_fallback_placeholder(&mut commands, &mut meshes, &mut materials, &mut state);
        }
        FitOutcome::Skipped(err) => {
            warn!("Skipping fit: {err}");
            state.status = format!("Fit skipped: {err}");
        }
    }
}
