use crate::viewer::camera::{OrbitCameraState, UiInteractionState};
use crate::viewer::settings::ViewerSettings;
use crate::viewer::state::{ContentPhase, FramingState};
use bevy::prelude::ResMut;
use bevy_egui::{EguiContexts, egui};

pub fn ui_system(
    mut contexts: EguiContexts,
    mut settings: ResMut<ViewerSettings>,
    mut state: ResMut<FramingState>,
    mut ui_state: ResMut<UiInteractionState>,
    mut orbit: ResMut<OrbitCameraState>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let side_panel_response = egui::SidePanel::left("framefit_controls")
        .resizable(true)
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.heading("Framing");
            ui.label(format!("Status: {}", state.status));
            ui.small(settings.content.label());

            ui.separator();
            match &state.phase {
                ContentPhase::Pending { frames_waited } => {
                    ui.label(format!("Waiting for content ({frames_waited} frames)"));
                }
                ContentPhase::Measured(bounds) => {
                    let extent = bounds.extent();
                    ui.label(format!(
                        "Local extent: {:.3} x {:.3}",
                        extent.width, extent.height
                    ));
                }
                ContentPhase::Missing => {
                    ui.label("No content to measure");
                }
            }
            if let Some(fit) = state.last_fit {
                ui.label(format!("Scale: {:.4}", fit.scale));
                if let Some(distance) = fit.recommended_distance {
                    ui.label(format!("Recommended radius: {distance:.3}"));
                }
            }
            ui.label(format!("Orbit radius: {:.3}", orbit.distance));

            ui.separator();
            let mut refit = false;
            refit |= ui
                .add(
                    egui::Slider::new(&mut settings.fit.target_fraction, 0.05..=1.0)
                        .text("Fill fraction"),
                )
                .changed();
            refit |= ui
                .add(
                    egui::Slider::new(&mut settings.fit.safety_margin, 1.0..=3.0)
                        .text("Safety margin"),
                )
                .changed();
            ui.add(
                egui::Slider::new(&mut orbit.auto_rotate_speed, -2.0..=2.0)
                    .text("Auto rotate (rad/s)"),
            );

            ui.horizontal(|ui| {
                if ui.button("Refit").clicked() {
                    refit = true;
                }
                if ui.button("Reset Camera").clicked() {
                    *orbit = OrbitCameraState::from_settings(&settings.camera);
                    refit = true;
                }
            });

            if refit {
                state.needs_fit = true;
            }

            ui.separator();
            ui.small("Viewport controls: RMB orbit, wheel zoom.");
        });

    ui_state.wants_pointer_input = ctx.wants_pointer_input();
    ui_state.side_panel_width = side_panel_response.response.rect.width();
}
