//! Control panel for the live particle configuration.
//!
//! Only built with the `egui` feature. The panel edits a [`ParticleConfig`]
//! in place; the frame loop saves it once it differs from what is on disk.

use crate::config::{
    format_hex_color, ParticleConfig, DISPERSION_RANGE, NOISE_RANGE, SIZE_RANGE, SIZE_STEP, SPEED_RANGE,
};

/// Read-only figures shown under the sliders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelStats {
    pub points: u32,
    pub fps: f32,
}

/// Draw the panel.
pub fn control_panel(ctx: &egui::Context, config: &mut ParticleConfig, stats: PanelStats) {
    egui::Window::new("Controls")
        .anchor(egui::Align2::RIGHT_CENTER, [-24.0, 0.0])
        .default_width(240.0)
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            ui.add(
                egui::Slider::new(&mut config.dispersion, DISPERSION_RANGE)
                    .step_by(0.01)
                    .custom_formatter(|v, _| format!("{:.0}%", v * 100.0))
                    .text("Dispersion"),
            );
            ui.add(
                egui::Slider::new(&mut config.noise_strength, NOISE_RANGE)
                    .step_by(0.1)
                    .custom_formatter(|v, _| format!("{:.0}", v * 10.0))
                    .text("Chaos"),
            );
            ui.add(
                egui::Slider::new(&mut config.speed, SPEED_RANGE)
                    .step_by(0.1)
                    .custom_formatter(|v, _| format!("{v:.1}x"))
                    .text("Flow speed"),
            );
            ui.add(
                egui::Slider::new(&mut config.size, SIZE_RANGE)
                    .step_by(SIZE_STEP as f64)
                    .text("Particle size"),
            );

            ui.horizontal(|ui| {
                let mut rgb = tint_bytes(config);
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    config.color_hex = format_hex_color(rgb);
                }
                ui.label("Tint");
            });

            ui.separator();
            ui.label(format!("{} points", stats.points));
            ui.label(format!("{:.0} fps", stats.fps));

            if ui.button("Reset").clicked() {
                *config = ParticleConfig::default();
            }
        });
}

fn tint_bytes(config: &ParticleConfig) -> [u8; 3] {
    let tint = config.tint() * 255.0;
    [tint.x.round() as u8, tint.y.round() as u8, tint.z.round() as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_bytes_round_trip() {
        let config = ParticleConfig {
            color_hex: "#80ff10".to_string(),
            ..Default::default()
        };
        assert_eq!(tint_bytes(&config), [0x80, 0xff, 0x10]);
        assert_eq!(format_hex_color(tint_bytes(&config)), "#80ff10");
    }

    #[test]
    fn test_panel_runs_headless() {
        let ctx = egui::Context::default();
        let mut config = ParticleConfig::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            control_panel(ctx, &mut config, PanelStats::default());
        });
        assert_eq!(config, ParticleConfig::default());
    }
}
