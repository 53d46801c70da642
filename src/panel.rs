//! Debug panel: egui window with one control per wave parameter.
//!
//! The panel owns the egui context and the winit input state. Each frame it
//! lays out the controls, applies edits to the session and hands the
//! tessellated output to the renderer.

use std::collections::HashMap;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::color::Color;
use crate::ocean::Side;
use crate::session::Session;

/// Tessellated panel output for one frame
pub struct OverlayFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
}

/// Readouts shown under the controls
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelStats {
    pub fps: f32,
    pub frames: u64,
}

/// Buttons pressed this frame
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelActions {
    pub save_preset: bool,
}

pub struct DebugOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    width: f32,
    /// Hex text being typed, per color control
    drafts: HashMap<&'static str, String>,
}

impl DebugOverlay {
    pub fn new(window: &Window, width: f32) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        Self {
            ctx,
            state,
            width,
            drafts: HashMap::new(),
        }
    }

    /// Feed a window event to egui; `true` if the panel consumed it
    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Lay out the panel, apply any edits to `session` and tessellate
    pub fn prepare(
        &mut self,
        window: &Window,
        session: &mut Session,
        stats: PanelStats,
    ) -> (OverlayFrame, PanelActions) {
        let raw_input = self.state.take_egui_input(window);
        let mut actions = PanelActions::default();
        let width = self.width;
        let drafts = &mut self.drafts;

        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Debug")
                .default_width(width)
                .resizable(false)
                .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
                .show(ctx, |ui| {
                    ui.spacing_mut().slider_width = width * 0.5;
                    sliders(ui, session);
                    colors(ui, ctx, session, drafts);
                    side_selector(ui, session);

                    ui.separator();
                    ui.label(format!("{} waves", session.variant));
                    ui.label(format!("{:.1} fps ({} frames)", stats.fps, stats.frames));
                    ui.horizontal(|ui| {
                        actions.save_preset = ui.button("Save preset").clicked();
                        ui.label(session.preset_path.display().to_string());
                    });
                });
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);
        let primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (
            OverlayFrame {
                primitives,
                textures_delta: full_output.textures_delta,
            },
            actions,
        )
    }
}

fn sliders(ui: &mut egui::Ui, session: &mut Session) {
    for slider in session.bindings.sliders().to_vec() {
        let Some(mut value) = slider.read(&session.material().uniforms) else {
            continue;
        };
        let response = ui.add(
            egui::Slider::new(&mut value, slider.min..=slider.max)
                .step_by(slider.step as f64)
                .text(slider.label),
        );
        if response.changed() {
            if let Err(e) = session.set_slider(slider.label, value) {
                log::warn!("{}: {}", slider.label, e);
            }
        }
    }
}

fn colors(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    session: &mut Session,
    drafts: &mut HashMap<&'static str, String>,
) {
    for binding in session.bindings.colors().to_vec() {
        let id = egui::Id::new(("hex", binding.label));
        let typing = ctx.memory(|m| m.has_focus(id));
        let draft = drafts
            .entry(binding.label)
            .or_insert_with(|| binding.hex().to_string());
        if !typing {
            draft.clear();
            draft.push_str(binding.hex());
        }

        ui.horizontal(|ui| {
            let mut rgb = Color::from_hex(binding.hex())
                .map(Color::to_rgb8)
                .unwrap_or_default();
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                let hex = Color::from_rgb8(rgb).to_hex();
                if let Err(e) = session.set_color_hex(binding.label, &hex) {
                    log::warn!("{}: {}", binding.label, e);
                }
            }

            let response = ui.add(
                egui::TextEdit::singleline(draft)
                    .id(id)
                    .desired_width(72.0)
                    .font(egui::TextStyle::Monospace),
            );
            if response.changed() {
                // Partial input is expected while typing
                if let Err(e) = session.set_color_hex(binding.label, draft) {
                    log::debug!("{}: {}", binding.label, e);
                }
            }
            if response.lost_focus() && Color::from_hex(draft).is_err() {
                log::warn!("{}: ignoring '{}'", binding.label, draft);
            }

            ui.label(binding.label);
        });
    }
}

fn side_selector(ui: &mut egui::Ui, session: &mut Session) {
    let mut side = session.material().side;
    egui::ComboBox::from_label("side")
        .selected_text(side.label())
        .show_ui(ui, |ui| {
            for option in Side::ALL {
                ui.selectable_value(&mut side, option, option.label());
            }
        });
    session.set_side(side);
}
