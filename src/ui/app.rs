//! Main window: conversation log, input line and voice trigger

use crate::integration::SessionCoordinator;
use crate::messages::{Speaker, Transcript};
use crate::ui::theme::Theme;
use egui::{
    self, CentralPanel, Color32, Key, RichText, ScrollArea, Sense, Stroke, TopBottomPanel, Vec2,
};
use std::time::Duration;
use tracing::info;

/// Frame interval for the avatar animation; doubled while idle
const AVATAR_FRAME: Duration = Duration::from_millis(60);

/// Height of the avatar strip above the log
pub const AVATAR_HEIGHT: f32 = 200.0;

/// Radius of the avatar orb at `time` seconds
///
/// Idle breathing is slow and shallow; while listening or speaking the orb
/// pulses faster and wider.
pub fn orb_radius(base: f32, time: f64, active: bool) -> f32 {
    let (rate, depth) = if active { (6.0, 0.15) } else { (1.5, 0.04) };
    base * (1.0 + depth * (time * rate).sin() as f32)
}

pub struct EiraApp {
    coordinator: SessionCoordinator,
    transcript: Transcript,
    theme: Theme,
    input: String,
}

impl EiraApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        coordinator: SessionCoordinator,
        transcript: Transcript,
    ) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            coordinator,
            transcript,
            theme,
            input: String::new(),
        }
    }

    fn submit(&mut self) {
        let text = std::mem::take(&mut self.input);
        // Fire and forget; the log shows the outcome
        let _ = self.coordinator.submit_text(&text);
    }

    fn listen(&self) {
        info!("Voice capture requested");
        let _ = self.coordinator.start_listening();
    }

    fn show_status(&self, ctx: &egui::Context) {
        TopBottomPanel::top("status")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("EIRA AI").size(18.0).strong());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.coordinator.is_listening() {
                            ui.label(RichText::new("● Listening").color(self.theme.listening));
                        } else if self.coordinator.is_speaking() {
                            ui.label(RichText::new("● Speaking").color(self.theme.speaking));
                        } else if self.coordinator.has_voice_input() {
                            ui.label(
                                RichText::new("F2 to speak")
                                    .size(11.0)
                                    .color(self.theme.text_muted),
                            );
                        }
                    });
                });
            });
    }

    fn show_avatar(&self, ctx: &egui::Context) {
        let (accent, active) = if self.coordinator.is_listening() {
            (self.theme.listening, true)
        } else if self.coordinator.is_speaking() {
            (self.theme.speaking, true)
        } else {
            (self.theme.text_log, false)
        };
        let time = ctx.input(|i| i.time);

        TopBottomPanel::top("avatar")
            .exact_height(AVATAR_HEIGHT)
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
                let center = rect.center();
                let base = rect.height() * 0.3;
                let radius = orb_radius(base, time, active);

                let painter = ui.painter_at(rect);
                let [r, g, b, _] = accent.to_array();
                let glow = Color32::from_rgba_unmultiplied(r, g, b, 24);
                let fill = Color32::from_rgba_unmultiplied(r, g, b, 64);
                painter.circle_filled(center, radius * 1.3, glow);
                painter.circle_filled(center, radius, fill);
                painter.circle_stroke(center, radius, Stroke::new(2.0, accent));
            });
    }

    fn show_input(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let send_width = 70.0;
                    let response = ui.add_sized(
                        Vec2::new(
                            ui.available_width() - send_width - self.theme.spacing,
                            25.0,
                        ),
                        egui::TextEdit::singleline(&mut self.input).hint_text("Type a command"),
                    );

                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

                    let send = egui::Button::new(RichText::new("Send").strong())
                        .fill(self.theme.button_fill)
                        .rounding(self.theme.button_rounding)
                        .min_size(Vec2::new(send_width, 25.0));
                    let clicked = ui.add(send).clicked();

                    if enter || clicked {
                        self.submit();
                        response.request_focus();
                    }
                });
            });
    }

    fn show_log(&self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in self.transcript.entries() {
                            let color = match entry.speaker {
                                Speaker::User => self.theme.text_primary,
                                Speaker::System => self.theme.text_muted,
                                Speaker::Assistant => self.theme.text_log,
                            };
                            ui.label(
                                RichText::new(entry.to_string())
                                    .family(egui::FontFamily::Monospace)
                                    .size(12.0)
                                    .color(color),
                            );
                        }
                    });
            });
    }
}

impl eframe::App for EiraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.transcript.drain();

        if ctx.input(|i| i.key_pressed(Key::F2)) {
            self.listen();
        }

        self.show_status(ctx);
        self.show_avatar(ctx);
        self.show_input(ctx);
        self.show_log(ctx);

        if self.coordinator.is_listening() || self.coordinator.is_speaking() {
            ctx.request_repaint_after(AVATAR_FRAME);
        } else {
            ctx.request_repaint_after(AVATAR_FRAME * 2);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("EIRA window closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_orb_stays_near_base() {
        for step in 0..200 {
            let radius = orb_radius(60.0, step as f64 * 0.05, false);
            assert!((radius - 60.0).abs() <= 60.0 * 0.04 + 1e-3);
        }
    }

    #[test]
    fn test_active_orb_pulses_wider() {
        let spread = |active| {
            let radii: Vec<f32> = (0..200)
                .map(|step| orb_radius(60.0, step as f64 * 0.05, active))
                .collect();
            let max = radii.iter().cloned().fold(f32::MIN, f32::max);
            let min = radii.iter().cloned().fold(f32::MAX, f32::min);
            max - min
        };
        assert!(spread(true) > spread(false) * 2.0);
    }
}
