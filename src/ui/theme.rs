//! Colors and spacing for the assistant window

use egui::{Color32, Rounding, Visuals};

#[derive(Clone, Debug)]
pub struct Theme {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_input: Color32,

    /// Log text
    pub text_log: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,

    /// Indicator colors
    pub listening: Color32,
    pub speaking: Color32,

    pub button_fill: Color32,
    pub button_rounding: Rounding,

    pub spacing: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg_primary: Color32::BLACK,
            bg_secondary: Color32::from_rgb(17, 24, 39),
            bg_input: Color32::from_rgb(26, 26, 26),

            text_log: Color32::from_rgb(135, 206, 235), // sky blue
            text_primary: Color32::from_rgb(249, 250, 251),
            text_muted: Color32::from_rgb(156, 163, 175),

            listening: Color32::from_rgb(239, 68, 68),
            speaking: Color32::from_rgb(99, 102, 241),

            button_fill: Color32::from_rgb(68, 68, 68),
            button_rounding: egui::Rounding::same(4.0),

            spacing: 8.0,
            spacing_sm: 4.0,
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();
        visuals.panel_fill = self.bg_primary;
        visuals.extreme_bg_color = self.bg_input;
        visuals.override_text_color = Some(self.text_primary);
        ctx.set_visuals(visuals);
    }
}
