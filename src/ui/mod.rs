//! egui front end
//!
//! The window owns the [`Transcript`] and is the only reader of the log
//! channel. Background tasks wake it through a [`RepaintSignal`].

pub mod app;
pub mod theme;

pub use app::EiraApp;
pub use theme::Theme;

use crate::integration::SessionCoordinator;
use crate::messages::{Transcript, Waker};
use parking_lot::Mutex;
use std::sync::Arc;

pub const WINDOW_TITLE: &str = "EIRA AI";
pub const WINDOW_SIZE: [f32; 2] = [450.0, 400.0];

/// Repaint hook that can be handed out before the window exists
#[derive(Clone, Default)]
pub struct RepaintSignal {
    ctx: Arc<Mutex<Option<egui::Context>>>,
}

impl RepaintSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn attach(&self, ctx: &egui::Context) {
        *self.ctx.lock() = Some(ctx.clone());
    }

    /// Waker for [`crate::messages::LogSender::with_waker`]
    pub fn waker(&self) -> Waker {
        let ctx = self.ctx.clone();
        Arc::new(move || {
            if let Some(ctx) = ctx.lock().as_ref() {
                ctx.request_repaint();
            }
        })
    }
}

/// Open the window and block until it is closed
pub fn run(
    coordinator: SessionCoordinator,
    transcript: Transcript,
    repaint: RepaintSignal,
) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_resizable(false)
            .with_window_level(egui::WindowLevel::AlwaysOnTop)
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            repaint.attach(&cc.egui_ctx);
            Ok(Box::new(EiraApp::new(cc, coordinator, transcript)))
        }),
    )
}
