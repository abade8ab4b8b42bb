use eframe::egui;

use crate::state::AppState;
use crate::ui::{grid, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MriViewerApp {
    pub state: AppState,
}

impl MriViewerApp {
    /// Wrap a state and perform the initial load, if a directory is known.
    pub fn new(mut state: AppState) -> Self {
        state.reload_reporting();
        Self { state }
    }
}

impl eframe::App for MriViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: image grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            grid::image_grid(ui, &mut self.state);
        });
    }
}
