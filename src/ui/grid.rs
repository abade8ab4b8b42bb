use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};

use crate::color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Image grid (central panel)
// ---------------------------------------------------------------------------

/// Upload one texture per panel if the figure changed since the last frame.
fn ensure_textures(ctx: &egui::Context, state: &mut AppState) {
    let Some(figure) = &state.figure else {
        return;
    };
    if state.textures.len() == figure.panels.len() {
        return;
    }
    state.textures = figure
        .panels
        .iter()
        .map(|panel| {
            let (w, h) = panel.raster.dimensions();
            let img = egui::ColorImage::from_gray([w as usize, h as usize], panel.raster.as_raw());
            ctx.load_texture(&panel.file_name, img, egui::TextureOptions::LINEAR)
        })
        .collect();
}

/// Render the captioned image grid in the central panel.
pub fn image_grid(ui: &mut Ui, state: &mut AppState) {
    ensure_textures(ui.ctx(), state);

    let Some(figure) = &state.figure else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = if state.directory.is_some() {
                "No images to display."
            } else {
                "Open a folder to view images  (File → Open folder…)"
            };
            ui.heading(hint);
        });
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(&figure.heading)
                .strong()
                .size(color::HEADING_SIZE)
                .color(color::to_color32(color::HEADING)),
        );
    });
    ui.add_space(6.0);

    let cols = figure.layout.cols;
    let spacing = ui.spacing().item_spacing.x;
    let cell_width = ((ui.available_width() - spacing * (cols as f32 - 1.0)) / cols as f32).max(64.0);
    // 4:5 cells
    let cell_height = cell_width * 1.25;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("image_grid")
                .num_columns(cols)
                .spacing([spacing, spacing])
                .show(ui, |ui: &mut Ui| {
                    for (i, (panel, texture)) in
                        figure.panels.iter().zip(state.textures.iter()).enumerate()
                    {
                        ui.allocate_ui_with_layout(
                            egui::vec2(cell_width, cell_height),
                            Layout::top_down(Align::Center),
                            |ui: &mut Ui| {
                                ui.label(
                                    RichText::new(&panel.caption)
                                        .strong()
                                        .size(color::CAPTION_SIZE)
                                        .color(color::to_color32(color::CAPTION)),
                                )
                                .on_hover_text(&panel.file_name);
                                let avail = egui::vec2(cell_width, ui.available_height());
                                ui.add(
                                    egui::Image::new(texture)
                                        .max_size(avail)
                                        .maintain_aspect_ratio(true),
                                );
                            },
                        );
                        if (i + 1) % cols == 0 {
                            ui.end_row();
                        }
                    }
                });
        });
}
