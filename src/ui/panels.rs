use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{unique_codes, FilterField};
use crate::data::model::Probe;
use crate::state::AppState;
use crate::title::{metabolite_label, timepoint_label};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Display text for a code in the filter list.
fn code_label(field: FilterField, probe: Probe, code: &str) -> String {
    let known = match field {
        FilterField::Timepoint => timepoint_label(code),
        FilterField::Metabolite => metabolite_label(probe, code),
    };
    match known {
        Some(label) => format!("{label}  ({code})"),
        None => code.to_string(),
    }
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.images.is_empty() {
        ui.label("No images loaded.");
        return;
    }

    let unique = unique_codes(&state.images);
    let probe = state.probe;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in FilterField::ALL {
                let Some(all_codes) = unique.get(&field) else {
                    continue;
                };

                let n_selected = state
                    .filters
                    .get(&field)
                    .map_or(all_codes.len(), |s| s.intersection(all_codes).count());
                let header_text = format!("{field}  ({n_selected}/{})", all_codes.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(field);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(field);
                            }
                        });

                        for code in all_codes {
                            let mut checked = state
                                .filters
                                .get(&field)
                                .map_or(true, |s| s.contains(code));
                            let text = RichText::new(code_label(field, probe, code));
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(field, code);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            let can_export = state.figure.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export PNG…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.directory.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload_reporting();
                ui.close_menu();
            }
        });

        ui.separator();

        let mut probe = state.probe;
        egui::ComboBox::from_id_salt("probe")
            .selected_text(format!("Probe {}", probe.upper_label()))
            .show_ui(ui, |ui: &mut Ui| {
                for p in Probe::ALL {
                    ui.selectable_value(&mut probe, p, p.upper_label())
                        .on_hover_text(format!("{} (files {}*)", p.compound(), p.prefix()));
                }
            });
        state.set_probe(probe);

        ui.separator();

        if let Some(dir) = &state.directory {
            ui.label(format!(
                "{} images in {}, {} visible",
                state.images.len(),
                dir.display(),
                state.figure.as_ref().map_or(0, |f| f.panels.len())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new().set_title("Open image folder");
    if let Some(dir) = &state.directory {
        dialog = dialog.set_directory(dir);
    }

    if let Some(dir) = dialog.pick_folder() {
        state.set_directory(dir);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export figure")
        .add_filter("PNG", &["png"])
        .set_file_name(format!("mri_{}.png", state.probe))
        .save_file();

    if let Some(path) = file {
        match state.export(&path) {
            Ok(true) => {
                state.status_message = None;
            }
            Ok(false) => {
                state.status_message = Some("Nothing to export".to_string());
            }
            Err(e) => {
                log::error!("Failed to export figure: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
