use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Region;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – region and year selectors
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Region selector ----
    ui.strong("Select region:");
    let mut region = state.selection.region;
    egui::ComboBox::from_id_salt("region")
        .selected_text(region.name())
        .show_ui(ui, |ui: &mut Ui| {
            for r in Region::ALL {
                ui.selectable_value(&mut region, r, r.name());
            }
        });
    state.set_region(region);
    ui.add_space(8.0);

    // ---- Year range ----
    ui.strong("Years covered:");
    let bounds = state.config.years;
    let mut start = state.selection.range.start;
    let mut end = state.selection.range.end;
    ui.add(egui::Slider::new(&mut start, bounds.start..=bounds.end).text("from"));
    ui.add(egui::Slider::new(&mut end, bounds.start..=bounds.end).text("to"));
    state.set_range(start, end);
    ui.separator();

    // ---- Notices from the last run ----
    if state.notices.is_empty() {
        return;
    }
    let title = format!("Notices ({})", state.notices.len());
    egui::CollapsingHeader::new(RichText::new(title).strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::vertical()
                .auto_shrink([false, true])
                .show(ui, |ui: &mut Ui| {
                    for notice in &state.notices {
                        ui.label(RichText::new(notice).color(Color32::from_rgb(200, 140, 30)));
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} · {} · data from {}",
            state.selection.region,
            state.selection.range,
            state.config.data_dir.display()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.reload_from(dir);
    }
}
