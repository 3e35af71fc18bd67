use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.output.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut purchasable = state.filters.purchasable_only;
    if ui
        .checkbox(&mut purchasable, "Display Purchasable Properties")
        .changed()
    {
        state.set_purchasable_only(purchasable);
    }

    if let Some(profit) = state.potential_profit() {
        ui.add_space(6.0);
        ui.strong("Potential Profit");
        ui.label(RichText::new(format!("{profit:.3}")).size(20.0));
    }
    ui.separator();

    if state.view == View::Map {
        for (label, color) in state.color_map.legend_entries() {
            ui.label(RichText::new(format!("● {label}")).color(color));
        }
        ui.separator();
    }

    // Clone what we need so we can mutate state inside the loop.
    let zipcodes = state.zipcodes.clone();
    let n_selected = state.filters.zipcodes.len();
    let header_text = if n_selected == 0 {
        format!("Zipcode  (all {})", zipcodes.len())
    } else {
        format!("Zipcode  ({n_selected}/{})", zipcodes.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("zipcode_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear selection").clicked() {
                state.clear_zipcodes();
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for zip in &zipcodes {
                        let mut checked = state.filters.zipcodes.contains(zip);
                        if ui.checkbox(&mut checked, zip.to_string()).changed() {
                            state.toggle_zipcode(*zip);
                        }
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
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_data = state.output.is_some();
            if ui
                .add_enabled(has_data, egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Export as csv…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for (view, label) in [
            (View::Table, "Purchase Recommendation"),
            (View::Map, "Map Visualization"),
            (View::Insights, "Exploratory Data Analysis"),
        ] {
            if ui.selectable_label(state.view == view, label).clicked() {
                state.view = view;
            }
        }

        ui.separator();

        if state.output.is_some() {
            ui.label(format!(
                "{} recommendations, {} visible",
                state.rows().len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export recommendations")
        .set_file_name(&state.config.export_file_name)
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
