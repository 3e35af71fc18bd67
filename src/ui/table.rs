use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{BuyFlag, EXPORT_COLUMNS, Recommendation};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Recommendation table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered recommendation table.
pub fn recommendation_table(ui: &mut Ui, state: &AppState) {
    if state.output.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a listings file to get recommendations  (File → Open…)");
        });
        return;
    }

    ui.heading("Purchase Recommendation");
    ui.add_space(4.0);

    let rows = state.rows();
    let visible = &state.visible_indices;

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0), EXPORT_COLUMNS.len())
            .header(22.0, |mut header| {
                for name in EXPORT_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, visible.len(), |mut table_row| {
                    let rec = &rows[visible[table_row.index()]];
                    for (col, text) in cells(rec).into_iter().enumerate() {
                        table_row.col(|ui: &mut Ui| {
                            if col == 0 {
                                ui.label(buy_label(rec.buy));
                            } else {
                                ui.label(text);
                            }
                        });
                    }
                });
            });
    });
}

fn buy_label(flag: BuyFlag) -> RichText {
    let color = match flag {
        BuyFlag::Buy => Color32::from_rgb(60, 170, 90),
        BuyFlag::DontBuy => Color32::from_rgb(200, 80, 70),
    };
    RichText::new(flag.label()).color(color)
}

/// Cell texts in export column order.
fn cells(r: &Recommendation) -> [String; 21] {
    [
        r.buy.to_string(),
        r.id.to_string(),
        format!("{:.2}", r.price),
        format!("{:.2}", r.proposed_price),
        r.sell_when.to_string(),
        format!("{:.4}", r.price_index),
        r.bedrooms.to_string(),
        r.bathrooms.to_string(),
        r.sqft_living.to_string(),
        r.sqft_lot.to_string(),
        r.floors.to_string(),
        r.waterfront.to_string(),
        r.condition.to_string(),
        r.sqft_above.to_string(),
        r.sqft_basement.to_string(),
        r.yr_built.to_string(),
        r.yr_renovated.to_string(),
        r.date.format("%Y-%m-%d").to_string(),
        r.zipcode.to_string(),
        format!("{:.4}", r.lat),
        format!("{:.3}", r.long),
    ]
}
