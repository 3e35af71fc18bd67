use eframe::egui::{self, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::model::BuyFlag;
use crate::insights::{self, ChartKind, Findings, Hypothesis};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Map (central panel)
// ---------------------------------------------------------------------------

/// Scatter of the visible properties by longitude/latitude, coloured by
/// buy flag.
pub fn map_plot(ui: &mut Ui, state: &AppState) {
    if state.output.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a listings file to view the map  (File → Open…)");
        });
        return;
    }

    let rows = state.rows();
    let radius = state.config.map_point_radius;

    Plot::new("map_plot")
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for flag in [BuyFlag::Buy, BuyFlag::DontBuy] {
                let points: PlotPoints = state
                    .visible_indices
                    .iter()
                    .map(|&i| &rows[i])
                    .filter(|r| r.buy == flag)
                    .map(|r| [r.long, r.lat])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(flag.label())
                        .color(state.color_map.color_for(flag.label()))
                        .radius(radius),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Exploratory data analysis (central panel)
// ---------------------------------------------------------------------------

/// One chart per hypothesis, over the full recommendation table.
pub fn insights_view(ui: &mut Ui, state: &AppState) {
    if state.hypotheses.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a listings file to explore the data  (File → Open…)");
        });
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Exploratory Data Analysis");
            ui.label(format!(
                "{} rows, {} with waterfront",
                state.rows().len(),
                insights::waterfront_count(state.rows())
            ));
            for h in &state.hypotheses {
                ui.add_space(12.0);
                ui.label(RichText::new(format!("{}: {}", h.code, h.statement)).strong());
                hypothesis_chart(ui, h);
            }
            if let Some(output) = &state.output {
                ui.add_space(12.0);
                zip_median_table(ui, &output.zip_medians.ranked());
            }
        });
}

/// Zip codes by median price, most expensive first.
fn zip_median_table(ui: &mut Ui, ranked: &[(u32, f64)]) {
    egui::CollapsingHeader::new(RichText::new("Median price by zip code").strong())
        .id_salt("zip_medians")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("zip_median_grid").striped(true).show(ui, |ui: &mut Ui| {
                ui.strong("zipcode");
                ui.strong("median price");
                ui.end_row();
                for (zipcode, median) in ranked {
                    ui.label(zipcode.to_string());
                    ui.label(format!("{median:.2}"));
                    ui.end_row();
                }
            });
        });
}

fn hypothesis_chart(ui: &mut Ui, h: &Hypothesis) {
    match (&h.findings, h.chart) {
        (Findings::Monthly(series), _) => {
            let points: PlotPoints = series
                .iter()
                .enumerate()
                .map(|(i, m)| [i as f64, m.variation_pct])
                .collect();
            let legend = series
                .iter()
                .map(|m| m.month.format("%m-%Y").to_string())
                .collect::<Vec<_>>()
                .join("  ");
            ui.small(legend);
            Plot::new(h.code)
                .height(220.0)
                .y_axis_label(h.metric)
                .x_axis_label("month")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new(points).name(h.metric).width(1.5));
                });
        }
        (Findings::Groups(groups), ChartKind::Table) => {
            egui::Grid::new(h.code).striped(true).show(ui, |ui: &mut Ui| {
                ui.strong("group");
                ui.strong(h.metric);
                ui.end_row();
                for g in groups {
                    ui.label(&g.label);
                    ui.label(format!("{:.4}", g.value));
                    ui.end_row();
                }
            });
        }
        (Findings::Groups(groups), kind) => {
            let colors = ColorMap::new(h.code, groups.iter().map(|g| g.label.clone()));
            let total: f64 = groups.iter().map(|g| g.value).sum();
            Plot::new(h.code)
                .height(220.0)
                .legend(Legend::default())
                .y_axis_label(h.metric)
                .allow_drag(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for (i, g) in groups.iter().enumerate() {
                        // pie charts are drawn as share-of-total bars
                        let (height, name) = match kind {
                            ChartKind::Pie if total > 0.0 => {
                                (g.value, format!("{} ({:.1}%)", g.label, g.value / total * 100.0))
                            }
                            _ => (g.value, format!("{} = {}", g.label, g.value)),
                        };
                        let bar = Bar::new(i as f64, height).width(0.6).name(&name);
                        plot_ui.bar_chart(
                            BarChart::new(vec![bar])
                                .name(name)
                                .color(colors.color_for(&g.label)),
                        );
                    }
                });
        }
    }
}
