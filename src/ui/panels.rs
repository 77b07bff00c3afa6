use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::summary::Summary;
use crate::page::TablePreview;
use crate::state::AppState;

const HEADING: Color32 = Color32::from_rgb(0x1E, 0x3A, 0x8A);
const METRIC_FILL: Color32 = Color32::from_rgb(0xEF, 0xF6, 0xFF);
const WARNING: Color32 = Color32::from_rgb(0xB4, 0x53, 0x09);

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔎 Filter Options");
    ui.separator();

    // ---- Sliders ----
    let magnitude_range = state.controls.magnitude_range.clone();
    let depth_range = state.controls.depth_range.clone();

    ui.strong("Minimum Magnitude");
    ui.add(egui::Slider::new(&mut state.min_magnitude, magnitude_range).max_decimals(2));
    ui.add_space(4.0);

    ui.strong("Maximum Depth (km)");
    ui.add(egui::Slider::new(&mut state.max_depth, depth_range).max_decimals(1));
    ui.separator();

    // ---- Country multi-select ----
    let n_selected = state.selected_countries.len();
    let n_total = state.controls.country_options.len();
    egui::CollapsingHeader::new(
        RichText::new(format!("Select Country  ({n_selected}/{n_total})")).strong(),
    )
    .id_salt("country_filter")
    .default_open(true)
    .show(ui, |ui: &mut Ui| {
        if n_total == 0 {
            ui.label("No country information in this dataset.");
            return;
        }

        ui.add(egui::TextEdit::singleline(&mut state.country_search).hint_text("Search…"));
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("All").clicked() {
                state.select_all_countries();
            }
            if ui.small_button("None").clicked() {
                state.select_no_countries();
            }
        });
        if n_selected == 0 {
            ui.label(RichText::new("No selection: all countries shown.").weak());
        }

        // Clone what we need so we can mutate state inside the loop.
        let visible: Vec<String> = state.visible_countries().cloned().collect();
        ScrollArea::vertical()
            .max_height(320.0)
            .auto_shrink([false, true])
            .show(ui, |ui: &mut Ui| {
                for country in &visible {
                    let mut checked = state.selected_countries.contains(country);
                    if ui.checkbox(&mut checked, country).changed() {
                        state.toggle_country(country);
                    }
                }
            });
    });

    ui.separator();
    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }

    // Recompute the page after any control change.
    state.refresh();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        ui.label(format!(
            "{} earthquakes loaded, {} visible",
            state.dataset.len(),
            state.page.summary.count
        ));
        if state.dataset.is_empty() {
            ui.colored_label(WARNING, "⚠ The data file has a header but no rows.");
        }

        ui.separator();
        ui.label(RichText::new(state.source.display().to_string()).weak());
    });
}

// ---------------------------------------------------------------------------
// Header, metrics, preview
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.heading(
        RichText::new("🌍 Global Earthquake & Tsunami Risk Dashboard")
            .size(26.0)
            .color(HEADING),
    );
    ui.label("Analyze global earthquake data and visualize tsunami risks in an interactive way.");
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Dataset Source:");
        ui.hyperlink_to(
            "Kaggle - Global Earthquake-Tsunami Risk Assessment",
            "https://www.kaggle.com/datasets/ahmeduzaki/global-earthquake-tsunami-risk-assessment-dataset",
        );
    });
}

pub fn section_heading(ui: &mut Ui, text: &str) {
    ui.add_space(12.0);
    ui.label(RichText::new(text).heading().color(HEADING));
}

fn metric_card(ui: &mut Ui, title: &str, value: String) {
    egui::Frame::group(ui.style())
        .fill(METRIC_FILL)
        .corner_radius(10.0)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.label(title);
            ui.label(RichText::new(value).size(28.0).strong());
        });
}

/// The three headline metrics side by side.
pub fn metrics(ui: &mut Ui, summary: &Summary) {
    let average = summary
        .avg_magnitude
        .map(|m| format!("{m:.2}"))
        .unwrap_or_else(|| "—".to_string());

    ui.columns(3, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Total Earthquakes", summary.count.to_string());
        metric_card(&mut cols[1], "Average Magnitude", average);
        metric_card(&mut cols[2], "Tsunami Events", summary.tsunami.to_string());
    });
}

/// Collapsible table with the first filtered rows.
pub fn preview(ui: &mut Ui, preview: &TablePreview) {
    egui::CollapsingHeader::new("📋 Show Dataset Preview")
        .id_salt("dataset_preview")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if preview.rows.is_empty() {
                ui.label(RichText::new("No rows match the current filters.").italics());
                return;
            }
            ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .columns(Column::auto().at_least(60.0), preview.columns.len())
                    .header(20.0, |mut header| {
                        for name in &preview.columns {
                            header.col(|ui: &mut Ui| {
                                ui.strong(name);
                            });
                        }
                    })
                    .body(|mut body| {
                        for row in &preview.rows {
                            body.row(18.0, |mut table_row| {
                                for cell in row {
                                    table_row.col(|ui: &mut Ui| {
                                        ui.label(cell);
                                    });
                                }
                            });
                        }
                    });
            });
        });
}

pub fn footer(ui: &mut Ui) {
    ui.add_space(12.0);
    ui.separator();
    ui.label(
        RichText::new(
            "💡 Tip: Use the filters on the left sidebar to explore different magnitude and country combinations!",
        )
        .strong(),
    );
    ui.label(RichText::new("Data from Kaggle").small().weak());
}
