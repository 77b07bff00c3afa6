use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct QuakeDashApp {
    pub state: AppState,
}

impl QuakeDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for QuakeDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics and charts ----
        let page = &self.state.page;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::header(ui);
                    ui.add_space(8.0);
                    panels::metrics(ui, &page.summary);
                    ui.add_space(8.0);
                    panels::preview(ui, &page.preview);

                    panels::section_heading(ui, "📊 Earthquake Magnitude Distribution");
                    plot::magnitude_histogram(ui, &page.histogram);

                    panels::section_heading(ui, "🌊 Depth vs Magnitude (Tsunami Highlighted)");
                    plot::depth_magnitude_scatter(ui, &page.scatter);

                    panels::section_heading(ui, "🗺 Global Earthquake Map");
                    plot::geo_map(ui, &page.geo);

                    if let Some(ranking) = &page.top_countries {
                        panels::section_heading(ui, "🏳 Top 10 Countries by Average Magnitude");
                        plot::top_countries(ui, ranking);
                    }

                    panels::footer(ui);
                });
        });
    }
}
