use std::collections::HashMap;

use eframe::egui::{self, Color32, RichText, Sense, Ui};
use egui_plot::{Bar, BarChart, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::charts::geo::GeoMap;
use crate::charts::histogram::MagnitudeHistogram;
use crate::charts::ranking::TopCountriesBar;
use crate::charts::scatter::{DepthMagnitudeScatter, ScatterColor};
use crate::color::{ColorScale, Rgb};

const PLOT_HEIGHT: f32 = 320.0;
const MAP_HEIGHT: f32 = 420.0;
const SCATTER_RADIUS: f32 = 3.0;
const WARNING: Color32 = Color32::from_rgb(0xB4, 0x53, 0x09);

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn empty_note(ui: &mut Ui) {
    ui.label(RichText::new("No earthquakes match the current filters.").italics());
}

/// Horizontal gradient strip with the domain bounds on either side.
fn color_bar(ui: &mut Ui, scale: &ColorScale, domain: Option<(f64, f64)>) {
    let Some((lo, hi)) = domain else {
        return;
    };
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{}: {lo:.2}", scale.name));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(160.0, 12.0), Sense::hover());
        let steps = 32;
        let step_width = rect.width() / steps as f32;
        for i in 0..steps {
            let t = (i as f64 + 0.5) / steps as f64;
            let x = rect.left() + i as f32 * step_width;
            let cell = egui::Rect::from_min_size(
                egui::pos2(x, rect.top()),
                egui::vec2(step_width + 0.5, rect.height()),
            );
            ui.painter()
                .rect_filled(cell, 0.0, scale.sample(t).to_color32());
        }
        ui.label(format!("{hi:.2}"));
    });
}

/// Group points of the same colour into one series.
fn points_by_color(points: impl Iterator<Item = ([f64; 2], Rgb)>) -> Vec<(Rgb, Vec<[f64; 2]>)> {
    let mut order: Vec<Rgb> = Vec::new();
    let mut groups: HashMap<[u8; 3], Vec<[f64; 2]>> = HashMap::new();
    for (xy, color) in points {
        groups
            .entry(color.0)
            .or_insert_with(|| {
                order.push(color);
                Vec::new()
            })
            .push(xy);
    }
    order
        .into_iter()
        .map(|c| (c, groups.remove(&c.0).unwrap_or_default()))
        .collect()
}

// ---------------------------------------------------------------------------
// Chart 1: magnitude histogram
// ---------------------------------------------------------------------------

pub fn magnitude_histogram(ui: &mut Ui, chart: &MagnitudeHistogram) {
    if chart.is_empty() {
        empty_note(ui);
    }
    let width = chart.bar_width();
    let color = chart.color.to_color32();
    let bars: Vec<Bar> = chart
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(width)
                .fill(color)
                .name(format!("{:.2} – {:.2}", bin.start, bin.end))
        })
        .collect();

    Plot::new("magnitude_histogram")
        .height(PLOT_HEIGHT)
        .x_axis_label("Magnitude")
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color).name(chart.title));
        });
}

// ---------------------------------------------------------------------------
// Chart 2: depth vs magnitude
// ---------------------------------------------------------------------------

pub fn depth_magnitude_scatter(ui: &mut Ui, chart: &DepthMagnitudeScatter) {
    if chart.points.is_empty() {
        empty_note(ui);
    }
    let groups = points_by_color(
        chart
            .points
            .iter()
            .map(|p| ([p.depth, p.magnitude], p.color)),
    );
    let show_legend = chart.color_by == ScatterColor::Tsunami;

    let mut plot = Plot::new("depth_magnitude_scatter")
        .height(PLOT_HEIGHT)
        .x_axis_label("Depth (km)")
        .y_axis_label("Magnitude")
        .allow_scroll(false);
    if show_legend {
        plot = plot.legend(egui_plot::Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for (color, xy) in groups {
            let name = match (show_legend, color) {
                (true, c) if c == chart.scale.sample(0.0) => "No tsunami".to_string(),
                (true, c) if c == chart.scale.sample(1.0) => "Tsunami".to_string(),
                (true, _) => "Flag missing".to_string(),
                (false, _) => chart.title.to_string(),
            };
            plot_ui.points(
                Points::new(PlotPoints::from(xy))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(SCATTER_RADIUS)
                    .color(color.to_color32())
                    .name(name),
            );
        }
    });

    if !show_legend {
        color_bar(ui, &chart.scale, chart.domain);
    }
}

// ---------------------------------------------------------------------------
// Chart 3: world map
// ---------------------------------------------------------------------------

pub fn geo_map(ui: &mut Ui, chart: &GeoMap) {
    let map = match chart {
        GeoMap::Unavailable { missing } => {
            ui.colored_label(
                WARNING,
                format!(
                    "⚠ Latitude/Longitude columns missing in the dataset ({}).",
                    missing.join(", ")
                ),
            );
            return;
        }
        GeoMap::Available(map) => map,
    };

    if map.points.is_empty() {
        empty_note(ui);
    }

    Plot::new("geo_map")
        .height(MAP_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .label_formatter(|name, _| name.to_string())
        .show(ui, |plot_ui| {
            let frame_color = Color32::from_gray(200);
            for line in &map.frame.graticule {
                plot_ui.line(
                    Line::new(PlotPoints::from(line.clone()))
                        .color(Color32::from_gray(225))
                        .width(0.5),
                );
            }
            plot_ui.line(
                Line::new(PlotPoints::from(map.frame.outline.clone()))
                    .color(frame_color)
                    .width(1.0),
            );

            for point in &map.points {
                let label = format!(
                    "{}\nMagnitude {:.1}\n{:.2}°, {:.2}°",
                    point.label.as_deref().unwrap_or("Unknown"),
                    point.magnitude,
                    point.latitude,
                    point.longitude
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![point.position]))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius((point.size / 2.0).max(1.0) as f32)
                        .color(point.color.to_color32().gamma_multiply(0.8))
                        .name(label),
                );
            }
        });

    ui.label(RichText::new(format!("Projection: {}", map.projection)).small());
    color_bar(ui, &map.scale, map.domain);
}

// ---------------------------------------------------------------------------
// Chart 4: countries ranked by mean magnitude
// ---------------------------------------------------------------------------

pub fn top_countries(ui: &mut Ui, chart: &TopCountriesBar) {
    if chart.bars.is_empty() {
        empty_note(ui);
    }
    let labels: Vec<String> = chart.bars.iter().map(|b| b.country.clone()).collect();
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            Bar::new(i as f64, bar.mean_magnitude)
                .width(0.8)
                .fill(bar.color.to_color32())
                .name(&bar.country)
        })
        .collect();

    Plot::new("top_countries")
        .height(PLOT_HEIGHT)
        .y_axis_label("Magnitude")
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(chart.title));
        });

    color_bar(ui, &chart.scale, chart.domain);
}
