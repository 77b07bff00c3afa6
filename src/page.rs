use serde::Serialize;

use crate::charts::geo::{geo_map, GeoMap};
use crate::charts::histogram::{magnitude_histogram, MagnitudeHistogram};
use crate::charts::ranking::{top_countries, TopCountriesBar};
use crate::charts::scatter::{depth_magnitude_scatter, DepthMagnitudeScatter};
use crate::data::filter::{apply, FilterCriteria, FilteredView};
use crate::data::model::Dataset;
use crate::data::summary::{summarize, Summary};

/// Rows shown in the collapsible preview table.
pub const PREVIEW_ROWS: usize = 20;

// ---------------------------------------------------------------------------
// Page state – everything the shell draws for one set of criteria
// ---------------------------------------------------------------------------

/// First rows of the filtered view, already formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TablePreview {
    fn from_view(view: &FilteredView<'_>, limit: usize) -> Self {
        TablePreview {
            columns: view.dataset().schema.columns.clone(),
            rows: view
                .records()
                .take(limit)
                .map(|r| r.cells.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageState {
    pub criteria: FilterCriteria,
    pub summary: Summary,
    pub preview: TablePreview,
    pub histogram: MagnitudeHistogram,
    pub scatter: DepthMagnitudeScatter,
    pub geo: GeoMap,
    /// `None` when the dataset has no Country column.
    pub top_countries: Option<TopCountriesBar>,
}

/// Filter the dataset and derive every metric and chart from the result.
pub fn render(dataset: &Dataset, criteria: &FilterCriteria) -> PageState {
    let view = apply(dataset, criteria);
    log::debug!(
        "Rendering page: {} of {} records match {:?}",
        view.len(),
        dataset.len(),
        criteria
    );

    let geo = geo_map(&view);
    if let GeoMap::Unavailable { missing } = &geo {
        log::warn!("Map unavailable, missing columns: {missing:?}");
    }

    PageState {
        criteria: criteria.clone(),
        summary: summarize(&view),
        preview: TablePreview::from_view(&view, PREVIEW_ROWS),
        histogram: magnitude_histogram(&view),
        scatter: depth_magnitude_scatter(&view),
        geo,
        top_countries: top_countries(&view),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::tests::scenario_dataset;
    use crate::data::model::CellValue;
    use crate::data::summary::TsunamiTally;

    fn criteria(min: f64, max_depth: f64, countries: &[&str]) -> FilterCriteria {
        FilterCriteria {
            min_magnitude: min,
            max_depth,
            countries: countries.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_scenario_page() {
        let dataset = scenario_dataset();
        let page = render(&dataset, &criteria(5.0, 600.0, &[]));

        assert_eq!(page.summary.count, 2);
        assert_eq!(page.summary.avg_magnitude, Some(6.1));
        assert_eq!(page.summary.tsunami, TsunamiTally::Count(1.0));
        assert_eq!(page.preview.rows.len(), 2);
        assert_eq!(page.preview.rows[1], vec!["7.2", "600", "B", "1"]);
        assert_eq!(page.scatter.points.len(), 2);
        assert_eq!(page.top_countries.as_ref().map(|t| t.bars.len()), Some(2));
    }

    #[test]
    fn test_missing_coordinates_only_affect_map() {
        let dataset = scenario_dataset();
        let page = render(&dataset, &criteria(0.0, 1000.0, &[]));

        assert!(matches!(page.geo, GeoMap::Unavailable { .. }));
        assert_eq!(page.histogram.bins.len(), 30);
        assert_eq!(page.scatter.points.len(), 3);
        assert!(page.top_countries.is_some());
    }

    #[test]
    fn test_empty_view_renders() {
        let dataset = scenario_dataset();
        let page = render(&dataset, &criteria(5.0, 600.0, &["Z"]));

        assert_eq!(page.summary.count, 0);
        assert_eq!(page.summary.avg_magnitude, None);
        assert!(page.preview.rows.is_empty());
        assert_eq!(page.preview.columns.len(), 4);
        assert!(page.histogram.is_empty());
        assert!(page.scatter.points.is_empty());
        assert!(page.top_countries.unwrap().bars.is_empty());
    }

    #[test]
    fn test_preview_is_capped() {
        let columns = vec!["Magnitude".to_string(), "Depth".to_string()];
        let rows = (0..50)
            .map(|i| vec![CellValue::Float(5.0 + i as f64 / 100.0), CellValue::Integer(i)])
            .collect();
        let dataset = Dataset::from_rows(columns, rows).unwrap();
        let page = render(
            &dataset,
            &FilterCriteria {
                min_magnitude: 0.0,
                max_depth: 100.0,
                countries: BTreeSet::new(),
            },
        );
        assert_eq!(page.summary.count, 50);
        assert_eq!(page.preview.rows.len(), PREVIEW_ROWS);
        assert_eq!(page.preview.rows[0][1], "0");
        assert_eq!(page.summary.tsunami, TsunamiTally::NotAvailable);
    }

    #[test]
    fn test_render_is_deterministic_and_serializable() {
        let dataset = scenario_dataset();
        let c = criteria(4.9, 600.0, &["A"]);
        let first = render(&dataset, &c);
        let second = render(&dataset, &c);
        assert_eq!(first, second);

        let json = serde_json::to_value(&first).unwrap();
        assert_eq!(json["summary"]["count"], 2);
        assert_eq!(json["geo"]["status"], "unavailable");
        assert_eq!(json["summary"]["tsunami"]["Count"], 0.0);
    }

    #[test]
    fn test_all_nan_magnitudes_render_empty() {
        let columns = ["Magnitude", "Depth", "Country", "Tsunami", "Latitude", "Longitude"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            vec![
                CellValue::Null,
                CellValue::Float(10.0),
                CellValue::Text("Chile".into()),
                CellValue::Integer(1),
                CellValue::Float(-30.0),
                CellValue::Float(-71.0),
            ],
            vec![
                CellValue::Float(f64::NAN),
                CellValue::Float(20.0),
                CellValue::Text("Japan".into()),
                CellValue::Integer(0),
                CellValue::Float(36.0),
                CellValue::Float(140.0),
            ],
        ];
        let dataset = Dataset::from_rows(columns, rows).unwrap();
        let page = render(&dataset, &criteria(0.0, 1000.0, &[]));

        assert_eq!(page.summary.count, 0);
        assert_eq!(page.summary.avg_magnitude, None);
        assert_eq!(page.summary.tsunami, TsunamiTally::Count(0.0));
        assert!(page.histogram.is_empty());
        assert!(page.scatter.points.is_empty());
        assert_eq!(page.scatter.domain, Some((0.0, 1.0)));
        let GeoMap::Available(map) = &page.geo else {
            panic!("both coordinate columns are present");
        };
        assert!(map.points.is_empty());
        assert_eq!(map.domain, None);
        assert!(page.top_countries.unwrap().bars.is_empty());
    }
}
