use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::Serialize;

use super::model::{Dataset, Record};

/// Default floor of the magnitude slider.
pub const DEFAULT_MIN_MAGNITUDE: f64 = 5.0;

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// User-selected constraints. Rebuilt from the controls on every change.
///
/// An empty `countries` set means "no country restriction", not "match
/// nothing".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub min_magnitude: f64,
    pub max_depth: f64,
    pub countries: BTreeSet<String>,
}

impl FilterCriteria {
    /// Whether a single record passes all three predicates.
    ///
    /// NaN magnitude or depth fails its comparison, so such rows never pass.
    pub fn matches(&self, record: &Record) -> bool {
        if !(record.magnitude >= self.min_magnitude && record.depth <= self.max_depth) {
            return false;
        }
        if self.countries.is_empty() {
            return true;
        }
        record
            .country
            .as_ref()
            .is_some_and(|c| self.countries.contains(c))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – ordered subset of the dataset
// ---------------------------------------------------------------------------

/// Read-only subset of a dataset. Holds row indices in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Records of the view in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }
}

/// Apply the criteria to every record, keeping dataset order.
pub fn apply<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

// ---------------------------------------------------------------------------
// Control ranges derived from the dataset
// ---------------------------------------------------------------------------

/// Slider bounds and country options, computed once per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    pub magnitude_range: RangeInclusive<f64>,
    pub depth_range: RangeInclusive<f64>,
    /// Sorted distinct non-null countries.
    pub country_options: Vec<String>,
}

impl FilterControls {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let magnitude_range = finite_range(dataset.records.iter().map(|r| r.magnitude));
        let depth_range = finite_range(dataset.records.iter().map(|r| r.depth));
        let country_options: Vec<String> = dataset
            .records
            .iter()
            .filter_map(|r| r.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        FilterControls {
            magnitude_range,
            depth_range,
            country_options,
        }
    }

    /// Starting criteria: the given magnitude floor (clamped), the full
    /// depth range, and no countries.
    pub fn initial_criteria(&self, min_magnitude: f64) -> FilterCriteria {
        self.criteria(min_magnitude, *self.depth_range.end(), BTreeSet::new())
    }

    /// Build criteria from raw control values, clamping the sliders into
    /// the dataset's observed bounds.
    pub fn criteria(
        &self,
        min_magnitude: f64,
        max_depth: f64,
        countries: BTreeSet<String>,
    ) -> FilterCriteria {
        FilterCriteria {
            min_magnitude: clamp_to(min_magnitude, &self.magnitude_range),
            max_depth: clamp_to(max_depth, &self.depth_range),
            countries,
        }
    }
}

/// Observed finite min/max; `0.0..=0.0` when nothing is finite.
fn finite_range(values: impl Iterator<Item = f64>) -> RangeInclusive<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        0.0..=0.0
    } else {
        min..=max
    }
}

fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::model::CellValue;

    /// The three-row dataset used across the data-layer tests.
    pub(crate) fn scenario_dataset() -> Dataset {
        let columns = ["Magnitude", "Depth", "Country", "Tsunami"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row = |mag: f64, depth: f64, country: &str, tsunami: i64| {
            vec![
                CellValue::Float(mag),
                CellValue::Float(depth),
                CellValue::Text(country.to_string()),
                CellValue::Integer(tsunami),
            ]
        };
        Dataset::from_rows(
            columns,
            vec![
                row(5.0, 10.0, "A", 0),
                row(7.2, 600.0, "B", 1),
                row(4.9, 5.0, "A", 0),
            ],
        )
        .unwrap()
    }

    fn criteria(min: f64, max_depth: f64, countries: &[&str]) -> FilterCriteria {
        FilterCriteria {
            min_magnitude: min,
            max_depth,
            countries: countries.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_magnitude_floor_is_inclusive() {
        let dataset = scenario_dataset();
        let view = apply(&dataset, &criteria(5.0, 600.0, &[]));
        assert_eq!(view.indices(), &[0, 1]);
    }

    #[test]
    fn test_depth_ceiling_is_inclusive() {
        let dataset = scenario_dataset();
        let view = apply(&dataset, &criteria(0.0, 10.0, &[]));
        assert_eq!(view.indices(), &[0, 2]);
    }

    #[test]
    fn test_unmatched_country_gives_empty_view() {
        let dataset = scenario_dataset();
        let view = apply(&dataset, &criteria(5.0, 600.0, &["Z"]));
        assert!(view.is_empty());
    }

    #[test]
    fn test_empty_selection_equals_all_countries() {
        let dataset = scenario_dataset();
        let controls = FilterControls::from_dataset(&dataset);
        let all: Vec<&str> = controls.country_options.iter().map(String::as_str).collect();

        for (min, depth) in [(0.0, 1000.0), (5.0, 600.0), (4.95, 9.0), (8.0, 0.0)] {
            let unrestricted = apply(&dataset, &criteria(min, depth, &[]));
            let everything = apply(&dataset, &criteria(min, depth, &all));
            assert_eq!(unrestricted.indices(), everything.indices());
        }
    }

    #[test]
    fn test_view_is_ordered_subset() {
        let dataset = scenario_dataset();
        for c in [
            criteria(0.0, 1000.0, &[]),
            criteria(4.9, 5.0, &["A"]),
            criteria(7.0, 700.0, &["B", "A"]),
        ] {
            let view = apply(&dataset, &c);
            assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
            assert!(view.indices().iter().all(|&i| i < dataset.len()));
            for record in view.records() {
                assert!(dataset.records.contains(record));
            }
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let dataset = scenario_dataset();
        let c = criteria(4.9, 600.0, &["A"]);
        let first = apply(&dataset, &c);
        let second = apply(&dataset, &c);
        assert_eq!(first.indices(), second.indices());
    }

    #[test]
    fn test_nan_rows_are_dropped() {
        let columns = vec!["Magnitude".to_string(), "Depth".to_string()];
        let dataset = Dataset::from_rows(
            columns,
            vec![
                vec![CellValue::Null, CellValue::Float(1.0)],
                vec![CellValue::Float(6.0), CellValue::Text("deep".into())],
                vec![CellValue::Float(6.0), CellValue::Float(1.0)],
            ],
        )
        .unwrap();
        let view = apply(&dataset, &criteria(f64::NEG_INFINITY, f64::INFINITY, &[]));
        assert_eq!(view.indices(), &[2]);
    }

    #[test]
    fn test_null_country_excluded_only_when_selecting() {
        let columns = ["Magnitude", "Depth", "Country"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let dataset = Dataset::from_rows(
            columns,
            vec![
                vec![CellValue::Float(6.0), CellValue::Float(1.0), CellValue::Null],
                vec![CellValue::Float(6.0), CellValue::Float(1.0), CellValue::Text("C".into())],
            ],
        )
        .unwrap();
        assert_eq!(apply(&dataset, &criteria(0.0, 10.0, &[])).len(), 2);
        assert_eq!(apply(&dataset, &criteria(0.0, 10.0, &["C"])).indices(), &[1]);
    }

    #[test]
    fn test_controls_from_dataset() {
        let dataset = scenario_dataset();
        let controls = FilterControls::from_dataset(&dataset);
        assert_eq!(controls.magnitude_range, 4.9..=7.2);
        assert_eq!(controls.depth_range, 5.0..=600.0);
        assert_eq!(controls.country_options, vec!["A".to_string(), "B".to_string()]);

        let defaults = controls.initial_criteria(DEFAULT_MIN_MAGNITUDE);
        assert_eq!(defaults.min_magnitude, 5.0);
        assert_eq!(defaults.max_depth, 600.0);
        assert!(defaults.countries.is_empty());
    }

    #[test]
    fn test_criteria_are_clamped() {
        let dataset = scenario_dataset();
        let controls = FilterControls::from_dataset(&dataset);
        let c = controls.criteria(9.0, -4.0, BTreeSet::new());
        assert_eq!(c.min_magnitude, 7.2);
        assert_eq!(c.max_depth, 5.0);
    }

    #[test]
    fn test_controls_on_empty_dataset() {
        let dataset = Dataset::from_rows(
            vec!["Magnitude".to_string(), "Depth".to_string()],
            Vec::new(),
        )
        .unwrap();
        let controls = FilterControls::from_dataset(&dataset);
        assert_eq!(controls.magnitude_range, 0.0..=0.0);
        assert_eq!(controls.initial_criteria(DEFAULT_MIN_MAGNITUDE).min_magnitude, 0.0);
        assert!(controls.country_options.is_empty());
    }
}
