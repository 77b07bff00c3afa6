use std::fmt;

use serde::Serialize;

use super::filter::FilteredView;

// ---------------------------------------------------------------------------
// Summary metrics over a filtered view
// ---------------------------------------------------------------------------

/// Tsunami-event total, or a marker that the dataset has no Tsunami column.
///
/// The total is the plain sum of the flag column, so a non-binary flag shows
/// up as a fractional count rather than being rounded away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TsunamiTally {
    Count(f64),
    NotAvailable,
}

impl fmt::Display for TsunamiTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsunamiTally::Count(n) => write!(f, "{n}"),
            TsunamiTally::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// The three headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    /// Mean magnitude rounded to two decimals; `None` when there is no data.
    pub avg_magnitude: Option<f64>,
    pub tsunami: TsunamiTally,
}

pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let (sum, n) = view
        .records()
        .map(|r| r.magnitude)
        .filter(|m| !m.is_nan())
        .fold((0.0_f64, 0_usize), |(sum, n), m| (sum + m, n + 1));
    let avg_magnitude = (n > 0).then(|| round2(sum / n as f64));

    let tsunami = if view.dataset().schema.has_tsunami() {
        TsunamiTally::Count(view.records().filter_map(|r| r.tsunami).sum())
    } else {
        TsunamiTally::NotAvailable
    };

    Summary {
        count: view.len(),
        avg_magnitude,
        tsunami,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::tests::scenario_dataset;
    use crate::data::filter::{apply, FilterCriteria};
    use crate::data::model::{CellValue, Dataset};

    fn criteria(min: f64, max_depth: f64, countries: &[&str]) -> FilterCriteria {
        FilterCriteria {
            min_magnitude: min,
            max_depth,
            countries: countries.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_scenario_two_matching_rows() {
        let dataset = scenario_dataset();
        let view = apply(&dataset, &criteria(5.0, 600.0, &[]));
        let summary = summarize(&view);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.avg_magnitude, Some(6.1));
        assert_eq!(summary.tsunami, TsunamiTally::Count(1.0));
    }

    #[test]
    fn test_empty_view_has_no_mean() {
        let dataset = scenario_dataset();
        let view = apply(&dataset, &criteria(5.0, 600.0, &["Z"]));
        let summary = summarize(&view);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.avg_magnitude, None);
        assert_eq!(summary.tsunami, TsunamiTally::Count(0.0));
    }

    #[test]
    fn test_missing_tsunami_column_is_not_available() {
        let dataset = Dataset::from_rows(
            vec!["Magnitude".to_string(), "Depth".to_string()],
            vec![vec![CellValue::Float(6.0), CellValue::Float(12.0)]],
        )
        .unwrap();

        for min in [0.0, 9.0] {
            let view = apply(
                &dataset,
                &FilterCriteria {
                    min_magnitude: min,
                    max_depth: 100.0,
                    countries: BTreeSet::new(),
                },
            );
            assert_eq!(summarize(&view).tsunami, TsunamiTally::NotAvailable);
        }
        assert_eq!(TsunamiTally::NotAvailable.to_string(), "N/A");
    }

    #[test]
    fn test_mean_is_rounded_to_two_decimals() {
        let dataset = Dataset::from_rows(
            vec!["Magnitude".to_string(), "Depth".to_string()],
            vec![
                vec![CellValue::Float(5.0), CellValue::Float(1.0)],
                vec![CellValue::Float(5.1), CellValue::Float(1.0)],
                vec![CellValue::Float(5.1), CellValue::Float(1.0)],
            ],
        )
        .unwrap();
        let view = apply(&dataset, &criteria(0.0, 10.0, &[]));
        assert_eq!(summarize(&view).avg_magnitude, Some(5.07));
    }

    #[test]
    fn test_fractional_flags_are_summed_exactly() {
        let dataset = Dataset::from_rows(
            vec!["Magnitude".to_string(), "Depth".to_string(), "Tsunami".to_string()],
            vec![
                vec![CellValue::Float(6.0), CellValue::Float(1.0), CellValue::Float(0.5)],
                vec![CellValue::Float(6.5), CellValue::Float(1.0), CellValue::Integer(1)],
                vec![CellValue::Float(7.0), CellValue::Float(1.0), CellValue::Null],
            ],
        )
        .unwrap();
        let view = apply(&dataset, &criteria(0.0, 10.0, &[]));
        let tally = summarize(&view).tsunami;
        assert_eq!(tally, TsunamiTally::Count(1.5));
        assert_eq!(tally.to_string(), "1.5");
        assert_eq!(TsunamiTally::Count(3.0).to_string(), "3");
    }
}
