use serde::Serialize;

use super::value_domain;
use crate::color::Rgb;
use crate::data::filter::FilteredView;

pub const BIN_COUNT: usize = 30;
/// Gap between bars as a fraction of the bin width.
pub const BAR_GAP: f64 = 0.05;
pub const BAR_COLOR: Rgb = Rgb::from_hex(0x2563EB);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Magnitude distribution. `bins` is empty when the view has no magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagnitudeHistogram {
    pub title: &'static str,
    pub bins: Vec<HistogramBin>,
    pub bar_gap: f64,
    pub color: Rgb,
}

impl MagnitudeHistogram {
    /// Drawn bar width: bin width minus the gap.
    pub fn bar_width(&self) -> f64 {
        self.bins
            .first()
            .map(|b| (b.end - b.start) * (1.0 - self.bar_gap))
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Bin magnitudes into [`BIN_COUNT`] equal-width bins over the observed range.
///
/// Bins are half-open except the last, which also holds the maximum. A
/// single distinct value is centred in a range one unit wide.
pub fn magnitude_histogram(view: &FilteredView<'_>) -> MagnitudeHistogram {
    let mut histogram = MagnitudeHistogram {
        title: "Magnitude Distribution",
        bins: Vec::new(),
        bar_gap: BAR_GAP,
        color: BAR_COLOR,
    };

    let Some((mut lo, mut hi)) = value_domain(view.records().map(|r| r.magnitude)) else {
        return histogram;
    };
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / BIN_COUNT as f64;

    let mut counts = [0usize; BIN_COUNT];
    for magnitude in view.records().map(|r| r.magnitude).filter(|m| m.is_finite()) {
        let idx = (((magnitude - lo) / width).floor() as usize).min(BIN_COUNT - 1);
        counts[idx] += 1;
    }

    histogram.bins = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
        })
        .collect();
    histogram
}
