/// Chart builders: each is a pure function of a [`FilteredView`] that
/// returns a declarative, serializable description for the UI to draw.
///
/// ```text
///   FilteredView
///        │
///        ├──► histogram   30 magnitude bins
///        ├──► scatter     depth × magnitude, coloured by tsunami flag
///        ├──► geo         natural-earth map, or "unavailable"
///        └──► ranking     top countries by mean magnitude
/// ```
///
/// [`FilteredView`]: crate::data::filter::FilteredView

pub mod geo;
pub mod histogram;
pub mod ranking;
pub mod scatter;

/// Observed finite min/max of a series, `None` when nothing is finite.
pub fn value_domain(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}
