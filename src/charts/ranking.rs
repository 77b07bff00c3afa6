use std::collections::BTreeMap;

use serde::Serialize;

use super::value_domain;
use crate::color::{ColorScale, Rgb};
use crate::data::filter::FilteredView;

/// Number of countries shown in the ranking.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryBar {
    pub country: String,
    pub mean_magnitude: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCountriesBar {
    pub title: &'static str,
    pub scale: ColorScale,
    pub domain: Option<(f64, f64)>,
    pub bars: Vec<CountryBar>,
}

/// Countries ranked by mean magnitude, highest first.
///
/// `None` when the dataset has no Country column. Rows without a country
/// (or with a NaN magnitude) do not form groups. Equal means are ordered
/// alphabetically so the cut at [`TOP_N`] is deterministic.
pub fn top_countries(view: &FilteredView<'_>) -> Option<TopCountriesBar> {
    if !view.dataset().schema.has_country() {
        return None;
    }

    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in view.records() {
        let Some(country) = record.country.as_deref() else {
            continue;
        };
        if record.magnitude.is_nan() {
            continue;
        }
        let entry = groups.entry(country).or_insert((0.0, 0));
        entry.0 += record.magnitude;
        entry.1 += 1;
    }

    let mut ranked: Vec<(&str, f64)> = groups
        .into_iter()
        .map(|(country, (sum, n))| (country, sum / n as f64))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(TOP_N);

    let scale = ColorScale::blues();
    let domain = value_domain(ranked.iter().map(|(_, mean)| *mean));
    let bars = ranked
        .into_iter()
        .map(|(country, mean)| CountryBar {
            country: country.to_string(),
            mean_magnitude: mean,
            color: domain.map_or(Rgb::MISSING, |d| scale.color_for(mean, d)),
        })
        .collect();

    Some(TopCountriesBar {
        title: "Top 10 Countries by Average Magnitude",
        scale,
        domain,
        bars,
    })
}
