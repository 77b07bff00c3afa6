use serde::Serialize;

use super::value_domain;
use crate::color::{ColorScale, Rgb};
use crate::data::filter::FilteredView;

/// Marker diameter of the largest magnitude in the view, in points.
pub const MAX_MARKER_SIZE: f64 = 20.0;
const GRATICULE_STEP_DEG: i32 = 30;
const LINE_STEP_DEG: i32 = 5;

// ---------------------------------------------------------------------------
// Natural Earth projection
// ---------------------------------------------------------------------------

/// Project a longitude/latitude pair (degrees) with the Natural Earth
/// pseudo-cylindrical projection. Output is in unit-sphere coordinates,
/// x in roughly ±2.73 and y in roughly ±1.42.
pub fn natural_earth(longitude: f64, latitude: f64) -> [f64; 2] {
    let lambda = longitude.to_radians();
    let phi = latitude.to_radians();
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    [x, y]
}

/// Projected world outline and graticule, drawn beneath the points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldFrame {
    pub outline: Vec<[f64; 2]>,
    pub graticule: Vec<Vec<[f64; 2]>>,
}

impl WorldFrame {
    pub fn natural_earth() -> Self {
        let meridian = |lon: i32| -> Vec<[f64; 2]> {
            (-90..=90)
                .step_by(LINE_STEP_DEG as usize)
                .map(|lat| natural_earth(lon as f64, lat as f64))
                .collect()
        };
        let parallel = |lat: i32| -> Vec<[f64; 2]> {
            (-180..=180)
                .step_by(LINE_STEP_DEG as usize)
                .map(|lon| natural_earth(lon as f64, lat as f64))
                .collect()
        };

        let mut outline = meridian(-180);
        outline.extend(meridian(180).into_iter().rev());
        if let Some(&first) = outline.first() {
            outline.push(first);
        }

        let mut graticule: Vec<Vec<[f64; 2]>> = (-180 + GRATICULE_STEP_DEG..180)
            .step_by(GRATICULE_STEP_DEG as usize)
            .map(meridian)
            .collect();
        graticule.extend(
            (-90 + GRATICULE_STEP_DEG..90)
                .step_by(GRATICULE_STEP_DEG as usize)
                .map(parallel),
        );

        WorldFrame { outline, graticule }
    }
}

// ---------------------------------------------------------------------------
// Geo scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Projected position.
    pub position: [f64; 2],
    pub magnitude: f64,
    pub size: f64,
    pub color: Rgb,
    /// Hover label: the country, when known.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoScatter {
    pub title: &'static str,
    pub projection: &'static str,
    pub scale: ColorScale,
    pub domain: Option<(f64, f64)>,
    pub frame: WorldFrame,
    pub points: Vec<GeoPoint>,
}

/// The map, or the reason it cannot be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeoMap {
    Unavailable { missing: Vec<String> },
    Available(GeoScatter),
}

/// One point per row with finite coordinates, sized and coloured by
/// magnitude. Decided on schema presence alone: an empty view with both
/// coordinate columns still yields an (empty) map.
pub fn geo_map(view: &FilteredView<'_>) -> GeoMap {
    let missing = view.dataset().schema.missing_coordinates();
    if !missing.is_empty() {
        return GeoMap::Unavailable { missing };
    }

    let scale = ColorScale::viridis();
    let domain = value_domain(view.records().map(|r| r.magnitude));
    let max_magnitude = domain.map(|(_, hi)| hi).unwrap_or(0.0);

    let points = view
        .records()
        .filter_map(|r| {
            let latitude = r.latitude.filter(|v| v.is_finite())?;
            let longitude = r.longitude.filter(|v| v.is_finite())?;
            let size = if max_magnitude > 0.0 {
                (r.magnitude / max_magnitude).max(0.0) * MAX_MARKER_SIZE
            } else {
                MAX_MARKER_SIZE / 2.0
            };
            let color = match domain {
                Some(domain) => scale.color_for(r.magnitude, domain),
                None => Rgb::MISSING,
            };
            Some(GeoPoint {
                latitude,
                longitude,
                position: natural_earth(longitude, latitude),
                magnitude: r.magnitude,
                size,
                color,
                label: r.country.clone(),
            })
        })
        .collect();

    GeoMap::Available(GeoScatter {
        title: "Global Earthquake Locations",
        projection: "natural earth",
        scale,
        domain,
        frame: WorldFrame::natural_earth(),
        points,
    })
}
