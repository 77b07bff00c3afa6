use serde::Serialize;

use super::value_domain;
use crate::color::{ColorScale, Rgb};
use crate::data::filter::FilteredView;

pub const TSUNAMI_OFF: Rgb = Rgb::from_hex(0x60A5FA);
pub const TSUNAMI_ON: Rgb = Rgb::from_hex(0xEF4444);

/// Which column drives point colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScatterColor {
    Tsunami,
    Magnitude,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub depth: f64,
    pub magnitude: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthMagnitudeScatter {
    pub title: &'static str,
    pub color_by: ScatterColor,
    pub scale: ColorScale,
    /// Value range mapped onto the scale, `None` when no point has a value.
    pub domain: Option<(f64, f64)>,
    pub points: Vec<ScatterPoint>,
}

/// Depth (x) against magnitude (y).
///
/// With a Tsunami column the flag picks between the two stops of a
/// blue-to-red gradient over the fixed `0..=1` domain; rows with no flag
/// get the missing colour. Without it, points follow Plasma over the
/// observed magnitude range.
pub fn depth_magnitude_scatter(view: &FilteredView<'_>) -> DepthMagnitudeScatter {
    let (color_by, title, scale, domain) = if view.dataset().schema.has_tsunami() {
        (
            ScatterColor::Tsunami,
            "Depth vs Magnitude (Colored by Tsunami)",
            ColorScale::two_stop("Tsunami", TSUNAMI_OFF, TSUNAMI_ON),
            Some((0.0, 1.0)),
        )
    } else {
        (
            ScatterColor::Magnitude,
            "Depth vs Magnitude",
            ColorScale::plasma(),
            value_domain(view.records().map(|r| r.magnitude)),
        )
    };

    let points = view
        .records()
        .map(|r| {
            let value = match color_by {
                ScatterColor::Tsunami => r.tsunami.unwrap_or(f64::NAN),
                ScatterColor::Magnitude => r.magnitude,
            };
            let color = match domain {
                Some(domain) => scale.color_for(value, domain),
                None => Rgb::MISSING,
            };
            ScatterPoint {
                depth: r.depth,
                magnitude: r.magnitude,
                color,
            }
        })
        .collect();

    DepthMagnitudeScatter {
        title,
        color_by,
        scale,
        domain,
        points,
    }
}
