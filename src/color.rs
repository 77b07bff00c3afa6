use std::fmt;

use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Rgb – an sRGB triplet that serializes as `#rrggbb`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Colour for values a scale cannot place (NaN).
    pub const MISSING: Rgb = Rgb::from_hex(0x9CA3AF);

    pub const fn from_hex(hex: u32) -> Self {
        Rgb([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8])
    }

    pub fn to_color32(self) -> Color32 {
        let [r, g, b] = self.0;
        Color32::from_rgb(r, g, b)
    }

    fn to_linear(self) -> LinSrgb {
        let [r, g, b] = self.0;
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    }

    fn from_linear(lin: LinSrgb) -> Self {
        let srgb: Srgb<f32> = Srgb::from_linear(lin);
        let srgb: Srgb<u8> = srgb.into_format();
        Rgb([srgb.red, srgb.green, srgb.blue])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// A continuous scale of evenly spaced stops, interpolated in linear sRGB.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    pub name: &'static str,
    pub stops: Vec<Rgb>,
}

impl ColorScale {
    fn from_hexes(name: &'static str, hexes: &[u32]) -> Self {
        ColorScale {
            name,
            stops: hexes.iter().copied().map(Rgb::from_hex).collect(),
        }
    }

    /// Two-stop gradient for a 0/1 flag.
    pub fn two_stop(name: &'static str, off: Rgb, on: Rgb) -> Self {
        ColorScale {
            name,
            stops: vec![off, on],
        }
    }

    pub fn plasma() -> Self {
        Self::from_hexes(
            "Plasma",
            &[
                0x0D0887, 0x46039F, 0x7201A8, 0x9C179E, 0xBD3786, 0xD8576B, 0xED7953, 0xFB9F3A,
                0xFDCA26, 0xF0F921,
            ],
        )
    }

    pub fn viridis() -> Self {
        Self::from_hexes(
            "Viridis",
            &[
                0x440154, 0x482878, 0x3E4989, 0x31688E, 0x26828E, 0x1F9E89, 0x35B779, 0x6ECE58,
                0xB5DE2B, 0xFDE725,
            ],
        )
    }

    pub fn blues() -> Self {
        Self::from_hexes(
            "Blues",
            &[
                0xF7FBFF, 0xDEEBF7, 0xC6DBEF, 0x9ECAE1, 0x6BAED6, 0x4292C6, 0x2171B5, 0x08519C,
                0x08306B,
            ],
        )
    }

    /// Colour at position `t` in `[0, 1]` (clamped). NaN maps to `Rgb::MISSING`.
    pub fn sample(&self, t: f64) -> Rgb {
        if t.is_nan() || self.stops.is_empty() {
            return Rgb::MISSING;
        }
        if self.stops.len() == 1 {
            return self.stops[0];
        }
        let pos = t.clamp(0.0, 1.0) * (self.stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(self.stops.len() - 2);
        let frac = (pos - i as f64) as f32;
        let a = self.stops[i].to_linear();
        let b = self.stops[i + 1].to_linear();
        Rgb::from_linear(a.mix(b, frac))
    }

    /// Colour for `value` within `domain`. A degenerate domain maps to the
    /// middle of the scale.
    pub fn color_for(&self, value: f64, domain: (f64, f64)) -> Rgb {
        if value.is_nan() {
            return Rgb::MISSING;
        }
        let (lo, hi) = domain;
        let span = hi - lo;
        let t = if span > 0.0 { (value - lo) / span } else { 0.5 };
        self.sample(t)
    }
}
