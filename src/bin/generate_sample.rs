use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Kept apart from the shipped `data/global_earthquake_tsunami_risk.csv`.
const DEFAULT_OUTPUT: &str = "data/sample_earthquakes.csv";
const EVENT_COUNT: usize = 300;

/// Seismic regions: (country, latitude, longitude, spread in degrees).
const REGIONS: &[(&str, f64, f64, f64)] = &[
    ("Japan", 37.0, 141.0, 4.0),
    ("Indonesia", -3.0, 120.0, 8.0),
    ("Chile", -28.0, -71.0, 6.0),
    ("Peru", -12.0, -76.0, 3.0),
    ("Mexico", 17.0, -99.0, 3.0),
    ("United States", 55.0, -155.0, 6.0),
    ("Philippines", 11.0, 125.0, 4.0),
    ("Papua New Guinea", -5.5, 149.0, 3.0),
    ("Vanuatu", -16.0, 168.0, 2.0),
    ("Tonga", -20.0, -174.5, 2.0),
    ("New Zealand", -40.0, 175.0, 3.0),
    ("Turkey", 39.0, 35.0, 3.0),
    ("Iran", 31.0, 55.0, 4.0),
    ("China", 33.0, 100.0, 6.0),
    ("Nepal", 28.0, 85.0, 1.5),
    ("Ecuador", -1.5, -79.0, 1.5),
    ("Russia", 52.0, 158.0, 4.0),
];

#[derive(Debug, Serialize)]
struct Event {
    #[serde(rename = "Magnitude")]
    magnitude: f64,
    #[serde(rename = "Depth")]
    depth: f64,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Tsunami")]
    tsunami: i64,
    #[serde(rename = "Year")]
    year: i64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn exponential(&mut self, mean: f64) -> f64 {
        -mean * self.next_f64().max(1e-15).ln()
    }
}

fn generate_events(rng: &mut SimpleRng) -> Vec<Event> {
    (0..EVENT_COUNT)
        .map(|_| {
            let (country, lat0, lon0, spread) = REGIONS[rng.below(REGIONS.len())];
            // Gutenberg-Richter-like tail above the catalogue threshold.
            let magnitude = (6.5 + rng.exponential(0.45)).min(9.1);
            let depth = (rng.exponential(60.0) + 2.0).min(670.0);
            let latitude = (lat0 + rng.gauss(0.0, spread)).clamp(-89.0, 89.0);
            let mut longitude = lon0 + rng.gauss(0.0, spread);
            if longitude > 180.0 {
                longitude -= 360.0;
            } else if longitude < -180.0 {
                longitude += 360.0;
            }
            // Offshore events are recorded without a country.
            let offshore = rng.next_f64() < 0.08;
            let tsunami_odds = 0.15 + 0.25 * (magnitude - 6.5) - depth / 1000.0;
            let tsunami = i64::from(rng.next_f64() < tsunami_odds);

            Event {
                magnitude: (magnitude * 10.0).round() / 10.0,
                depth: (depth * 10.0).round() / 10.0,
                country: (!offshore).then(|| country.to_string()),
                latitude: (latitude * 1000.0).round() / 1000.0,
                longitude: (longitude * 1000.0).round() / 1000.0,
                tsunami,
                year: 2001 + rng.below(22) as i64,
            }
        })
        .collect()
}

fn write_csv(path: &Path, events: &[Event]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    for event in events {
        writer.serialize(event).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(path: &Path, events: &[Event]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Magnitude", DataType::Float64, false),
        Field::new("Depth", DataType::Float64, false),
        Field::new("Country", DataType::Utf8, true),
        Field::new("Latitude", DataType::Float64, false),
        Field::new("Longitude", DataType::Float64, false),
        Field::new("Tsunami", DataType::Int64, false),
        Field::new("Year", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from_iter_values(events.iter().map(|e| e.magnitude))),
            Arc::new(Float64Array::from_iter_values(events.iter().map(|e| e.depth))),
            Arc::new(StringArray::from_iter(events.iter().map(|e| e.country.as_deref()))),
            Arc::new(Float64Array::from_iter_values(events.iter().map(|e| e.latitude))),
            Arc::new(Float64Array::from_iter_values(events.iter().map(|e| e.longitude))),
            Arc::new(Int64Array::from_iter_values(events.iter().map(|e| e.tsunami))),
            Arc::new(Int64Array::from_iter_values(events.iter().map(|e| e.year))),
        ],
    )
    .context("building record batch")?;

    let preview = arrow::util::pretty::pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])
        .context("formatting preview")?;
    log::info!("First generated rows:\n{preview}");

    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut rng = SimpleRng::new(42);
    let events = generate_events(&mut rng);

    let is_parquet = output_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&output_path, &events)?;
    } else {
        write_csv(&output_path, &events)?;
    }

    println!(
        "Wrote {} earthquakes ({} with tsunami) to {}",
        events.len(),
        events.iter().filter(|e| e.tsunami == 1).count(),
        output_path.display()
    );
    Ok(())
}
