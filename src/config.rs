use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::DEFAULT_MIN_MAGNITUDE;

pub const DEFAULT_DATA_PATH: &str = "data/global_earthquake_tsunami_risk.csv";

/// Global Earthquake & Tsunami Risk Dashboard.
///
/// Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=quake_dash=debug`).
#[derive(Debug, Clone, Parser)]
#[command(name = "quake-dash", version, about)]
pub struct DashboardConfig {
    /// Earthquake table to load (.csv or .parquet)
    #[arg(default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Initial position of the minimum-magnitude slider
    #[arg(long, default_value_t = DEFAULT_MIN_MAGNITUDE)]
    pub min_magnitude: f64,

    /// Print the page for the initial filters as JSON and exit
    #[arg(long)]
    pub dump_json: bool,
}
