//! CLI argument parsing for the advisory flows.
//!
//! The CLI is intentionally thin: it wires arguments to client flows
//! without embedding endpoint policy or rendering rules, so the same
//! client can be driven by other hosts.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the advisory client.
///
/// Keeping a single `RootArgs` type makes command routing obvious and
/// avoids hidden defaults in subcommand constructors.
#[derive(Parser, Debug)]
#[command(
    name = "cropcast",
    version,
    about = "Crop advisory client: prediction, cultivation guides, weather",
    after_help = "Commands:\n  predict   Recommend a crop from seven field measurements\n  guide     Fetch the cultivation guide for a crop\n  weather   Show current conditions and the daily forecast\n\nExamples:\n  cropcast predict --n 90 --p 42 --k 43 --temperature 21 --humidity 82 --ph 6.5 --rainfall 203\n  cropcast predict --n 90 --p 42 --k 43 --temperature 21 --humidity 82 --ph 6.5 --rainfall 203 --with-guide\n  cropcast guide rice\n  cropcast weather --city Pune\n  cropcast weather --lat 18.52 --lon 73.86 --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Path to config.json (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level advisory commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Predict(PredictArgs),
    Guide(GuideArgs),
    Weather(WeatherArgs),
}

/// Predict command inputs: the seven measurements, kept as raw text so
/// validation owns all interpretation.
#[derive(Parser, Debug)]
#[command(about = "Recommend a crop from field measurements")]
pub struct PredictArgs {
    /// Nitrogen ratio (0 - 200)
    #[arg(long, value_name = "VALUE")]
    pub n: String,

    /// Phosphorus ratio (0 - 150)
    #[arg(long, value_name = "VALUE")]
    pub p: String,

    /// Potassium ratio (0 - 150)
    #[arg(long, value_name = "VALUE")]
    pub k: String,

    /// Temperature in degrees Celsius (0 - 50)
    #[arg(long, value_name = "VALUE")]
    pub temperature: String,

    /// Relative humidity in percent (0 - 100)
    #[arg(long, value_name = "VALUE")]
    pub humidity: String,

    /// Soil pH (0 - 14)
    #[arg(long, value_name = "VALUE")]
    pub ph: String,

    /// Rainfall in millimetres (0 - 500)
    #[arg(long, value_name = "VALUE")]
    pub rainfall: String,

    /// Also fetch the cultivation guide for the predicted crop
    #[arg(long)]
    pub with_guide: bool,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Guide command inputs for one crop lookup.
#[derive(Parser, Debug)]
#[command(about = "Fetch the cultivation guide for a crop")]
pub struct GuideArgs {
    /// Crop to look up; matching is case-insensitive
    #[arg(value_name = "CROP")]
    pub query: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Weather command inputs: a city name, or coordinates standing in for
/// a geolocation source.
#[derive(Parser, Debug)]
#[command(about = "Show current conditions and the daily forecast")]
pub struct WeatherArgs {
    /// City to look up
    #[arg(long, value_name = "NAME", conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude of the location
    #[arg(long, value_name = "DEG", requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the location
    #[arg(long, value_name = "DEG", requires = "lat")]
    pub lon: Option<f64>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}
