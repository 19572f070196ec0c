//! Endpoint configuration for the three collaborator services.
//!
//! Configuration is resolved once at startup and handed to the client
//! as a plain value; no flow reads the environment on its own.
//!
//! Resolution priority per field:
//! 1. the JSON config file (`--config PATH`, else
//!    `<config dir>/cropcast/config.json`)
//! 2. the matching `CROPCAST_*` environment variable
//! 3. the built-in default (weather URL only)

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Public OpenWeatherMap API base used when no weather URL is set.
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

const PREDICTION_URL_VAR: &str = "CROPCAST_PREDICTION_URL";
const CULTIVATION_URL_VAR: &str = "CROPCAST_CULTIVATION_URL";
const WEATHER_URL_VAR: &str = "CROPCAST_WEATHER_URL";
const WEATHER_KEY_VAR: &str = "CROPCAST_WEATHER_KEY";

/// On-disk shape of `config.json`. Unknown keys are rejected so typos
/// do not silently fall through to environment lookups.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    prediction_url: Option<String>,
    #[serde(default)]
    cultivation_url: Option<String>,
    #[serde(default)]
    weather_url: Option<String>,
    #[serde(default)]
    weather_key: Option<String>,
}

/// Fully resolved endpoints and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryConfig {
    /// Full URL of the prediction endpoint (POST target).
    pub prediction_url: String,
    /// Base URL of the cultivation service.
    pub cultivation_url: String,
    /// Base URL of the weather service.
    pub weather_url: String,
    /// API key appended to every weather request.
    pub weather_key: String,
}

impl AdvisoryConfig {
    /// Resolve configuration, reading the explicit file when given.
    ///
    /// A missing explicit file is an error; a missing default file just
    /// defers every field to the environment.
    pub fn load(explicit: Option<&Path>) -> Result<AdvisoryConfig> {
        let file = match config_path(explicit) {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "reading config file");
                read_config_file(&path)?
            }
            Some(path) if explicit.is_some() => {
                return Err(anyhow!("config file not found: {}", path.display()));
            }
            _ => ConfigFile::default(),
        };
        Self::resolve(file)
    }

    fn resolve(file: ConfigFile) -> Result<AdvisoryConfig> {
        Ok(AdvisoryConfig {
            prediction_url: require(file.prediction_url, PREDICTION_URL_VAR, "prediction_url")?,
            cultivation_url: require(
                file.cultivation_url,
                CULTIVATION_URL_VAR,
                "cultivation_url",
            )?,
            weather_url: resolve_field(file.weather_url, WEATHER_URL_VAR)
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
            weather_key: require(file.weather_key, WEATHER_KEY_VAR, "weather_key")?,
        })
    }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    dirs::config_dir().map(|dir| dir.join("cropcast/config.json"))
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read config {}", path.display()))?;
    let file: ConfigFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(file)
}

fn resolve_field(file_value: Option<String>, var: &str) -> Option<String> {
    file_value
        .or_else(|| env::var(var).ok())
        .filter(|value| !value.trim().is_empty())
}

fn require(file_value: Option<String>, var: &str, key: &str) -> Result<String> {
    resolve_field(file_value, var)
        .ok_or_else(|| anyhow!("missing {key}: set it in config.json or export {var}"))
}
