//! Domain payloads and the wire shapes of the three collaborators.
//!
//! Wire types tolerate extra fields, since the services own their
//! schemas; only the fields consumed here are declared.

use anyhow::{anyhow, Context};
use chrono::NaiveDateTime;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::forecast::ForecastSample;

/// Asset base for weather condition icons.
pub const ICON_BASE: &str = "https://openweathermap.org/img/wn";

/// Icon asset URL for a condition icon id at a given scale ("2x", "4x").
pub fn icon_url(icon_id: &str, scale: &str) -> String {
    format!("{ICON_BASE}/{icon_id}@{scale}.png")
}

/// Crop label returned by the prediction service, verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_label: String,
}

/// 2xx envelope of the cultivation endpoint.
///
/// A missing or null `crop` object means the guide is not written yet,
/// which is a different condition from a failed request.
#[derive(Debug, Deserialize)]
pub struct CultivationEnvelope {
    #[serde(default)]
    pub crop: Option<CultivationGuide>,
}

/// A cultivation guide: titled topic steps plus an estimated cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultivationGuide {
    pub name: String,
    /// Topic to prose description, in payload order. The service writes
    /// guides with steps in cultivation order, so order is meaning.
    #[serde(
        deserialize_with = "steps_in_order",
        serialize_with = "steps_as_map"
    )]
    pub steps: Vec<(String, String)>,
    pub cost: f64,
}

fn steps_in_order<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StepsVisitor;

    impl<'de> Visitor<'de> for StepsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of step topics to descriptions")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut steps = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((topic, description)) = access.next_entry::<String, String>()? {
                steps.push((topic, description));
            }
            Ok(steps)
        }
    }

    deserializer.deserialize_map(StepsVisitor)
}

fn steps_as_map<S>(steps: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(steps.len()))?;
    for (topic, description) in steps {
        map.serialize_entry(topic, description)?;
    }
    map.end()
}

/// Current conditions for a location, reduced to what gets rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub location_name: String,
    pub description: String,
    pub icon_id: String,
}

impl WeatherSnapshot {
    /// Icon asset URL at the given scale, e.g. `"4x"`.
    pub fn icon_url(&self, scale: &str) -> String {
        icon_url(&self.icon_id, scale)
    }
}

/// Wire shape of the current-weather endpoint.
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub weather: Vec<ConditionReading>,
    pub main: MainReading,
    pub name: String,
}

/// One condition entry; the first entry is the headline condition.
#[derive(Debug, Deserialize)]
pub struct ConditionReading {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct MainReading {
    pub temp: f64,
}

impl CurrentWeatherResponse {
    /// Collapse the wire shape to the snapshot the caller renders.
    pub fn into_snapshot(self) -> anyhow::Result<WeatherSnapshot> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("weather response carried no condition entries"))?;
        Ok(WeatherSnapshot {
            temperature: self.main.temp,
            location_name: self.name,
            description: condition.description,
            icon_id: condition.icon,
        })
    }
}

/// Wire shape of the forecast endpoint: a list of sub-daily entries.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    pub dt_txt: String,
    pub main: MainReading,
    pub weather: Vec<ConditionReading>,
}

impl ForecastEntry {
    /// Parse the wire entry into a dated sample.
    ///
    /// The calendar day is derived from `dt_txt` ("YYYY-MM-DD HH:MM:SS"
    /// in the service's timezone). A malformed timestamp or an empty
    /// condition list is an error for the caller to classify.
    pub fn into_sample(self) -> anyhow::Result<ForecastSample> {
        let timestamp = NaiveDateTime::parse_from_str(&self.dt_txt, "%Y-%m-%d %H:%M:%S")
            .with_context(|| format!("parse forecast timestamp {:?}", self.dt_txt))?;
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("forecast entry {} carried no condition entries", self.dt_txt))?;
        Ok(ForecastSample {
            timestamp,
            date: timestamp.date(),
            temperature: self.main.temp,
            description: condition.description,
            icon_id: condition.icon,
        })
    }
}
