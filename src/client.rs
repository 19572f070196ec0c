//! The advisory client: validation, lifecycles, and the three HTTP
//! collaborators behind one stateful facade.
//!
//! Every flow follows the same discipline: exactly one network call per
//! trigger, no retries, and a terminal state whose message is exactly
//! what the user should read.

use std::time::Instant;

use crate::config::AdvisoryConfig;
use crate::error::FlowError;
use crate::forecast::{dedupe_daily, DailyForecast};
use crate::lifecycle::{RequestLifecycle, RequestState};
use crate::model::{
    CultivationEnvelope, CultivationGuide, CurrentWeatherResponse, ForecastResponse,
    PredictionResult, WeatherSnapshot,
};
use crate::validate::{submittable, validate, Field, MeasurementForm, ValidationErrors};

/// Lifecycle state of one advisory flow.
pub type FlowState<T> = RequestState<T, FlowError>;

const BLOCKED_SUBMISSION: &str = "Please correct the input errors.";
const PREDICTION_FAILED: &str = "Failed to fetch prediction. Please try again.";
const CROP_NOT_FOUND: &str = "Crop data not found.";
const CROP_PENDING: &str = "Crop details will be available soon.";
const WEATHER_FAILED: &str = "Failed to fetch weather data.";
const FORECAST_FAILED: &str = "Failed to fetch forecast data.";
const WEATHER_INCOMPLETE: &str = "Weather data is unavailable right now.";
const FORECAST_INCOMPLETE: &str = "Forecast data is unavailable right now.";
const ENTER_CITY: &str = "Please enter a city";
const NO_LOCATION: &str = "No location available. Provide a city name or coordinates.";

/// Where a weather lookup points.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text city name, sent as the `q` parameter.
    City(String),
    /// Coordinates, e.g. from a host geolocation source.
    Coords { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Build a query from whatever location inputs the host has.
    ///
    /// A city is preferred over coordinates when both are present. A
    /// blank city is a validation failure; no inputs at all means the
    /// host has no location source, an environment failure.
    pub fn from_host(
        city: Option<String>,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<LocationQuery, FlowError> {
        match (city, lat, lon) {
            (Some(city), _, _) => {
                let trimmed = city.trim();
                if trimmed.is_empty() {
                    return Err(FlowError::Validation(ENTER_CITY.to_string()));
                }
                Ok(LocationQuery::City(trimmed.to_string()))
            }
            (None, Some(lat), Some(lon)) => Ok(LocationQuery::Coords { lat, lon }),
            _ => Err(FlowError::Environment(NO_LOCATION.to_string())),
        }
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(city) => vec![("q", city.clone())],
            LocationQuery::Coords { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

/// Normalize free-text crop search input into a guide id.
///
/// Shared by every path that routes into the cultivation flow: trimmed,
/// rejected when blank, lowercased.
pub fn normalize_guide_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Stateful client driving the prediction, cultivation, and weather
/// flows against configured endpoints.
pub struct AdvisoryClient {
    config: AdvisoryConfig,
    agent: ureq::Agent,
    form: MeasurementForm,
    errors: ValidationErrors,
    prediction: RequestLifecycle<PredictionResult, FlowError>,
    guide: RequestLifecycle<CultivationGuide, FlowError>,
    weather: RequestLifecycle<WeatherSnapshot, FlowError>,
    forecast: RequestLifecycle<DailyForecast, FlowError>,
}

impl AdvisoryClient {
    pub fn new(config: AdvisoryConfig) -> AdvisoryClient {
        AdvisoryClient {
            config,
            agent: ureq::Agent::new_with_defaults(),
            form: MeasurementForm::default(),
            errors: ValidationErrors::default(),
            prediction: RequestLifecycle::new(),
            guide: RequestLifecycle::new(),
            weather: RequestLifecycle::new(),
            forecast: RequestLifecycle::new(),
        }
    }

    /// The measurement form as currently entered.
    pub fn form(&self) -> &MeasurementForm {
        &self.form
    }

    /// Validation outcomes recorded so far.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Record one field input: store the raw value and merge that
    /// field's validation outcome, leaving other fields untouched.
    pub fn record_input(&mut self, field: Field, raw: &str) {
        self.errors.record(field, validate(field, raw));
        self.form.set(field, raw);
    }

    /// Drive the prediction flow: gate on validation, then POST the form.
    ///
    /// A blocked gate resolves the lifecycle without any network call.
    pub fn submit_measurements(&mut self) -> &FlowState<PredictionResult> {
        self.prediction.run(|| {
            if !submittable(&self.form, &self.errors) {
                tracing::debug!("submission blocked by validation");
                return Err(FlowError::Validation(BLOCKED_SUBMISSION.to_string()));
            }
            post_prediction(&self.agent, &self.config.prediction_url, &self.form)
        })
    }

    pub fn prediction_state(&self) -> &FlowState<PredictionResult> {
        self.prediction.state()
    }

    /// Guide id for the last successful prediction, ready for
    /// [`AdvisoryClient::fetch_guide`].
    pub fn recommended_guide_id(&self) -> Option<String> {
        self.prediction
            .success()
            .and_then(|prediction| normalize_guide_query(&prediction.predicted_label))
    }

    /// Fetch the cultivation guide with the given id.
    pub fn fetch_guide(&mut self, guide_id: &str) -> &FlowState<CultivationGuide> {
        self.guide
            .run(|| get_guide(&self.agent, &self.config.cultivation_url, guide_id))
    }

    pub fn guide_state(&self) -> &FlowState<CultivationGuide> {
        self.guide.state()
    }

    /// Fetch the current conditions snapshot for a location.
    pub fn fetch_current_weather(&mut self, location: &LocationQuery) -> &FlowState<WeatherSnapshot> {
        self.weather
            .run(|| get_current_weather(&self.agent, &self.config, location))
    }

    pub fn weather_state(&self) -> &FlowState<WeatherSnapshot> {
        self.weather.state()
    }

    /// Fetch the forecast series for a location, reduced to one sample
    /// per calendar day before it is stored.
    pub fn fetch_daily_forecast(&mut self, location: &LocationQuery) -> &FlowState<DailyForecast> {
        self.forecast
            .run(|| get_daily_forecast(&self.agent, &self.config, location))
    }

    pub fn forecast_state(&self) -> &FlowState<DailyForecast> {
        self.forecast.state()
    }
}

fn post_prediction(
    agent: &ureq::Agent,
    url: &str,
    form: &MeasurementForm,
) -> Result<PredictionResult, FlowError> {
    let started = Instant::now();
    // The wire body is one compact JSON object in field order.
    let body = serde_json::to_vec(form)
        .map_err(|err| transport("prediction", &err, PREDICTION_FAILED))?;
    let mut response = agent
        .post(url)
        .header("content-type", "application/json")
        .send(body.as_slice())
        .map_err(|err| transport("prediction", &err, PREDICTION_FAILED))?;
    let status = response.status().as_u16();
    let prediction: PredictionResult = response
        .body_mut()
        .read_json()
        .map_err(|err| payload("prediction", &err, PREDICTION_FAILED))?;
    let elapsed_ms = started.elapsed().as_millis();
    tracing::info!(flow = "prediction", status, elapsed_ms, "request complete");
    Ok(prediction)
}

fn get_guide(
    agent: &ureq::Agent,
    base: &str,
    guide_id: &str,
) -> Result<CultivationGuide, FlowError> {
    let started = Instant::now();
    let url = format!("{}/api/cultivation/{}", base.trim_end_matches('/'), guide_id);
    let mut response = agent
        .get(&url)
        .call()
        .map_err(|err| transport("cultivation", &err, CROP_NOT_FOUND))?;
    let status = response.status().as_u16();
    let envelope: CultivationEnvelope = response
        .body_mut()
        .read_json()
        .map_err(|err| payload("cultivation", &err, CROP_PENDING))?;
    let elapsed_ms = started.elapsed().as_millis();
    tracing::info!(flow = "cultivation", status, elapsed_ms, "request complete");
    envelope
        .crop
        .ok_or_else(|| FlowError::Payload(CROP_PENDING.to_string()))
}

fn get_current_weather(
    agent: &ureq::Agent,
    config: &AdvisoryConfig,
    location: &LocationQuery,
) -> Result<WeatherSnapshot, FlowError> {
    let response: CurrentWeatherResponse =
        weather_request(agent, config, "weather", location, WEATHER_FAILED, WEATHER_INCOMPLETE)?;
    response
        .into_snapshot()
        .map_err(|err| payload("weather", &err, WEATHER_INCOMPLETE))
}

fn get_daily_forecast(
    agent: &ureq::Agent,
    config: &AdvisoryConfig,
    location: &LocationQuery,
) -> Result<DailyForecast, FlowError> {
    let response: ForecastResponse = weather_request(
        agent,
        config,
        "forecast",
        location,
        FORECAST_FAILED,
        FORECAST_INCOMPLETE,
    )?;
    let mut samples = Vec::with_capacity(response.list.len());
    for entry in response.list {
        let sample = entry
            .into_sample()
            .map_err(|err| payload("forecast", &err, FORECAST_INCOMPLETE))?;
        samples.push(sample);
    }
    Ok(dedupe_daily(samples))
}

/// GET one weather endpoint with the shared query parameters.
fn weather_request<T: serde::de::DeserializeOwned>(
    agent: &ureq::Agent,
    config: &AdvisoryConfig,
    path: &'static str,
    location: &LocationQuery,
    transport_message: &str,
    payload_message: &str,
) -> Result<T, FlowError> {
    let started = Instant::now();
    let url = format!("{}/{}", config.weather_url.trim_end_matches('/'), path);
    let mut request = agent.get(&url);
    for (key, value) in location.pairs() {
        request = request.query(key, &value);
    }
    let mut response = request
        .query("units", "metric")
        .query("appid", &config.weather_key)
        .call()
        .map_err(|err| transport(path, &err, transport_message))?;
    let status = response.status().as_u16();
    let parsed: T = response
        .body_mut()
        .read_json()
        .map_err(|err| payload(path, &err, payload_message))?;
    let elapsed_ms = started.elapsed().as_millis();
    tracing::info!(flow = path, status, elapsed_ms, "request complete");
    Ok(parsed)
}

/// Classify a request that never produced a usable response.
fn transport<E: std::fmt::Display>(flow: &'static str, err: &E, message: &str) -> FlowError {
    tracing::info!(flow, error = %err, "request failed");
    FlowError::Transport(message.to_string())
}

/// Classify a 2xx response whose body did not hold what was expected.
fn payload<E: std::fmt::Display>(flow: &'static str, err: &E, message: &str) -> FlowError {
    tracing::info!(flow, error = %err, "response unusable");
    FlowError::Payload(message.to_string())
}
