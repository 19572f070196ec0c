//! Daily reduction of the sub-daily forecast series.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashSet;

use crate::model;

/// One forecast entry per retained calendar day, in day order.
pub type DailyForecast = Vec<ForecastSample>;

/// A single forecast reading, tagged with the calendar day it falls on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSample {
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    pub temperature: f64,
    pub description: String,
    pub icon_id: String,
}

impl ForecastSample {
    /// Icon asset URL at the given scale, e.g. `"2x"`.
    pub fn icon_url(&self, scale: &str) -> String {
        model::icon_url(&self.icon_id, scale)
    }
}

/// Collapse a chronologically ordered series to one sample per calendar
/// day, keeping the first sample seen for each date.
///
/// Output order is first-occurrence order, which for chronological
/// input is ascending day order. Every distinct day in the input is
/// retained; the series length is whatever the service supplied.
pub fn dedupe_daily(samples: Vec<ForecastSample>) -> DailyForecast {
    let mut seen = HashSet::new();
    samples
        .into_iter()
        .filter(|sample| seen.insert(sample.date))
        .collect()
}
