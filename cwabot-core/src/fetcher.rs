//! Client for the CWA (中央氣象署) 36-hour forecast datastore.
//!
//! One bounded GET per fetch, no retries: any retry or backoff policy belongs
//! to the layer driving the bot, not here. Certificate validation stays on.

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog;
use crate::format::{self, RawPeriod};
use crate::model::{Forecast, ForecastError, PERIOD_COUNT};

/// F-C0032-001: general weather forecast, 36 hours, by city/county.
const CWA_FORECAST_URL: &str = "https://opendata.cwa.gov.tw/api/v1/rest/datastore/F-C0032-001";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The five weather elements a usable record must carry.
const REQUIRED_ELEMENTS: [&str; 5] = ["Wx", "CI", "MinT", "MaxT", "PoP"];

/// Source of 36-hour forecasts. The reply policy only sees this trait, so
/// tests can substitute a scripted source for the real HTTP client.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch(&self, location: &str) -> Result<Forecast, ForecastError>;
}

#[derive(Debug, Clone)]
pub struct CwaFetcher {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl CwaFetcher {
    /// A missing key is accepted here and surfaces as
    /// [`ForecastError::ApiKeyMissing`] at fetch time.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: CWA_FORECAST_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Point the fetcher at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ForecastSource for CwaFetcher {
    async fn fetch(&self, location: &str) -> Result<Forecast, ForecastError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ForecastError::ApiKeyMissing)?;

        if !catalog::is_supported(location) {
            return Err(ForecastError::UnsupportedLocation(location.to_string()));
        }

        debug!(location, "fetching 36-hour forecast");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("Authorization", api_key), ("locationName", location)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ForecastError::Timeout
                } else {
                    ForecastError::Network(e.to_string())
                }
            })?;

        let status = res.status();
        if !status.is_success() {
            warn!(location, status = status.as_u16(), "CWA request failed");
            return Err(ForecastError::Transport(status.as_u16()));
        }

        let body = res.text().await.map_err(|e| {
            if e.is_timeout() {
                ForecastError::Timeout
            } else {
                ForecastError::Network(e.to_string())
            }
        })?;

        let parsed: CwaResponse =
            serde_json::from_str(&body).map_err(|e| ForecastError::Parse(e.to_string()))?;

        let forecast = build_forecast(parsed)?;
        debug!(location = %forecast.location_name, periods = forecast.periods.len(), "forecast parsed");
        Ok(forecast)
    }
}

/// Validate the record structure and zip the first three windows of each
/// element into [`PeriodForecast`]s.
fn build_forecast(parsed: CwaResponse) -> Result<Forecast, ForecastError> {
    let record = parsed
        .records
        .location
        .into_iter()
        .next()
        .ok_or_else(|| ForecastError::Parse("response contained no location record".to_string()))?;

    let mut elements: HashMap<String, Vec<CwaTimeEntry>> = record
        .weather_element
        .into_iter()
        .map(|el| (el.element_name, el.time))
        .collect();

    let mut take = |name: &str| -> Result<Vec<CwaTimeEntry>, ForecastError> {
        let entries = elements
            .remove(name)
            .ok_or_else(|| ForecastError::Parse(format!("missing weather element {name}")))?;
        if entries.len() < PERIOD_COUNT {
            return Err(ForecastError::Parse(format!(
                "element {name} has {} time entries, expected at least {PERIOD_COUNT}",
                entries.len()
            )));
        }
        Ok(entries)
    };

    let [wx_name, ci_name, min_name, max_name, pop_name] = REQUIRED_ELEMENTS;
    let wx = take(wx_name)?;
    let ci = take(ci_name)?;
    let min_t = take(min_name)?;
    let max_t = take(max_name)?;
    let pop = take(pop_name)?;

    let mut periods = Vec::with_capacity(PERIOD_COUNT);
    for i in 0..PERIOD_COUNT {
        let start = parse_cwa_time(&wx[i].start_time)?;
        let end = parse_cwa_time(&wx[i].end_time)?;

        let raw = RawPeriod {
            start,
            end,
            weather: wx[i].parameter.parameter_name.clone(),
            comfort: ci[i].parameter.parameter_name.clone(),
            min_temp: parse_temp(&min_t[i].parameter.parameter_name, min_name)?,
            max_temp: parse_temp(&max_t[i].parameter.parameter_name, max_name)?,
            rain_pop: parse_pop(&pop[i].parameter.parameter_name)?,
        };
        periods.push(format::derive_period(i, raw));
    }

    Ok(Forecast { location_name: record.location_name, periods })
}

fn parse_cwa_time(value: &str) -> Result<NaiveDateTime, ForecastError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| ForecastError::Parse(format!("unparseable timestamp {value:?}")))
}

fn parse_temp(value: &str, element: &str) -> Result<i32, ForecastError> {
    value
        .trim()
        .parse()
        .map_err(|_| ForecastError::Parse(format!("{element} value {value:?} is not an integer")))
}

fn parse_pop(value: &str) -> Result<u8, ForecastError> {
    let pop: u8 = value
        .trim()
        .parse()
        .map_err(|_| ForecastError::Parse(format!("PoP value {value:?} is not an integer")))?;
    if pop > 100 {
        return Err(ForecastError::Parse(format!("PoP value {pop} is out of range")));
    }
    Ok(pop)
}

#[derive(Debug, Deserialize)]
struct CwaResponse {
    records: CwaRecords,
}

#[derive(Debug, Deserialize)]
struct CwaRecords {
    location: Vec<CwaLocation>,
}

#[derive(Debug, Deserialize)]
struct CwaLocation {
    #[serde(rename = "locationName")]
    location_name: String,
    #[serde(rename = "weatherElement")]
    weather_element: Vec<CwaElement>,
}

#[derive(Debug, Deserialize)]
struct CwaElement {
    #[serde(rename = "elementName")]
    element_name: String,
    time: Vec<CwaTimeEntry>,
}

#[derive(Debug, Deserialize)]
struct CwaTimeEntry {
    #[serde(rename = "startTime")]
    start_time: String,
    #[serde(rename = "endTime")]
    end_time: String,
    parameter: CwaParameter,
}

#[derive(Debug, Deserialize)]
struct CwaParameter {
    #[serde(rename = "parameterName")]
    parameter_name: String,
}
