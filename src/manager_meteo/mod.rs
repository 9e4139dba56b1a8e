pub mod errors;
pub mod models;

use std::time::Duration;
use chrono::NaiveDate;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use crate::manager_meteo::errors::MeteoError;
use crate::manager_meteo::models::{DailyBlock, Forecast, ForecastDay, MeteoResponse};

/// Settings for the Open-Meteo forecast client
#[derive(Debug, Clone, Deserialize)]
pub struct MeteoConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Forecast horizon in days (1-16)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_forecast_days() -> u8 {
    7
}

impl Default for MeteoConfig {
    fn default() -> Self {
        MeteoConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

/// Struct for managing weather forecasts produced by Open-Meteo
#[derive(Clone)]
pub struct Meteo {
    client: Client,
    base_url: String,
    forecast_days: u8,
}

impl Meteo {
    /// Returns a Meteo struct ready for fetching and processing weather
    /// forecasts from Open-Meteo
    ///
    /// # Arguments
    ///
    /// * 'config' - base url, request timeout and forecast horizon
    pub fn new(config: &MeteoConfig) -> Result<Meteo, MeteoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            forecast_days: config.forecast_days.clamp(1, 16),
        })
    }

    /// Retrieves a weather forecast from Open-Meteo for the given location.
    /// The raw forecast holds one array per daily field plus the hourly
    /// surface pressure series; the daily arrays are validated and converted
    /// into one value set per day.
    ///
    /// Timestamps in the forecast are local wall clock time at the location
    /// (timezone=auto), the reported UTC offset is carried along so consumers
    /// can compute "now" in the same reference.
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude of the location
    /// * 'long' - longitude of the location
    pub async fn fetch_forecast(&self, lat: f64, long: f64) -> Result<Forecast, MeteoError> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}\
            &daily=temperature_2m_max,temperature_2m_min,weathercode,sunshine_duration\
            &hourly=surface_pressure&timezone=auto&forecast_days={}",
            self.base_url, lat, long, self.forecast_days);

        debug!("fetching forecast from {}", url);

        let req = self.client
            .get(url)
            .send().await?;

        let status = req.status();
        if !status.is_success() {
            return Err(MeteoError::Meteo(format!("Error while fetching forecast from Open-Meteo: {}", status)));
        }

        let json = req.text().await?;
        let response: MeteoResponse = serde_json::from_str(&json)?;

        let daily = response.daily
            .ok_or_else(|| MeteoError::Document("no daily group in forecast".to_string()))?;

        Ok(Forecast {
            utc_offset_seconds: response.utc_offset_seconds,
            days: convert_days(&daily)?,
            pressure: response.hourly,
        })
    }
}

/// Converts the raw daily arrays into per day values, verifying that every
/// field covers the same days
///
/// # Arguments
///
/// * 'daily' - raw daily group from the forecast response
fn convert_days(daily: &DailyBlock) -> Result<Vec<ForecastDay>, MeteoError> {
    let len = daily.time.len();
    if len == 0 {
        return Err(MeteoError::Document("forecast contains no days".to_string()));
    }
    if daily.temperature_2m_min.len() != len
        || daily.temperature_2m_max.len() != len
        || daily.weathercode.len() != len
        || daily.sunshine_duration.len() != len
    {
        return Err(MeteoError::Document("daily arrays differ in length".to_string()));
    }

    let mut days: Vec<ForecastDay> = Vec::with_capacity(len);

    for i in 0..len {
        let date = NaiveDate::parse_from_str(&daily.time[i], "%Y-%m-%d")
            .map_err(|e| MeteoError::Document(format!("invalid forecast date '{}': {}", daily.time[i], e)))?;

        days.push(ForecastDay {
            date,
            weather_code: daily.weathercode[i],
            temp_min: daily.temperature_2m_min[i],
            temp_max: daily.temperature_2m_max[i],
            sunshine_seconds: daily.sunshine_duration[i],
        });
    }

    Ok(days)
}
