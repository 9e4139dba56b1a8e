use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

#[derive(Deserialize)]
pub struct MeteoResponse {
    #[serde(default)]
    pub utc_offset_seconds: i64,
    pub daily: Option<DailyBlock>,
    pub hourly: Option<PressureSeries>,
}

#[derive(Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub temperature_2m_min: Vec<f64>,
    pub temperature_2m_max: Vec<f64>,
    pub weathercode: Vec<u8>,
    pub sunshine_duration: Vec<f64>,
}

/// Hourly surface pressure readings, timestamps are kept as the upstream
/// delivers them: ISO-8601 wall clock time at the forecast location, in
/// ascending order
#[derive(Debug, Clone, Deserialize)]
pub struct PressureSeries {
    pub time: Vec<String>,
    pub surface_pressure: Vec<f64>,
}

#[derive(Debug, Copy, Clone, Serialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub weather_code: u8,
    pub temp_min: f64,
    pub temp_max: f64,
    pub sunshine_seconds: f64,
}

/// A forecast in domain form, daily values validated and converted, the
/// pressure series passed through as received
#[derive(Debug, Clone)]
pub struct Forecast {
    pub utc_offset_seconds: i64,
    pub days: Vec<ForecastDay>,
    pub pressure: Option<PressureSeries>,
}
